//! Views over a flattened store: the rule-set tree and plaintext files.

use dlc_core::geosite::{GeoSite, GeoSiteList, SiteDomain};
use dlc_core::types::{DomainEntry, ListName, MatchType};

use crate::error::CompileError;
use crate::filter::ExclusionPolicy;
use crate::store::ListStore;

/// Build the rule-set tree for the given lists, in the given order.
///
/// Each list is filtered through `policy`. A list whose entries are all
/// excluded still produces an (empty) group.
pub fn build_tree<'a, I>(
    store: &ListStore,
    names: I,
    policy: &ExclusionPolicy,
) -> Result<GeoSiteList, CompileError>
where
    I: IntoIterator<Item = &'a ListName>,
{
    let mut tree = GeoSiteList::default();

    for name in names {
        let list = store.resolved(name)?;
        let kept = policy.apply(list);

        let mut site = GeoSite::new(name);
        site.domains = kept
            .into_iter()
            .map(|entry| SiteDomain {
                match_type: entry.match_type,
                value: entry.value,
                attributes: entry.attributes.into_iter().collect(),
            })
            .collect();

        let dropped = list.domains.len() - site.domains.len();
        if dropped > 0 {
            log::debug!("excluded {} entries from {}", dropped, name);
        }
        tree.entries.push(site);
    }

    Ok(tree)
}

/// Build the rule-set tree for every list in the store, sorted by name.
pub fn build_full_tree(
    store: &ListStore,
    policy: &ExclusionPolicy,
) -> Result<GeoSiteList, CompileError> {
    for name in policy.lists() {
        if !store.contains(name) {
            log::warn!("exclusion rule names unknown list {}", name);
        }
    }

    build_tree(store, store.names(), policy)
}

/// One rendered plaintext artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextFile {
    pub list: ListName,
    /// `<name>.txt`, using the name as requested.
    pub file_name: String,
    pub contents: String,
}

/// Render the requested lists as plaintext, one file per list, in request
/// order. No attribute filtering is applied.
pub fn render_plaintext<S>(store: &ListStore, requested: &[S]) -> Result<Vec<PlaintextFile>, CompileError>
where
    S: AsRef<str>,
{
    let mut files: Vec<PlaintextFile> = Vec::with_capacity(requested.len());

    for name in requested {
        let name = name.as_ref().trim();
        let list_name = ListName::new(name);
        if files.iter().any(|file| file.list == list_name) {
            continue;
        }

        let list = store.resolved(&list_name)?;
        let mut contents = String::new();
        for entry in list.domains.iter() {
            contents.push_str(&render_entry(entry));
            contents.push('\n');
        }

        files.push(PlaintextFile {
            list: list_name,
            file_name: format!("{name}.txt"),
            contents,
        });
    }

    Ok(files)
}

/// Source-syntax rendering of one entry. `Domain` is the default and is
/// written without a prefix.
pub fn render_entry(entry: &DomainEntry) -> String {
    match entry.match_type {
        MatchType::Domain => entry.value.clone(),
        other => format!("{}:{}", other.prefix(), entry.value),
    }
}
