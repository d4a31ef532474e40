use std::collections::BTreeMap;

use dlc_core::types::{Attribute, AttributeSet, DomainSet, ListName};

use crate::store::ResolvedList;

/// Entries of `list` that hold none of the `excluded` attributes.
///
/// Entries without attributes always survive. The resolved list is not
/// modified.
pub fn filter_entries(list: &ResolvedList, excluded: &AttributeSet) -> DomainSet {
    if excluded.is_empty() {
        return list.domains.clone();
    }
    list.domains.filtered(|entry| !entry.has_any(excluded))
}

/// Attributes to drop at export time, keyed per list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    rules: BTreeMap<ListName, AttributeSet>,
}

impl ExclusionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion set of `list`, dropping any earlier rule for it.
    pub fn exclude<I>(&mut self, list: impl AsRef<str>, attributes: I)
    where
        I: IntoIterator,
        I::Item: Into<Attribute>,
    {
        self.rules.insert(
            ListName::new(list),
            attributes.into_iter().map(Into::into).collect(),
        );
    }

    pub fn excluded_for(&self, list: &ListName) -> Option<&AttributeSet> {
        self.rules.get(list)
    }

    /// Filter a resolved list with the rule for its own name.
    pub fn apply(&self, list: &ResolvedList) -> DomainSet {
        match self.excluded_for(&list.name) {
            Some(excluded) => filter_entries(list, excluded),
            None => list.domains.clone(),
        }
    }

    pub fn lists(&self) -> impl Iterator<Item = &ListName> {
        self.rules.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
