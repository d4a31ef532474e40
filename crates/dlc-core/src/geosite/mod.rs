//! Rule-set tree and its binary format

pub mod loader;
pub mod proto;

pub use loader::{load, FormatError};
pub use proto::DomainType;

use crate::types::{Attribute, ListName, MatchType};

/// A single domain record under a site group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDomain {
    pub match_type: MatchType,
    pub value: String,
    pub attributes: Vec<Attribute>,
}

/// All records exported for one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoSite {
    /// List name, upper-cased.
    pub country_code: String,
    pub domains: Vec<SiteDomain>,
}

impl GeoSite {
    pub fn new(name: &ListName) -> Self {
        Self {
            country_code: name.as_str().to_string(),
            domains: Vec::new(),
        }
    }
}

/// The whole rule set, one group per list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoSiteList {
    pub entries: Vec<GeoSite>,
}

impl GeoSiteList {
    pub fn get(&self, code: &str) -> Option<&GeoSite> {
        self.entries
            .iter()
            .find(|site| site.country_code.eq_ignore_ascii_case(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of domain records across all groups.
    pub fn domain_count(&self) -> usize {
        self.entries.iter().map(|site| site.domains.len()).sum()
    }
}
