//! Domain List Core Library
//!
//! Shared data model for the domain list compiler and the binary rule-set
//! format it produces.
//!
//! # Modules
//!
//! - `types`: list names, attributes, match types and domain sets
//! - `geosite`: rule-set tree, prost wire messages and loader

pub mod geosite;
pub mod types;

// Re-export commonly used types
pub use geosite::{FormatError, GeoSite, GeoSiteList, SiteDomain};
pub use types::{Attribute, AttributeSet, DomainEntry, DomainKey, DomainSet, ListName, MatchType};
