//! Core type definitions for the domain list compiler
//!
//! These types are shared by the parser, the resolver and the exporters,
//! and map onto the records of the rule-set tree.

use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// List Names
// =============================================================================

/// Case-normalized name of a domain list.
///
/// Derived from a source file's base name. Names are upper-cased on
/// construction so that `include:google` and a file called `GOOGLE` refer to
/// the same list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListName(String);

impl ListName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ListName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Opaque, case-sensitive tag attached to a domain entry (`@ads`, `@cn`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute(String);

impl Attribute {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Attribute {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

pub type AttributeSet = BTreeSet<Attribute>;

// =============================================================================
// Match Types
// =============================================================================

/// Matching semantics of a domain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MatchType {
    /// `full:` - exact domain match
    Full,
    /// `domain:` - the domain and all of its subdomains
    #[default]
    Domain,
    /// `keyword:` - substring match
    Keyword,
    /// `regexp:` - regular expression match
    Regex,
}

impl MatchType {
    /// Resolve a source prefix (`full`, `domain`, `keyword`, `regexp`).
    /// Matching is ASCII case-insensitive.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "domain" => Some(Self::Domain),
            "keyword" => Some(Self::Keyword),
            "regexp" => Some(Self::Regex),
            _ => None,
        }
    }

    /// Source prefix for this type, without the trailing colon.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Domain => "domain",
            Self::Keyword => "keyword",
            Self::Regex => "regexp",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// =============================================================================
// Domain Entries
// =============================================================================

/// Deduplication key of a domain fact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainKey {
    pub match_type: MatchType,
    pub value: String,
}

/// A concrete domain rule with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub value: String,
    pub match_type: MatchType,
    pub attributes: AttributeSet,
}

impl DomainEntry {
    pub fn new(match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_type,
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_attributes<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn key(&self) -> DomainKey {
        DomainKey {
            match_type: self.match_type,
            value: self.value.clone(),
        }
    }

    pub fn has_attribute(&self, attribute: &Attribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// True when the entry carries every attribute in `required`.
    pub fn has_all(&self, required: &AttributeSet) -> bool {
        required.is_subset(&self.attributes)
    }

    /// True when the entry carries at least one attribute in `attributes`.
    pub fn has_any(&self, attributes: &AttributeSet) -> bool {
        !self.attributes.is_disjoint(attributes)
    }
}

// =============================================================================
// Domain Sets
// =============================================================================

/// Deduplicated collection of domain entries keyed on `(match_type, value)`.
///
/// Inserting an entry whose key is already present unions the attribute sets;
/// attributes never shrink. Iteration is ordered by match type, then value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    entries: BTreeMap<DomainKey, DomainEntry>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an entry into the set. Returns `true` if the key was new.
    pub fn insert(&mut self, entry: DomainEntry) -> bool {
        match self.entries.entry(entry.key()) {
            btree_map::Entry::Occupied(mut slot) => {
                slot.get_mut().attributes.extend(entry.attributes);
                false
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn get(&self, match_type: MatchType, value: &str) -> Option<&DomainEntry> {
        self.entries.get(&DomainKey {
            match_type,
            value: value.to_string(),
        })
    }

    pub fn contains(&self, match_type: MatchType, value: &str) -> bool {
        self.get(match_type, value).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.values()
    }

    /// Copy of the entries accepted by `keep`.
    pub fn filtered<F>(&self, mut keep: F) -> DomainSet
    where
        F: FnMut(&DomainEntry) -> bool,
    {
        self.iter().filter(|entry| keep(entry)).cloned().collect()
    }
}

impl Extend<DomainEntry> for DomainSet {
    fn extend<T: IntoIterator<Item = DomainEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl FromIterator<DomainEntry> for DomainSet {
    fn from_iter<T: IntoIterator<Item = DomainEntry>>(iter: T) -> Self {
        let mut set = DomainSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for DomainSet {
    type Item = DomainEntry;
    type IntoIter = btree_map::IntoValues<DomainKey, DomainEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
