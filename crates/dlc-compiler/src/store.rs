use std::collections::BTreeMap;

use dlc_core::types::{DomainSet, ListName};

use crate::error::CompileError;
use crate::parser::Directive;

/// A list as written: directives in source order, includes not yet expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawList {
    pub name: ListName,
    pub directives: Vec<Directive>,
}

/// A fully expanded list. Contains no includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedList {
    pub name: ListName,
    pub domains: DomainSet,
}

/// Per-list lifecycle. `InProgress` only exists while the resolver is
/// expanding the list and marks it as part of the current include path.
#[derive(Debug)]
pub(crate) enum ListState {
    Unresolved(RawList),
    InProgress,
    Resolved(ResolvedList),
}

/// All lists known to a compilation, keyed by normalized name.
#[derive(Debug, Default)]
pub struct ListStore {
    pub(crate) lists: BTreeMap<ListName, ListState>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directives to a list, creating it if needed.
    ///
    /// Repeated registrations for the same name append in call order. Fails
    /// once the list has been resolved.
    pub fn register(
        &mut self,
        name: impl AsRef<str>,
        directives: Vec<Directive>,
    ) -> Result<(), CompileError> {
        let name = ListName::new(name);

        match self.lists.get_mut(&name) {
            Some(ListState::Unresolved(raw)) => {
                raw.directives.extend(directives);
            }
            Some(ListState::InProgress) | Some(ListState::Resolved(_)) => {
                return Err(CompileError::AlreadyResolved(name));
            }
            None => {
                log::debug!("registered list {} ({} directives)", name, directives.len());
                let raw = RawList {
                    name: name.clone(),
                    directives,
                };
                self.lists.insert(name, ListState::Unresolved(raw));
            }
        }

        Ok(())
    }

    pub fn contains(&self, name: &ListName) -> bool {
        self.lists.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// List names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &ListName> {
        self.lists.keys()
    }

    /// The unflattened form of a list, if it has not been resolved yet.
    pub fn raw(&self, name: &ListName) -> Option<&RawList> {
        match self.lists.get(name) {
            Some(ListState::Unresolved(raw)) => Some(raw),
            _ => None,
        }
    }

    pub fn resolved(&self, name: &ListName) -> Result<&ResolvedList, CompileError> {
        match self.lists.get(name) {
            Some(ListState::Resolved(list)) => Ok(list),
            Some(_) => Err(CompileError::NotFlattened(name.clone())),
            None => Err(CompileError::UnknownList {
                name: name.clone(),
                referenced_by: None,
            }),
        }
    }

    /// Every list in the store has been resolved.
    pub fn is_flattened(&self) -> bool {
        self.lists
            .values()
            .all(|state| matches!(state, ListState::Resolved(_)))
    }

    pub(crate) fn pending(&self) -> Vec<ListName> {
        self.lists
            .iter()
            .filter(|(_, state)| matches!(state, ListState::Unresolved(_)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Move a raw list out for expansion, leaving it marked in progress.
    pub(crate) fn begin(&mut self, name: &ListName) -> Option<RawList> {
        let state = self.lists.get_mut(name)?;
        match std::mem::replace(state, ListState::InProgress) {
            ListState::Unresolved(raw) => Some(raw),
            other => {
                *state = other;
                None
            }
        }
    }

    pub(crate) fn finish(&mut self, list: ResolvedList) {
        self.lists
            .insert(list.name.clone(), ListState::Resolved(list));
    }

    /// Put back a list whose expansion was aborted.
    pub(crate) fn abandon(&mut self, raw: RawList) {
        self.lists.insert(raw.name.clone(), ListState::Unresolved(raw));
    }
}

#[cfg(test)]
mod tests {
    use dlc_core::types::{DomainEntry, MatchType};

    use super::*;
    use crate::parser::parse_list;

    fn directives(text: &str) -> Vec<Directive> {
        parse_list(&ListName::new("test"), text).unwrap()
    }

    #[test]
    fn test_register_normalizes_name() {
        let mut store = ListStore::new();
        store.register("google", directives("google.com")).unwrap();

        assert!(store.contains(&ListName::new("GOOGLE")));
        assert!(store.raw(&ListName::new("Google")).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_register_appends() {
        let mut store = ListStore::new();
        store.register("cn", directives("a.cn")).unwrap();
        store.register("CN", directives("b.cn\nc.cn")).unwrap();

        let raw = store.raw(&ListName::new("cn")).unwrap();
        assert_eq!(raw.directives.len(), 3);
        assert_eq!(
            raw.directives[0],
            Directive::Domain(DomainEntry::new(MatchType::Domain, "a.cn"))
        );
    }

    #[test]
    fn test_names_sorted() {
        let mut store = ListStore::new();
        store.register("private", Vec::new()).unwrap();
        store.register("apple", Vec::new()).unwrap();
        store.register("cn", Vec::new()).unwrap();

        let names: Vec<&str> = store.names().map(ListName::as_str).collect();
        assert_eq!(names, vec!["APPLE", "CN", "PRIVATE"]);
    }

    #[test]
    fn test_resolved_before_flatten() {
        let mut store = ListStore::new();
        store.register("cn", Vec::new()).unwrap();

        assert_eq!(
            store.resolved(&ListName::new("cn")),
            Err(CompileError::NotFlattened(ListName::new("CN")))
        );
        assert!(matches!(
            store.resolved(&ListName::new("nope")),
            Err(CompileError::UnknownList { .. })
        ));
        assert!(!store.is_flattened());
    }

    #[test]
    fn test_begin_and_abandon() {
        let mut store = ListStore::new();
        store.register("cn", directives("a.cn")).unwrap();
        let name = ListName::new("cn");

        let raw = store.begin(&name).unwrap();
        assert!(store.begin(&name).is_none());
        assert!(store.raw(&name).is_none());

        store.abandon(raw);
        assert_eq!(store.raw(&name).unwrap().directives.len(), 1);
    }
}
