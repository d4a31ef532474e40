//! Include flattening.
//!
//! Every list is expanded depth-first with an explicit stack. A list being
//! expanded is marked `InProgress` in the store; meeting that marker again
//! means the include graph has a cycle. Finished lists are stored as
//! `Resolved` and reused by every later include, so each list is expanded
//! exactly once.

use dlc_core::types::{DomainSet, ListName};

use crate::error::CompileError;
use crate::parser::Directive;
use crate::store::{ListState, ListStore, RawList, ResolvedList};

/// Counters for one `flatten_all` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub lists_resolved: usize,
    pub includes_expanded: usize,
    pub domains_total: usize,
}

/// Resolve every unresolved list in the store, in place.
///
/// Lists already resolved are left alone, so a second call is a no-op. On
/// error, lists that were mid-expansion are put back in their raw form.
pub fn flatten_all(store: &mut ListStore) -> Result<FlattenStats, CompileError> {
    let mut stats = FlattenStats::default();

    for name in store.pending() {
        resolve_from(store, &name, &mut stats)?;
    }

    if stats.lists_resolved > 0 {
        log::info!(
            "flattened {} lists ({} includes, {} domains)",
            stats.lists_resolved,
            stats.includes_expanded,
            stats.domains_total
        );
    }

    Ok(stats)
}

struct Frame {
    name: ListName,
    directives: Vec<Directive>,
    cursor: usize,
    domains: DomainSet,
}

impl Frame {
    fn new(raw: RawList) -> Self {
        Self {
            name: raw.name,
            directives: raw.directives,
            cursor: 0,
            domains: DomainSet::new(),
        }
    }
}

fn resolve_from(
    store: &mut ListStore,
    root: &ListName,
    stats: &mut FlattenStats,
) -> Result<(), CompileError> {
    // Already resolved as a dependency of an earlier root.
    let Some(raw) = store.begin(root) else {
        return Ok(());
    };
    let mut stack = vec![Frame::new(raw)];

    while let Some(frame) = stack.last_mut() {
        let Some(directive) = frame.directives.get(frame.cursor) else {
            if let Some(done) = stack.pop() {
                log::debug!("resolved list {} ({} domains)", done.name, done.domains.len());
                stats.lists_resolved += 1;
                stats.domains_total += done.domains.len();
                store.finish(ResolvedList {
                    name: done.name,
                    domains: done.domains,
                });
            }
            continue;
        };

        let include = match directive {
            Directive::Domain(entry) => {
                frame.domains.insert(entry.clone());
                frame.cursor += 1;
                continue;
            }
            Directive::Include(include) => include,
        };

        let target = include.target.clone();
        match store.lists.get(&target) {
            Some(ListState::Resolved(resolved)) => {
                frame.domains.extend(
                    resolved
                        .domains
                        .iter()
                        .filter(|entry| include.selects(entry))
                        .cloned(),
                );
                frame.cursor += 1;
                stats.includes_expanded += 1;
            }
            Some(ListState::Unresolved(_)) => {
                // The including frame stays on the same directive and merges
                // the target once it comes back resolved.
                if let Some(raw) = store.begin(&target) {
                    stack.push(Frame::new(raw));
                }
            }
            Some(ListState::InProgress) => {
                let path = cycle_path(&stack, &target);
                abandon(store, stack);
                return Err(CompileError::Cycle { path });
            }
            None => {
                let referenced_by = Some(frame.name.clone());
                abandon(store, stack);
                return Err(CompileError::UnknownList {
                    name: target,
                    referenced_by,
                });
            }
        }
    }

    Ok(())
}

/// Path from the first occurrence of `target` on the stack, closed by `target`.
fn cycle_path(stack: &[Frame], target: &ListName) -> Vec<ListName> {
    let start = stack
        .iter()
        .position(|frame| &frame.name == target)
        .unwrap_or(0);

    stack[start..]
        .iter()
        .map(|frame| frame.name.clone())
        .chain(std::iter::once(target.clone()))
        .collect()
}

fn abandon(store: &mut ListStore, stack: Vec<Frame>) {
    for frame in stack {
        store.abandon(RawList {
            name: frame.name,
            directives: frame.directives,
        });
    }
}

#[cfg(test)]
mod tests {
    use dlc_core::types::{Attribute, MatchType};

    use super::*;
    use crate::parser::parse_list;

    fn store_from(files: &[(&str, &str)]) -> ListStore {
        let mut store = ListStore::new();
        for (name, text) in files {
            let directives = parse_list(&ListName::new(name), text).unwrap();
            store.register(name, directives).unwrap();
        }
        store
    }

    fn domains<'a>(store: &'a ListStore, name: &str) -> &'a DomainSet {
        &store.resolved(&ListName::new(name)).unwrap().domains
    }

    #[test]
    fn test_flatten_example() {
        let mut store = store_from(&[
            ("private", "domain.com\nads.com @ads\n"),
            ("google", "include:private\ngoogle.com\n"),
        ]);

        flatten_all(&mut store).unwrap();
        assert!(store.is_flattened());

        let google = domains(&store, "google");
        assert_eq!(google.len(), 3);
        assert!(google.contains(MatchType::Domain, "domain.com"));
        assert!(google.contains(MatchType::Domain, "google.com"));
        let ads = google.get(MatchType::Domain, "ads.com").unwrap();
        assert!(ads.has_attribute(&Attribute::from("ads")));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let mut store = store_from(&[
            ("a", "include:b\na.com"),
            ("b", "b.com @x"),
        ]);

        let first = flatten_all(&mut store).unwrap();
        assert_eq!(first.lists_resolved, 2);
        let snapshot = domains(&store, "a").clone();

        let second = flatten_all(&mut store).unwrap();
        assert_eq!(second, FlattenStats::default());
        assert_eq!(domains(&store, "a"), &snapshot);
    }

    #[test]
    fn test_include_with_required_attributes() {
        let mut store = store_from(&[
            ("cn", "baidu.com @cn\nads.cn @ads @cn\nother.com"),
            ("geolocation-cn", "include:cn @cn @-ads"),
            ("category-ads", "include:cn @ads"),
        ]);
        flatten_all(&mut store).unwrap();

        let geo = domains(&store, "geolocation-cn");
        assert_eq!(geo.len(), 1);
        assert!(geo.contains(MatchType::Domain, "baidu.com"));

        let ads = domains(&store, "category-ads");
        assert_eq!(ads.len(), 1);
        assert!(ads.contains(MatchType::Domain, "ads.cn"));
    }

    #[test]
    fn test_dedup_unions_attributes() {
        let mut store = store_from(&[
            ("a", "shared.com @x"),
            ("b", "shared.com @y"),
            ("c", "include:a\ninclude:b\nshared.com\nfull:shared.com"),
        ]);
        flatten_all(&mut store).unwrap();

        let c = domains(&store, "c");
        assert_eq!(c.len(), 2);
        let shared = c.get(MatchType::Domain, "shared.com").unwrap();
        let attrs: Vec<&str> = shared.attributes.iter().map(Attribute::as_str).collect();
        assert_eq!(attrs, vec!["x", "y"]);
        assert!(c.get(MatchType::Full, "shared.com").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_union_superset_over_chain() {
        let mut store = store_from(&[
            ("a", "include:b\na.com"),
            ("b", "include:c\nb.com"),
            ("c", "c.com @t\nfull:c2.com"),
        ]);
        flatten_all(&mut store).unwrap();

        let a = domains(&store, "a");
        for name in ["b", "c"] {
            for entry in domains(&store, name).iter() {
                let merged = a.get(entry.match_type, &entry.value).unwrap();
                assert!(merged.attributes.is_superset(&entry.attributes));
            }
        }
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_diamond_is_expanded_once() {
        let mut store = store_from(&[
            ("top", "include:left\ninclude:right"),
            ("left", "include:base\nleft.com"),
            ("right", "include:base\nright.com"),
            ("base", "base.com"),
        ]);
        let stats = flatten_all(&mut store).unwrap();

        assert_eq!(stats.lists_resolved, 4);
        assert_eq!(stats.includes_expanded, 4);
        assert_eq!(domains(&store, "top").len(), 3);
    }

    #[test]
    fn test_result_independent_of_registration_order() {
        let files = [
            ("x", "include:y\nx.com @a"),
            ("y", "x.com @b\ny.com"),
        ];
        let mut forward = store_from(&files);
        let mut reversed = store_from(&[files[1], files[0]]);
        flatten_all(&mut forward).unwrap();
        flatten_all(&mut reversed).unwrap();

        assert_eq!(domains(&forward, "x"), domains(&reversed, "x"));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let mut store = store_from(&[
            ("a", "include:b\na.com"),
            ("b", "include:a\nb.com"),
            ("c", "c.com"),
        ]);

        let err = flatten_all(&mut store).unwrap_err();
        assert_eq!(
            err,
            CompileError::Cycle {
                path: vec!["A".into(), "B".into(), "A".into()],
            }
        );

        // Lists on the cycle are back to raw, nothing half-resolved.
        assert!(store.raw(&ListName::new("a")).is_some());
        assert!(store.raw(&ListName::new("b")).is_some());
        assert!(store.resolved(&ListName::new("a")).is_err());
    }

    #[test]
    fn test_self_include_is_cycle() {
        let mut store = store_from(&[("loop", "include:LOOP")]);
        let err = flatten_all(&mut store).unwrap_err();
        assert_eq!(
            err,
            CompileError::Cycle {
                path: vec!["LOOP".into(), "LOOP".into()],
            }
        );
    }

    #[test]
    fn test_unknown_include() {
        let mut store = store_from(&[("google", "include:missinglist\ngoogle.com")]);
        let err = flatten_all(&mut store).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownList {
                name: "MISSINGLIST".into(),
                referenced_by: Some("GOOGLE".into()),
            }
        );
    }

    #[test]
    fn test_deep_chain() {
        let mut store = ListStore::new();
        let depth = 500;
        for i in 0..depth {
            let text = format!("include:l{}\nd{}.com", i + 1, i);
            let name = format!("l{i}");
            store
                .register(&name, parse_list(&ListName::new(&name), &text).unwrap())
                .unwrap();
        }
        store
            .register(format!("l{depth}"), parse_list(&ListName::new("end"), "end.com").unwrap())
            .unwrap();

        flatten_all(&mut store).unwrap();
        assert_eq!(domains(&store, "l0").len(), depth + 1);
    }

    #[test]
    fn test_register_after_flatten_fails() {
        let mut store = store_from(&[("a", "a.com")]);
        flatten_all(&mut store).unwrap();
        assert_eq!(
            store.register("a", Vec::new()),
            Err(CompileError::AlreadyResolved("A".into()))
        );
    }
}
