//! Domain List Compiler
//!
//! This crate compiles domain list sources into a flattened, filtered rule
//! set and plaintext exports.
//!
//! Phases run in order: `parser` turns lines into directives, `store`
//! collects them per list, `resolver` expands includes in place, then
//! `export` and `builder` produce the artifacts through `filter`.

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod parser;
pub mod resolver;
pub mod store;

pub use builder::build_geosite;
pub use config::{parse_export_lists, DEFAULT_EXCLUDE_ATTRS, DEFAULT_EXPORT_LISTS};
pub use error::{CompileError, ParseError};
pub use export::{build_full_tree, build_tree, render_plaintext, PlaintextFile};
pub use filter::{filter_entries, ExclusionPolicy};
pub use parser::{parse_line, parse_list, Directive, IncludeDirective};
pub use resolver::{flatten_all, FlattenStats};
pub use store::{ListStore, RawList, ResolvedList};
