//! Error types for the compiler phases.

use dlc_core::types::ListName;

/// A malformed directive line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty value")]
    EmptyValue,
    #[error("unknown match type prefix: {0:?}")]
    UnknownType(String),
    #[error("malformed attribute token: {0:?}")]
    MalformedAttribute(String),
    #[error("negated attribute {0:?} is only valid on include directives")]
    NegatedAttribute(String),
}

/// Fatal build-configuration error. Any of these aborts the whole compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("{list}:{line}: {source}")]
    Parse {
        list: ListName,
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error(
        "unknown list: {name}{}",
        .referenced_by.as_ref().map(|by| format!(" (included by {by})")).unwrap_or_default()
    )]
    UnknownList {
        name: ListName,
        referenced_by: Option<ListName>,
    },
    #[error("include cycle: {}", format_path(.path))]
    Cycle { path: Vec<ListName> },
    #[error("list {0} is already resolved")]
    AlreadyResolved(ListName),
    #[error("list {0} has not been flattened")]
    NotFlattened(ListName),
}

fn format_path(path: &[ListName]) -> String {
    path.iter()
        .map(ListName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
