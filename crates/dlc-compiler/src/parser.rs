use dlc_core::types::{Attribute, AttributeSet, DomainEntry, ListName, MatchType};

use crate::error::{CompileError, ParseError};

const INCLUDE_PREFIX: &str = "include";

/// Reference to another list, optionally narrowed by attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub target: ListName,
    /// Entry must hold every one of these (`@attr`).
    pub required: AttributeSet,
    /// Entry must hold none of these (`@-attr`).
    pub excluded: AttributeSet,
}

impl IncludeDirective {
    /// Whether an entry of the target list is pulled in by this directive.
    pub fn selects(&self, entry: &DomainEntry) -> bool {
        entry.has_all(&self.required) && !entry.has_any(&self.excluded)
    }
}

/// One parsed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Domain(DomainEntry),
    Include(IncludeDirective),
}

/// Parse a whole source file belonging to `list`.
///
/// Stops at the first malformed line and reports its 1-based line number.
pub fn parse_list(list: &ListName, text: &str) -> Result<Vec<Directive>, CompileError> {
    let mut directives = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        match parse_line(raw_line) {
            Ok(Some(directive)) => directives.push(directive),
            Ok(None) => {}
            Err(source) => {
                return Err(CompileError::Parse {
                    list: list.clone(),
                    line: index + 1,
                    source,
                })
            }
        }
    }

    Ok(directives)
}

/// Parse a single line: `[type:]value [@attr]...` or `include:list [@attr|@-attr]...`.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Directive>, ParseError> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let head = match tokens.next() {
        Some(head) => head,
        None => return Ok(None),
    };

    let mut required = AttributeSet::new();
    let mut excluded = AttributeSet::new();
    for token in tokens {
        let (negated, attribute) = parse_attribute(token)?;
        if negated {
            excluded.insert(attribute);
        } else {
            required.insert(attribute);
        }
    }

    let (prefix, value) = match head.split_once(':') {
        Some((prefix, value)) => (Some(prefix), value.trim()),
        None => (None, head),
    };

    // A line made only of attribute tokens has no value.
    if value.is_empty() || value.starts_with('@') {
        return Err(ParseError::EmptyValue);
    }

    if let Some(prefix) = prefix {
        if prefix.eq_ignore_ascii_case(INCLUDE_PREFIX) {
            return Ok(Some(Directive::Include(IncludeDirective {
                target: ListName::new(value),
                required,
                excluded,
            })));
        }
    }

    if let Some(negated) = excluded.into_iter().next() {
        return Err(ParseError::NegatedAttribute(negated.to_string()));
    }

    let match_type = match prefix {
        Some(prefix) => MatchType::from_prefix(prefix)
            .ok_or_else(|| ParseError::UnknownType(prefix.to_string()))?,
        None => MatchType::default(),
    };

    Ok(Some(Directive::Domain(DomainEntry {
        value: normalize_value(match_type, value),
        match_type,
        attributes: required,
    })))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_attribute(token: &str) -> Result<(bool, Attribute), ParseError> {
    let malformed = || ParseError::MalformedAttribute(token.to_string());

    let body = token.strip_prefix('@').ok_or_else(malformed)?;
    let (negated, key) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    if key.is_empty() || key.contains('@') {
        return Err(malformed());
    }

    Ok((negated, Attribute::new(key)))
}

/// Host-like values are case-insensitive; regular expressions are kept verbatim.
fn normalize_value(match_type: MatchType, value: &str) -> String {
    match match_type {
        MatchType::Regex => value.to_string(),
        _ => value.to_ascii_lowercase(),
    }
}
