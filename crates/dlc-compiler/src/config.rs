//! Option strings for export selection and attribute exclusion.

use crate::filter::ExclusionPolicy;

/// Lists exported as plaintext when nothing else is requested.
pub const DEFAULT_EXPORT_LISTS: &str =
    "private,microsoft,apple,google,category-games,speedtest,tld-!cn,geolocation-!cn,tld-cn,cn";

/// Attribute exclusions applied to the rule set by default.
pub const DEFAULT_EXCLUDE_ATTRS: &str = "microsoft@ads,apple@ads,google@ads,category-games@ads,speedtest@ads,geolocation-!cn@cn@ads,cn@!cn@ads";

impl ExclusionPolicy {
    /// Parse `list@attr1@attr2,list2@attrA`.
    ///
    /// Entries and attributes are trimmed; empty ones are skipped. When a
    /// list is named twice the later rule replaces the earlier one.
    pub fn parse(spec: &str) -> Self {
        let mut policy = ExclusionPolicy::new();

        for rule in spec.split(',') {
            let rule = rule.trim();
            if rule.is_empty() {
                continue;
            }

            let mut parts = rule.split('@');
            let list = parts.next().unwrap_or_default().trim();
            if list.is_empty() {
                log::warn!("ignoring exclusion rule without a list name: {rule:?}");
                continue;
            }

            let attributes: Vec<&str> = parts.map(str::trim).filter(|attr| !attr.is_empty()).collect();
            policy.exclude(list, attributes);
        }

        policy
    }
}

/// Parse a comma-separated list of export names, keeping caller order.
///
/// Names are trimmed but not case-normalized; they become the output file
/// stems. Empty entries and repeated names are dropped.
pub fn parse_export_lists(spec: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for name in spec.split(',').map(str::trim) {
        if name.is_empty() || names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}
