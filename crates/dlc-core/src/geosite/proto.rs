//! GeoSite Rule-Set Messages
//!
//! prost definitions of the V2Ray router schema the rule set is written in:
//!
//! ```text
//! GeoSiteList { repeated GeoSite entry = 1; }
//! GeoSite     { string country_code = 1; repeated Domain domain = 2; }
//! Domain      { Type type = 1; string value = 2; repeated Attribute attribute = 3; }
//! Attribute   { string key = 1; oneof typed_value { bool bool_value = 2; int64 int_value = 3; } }
//! ```

use crate::types::MatchType;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSiteList {
    #[prost(message, repeated, tag = "1")]
    pub entry: Vec<GeoSite>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSite {
    #[prost(string, tag = "1")]
    pub country_code: String,
    #[prost(message, repeated, tag = "2")]
    pub domain: Vec<Domain>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Domain {
    /// Raw `DomainType`; proto3 enums are open, so unknown values survive decoding.
    #[prost(enumeration = "DomainType", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(message, repeated, tag = "3")]
    pub attribute: Vec<Attribute>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "attribute::TypedValue", tags = "2, 3")]
    pub typed_value: Option<attribute::TypedValue>,
}

pub mod attribute {
    #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
    pub enum TypedValue {
        #[prost(bool, tag = "2")]
        BoolValue(bool),
        #[prost(int64, tag = "3")]
        IntValue(i64),
    }
}

/// `Domain.Type` values on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DomainType {
    /// Substring match (`keyword:`)
    Plain = 0,
    Regex = 1,
    /// Root domain match (`domain:` / default)
    Domain = 2,
    Full = 3,
}

impl From<MatchType> for DomainType {
    fn from(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Keyword => Self::Plain,
            MatchType::Regex => Self::Regex,
            MatchType::Domain => Self::Domain,
            MatchType::Full => Self::Full,
        }
    }
}

impl From<DomainType> for MatchType {
    fn from(domain_type: DomainType) -> Self {
        match domain_type {
            DomainType::Plain => Self::Keyword,
            DomainType::Regex => Self::Regex,
            DomainType::Domain => Self::Domain,
            DomainType::Full => Self::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_mapping() {
        for match_type in [MatchType::Full, MatchType::Domain, MatchType::Keyword, MatchType::Regex] {
            assert_eq!(MatchType::from(DomainType::from(match_type)), match_type);
        }
        assert_eq!(DomainType::from(MatchType::Keyword) as i32, 0);
        assert_eq!(DomainType::try_from(3).ok(), Some(DomainType::Full));
        assert!(DomainType::try_from(9).is_err());
    }
}
