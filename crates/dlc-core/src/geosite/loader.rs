//! GeoSite Rule-Set Loader
//!
//! Decodes a rule-set file back into a [`GeoSiteList`]. Used to validate
//! freshly built artifacts and to inspect published ones.

use prost::Message;

use super::proto::{self, DomainType};
use super::{GeoSite, GeoSiteList, SiteDomain};
use crate::types::{Attribute, MatchType};

/// Error type for rule-set decoding.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Malformed rule set: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("Unknown domain type {value} in group '{group}'")]
    UnknownDomainType { group: String, value: i32 },
}

/// Decode a complete `GeoSiteList` message.
pub fn load(data: &[u8]) -> Result<GeoSiteList, FormatError> {
    let message = proto::GeoSiteList::decode(data)?;

    let entries = message
        .entry
        .into_iter()
        .map(read_geosite)
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("decoded rule set with {} groups", entries.len());
    Ok(GeoSiteList { entries })
}

fn read_geosite(site: proto::GeoSite) -> Result<GeoSite, FormatError> {
    let mut domains = Vec::with_capacity(site.domain.len());
    for domain in site.domain {
        let domain_type =
            DomainType::try_from(domain.r#type).map_err(|_| FormatError::UnknownDomainType {
                group: site.country_code.clone(),
                value: domain.r#type,
            })?;

        domains.push(SiteDomain {
            match_type: MatchType::from(domain_type),
            value: domain.value,
            // Typed values carry no meaning for list export; only the key is kept.
            attributes: domain
                .attribute
                .into_iter()
                .map(|attr| Attribute::new(attr.key))
                .collect(),
        });
    }

    Ok(GeoSite {
        country_code: site.country_code,
        domains,
    })
}
