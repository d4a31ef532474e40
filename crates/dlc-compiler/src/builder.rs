use prost::Message;

use dlc_core::geosite::proto::{self, attribute::TypedValue, DomainType};
use dlc_core::geosite::{GeoSite, GeoSiteList, SiteDomain};

/// Encode the rule-set tree as a `GeoSiteList` protobuf message.
pub fn build_geosite(list: &GeoSiteList) -> Vec<u8> {
    let message = proto::GeoSiteList {
        entry: list.entries.iter().map(encode_geosite).collect(),
    };
    let buffer = message.encode_to_vec();

    log::debug!(
        "encoded {} groups, {} domains into {} bytes",
        list.len(),
        list.domain_count(),
        buffer.len()
    );
    buffer
}

fn encode_geosite(site: &GeoSite) -> proto::GeoSite {
    proto::GeoSite {
        country_code: site.country_code.clone(),
        domain: site.domains.iter().map(encode_domain).collect(),
    }
}

fn encode_domain(record: &SiteDomain) -> proto::Domain {
    proto::Domain {
        r#type: DomainType::from(record.match_type) as i32,
        value: record.value.clone(),
        // Attributes are flags: a key with bool_value = true.
        attribute: record
            .attributes
            .iter()
            .map(|attr| proto::Attribute {
                key: attr.as_str().to_string(),
                typed_value: Some(TypedValue::BoolValue(true)),
            })
            .collect(),
    }
}
