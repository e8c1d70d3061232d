//! Cross-feature reference resolution and address-format helpers.
//!
//! Lookups scan the referenced collection on every compile — collections are
//! small (tens of entries) and mutate frequently, so no index is kept. A
//! failed lookup is reported to the caller, which omits the dependent
//! command and notes the omission in the explanation.

use crate::model::{
    Acl, AddressGroup, AddressMatch, Configuration, DhcpPool, DomainGroup, LagGroup, NatPool,
    ServiceGroup, TransformSet,
};

/// ACL by id
pub fn find_acl(config: &Configuration, id: u32) -> Option<&Acl> {
    config.acl.acls.iter().find(|a| a.id == id)
}

/// DHCP pool by name
pub fn find_dhcp_pool<'a>(config: &'a Configuration, name: &str) -> Option<&'a DhcpPool> {
    config.dhcp.pools.iter().find(|p| p.name == name)
}

/// Link-aggregation group by id
pub fn find_lag(config: &Configuration, id: u32) -> Option<&LagGroup> {
    config.link_aggregation.groups.iter().find(|g| g.id == id)
}

/// NAT pool by id
pub fn find_nat_pool(config: &Configuration, id: u32) -> Option<&NatPool> {
    config.nat.pools.iter().find(|p| p.id == id)
}

/// Address object group by name
pub fn find_address_group<'a>(config: &'a Configuration, name: &str) -> Option<&'a AddressGroup> {
    config.object_groups.address_groups.iter().find(|g| g.name == name)
}

/// Service object group by name
pub fn find_service_group<'a>(config: &'a Configuration, name: &str) -> Option<&'a ServiceGroup> {
    config.object_groups.service_groups.iter().find(|g| g.name == name)
}

/// Domain object group by name
pub fn find_domain_group<'a>(config: &'a Configuration, name: &str) -> Option<&'a DomainGroup> {
    config.object_groups.domain_groups.iter().find(|g| g.name == name)
}

/// Security zone existence check
pub fn zone_exists(config: &Configuration, name: &str) -> bool {
    config.security.zones.iter().any(|z| z.name == name)
}

/// IPsec transform set by name
pub fn find_transform_set<'a>(config: &'a Configuration, name: &str) -> Option<&'a TransformSet> {
    config.ipsec.transform_sets.iter().find(|t| t.name == name)
}

/// Convert a dotted-decimal subnet mask to its wildcard (inverse) form.
/// Returns None for anything that does not parse as four octets.
pub fn mask_to_wildcard(mask: &str) -> Option<String> {
    let octets = parse_octets(mask)?;
    Some(
        octets
            .iter()
            .map(|o| (255 - o).to_string())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Convert a dotted-decimal subnet mask to a prefix length (e.g. 24)
pub fn mask_to_prefix_len(mask: &str) -> Option<u32> {
    let octets = parse_octets(mask)?;
    let bits = u32::from_be_bytes(octets);
    // Reject non-contiguous masks
    if bits != 0 && (!bits).wrapping_add(1) & !bits != 0 {
        return None;
    }
    Some(bits.count_ones())
}

fn parse_octets(addr: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = addr.split('.');
    for slot in &mut octets {
        *slot = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

/// Render an address match in "ip wildcard" form, or "any".
/// Used by ACL rule emission on all three dialects.
pub fn wildcard_form(addr: &AddressMatch) -> String {
    if addr.is_any() {
        return "any".to_string();
    }
    match mask_to_wildcard(&addr.mask) {
        Some(wildcard) => format!("{} {}", addr.ip, wildcard),
        // Host match when the mask is absent or malformed
        None => format!("{} 0.0.0.0", addr.ip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_to_wildcard() {
        assert_eq!(mask_to_wildcard("255.255.255.0").as_deref(), Some("0.0.0.255"));
        assert_eq!(mask_to_wildcard("255.255.0.0").as_deref(), Some("0.0.255.255"));
        assert_eq!(mask_to_wildcard("255.255.255.255").as_deref(), Some("0.0.0.0"));
        assert_eq!(mask_to_wildcard("garbage"), None);
    }

    #[test]
    fn test_mask_to_prefix_len() {
        assert_eq!(mask_to_prefix_len("255.255.255.0"), Some(24));
        assert_eq!(mask_to_prefix_len("255.255.255.252"), Some(30));
        assert_eq!(mask_to_prefix_len("0.0.0.0"), Some(0));
        assert_eq!(mask_to_prefix_len("255.0.255.0"), None);
    }

    #[test]
    fn test_wildcard_form_any_and_host() {
        let any = AddressMatch::default();
        assert_eq!(wildcard_form(&any), "any");

        let host = AddressMatch { ip: "10.1.1.1".to_string(), mask: String::new() };
        assert_eq!(wildcard_form(&host), "10.1.1.1 0.0.0.0");

        let subnet = AddressMatch { ip: "10.1.0.0".to_string(), mask: "255.255.0.0".to_string() };
        assert_eq!(wildcard_form(&subnet), "10.1.0.0 0.0.255.255");
    }
}
