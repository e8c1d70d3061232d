//! Full-script aggregation. Every applicable enabled feature is recompiled
//! fresh and concatenated in a fixed, dependency-safe order: definitions
//! (object groups, ACLs) precede the features that reference them.

use crate::applicability::Feature;
use crate::compile::compile_feature;
use crate::dialect::Dialect;
use crate::model::{Connection, Device};

/// Feature concatenation order. Cross-referenced definitions come first so
/// the emitted script can be pasted top to bottom on a real device.
pub const AGGREGATE_ORDER: [Feature; 21] = [
    Feature::ObjectGroups,
    Feature::Acl,
    Feature::Security,
    Feature::Ipsec,
    Feature::Gre,
    Feature::InterfaceIp,
    Feature::Vlan,
    Feature::Dhcp,
    Feature::DhcpRelay,
    Feature::DhcpSnooping,
    Feature::LinkAggregation,
    Feature::PortIsolation,
    Feature::Stacking,
    Feature::Mlag,
    Feature::Stp,
    Feature::Routing,
    Feature::Nat,
    Feature::Ssh,
    Feature::Vrrp,
    Feature::Ha,
    Feature::Wireless,
];

/// Compile the complete deployment script for a device.
///
/// Features with empty output are skipped entirely. Dialects that do not
/// wrap per feature (Cisco) get exactly one global `configure terminal` /
/// `end` pair around the whole body.
pub fn compile_all(device: &Device, connections: &[Connection]) -> String {
    let dialect = Dialect::for_vendor(device.vendor);
    let mut sections: Vec<String> = Vec::new();

    for feature in AGGREGATE_ORDER {
        let output = compile_feature(device, feature, connections);
        if output.cli.is_empty() {
            continue;
        }
        sections.push(format!("{} {}\n{}", dialect.comment, feature, output.cli));
    }

    if sections.is_empty() {
        return String::new();
    }
    let body = sections.join("\n");
    if dialect.wraps_itself {
        body
    } else {
        format!("{}\n{}\n{}", dialect.enter_config, body, dialect.exit_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Acl, AclKind, AddressGroup, AddressGroupMember, DeviceType, NatPool, SnatRule, Vendor,
        VlanEntry,
    };

    fn firewall_with_chain(vendor: Vendor) -> Device {
        let mut device = Device::new("fw1", "fw1", vendor, DeviceType::Firewall);
        device.config.object_groups.address_enabled = true;
        device.config.object_groups.address_groups.push(AddressGroup {
            name: "lan".to_string(),
            members: vec![AddressGroupMember {
                ip: "10.0.0.0".to_string(),
                mask: "255.0.0.0".to_string(),
            }],
        });
        device.config.acl.enabled = true;
        device.config.acl.acls.push(Acl {
            id: 2000,
            name: String::new(),
            kind: AclKind::Basic,
            rules: vec![],
        });
        device.config.nat.enabled = true;
        device.config.nat.pools.push(NatPool {
            id: 1,
            name: String::new(),
            start_ip: "203.0.113.1".to_string(),
            end_ip: "203.0.113.5".to_string(),
            mask: "255.255.255.0".to_string(),
        });
        device.config.nat.snat_rules.push(SnatRule {
            acl_id: Some(2000),
            pool_id: Some(1),
            outside_interface: "GigabitEthernet0/0".to_string(),
            overload: false,
        });
        device
    }

    #[test]
    fn test_definitions_precede_uses() {
        let script = compile_all(&firewall_with_chain(Vendor::Huawei), &[]);
        let groups_at = script.find("ip address-set lan").unwrap();
        let acl_at = script.find("acl number 2000").unwrap();
        let nat_at = script.find("nat address-group 1").unwrap();
        assert!(groups_at < acl_at);
        assert!(acl_at < nat_at);
    }

    #[test]
    fn test_cisco_wrapped_exactly_once() {
        let script = compile_all(&firewall_with_chain(Vendor::Cisco), &[]);
        assert!(script.starts_with("configure terminal\n"));
        assert!(script.ends_with("\nend"));
        assert_eq!(script.matches("configure terminal").count(), 1);
        assert_eq!(script.matches("\nend").count(), 1);
    }

    #[test]
    fn test_self_wrapping_vendor_gets_no_extra_wrap() {
        let script = compile_all(&firewall_with_chain(Vendor::Huawei), &[]);
        // Each non-empty feature carries its own wrap; the aggregate adds none
        let features_emitted = script.matches("\n# ").count() + 1;
        assert_eq!(script.matches("system-view").count(), features_emitted);
        assert!(!script.starts_with("system-view\n# "));
    }

    #[test]
    fn test_empty_features_are_skipped() {
        let mut device = Device::new("sw1", "sw1", Vendor::Cisco, DeviceType::L3Switch);
        device.config.vlan.enabled = true;
        device.config.vlan.vlans.push(VlanEntry {
            id: 10,
            name: "users".to_string(),
            description: String::new(),
            interface: None,
            access_ports: vec![],
            trunk_ports: vec![],
        });
        let script = compile_all(&device, &[]);
        assert!(script.contains("! VLAN"));
        assert!(!script.contains("! DHCP"));
        assert!(!script.contains("! Routing"));
    }

    #[test]
    fn test_everything_disabled_yields_empty_script() {
        let device = Device::new("sw1", "sw1", Vendor::Cisco, DeviceType::L3Switch);
        assert_eq!(compile_all(&device, &[]), "");
    }
}
