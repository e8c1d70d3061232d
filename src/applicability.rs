use serde::{Deserialize, Serialize};

use crate::model::DeviceType;

/// Feature names one independently toggleable configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dhcp,
    DhcpRelay,
    DhcpSnooping,
    Vlan,
    InterfaceIp,
    LinkAggregation,
    PortIsolation,
    Stacking,
    Mlag,
    Stp,
    Routing,
    Vrrp,
    Wireless,
    Acl,
    Nat,
    Ssh,
    Security,
    ObjectGroups,
    Ipsec,
    Ha,
    Gre,
}

impl Feature {
    /// Every feature, in declaration order
    pub const ALL: &'static [Feature] = &[
        Feature::Dhcp,
        Feature::DhcpRelay,
        Feature::DhcpSnooping,
        Feature::Vlan,
        Feature::InterfaceIp,
        Feature::LinkAggregation,
        Feature::PortIsolation,
        Feature::Stacking,
        Feature::Mlag,
        Feature::Stp,
        Feature::Routing,
        Feature::Vrrp,
        Feature::Wireless,
        Feature::Acl,
        Feature::Nat,
        Feature::Ssh,
        Feature::Security,
        Feature::ObjectGroups,
        Feature::Ipsec,
        Feature::Ha,
        Feature::Gre,
    ];

    /// Static applicability matrix: the device types a feature supports.
    /// `None` means the feature is structurally applicable everywhere.
    /// Vendor-only gates (Stacking, MLAG, HA) live with their compilers —
    /// they are feature-specific, not structural.
    fn allowed_device_types(self) -> Option<&'static [DeviceType]> {
        use DeviceType::*;
        match self {
            Feature::Dhcp => Some(&[Router, L3Switch, Firewall]),
            Feature::DhcpRelay => Some(&[Router, L3Switch]),
            Feature::DhcpSnooping => Some(&[L2Switch, L3Switch]),
            Feature::Vlan => Some(&[L2Switch, L3Switch]),
            Feature::InterfaceIp => Some(&[Router, L3Switch, Firewall]),
            Feature::LinkAggregation => Some(&[Router, L2Switch, L3Switch]),
            Feature::PortIsolation => Some(&[L2Switch, L3Switch]),
            Feature::Stacking => Some(&[L2Switch, L3Switch]),
            Feature::Mlag => Some(&[L3Switch]),
            Feature::Stp => Some(&[L2Switch, L3Switch]),
            Feature::Routing => Some(&[Router, L3Switch, Firewall]),
            Feature::Vrrp => Some(&[Router, L3Switch, Firewall]),
            Feature::Wireless => Some(&[AccessController]),
            Feature::Acl => None,
            Feature::Nat => Some(&[Router, Firewall]),
            Feature::Ssh => None,
            Feature::Security => Some(&[Firewall]),
            Feature::ObjectGroups => Some(&[Router, Firewall]),
            Feature::Ipsec => Some(&[Router, Firewall]),
            Feature::Ha => Some(&[Firewall]),
            Feature::Gre => Some(&[Router, Firewall]),
        }
    }

    /// Whether this feature is legal on a device type
    pub fn is_applicable(self, device_type: DeviceType) -> bool {
        match self.allowed_device_types() {
            Some(types) => types.contains(&device_type),
            None => true,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Feature::Dhcp => "DHCP",
            Feature::DhcpRelay => "DHCP Relay",
            Feature::DhcpSnooping => "DHCP Snooping",
            Feature::Vlan => "VLAN",
            Feature::InterfaceIp => "Interface IP",
            Feature::LinkAggregation => "Link Aggregation",
            Feature::PortIsolation => "Port Isolation",
            Feature::Stacking => "Stacking",
            Feature::Mlag => "M-LAG",
            Feature::Stp => "STP",
            Feature::Routing => "Routing",
            Feature::Vrrp => "VRRP",
            Feature::Wireless => "Wireless",
            Feature::Acl => "ACL",
            Feature::Nat => "NAT",
            Feature::Ssh => "SSH",
            Feature::Security => "Security",
            Feature::ObjectGroups => "Object Groups",
            Feature::Ipsec => "IPsec",
            Feature::Ha => "HA",
            Feature::Gre => "GRE",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_absence_means_everywhere() {
        for dt in [
            DeviceType::Router,
            DeviceType::L2Switch,
            DeviceType::L3Switch,
            DeviceType::Firewall,
            DeviceType::AccessController,
        ] {
            assert!(Feature::Acl.is_applicable(dt));
            assert!(Feature::Ssh.is_applicable(dt));
        }
    }

    #[test]
    fn test_structural_gating() {
        assert!(Feature::Vlan.is_applicable(DeviceType::L2Switch));
        assert!(!Feature::Vlan.is_applicable(DeviceType::Router));
        assert!(Feature::Wireless.is_applicable(DeviceType::AccessController));
        assert!(!Feature::Wireless.is_applicable(DeviceType::Firewall));
        assert!(!Feature::Nat.is_applicable(DeviceType::L2Switch));
        assert!(Feature::Ha.is_applicable(DeviceType::Firewall));
        assert!(!Feature::Ha.is_applicable(DeviceType::Router));
    }
}
