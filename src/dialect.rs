use crate::model::Vendor;

/// Dialect holds the per-vendor lexical primitives every compiler shares:
/// mode-entry commands, interface naming, negation syntax and comment style.
/// Pure data — total over all vendors.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    /// Global configuration mode entry command
    pub enter_config: &'static str,
    /// Global configuration mode exit command
    pub exit_config: &'static str,
    /// Negation prefix ("no " / "undo ")
    pub negation: &'static str,
    /// Comment token
    pub comment: &'static str,
    /// VLAN interface name prefix; the id is appended verbatim
    vlan_interface_prefix: &'static str,
    /// LAG interface name prefix; the group id is appended verbatim
    lag_interface_prefix: &'static str,
    /// True when feature compilers embed their own mode entry/exit
    /// (Huawei/H3C system-view) — the aggregator must not wrap again.
    pub wraps_itself: bool,
}

const CISCO: Dialect = Dialect {
    enter_config: "configure terminal",
    exit_config: "end",
    negation: "no ",
    comment: "!",
    vlan_interface_prefix: "Vlan",
    lag_interface_prefix: "Port-channel",
    wraps_itself: false,
};

const HUAWEI: Dialect = Dialect {
    enter_config: "system-view",
    exit_config: "return",
    negation: "undo ",
    comment: "#",
    vlan_interface_prefix: "Vlanif",
    lag_interface_prefix: "Eth-Trunk",
    wraps_itself: true,
};

const H3C: Dialect = Dialect {
    enter_config: "system-view",
    exit_config: "return",
    negation: "undo ",
    comment: "#",
    vlan_interface_prefix: "Vlan-interface",
    lag_interface_prefix: "Bridge-Aggregation",
    wraps_itself: true,
};

// UI default state; empty commands, no wrapping needed
const GENERIC: Dialect = Dialect {
    enter_config: "",
    exit_config: "",
    negation: "",
    comment: "#",
    vlan_interface_prefix: "Vlan",
    lag_interface_prefix: "Lag",
    wraps_itself: true,
};

impl Dialect {
    /// Look up the dialect for a vendor
    pub fn for_vendor(vendor: Vendor) -> &'static Dialect {
        match vendor {
            Vendor::Cisco => &CISCO,
            Vendor::Huawei => &HUAWEI,
            Vendor::H3C => &H3C,
            Vendor::Generic => &GENERIC,
        }
    }

    /// Vendor-conventional VLAN interface name for a VLAN id
    /// (Vlan10 / Vlanif10 / Vlan-interface10)
    pub fn vlan_interface(&self, vlan_id: u16) -> String {
        format!("{}{}", self.vlan_interface_prefix, vlan_id)
    }

    /// Vendor-conventional LAG interface name for a group id
    /// (Port-channel1 / Eth-Trunk1 / Bridge-Aggregation1)
    pub fn lag_interface(&self, group_id: u32) -> String {
        format!("{}{}", self.lag_interface_prefix, group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_interface_naming_per_vendor() {
        assert_eq!(Dialect::for_vendor(Vendor::Cisco).vlan_interface(10), "Vlan10");
        assert_eq!(Dialect::for_vendor(Vendor::Huawei).vlan_interface(10), "Vlanif10");
        assert_eq!(Dialect::for_vendor(Vendor::H3C).vlan_interface(10), "Vlan-interface10");
    }

    #[test]
    fn test_lag_interface_naming_per_vendor() {
        assert_eq!(Dialect::for_vendor(Vendor::Cisco).lag_interface(2), "Port-channel2");
        assert_eq!(Dialect::for_vendor(Vendor::Huawei).lag_interface(2), "Eth-Trunk2");
        assert_eq!(Dialect::for_vendor(Vendor::H3C).lag_interface(2), "Bridge-Aggregation2");
    }

    #[test]
    fn test_cisco_needs_global_wrap() {
        assert!(!Dialect::for_vendor(Vendor::Cisco).wraps_itself);
        assert!(Dialect::for_vendor(Vendor::Huawei).wraps_itself);
        assert!(Dialect::for_vendor(Vendor::H3C).wraps_itself);
    }
}
