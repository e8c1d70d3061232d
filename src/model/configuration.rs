use serde::{Deserialize, Serialize};

use crate::applicability::Feature;

use super::ip_services::{CompiledSlots, DhcpConfig, DhcpRelayConfig, DhcpSnoopingConfig, InterfaceIpConfig, VlanConfig};
use super::routing::{RoutingConfig, VrrpConfig};
use super::security::{AclConfig, NatConfig, ObjectGroupsConfig, SecurityConfig, SshConfig};
use super::switching::{LinkAggregationConfig, MlagConfig, PortIsolationConfig, StackingConfig, StpConfig};
use super::vpn::{GreConfig, HaConfig, IpsecConfig};
use super::wireless::WirelessConfig;

/// Configuration is the fixed set of named feature blocks on a device.
/// Created with all features disabled; each edit replaces the relevant
/// block wholesale so change detection stays a cheap comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub dhcp: DhcpConfig,
    #[serde(default)]
    pub dhcp_relay: DhcpRelayConfig,
    #[serde(default)]
    pub dhcp_snooping: DhcpSnoopingConfig,
    #[serde(default)]
    pub vlan: VlanConfig,
    #[serde(default)]
    pub interface_ip: InterfaceIpConfig,
    #[serde(default)]
    pub link_aggregation: LinkAggregationConfig,
    #[serde(default)]
    pub port_isolation: PortIsolationConfig,
    #[serde(default)]
    pub stacking: StackingConfig,
    #[serde(default)]
    pub mlag: MlagConfig,
    #[serde(default)]
    pub stp: StpConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub vrrp: VrrpConfig,
    #[serde(default)]
    pub wireless: WirelessConfig,
    #[serde(default)]
    pub acl: AclConfig,
    #[serde(default)]
    pub nat: NatConfig,
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub object_groups: ObjectGroupsConfig,
    #[serde(default)]
    pub ipsec: IpsecConfig,
    #[serde(default)]
    pub ha: HaConfig,
    #[serde(default)]
    pub gre: GreConfig,
}

impl Configuration {
    /// Whether the block behind `feature` is switched on. Compound features
    /// (Security, ObjectGroups) are on when any sub-toggle is on.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Dhcp => self.dhcp.enabled,
            Feature::DhcpRelay => self.dhcp_relay.enabled,
            Feature::DhcpSnooping => self.dhcp_snooping.enabled,
            Feature::Vlan => self.vlan.enabled,
            Feature::InterfaceIp => self.interface_ip.enabled,
            Feature::LinkAggregation => self.link_aggregation.enabled,
            Feature::PortIsolation => self.port_isolation.enabled,
            Feature::Stacking => self.stacking.enabled,
            Feature::Mlag => self.mlag.enabled,
            Feature::Stp => self.stp.enabled,
            Feature::Routing => self.routing.enabled,
            Feature::Vrrp => self.vrrp.enabled,
            Feature::Wireless => self.wireless.enabled,
            Feature::Acl => self.acl.enabled,
            Feature::Nat => self.nat.enabled,
            Feature::Ssh => self.ssh.enabled,
            Feature::Security => self.security.any_enabled(),
            Feature::ObjectGroups => self.object_groups.any_enabled(),
            Feature::Ipsec => self.ipsec.enabled,
            Feature::Ha => self.ha.enabled,
            Feature::Gre => self.gre.enabled,
        }
    }

    /// The compiled-output slots of a feature block (read side)
    pub fn slots(&self, feature: Feature) -> &CompiledSlots {
        match feature {
            Feature::Dhcp => &self.dhcp.out,
            Feature::DhcpRelay => &self.dhcp_relay.out,
            Feature::DhcpSnooping => &self.dhcp_snooping.out,
            Feature::Vlan => &self.vlan.out,
            Feature::InterfaceIp => &self.interface_ip.out,
            Feature::LinkAggregation => &self.link_aggregation.out,
            Feature::PortIsolation => &self.port_isolation.out,
            Feature::Stacking => &self.stacking.out,
            Feature::Mlag => &self.mlag.out,
            Feature::Stp => &self.stp.out,
            Feature::Routing => &self.routing.out,
            Feature::Vrrp => &self.vrrp.out,
            Feature::Wireless => &self.wireless.out,
            Feature::Acl => &self.acl.out,
            Feature::Nat => &self.nat.out,
            Feature::Ssh => &self.ssh.out,
            Feature::Security => &self.security.out,
            Feature::ObjectGroups => &self.object_groups.out,
            Feature::Ipsec => &self.ipsec.out,
            Feature::Ha => &self.ha.out,
            Feature::Gre => &self.gre.out,
        }
    }

    /// The compiled-output slots of a feature block (merge target). The
    /// scheduler writes only through this accessor, leaving every other
    /// field of the block untouched.
    pub fn slots_mut(&mut self, feature: Feature) -> &mut CompiledSlots {
        match feature {
            Feature::Dhcp => &mut self.dhcp.out,
            Feature::DhcpRelay => &mut self.dhcp_relay.out,
            Feature::DhcpSnooping => &mut self.dhcp_snooping.out,
            Feature::Vlan => &mut self.vlan.out,
            Feature::InterfaceIp => &mut self.interface_ip.out,
            Feature::LinkAggregation => &mut self.link_aggregation.out,
            Feature::PortIsolation => &mut self.port_isolation.out,
            Feature::Stacking => &mut self.stacking.out,
            Feature::Mlag => &mut self.mlag.out,
            Feature::Stp => &mut self.stp.out,
            Feature::Routing => &mut self.routing.out,
            Feature::Vrrp => &mut self.vrrp.out,
            Feature::Wireless => &mut self.wireless.out,
            Feature::Acl => &mut self.acl.out,
            Feature::Nat => &mut self.nat.out,
            Feature::Ssh => &mut self.ssh.out,
            Feature::Security => &mut self.security.out,
            Feature::ObjectGroups => &mut self.object_groups.out,
            Feature::Ipsec => &mut self.ipsec.out,
            Feature::Ha => &mut self.ha.out,
            Feature::Gre => &mut self.gre.out,
        }
    }
}
