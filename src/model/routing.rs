use serde::{Deserialize, Serialize};

use super::ip_services::CompiledSlots;

/// One static route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticRoute {
    pub destination: String,
    #[serde(default)]
    pub mask: String,
    #[serde(default)]
    pub next_hop: String,
}

/// An OSPF network statement (subnet mask form; compiled to wildcard form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OspfNetwork {
    pub network: String,
    #[serde(default)]
    pub mask: String,
}

/// One OSPF area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OspfArea {
    pub id: u32,
    #[serde(default)]
    pub networks: Vec<OspfNetwork>,
}

/// OSPF process settings. Passive interfaces are named by VLAN id and
/// rendered through the vendor dialect's interface-naming convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OspfConfig {
    #[serde(default = "default_process_id")]
    pub process_id: u32,
    #[serde(default)]
    pub router_id: String,
    #[serde(default)]
    pub areas: Vec<OspfArea>,
    #[serde(default)]
    pub passive_vlan_ids: Vec<u16>,
}

fn default_process_id() -> u32 {
    1
}

/// Routing feature block (static routes + optional OSPF)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub static_routes: Vec<StaticRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ospf: Option<OspfConfig>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// One VRRP group, keyed by the VLAN interface it lives on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrrpGroup {
    pub vrid: u8,
    pub vlan_id: u16,
    #[serde(default)]
    pub virtual_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub preempt: bool,
}

/// VRRP feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VrrpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub groups: Vec<VrrpGroup>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}
