use serde::{Deserialize, Serialize};

use super::ip_services::CompiledSlots;

/// Link-aggregation negotiation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagMode {
    Lacp,
    Static,
}

impl Default for LagMode {
    fn default() -> Self {
        LagMode::Lacp
    }
}

/// One link-aggregation group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagGroup {
    pub id: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mode: LagMode,
    /// Explicit member ports; ignored when auto_detect is set
    #[serde(default)]
    pub members: Vec<String>,
    /// Derive members from topology: ports wired to the same peer device
    #[serde(default)]
    pub auto_detect: bool,
    /// Peer device id to auto-detect against (first peer with >1 link when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_device_id: Option<String>,
}

/// Link aggregation feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkAggregationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub groups: Vec<LagGroup>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// Port isolation feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortIsolationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_isolation_group")]
    pub group_id: u32,
    #[serde(default)]
    pub isolated_ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_port: Option<String>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

fn default_isolation_group() -> u32 {
    1
}

/// One stack member slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackMember {
    pub slot: u32,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub stack_ports: Vec<String>,
}

/// Stacking feature block (Huawei iStack only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub members: Vec<StackMember>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// M-LAG / DRNI feature block (Huawei and H3C)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlagConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_isolation_group")]
    pub domain_id: u32,
    /// Cross-reference into the link-aggregation feature, by group id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_link_lag: Option<u32>,
    #[serde(default)]
    pub keepalive_source_ip: String,
    #[serde(default)]
    pub keepalive_peer_ip: String,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// Spanning-tree operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StpMode {
    Stp,
    Rstp,
    Mstp,
}

impl Default for StpMode {
    fn default() -> Self {
        StpMode::Rstp
    }
}

/// STP feature block. Edge ports may name physical ports or LAG groups
/// ("lag:<id>" resolves through the link-aggregation feature).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mode: StpMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub edge_ports: Vec<String>,
    #[serde(default)]
    pub bpdu_guard: bool,
    #[serde(flatten)]
    pub out: CompiledSlots,
}
