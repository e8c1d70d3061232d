use serde::{Deserialize, Serialize};

/// Compiled output slots shared by every feature block.
/// These are write-targets of the compiler, never hand-edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledSlots {
    #[serde(default)]
    pub cli: String,
    #[serde(default)]
    pub explanation: String,
}

/// DHCP lease duration, stored as discrete components and reassembled
/// per vendor at compile time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaseTime {
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl LeaseTime {
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// An address range excluded from dynamic allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedRange {
    pub start: String,
    pub end: String,
}

/// One DHCP address pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhcpPool {
    pub name: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub mask: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub excluded: Vec<ExcludedRange>,
    #[serde(default)]
    pub lease: LeaseTime,
}

/// DHCP server feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DhcpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub pools: Vec<DhcpPool>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// One VLAN-to-server relay mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEntry {
    pub vlan_id: u16,
    pub server_ip: String,
}

/// DHCP relay feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DhcpRelayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub entries: Vec<RelayEntry>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// DHCP snooping feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DhcpSnoopingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub vlans: Vec<u16>,
    #[serde(default)]
    pub trusted_ports: Vec<String>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// L3 interface attached to a VLAN (SVI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanInterface {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
    /// Cross-reference into the DHCP feature's pool list, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_pool: Option<String>,
}

/// One VLAN definition with optional SVI and port membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanEntry {
    pub id: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<VlanInterface>,
    #[serde(default)]
    pub access_ports: Vec<String>,
    #[serde(default)]
    pub trunk_ports: Vec<String>,
}

/// VLAN feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VlanConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub vlans: Vec<VlanEntry>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// Plain routed interface addressing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpInterface {
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
    #[serde(default)]
    pub description: String,
}

/// Interface IP feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceIpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub interfaces: Vec<IpInterface>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}
