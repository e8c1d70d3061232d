use serde::{Deserialize, Serialize};

use super::ip_services::CompiledSlots;

/// IKE phase-1 proposal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IkeProposal {
    pub id: u32,
    #[serde(default)]
    pub encryption: String,
    #[serde(default)]
    pub auth: String,
    #[serde(default)]
    pub dh_group: u32,
}

/// IPsec phase-2 transform set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSet {
    pub name: String,
    #[serde(default)]
    pub esp_encryption: String,
    #[serde(default)]
    pub esp_auth: String,
}

/// One IPsec policy entry. ACL and transform-set fields are cross-references;
/// a policy missing its transform sets is a work-in-progress and is omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpsecPolicy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seq: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_id: Option<u32>,
    #[serde(default)]
    pub transform_sets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ike_proposal: Option<u32>,
    #[serde(default)]
    pub peer_address: String,
    #[serde(default)]
    pub pre_shared_key: String,
    #[serde(default)]
    pub apply_interface: String,
}

/// IPsec feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpsecConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ike_proposals: Vec<IkeProposal>,
    #[serde(default)]
    pub transform_sets: Vec<TransformSet>,
    #[serde(default)]
    pub policies: Vec<IpsecPolicy>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// One GRE tunnel. When `source_interface` is unset the compiler falls back
/// to the first connected port discovered from topology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreTunnel {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub source_interface: String,
    #[serde(default)]
    pub destination_ip: String,
    #[serde(default)]
    pub tunnel_ip: String,
    #[serde(default)]
    pub tunnel_mask: String,
    #[serde(default)]
    pub keepalive: bool,
}

/// GRE feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tunnels: Vec<GreTunnel>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// High-availability role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaRole {
    Primary,
    Standby,
}

impl Default for HaRole {
    fn default() -> Self {
        HaRole::Primary
    }
}

/// Firewall HA feature block (Huawei HRP / H3C RBM)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub role: HaRole,
    #[serde(default)]
    pub heartbeat_interface: String,
    #[serde(default)]
    pub local_ip: String,
    #[serde(default)]
    pub peer_ip: String,
    #[serde(flatten)]
    pub out: CompiledSlots,
}
