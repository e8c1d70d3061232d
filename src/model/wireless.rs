use serde::{Deserialize, Serialize};

use super::ip_services::CompiledSlots;

/// SSID security mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SsidSecurity {
    Open,
    Wpa2Psk,
}

impl Default for SsidSecurity {
    fn default() -> Self {
        SsidSecurity::Open
    }
}

/// One wireless service (SSID) bound to a VLAN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ssid {
    pub name: String,
    #[serde(default)]
    pub vlan_id: u16,
    #[serde(default)]
    pub security: SsidSecurity,
    #[serde(default)]
    pub passphrase: String,
}

/// Wireless feature block (access controllers only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirelessConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ap_group: String,
    #[serde(default)]
    pub ssids: Vec<Ssid>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}
