use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Configuration;

/// Vendor identifies the command dialect a device speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    Cisco,
    Huawei,
    H3C,
    /// UI default state only — never produces deployable CLI
    Generic,
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::Cisco => write!(f, "Cisco"),
            Vendor::Huawei => write!(f, "Huawei"),
            Vendor::H3C => write!(f, "H3C"),
            Vendor::Generic => write!(f, "Generic"),
        }
    }
}

impl Default for Vendor {
    fn default() -> Self {
        Vendor::Generic
    }
}

/// DeviceType drives feature applicability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Router,
    L2Switch,
    L3Switch,
    Firewall,
    AccessController,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Router => write!(f, "Router"),
            DeviceType::L2Switch => write!(f, "L2Switch"),
            DeviceType::L3Switch => write!(f, "L3Switch"),
            DeviceType::Firewall => write!(f, "Firewall"),
            DeviceType::AccessController => write!(f, "AccessController"),
        }
    }
}

/// A physical port on a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    #[serde(default)]
    pub connected: bool,
}

/// Device represents a managed network device and its desired configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub vendor: Vendor,
    pub device_type: DeviceType,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub config: Configuration,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Create a device with all features disabled
    pub fn new(id: impl Into<String>, name: impl Into<String>, vendor: Vendor, device_type: DeviceType) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            vendor,
            device_type,
            ports: Vec::new(),
            config: Configuration::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Port names currently wired to something, in port-list order
    pub fn connected_port_names(&self) -> Vec<&str> {
        self.ports
            .iter()
            .filter(|p| p.connected)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// One endpoint of a topology edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub device_id: String,
    pub port: String,
}

/// Connection is a topology edge between two device ports.
/// Read-only input to compilers that infer membership from physical wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub a: Endpoint,
    pub b: Endpoint,
}

impl Connection {
    /// If this edge touches `device_id`, return (local port, peer endpoint)
    pub fn local_port_and_peer(&self, device_id: &str) -> Option<(&str, &Endpoint)> {
        if self.a.device_id == device_id {
            Some((self.a.port.as_str(), &self.b))
        } else if self.b.device_id == device_id {
            Some((self.b.port.as_str(), &self.a))
        } else {
            None
        }
    }
}

/// Group the ports of `device_id` by the peer device they are wired to.
/// Used by link-aggregation auto-detect: ports sharing a peer are LAG candidates.
pub fn ports_by_peer<'a>(device_id: &str, connections: &'a [Connection]) -> Vec<(String, Vec<&'a str>)> {
    let mut groups: Vec<(String, Vec<&'a str>)> = Vec::new();
    for conn in connections {
        if let Some((port, peer)) = conn.local_port_and_peer(device_id) {
            match groups.iter_mut().find(|(peer_id, _)| peer_id == &peer.device_id) {
                Some((_, ports)) => ports.push(port),
                None => groups.push((peer.device_id.clone(), vec![port])),
            }
        }
    }
    groups
}
