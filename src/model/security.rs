use serde::{Deserialize, Serialize};

use super::ip_services::CompiledSlots;

/// Permit/deny action shared by ACL rules and security policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Permit,
    Deny,
}

impl Default for RuleAction {
    fn default() -> Self {
        RuleAction::Permit
    }
}

/// Basic ACLs match on source only; advanced ACLs add protocol/destination/port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclKind {
    Basic,
    Advanced,
}

impl Default for AclKind {
    fn default() -> Self {
        AclKind::Basic
    }
}

/// A source or destination match. `ip` empty means "any"; mask is a subnet
/// mask, converted to wildcard form where the dialect requires it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressMatch {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
}

impl AddressMatch {
    pub fn is_any(&self) -> bool {
        self.ip.is_empty()
    }
}

/// One ACL rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AclRule {
    #[serde(default)]
    pub action: RuleAction,
    /// tcp/udp/icmp/ip — advanced ACLs only
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub source: AddressMatch,
    #[serde(default)]
    pub destination: AddressMatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<u16>,
}

/// One ACL, identified by number (the cross-reference key) and optional name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acl {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: AclKind,
    #[serde(default)]
    pub rules: Vec<AclRule>,
}

/// ACL feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AclConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub acls: Vec<Acl>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// A public address pool for source NAT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatPool {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_ip: String,
    #[serde(default)]
    pub end_ip: String,
    #[serde(default)]
    pub mask: String,
}

/// Dynamic source-NAT rule: traffic matching the ACL is translated to the pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnatRule {
    /// Cross-reference into the ACL feature, by id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_id: Option<u32>,
    /// Cross-reference into this feature's pool list, by id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<u32>,
    /// Outbound interface the translation applies on
    #[serde(default)]
    pub outside_interface: String,
    #[serde(default)]
    pub overload: bool,
}

/// Static destination-NAT (server publishing) mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnatRule {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub global_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_port: Option<u16>,
    #[serde(default)]
    pub inside_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside_port: Option<u16>,
}

/// NAT feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NatConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub pools: Vec<NatPool>,
    #[serde(default)]
    pub snat_rules: Vec<SnatRule>,
    #[serde(default)]
    pub dnat_rules: Vec<DnatRule>,
    /// Inside-facing interfaces (Cisco `ip nat inside` marking)
    #[serde(default)]
    pub inside_interfaces: Vec<String>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// A local login account for SSH access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshUser {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

/// SSH management-access feature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SshConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub users: Vec<SshUser>,
    /// Cross-reference into the ACL feature: restrict VTY access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_id: Option<u32>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

/// One firewall security zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityZone {
    pub name: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// One inter-zone security policy. Zone and object-group fields are
/// cross-references resolved at compile time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityPolicy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_zone: String,
    #[serde(default)]
    pub dest_zone: String,
    #[serde(default)]
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_address_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_group: Option<String>,
}

/// Security feature block — compound: zones and policies toggle independently
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub zones_enabled: bool,
    #[serde(default)]
    pub policies_enabled: bool,
    #[serde(default)]
    pub zones: Vec<SecurityZone>,
    #[serde(default)]
    pub policies: Vec<SecurityPolicy>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

impl SecurityConfig {
    pub fn any_enabled(&self) -> bool {
        self.zones_enabled || self.policies_enabled
    }
}

/// One member of an address object group (subnet form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressGroupMember {
    pub ip: String,
    #[serde(default)]
    pub mask: String,
}

/// Named address object group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<AddressGroupMember>,
}

/// One member of a service object group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGroupMember {
    #[serde(default)]
    pub protocol: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_end: Option<u16>,
}

/// Named service object group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<ServiceGroupMember>,
}

/// Named domain object group (FQDN filtering)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainGroup {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Object groups feature block — compound: three independent sub-toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectGroupsConfig {
    #[serde(default)]
    pub address_enabled: bool,
    #[serde(default)]
    pub service_enabled: bool,
    #[serde(default)]
    pub domain_enabled: bool,
    #[serde(default)]
    pub address_groups: Vec<AddressGroup>,
    #[serde(default)]
    pub service_groups: Vec<ServiceGroup>,
    #[serde(default)]
    pub domain_groups: Vec<DomainGroup>,
    #[serde(flatten)]
    pub out: CompiledSlots,
}

impl ObjectGroupsConfig {
    pub fn any_enabled(&self) -> bool {
        self.address_enabled || self.service_enabled || self.domain_enabled
    }
}
