//! Compilers for the two compound features: security zones/policies and
//! address/service/domain object groups. Both compile from multiple
//! sub-toggles; all sub-toggles off means the dispatch layer never calls in.

use crate::model::{RuleAction, SecurityPolicy, Vendor};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

// ---------------------------------------------------------------------------
// Security zones and inter-zone policies
// ---------------------------------------------------------------------------

pub fn compile_security(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.security;
    let mut emit = Emit::new();

    if cfg.zones_enabled {
        let zones: Vec<_> = cfg.zones.iter().filter(|z| !z.name.is_empty()).collect();
        emit.note(format!("Security: {} zone(s)", zones.len()));
        match ctx.device.vendor {
            Vendor::Cisco => {
                for zone in &zones {
                    emit.line(format!("zone security {}", zone.name));
                    emit.line("exit");
                    for iface in &zone.interfaces {
                        emit.line(format!("interface {iface}"));
                        emit.line(format!("zone-member security {}", zone.name));
                        emit.line("exit");
                    }
                }
            }
            Vendor::Huawei => {
                for zone in &zones {
                    emit.line(format!("firewall zone name {}", zone.name));
                    emit.line(format!("set priority {}", zone.priority));
                    for iface in &zone.interfaces {
                        emit.line(format!("add interface {iface}"));
                    }
                    emit.line("quit");
                }
            }
            Vendor::H3C => {
                for zone in &zones {
                    emit.line(format!("security-zone name {}", zone.name));
                    for iface in &zone.interfaces {
                        emit.line(format!("import interface {iface}"));
                    }
                    emit.line("quit");
                }
            }
            Vendor::Generic => {}
        }
    }

    if cfg.policies_enabled {
        let policies: Vec<_> = cfg
            .policies
            .iter()
            .filter(|p| !p.source_zone.is_empty() && !p.dest_zone.is_empty())
            .collect();
        emit.note(format!("Security: {} inter-zone policy(ies)", policies.len()));
        match ctx.device.vendor {
            Vendor::Cisco => policies_cisco(ctx, &policies, &mut emit),
            Vendor::Huawei => policies_huawei(ctx, &policies, &mut emit),
            Vendor::H3C => policies_h3c(ctx, &policies, &mut emit),
            Vendor::Generic => {}
        }
    }
    emit.finish()
}

/// Check a policy's zone references; note and skip when either side is
/// missing from the zone list.
fn zones_resolve(ctx: &CompileContext<'_>, policy: &SecurityPolicy, emit: &mut Emit) -> bool {
    for zone in [&policy.source_zone, &policy.dest_zone] {
        if !xref::zone_exists(&ctx.device.config, zone) {
            emit.note(format!(
                "Security: policy '{}' references zone '{}' which does not exist - policy omitted",
                policy.name, zone
            ));
            return false;
        }
    }
    true
}

/// Resolve an optional object-group reference, noting dangling names.
fn group_ref(
    ctx: &CompileContext<'_>,
    policy_name: &str,
    group: &Option<String>,
    service: bool,
    emit: &mut Emit,
) -> Option<String> {
    let name = group.as_ref()?;
    let found = if service {
        xref::find_service_group(&ctx.device.config, name).is_some()
    } else {
        xref::find_address_group(&ctx.device.config, name).is_some()
    };
    if found {
        Some(name.clone())
    } else {
        let kind = if service { "service" } else { "address" };
        emit.note(format!(
            "Security: policy '{policy_name}' references {kind} group '{name}' which does not exist - match omitted"
        ));
        None
    }
}

fn policies_cisco(ctx: &CompileContext<'_>, policies: &[&SecurityPolicy], emit: &mut Emit) {
    for policy in policies {
        if !zones_resolve(ctx, policy, emit) {
            continue;
        }
        // IOS zone-based firewall: class/policy/zone-pair triple per rule
        emit.line(format!("class-map type inspect match-all cm-{}", policy.name));
        if let Some(group) = group_ref(ctx, &policy.name, &policy.source_address_group, false, emit) {
            emit.line(format!("match access-group name {group}"));
        }
        emit.line("exit");
        emit.line(format!("policy-map type inspect pm-{}", policy.name));
        emit.line(format!("class type inspect cm-{}", policy.name));
        match policy.action {
            RuleAction::Permit => emit.line("inspect"),
            RuleAction::Deny => emit.line("drop"),
        }
        emit.line("exit");
        emit.line("exit");
        emit.line(format!(
            "zone-pair security zp-{} source {} destination {}",
            policy.name, policy.source_zone, policy.dest_zone
        ));
        emit.line(format!("service-policy type inspect pm-{}", policy.name));
        emit.line("exit");
    }
}

fn policies_huawei(ctx: &CompileContext<'_>, policies: &[&SecurityPolicy], emit: &mut Emit) {
    let resolved: Vec<_> = policies
        .iter()
        .filter(|p| zones_resolve(ctx, p, emit))
        .collect();
    if resolved.is_empty() {
        return;
    }
    emit.line("security-policy");
    for policy in resolved {
        emit.line(format!("rule name {}", policy.name));
        emit.line(format!("source-zone {}", policy.source_zone));
        emit.line(format!("destination-zone {}", policy.dest_zone));
        if let Some(group) = group_ref(ctx, &policy.name, &policy.source_address_group, false, emit) {
            emit.line(format!("source-address address-set {group}"));
        }
        if let Some(group) = group_ref(ctx, &policy.name, &policy.dest_address_group, false, emit) {
            emit.line(format!("destination-address address-set {group}"));
        }
        if let Some(group) = group_ref(ctx, &policy.name, &policy.service_group, true, emit) {
            emit.line(format!("service {group}"));
        }
        match policy.action {
            RuleAction::Permit => emit.line("action permit"),
            RuleAction::Deny => emit.line("action deny"),
        }
        emit.line("quit");
    }
    emit.line("quit");
}

fn policies_h3c(ctx: &CompileContext<'_>, policies: &[&SecurityPolicy], emit: &mut Emit) {
    let resolved: Vec<_> = policies
        .iter()
        .filter(|p| zones_resolve(ctx, p, emit))
        .collect();
    if resolved.is_empty() {
        return;
    }
    emit.line("security-policy ip");
    for (index, policy) in resolved.iter().enumerate() {
        emit.line(format!("rule {} name {}", index, policy.name));
        emit.line(format!("source-zone {}", policy.source_zone));
        emit.line(format!("destination-zone {}", policy.dest_zone));
        if let Some(group) = group_ref(ctx, &policy.name, &policy.source_address_group, false, emit) {
            emit.line(format!("source-ip {group}"));
        }
        if let Some(group) = group_ref(ctx, &policy.name, &policy.dest_address_group, false, emit) {
            emit.line(format!("destination-ip {group}"));
        }
        if let Some(group) = group_ref(ctx, &policy.name, &policy.service_group, true, emit) {
            emit.line(format!("service {group}"));
        }
        match policy.action {
            RuleAction::Permit => emit.line("action pass"),
            RuleAction::Deny => emit.line("action drop"),
        }
        emit.line("quit");
    }
    emit.line("quit");
}

// ---------------------------------------------------------------------------
// Object groups
// ---------------------------------------------------------------------------

pub fn compile_object_groups(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.object_groups;
    let mut emit = Emit::new();

    if cfg.address_enabled {
        let groups: Vec<_> = cfg.address_groups.iter().filter(|g| !g.name.is_empty()).collect();
        emit.note(format!("Object Groups: {} address group(s)", groups.len()));
        for group in &groups {
            match ctx.device.vendor {
                Vendor::Cisco => {
                    emit.line(format!("object-group network {}", group.name));
                    for member in &group.members {
                        emit.line(format!("network-object {} {}", member.ip, member.mask));
                    }
                    emit.line("exit");
                }
                Vendor::Huawei => {
                    emit.line(format!("ip address-set {} type object", group.name));
                    for (index, member) in group.members.iter().enumerate() {
                        match xref::mask_to_prefix_len(&member.mask) {
                            Some(len) => emit.line(format!(
                                "address {} {} mask {}",
                                index, member.ip, len
                            )),
                            None => emit.line(format!("address {} {} 0", index, member.ip)),
                        }
                    }
                    emit.line("quit");
                }
                Vendor::H3C => {
                    emit.line(format!("object-group ip address {}", group.name));
                    for member in &group.members {
                        match xref::mask_to_prefix_len(&member.mask) {
                            Some(len) => emit.line(format!(
                                "network subnet {} {}",
                                member.ip, len
                            )),
                            None => emit.line(format!("network host address {}", member.ip)),
                        }
                    }
                    emit.line("quit");
                }
                Vendor::Generic => {}
            }
        }
    }

    if cfg.service_enabled {
        let groups: Vec<_> = cfg.service_groups.iter().filter(|g| !g.name.is_empty()).collect();
        emit.note(format!("Object Groups: {} service group(s)", groups.len()));
        for group in &groups {
            match ctx.device.vendor {
                Vendor::Cisco => {
                    emit.line(format!("object-group service {}", group.name));
                    for member in &group.members {
                        match member.port_end {
                            Some(end) => emit.line(format!(
                                "{} range {} {}",
                                member.protocol, member.port, end
                            )),
                            None => emit.line(format!("{} eq {}", member.protocol, member.port)),
                        }
                    }
                    emit.line("exit");
                }
                Vendor::Huawei => {
                    emit.line(format!("ip service-set {} type object", group.name));
                    for (index, member) in group.members.iter().enumerate() {
                        match member.port_end {
                            Some(end) => emit.line(format!(
                                "service {} protocol {} destination-port {} to {}",
                                index, member.protocol, member.port, end
                            )),
                            None => emit.line(format!(
                                "service {} protocol {} destination-port {}",
                                index, member.protocol, member.port
                            )),
                        }
                    }
                    emit.line("quit");
                }
                Vendor::H3C => {
                    emit.line(format!("object-group service {}", group.name));
                    for member in &group.members {
                        match member.port_end {
                            Some(end) => emit.line(format!(
                                "service {} destination range {} {}",
                                member.protocol, member.port, end
                            )),
                            None => emit.line(format!(
                                "service {} destination eq {}",
                                member.protocol, member.port
                            )),
                        }
                    }
                    emit.line("quit");
                }
                Vendor::Generic => {}
            }
        }
    }

    if cfg.domain_enabled {
        let groups: Vec<_> = cfg.domain_groups.iter().filter(|g| !g.name.is_empty()).collect();
        match ctx.device.vendor {
            // IOS has no first-class domain group object
            Vendor::Cisco => {
                if !groups.is_empty() {
                    emit.note("Object Groups: domain groups are not supported on Cisco - omitted");
                }
            }
            Vendor::Huawei => {
                emit.note(format!("Object Groups: {} domain group(s)", groups.len()));
                for group in &groups {
                    emit.line(format!("domain-set name {}", group.name));
                    for domain in &group.domains {
                        emit.line(format!("add domain {domain}"));
                    }
                    emit.line("quit");
                }
            }
            Vendor::H3C => {
                emit.note(format!("Object Groups: {} domain group(s)", groups.len()));
                for group in &groups {
                    emit.line(format!("object-group ip address {}", group.name));
                    for domain in &group.domains {
                        emit.line(format!("network host name {domain}"));
                    }
                    emit.line("quit");
                }
            }
            Vendor::Generic => {}
        }
    }
    emit.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{
        AddressGroup, AddressGroupMember, Device, DeviceType, DomainGroup, SecurityZone,
        ServiceGroup, ServiceGroupMember,
    };

    fn firewall(vendor: Vendor) -> Device {
        Device::new("fw1", "fw1", vendor, DeviceType::Firewall)
    }

    fn with_zones_and_policy(vendor: Vendor) -> Device {
        let mut device = firewall(vendor);
        device.config.security.zones_enabled = true;
        device.config.security.policies_enabled = true;
        device.config.security.zones = vec![
            SecurityZone {
                name: "trust".to_string(),
                priority: 85,
                interfaces: vec!["GigabitEthernet0/1".to_string()],
            },
            SecurityZone { name: "untrust".to_string(), priority: 5, interfaces: vec![] },
        ];
        device.config.security.policies.push(SecurityPolicy {
            name: "allow-out".to_string(),
            source_zone: "trust".to_string(),
            dest_zone: "untrust".to_string(),
            action: RuleAction::Permit,
            source_address_group: None,
            dest_address_group: None,
            service_group: None,
        });
        device
    }

    #[test]
    fn test_huawei_zone_and_policy() {
        let out = compile_feature(&with_zones_and_policy(Vendor::Huawei), Feature::Security, &[]);
        assert!(out.cli.contains("firewall zone name trust"));
        assert!(out.cli.contains("set priority 85"));
        assert!(out.cli.contains("rule name allow-out"));
        assert!(out.cli.contains("action permit"));
    }

    #[test]
    fn test_policy_with_missing_zone_is_omitted() {
        let mut device = with_zones_and_policy(Vendor::H3C);
        device.config.security.policies[0].dest_zone = "dmz".to_string();
        let out = compile_feature(&device, Feature::Security, &[]);
        assert!(!out.cli.contains("allow-out"));
        assert!(out.explanation.contains("zone 'dmz' which does not exist"));
        // No rule survived, so the policy block itself is suppressed
        assert!(!out.cli.contains("security-policy"));
    }

    #[test]
    fn test_no_empty_policy_wrapper_when_all_rules_fail() {
        let mut device = firewall(Vendor::Huawei);
        device.config.security.policies_enabled = true;
        device.config.security.policies.push(SecurityPolicy {
            name: "orphan".to_string(),
            source_zone: "trust".to_string(),
            dest_zone: "untrust".to_string(),
            action: RuleAction::Permit,
            source_address_group: None,
            dest_address_group: None,
            service_group: None,
        });
        let out = compile_feature(&device, Feature::Security, &[]);
        assert!(out.cli.is_empty());
        assert!(out.explanation.contains("zone 'trust' which does not exist"));
    }

    #[test]
    fn test_policy_with_dangling_address_group() {
        let mut device = with_zones_and_policy(Vendor::Huawei);
        device.config.security.policies[0].source_address_group = Some("servers".to_string());
        let out = compile_feature(&device, Feature::Security, &[]);
        // Policy still emitted, only the group match is dropped
        assert!(out.cli.contains("rule name allow-out"));
        assert!(!out.cli.contains("address-set servers"));
        assert!(out.explanation.contains("address group 'servers' which does not exist"));
    }

    fn with_object_groups(vendor: Vendor) -> Device {
        let mut device = firewall(vendor);
        let og = &mut device.config.object_groups;
        og.address_enabled = true;
        og.service_enabled = true;
        og.domain_enabled = true;
        og.address_groups.push(AddressGroup {
            name: "servers".to_string(),
            members: vec![AddressGroupMember {
                ip: "192.168.1.0".to_string(),
                mask: "255.255.255.0".to_string(),
            }],
        });
        og.service_groups.push(ServiceGroup {
            name: "web".to_string(),
            members: vec![ServiceGroupMember { protocol: "tcp".to_string(), port: 80, port_end: Some(81) }],
        });
        og.domain_groups.push(DomainGroup {
            name: "blocked".to_string(),
            domains: vec!["example.com".to_string()],
        });
        device
    }

    #[test]
    fn test_object_groups_per_vendor_forms() {
        let cisco = compile_feature(&with_object_groups(Vendor::Cisco), Feature::ObjectGroups, &[]);
        assert!(cisco.cli.contains("object-group network servers"));
        assert!(cisco.cli.contains("network-object 192.168.1.0 255.255.255.0"));
        assert!(cisco.cli.contains("tcp range 80 81"));
        assert!(cisco.explanation.contains("domain groups are not supported on Cisco"));

        let huawei = compile_feature(&with_object_groups(Vendor::Huawei), Feature::ObjectGroups, &[]);
        assert!(huawei.cli.contains("ip address-set servers type object"));
        assert!(huawei.cli.contains("address 0 192.168.1.0 mask 24"));
        assert!(huawei.cli.contains("domain-set name blocked"));

        let h3c = compile_feature(&with_object_groups(Vendor::H3C), Feature::ObjectGroups, &[]);
        assert!(h3c.cli.contains("network subnet 192.168.1.0 24"));
    }
}
