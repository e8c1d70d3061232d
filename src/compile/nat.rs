//! NAT compiler. Source-NAT rules cross-reference the ACL feature (by id)
//! and this feature's own address pools; dangling references degrade to
//! explanation notes with the dependent command omitted.

use crate::model::{NatPool, SnatRule, Vendor};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

/// Resolve a SNAT rule's cross-references. Returns (acl id, pool) when both
/// resolve; notes and None otherwise.
fn resolve_snat<'a>(
    ctx: &'a CompileContext<'_>,
    index: usize,
    rule: &SnatRule,
    emit: &mut Emit,
) -> Option<(u32, &'a NatPool)> {
    let acl_id = match rule.acl_id {
        Some(id) => id,
        // Untouched rule, still being filled in
        None => return None,
    };
    if xref::find_acl(&ctx.device.config, acl_id).is_none() {
        emit.note(format!(
            "NAT: rule {} references ACL {} which does not exist - rule omitted",
            index + 1,
            acl_id
        ));
        return None;
    }
    let pool_id = match rule.pool_id {
        Some(id) => id,
        None => return None,
    };
    match xref::find_nat_pool(&ctx.device.config, pool_id) {
        Some(pool) => Some((acl_id, pool)),
        None => {
            emit.note(format!(
                "NAT: rule {} references address pool {} which does not exist - rule omitted",
                index + 1,
                pool_id
            ));
            None
        }
    }
}

pub fn compile_nat(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.nat;
    let mut emit = Emit::new();

    if cfg.pools.is_empty() && cfg.snat_rules.is_empty() && cfg.dnat_rules.is_empty() {
        emit.note("NAT: no pools or rules defined yet");
        return emit.finish();
    }
    emit.note(format!(
        "NAT: {} pool(s), {} source rule(s), {} server mapping(s)",
        cfg.pools.len(),
        cfg.snat_rules.len(),
        cfg.dnat_rules.len()
    ));

    match ctx.device.vendor {
        Vendor::Cisco => nat_cisco(ctx, &mut emit),
        Vendor::Huawei => nat_huawei(ctx, &mut emit),
        Vendor::H3C => nat_h3c(ctx, &mut emit),
        Vendor::Generic => {}
    }
    emit.finish()
}

fn nat_cisco(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.nat;

    for pool in &cfg.pools {
        if pool.start_ip.is_empty() || pool.end_ip.is_empty() {
            continue;
        }
        let name = if pool.name.is_empty() {
            format!("pool{}", pool.id)
        } else {
            pool.name.clone()
        };
        emit.line(format!(
            "ip nat pool {} {} {} netmask {}",
            name, pool.start_ip, pool.end_ip, pool.mask
        ));
    }

    for (index, rule) in cfg.snat_rules.iter().enumerate() {
        let Some((acl_id, pool)) = resolve_snat(ctx, index, rule, emit) else {
            continue;
        };
        let pool_name = if pool.name.is_empty() {
            format!("pool{}", pool.id)
        } else {
            pool.name.clone()
        };
        let mut line = format!("ip nat inside source list {acl_id} pool {pool_name}");
        if rule.overload {
            line.push_str(" overload");
        }
        emit.line(line);
    }

    for rule in &cfg.dnat_rules {
        if rule.global_ip.is_empty() || rule.inside_ip.is_empty() {
            continue;
        }
        match (rule.global_port, rule.inside_port) {
            (Some(global_port), Some(inside_port)) => emit.line(format!(
                "ip nat inside source static {} {} {} {} {}",
                rule.protocol, rule.inside_ip, inside_port, rule.global_ip, global_port
            )),
            _ => emit.line(format!(
                "ip nat inside source static {} {}",
                rule.inside_ip, rule.global_ip
            )),
        }
    }

    // Interface direction marking
    for iface in &cfg.inside_interfaces {
        emit.line(format!("interface {iface}"));
        emit.line("ip nat inside");
        emit.line("exit");
    }
    let outside: Vec<&str> = cfg
        .snat_rules
        .iter()
        .map(|r| r.outside_interface.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    for iface in dedup_preserving_order(&outside) {
        emit.line(format!("interface {iface}"));
        emit.line("ip nat outside");
        emit.line("exit");
    }
}

fn nat_huawei(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.nat;

    for pool in &cfg.pools {
        if pool.start_ip.is_empty() || pool.end_ip.is_empty() {
            continue;
        }
        emit.line(format!("nat address-group {}", pool.id));
        emit.line(format!("section 0 {} {}", pool.start_ip, pool.end_ip));
        emit.line("quit");
    }

    for (index, rule) in cfg.snat_rules.iter().enumerate() {
        let Some((acl_id, pool)) = resolve_snat(ctx, index, rule, emit) else {
            continue;
        };
        if rule.outside_interface.is_empty() {
            emit.note(format!(
                "NAT: rule {} has no outbound interface selected - rule omitted",
                index + 1
            ));
            continue;
        }
        emit.line(format!("interface {}", rule.outside_interface));
        emit.line(format!("nat outbound {} address-group {}", acl_id, pool.id));
        emit.line("quit");
    }

    for rule in &cfg.dnat_rules {
        if rule.global_ip.is_empty() || rule.inside_ip.is_empty() {
            continue;
        }
        match (rule.global_port, rule.inside_port) {
            (Some(global_port), Some(inside_port)) => emit.line(format!(
                "nat server protocol {} global {} {} inside {} {}",
                rule.protocol, rule.global_ip, global_port, rule.inside_ip, inside_port
            )),
            _ => emit.line(format!(
                "nat server global {} inside {}",
                rule.global_ip, rule.inside_ip
            )),
        }
    }
}

fn nat_h3c(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.nat;

    for pool in &cfg.pools {
        if pool.start_ip.is_empty() || pool.end_ip.is_empty() {
            continue;
        }
        emit.line(format!("nat address-group {}", pool.id));
        emit.line(format!("address {} {}", pool.start_ip, pool.end_ip));
        emit.line("quit");
    }

    for (index, rule) in cfg.snat_rules.iter().enumerate() {
        let Some((acl_id, pool)) = resolve_snat(ctx, index, rule, emit) else {
            continue;
        };
        if rule.outside_interface.is_empty() {
            emit.note(format!(
                "NAT: rule {} has no outbound interface selected - rule omitted",
                index + 1
            ));
            continue;
        }
        emit.line(format!("interface {}", rule.outside_interface));
        emit.line(format!("nat outbound {} address-group {}", acl_id, pool.id));
        emit.line("quit");
    }

    for rule in &cfg.dnat_rules {
        if rule.global_ip.is_empty() || rule.inside_ip.is_empty() {
            continue;
        }
        match (rule.global_port, rule.inside_port) {
            (Some(global_port), Some(inside_port)) => emit.line(format!(
                "nat server protocol {} global {} {} inside {} {}",
                rule.protocol, rule.global_ip, global_port, rule.inside_ip, inside_port
            )),
            _ => emit.line(format!(
                "nat server global {} inside {}",
                rule.global_ip, rule.inside_ip
            )),
        }
    }
}

fn dedup_preserving_order<'a>(names: &[&'a str]) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(name) {
            seen.push(name);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{Acl, AclKind, Device, DeviceType, DnatRule};

    fn nat_device(vendor: Vendor) -> Device {
        let mut device = Device::new("fw1", "fw1", vendor, DeviceType::Firewall);
        device.config.acl.enabled = true;
        device.config.acl.acls.push(Acl {
            id: 2000,
            name: String::new(),
            kind: AclKind::Basic,
            rules: vec![],
        });
        device.config.nat.enabled = true;
        device.config.nat.pools.push(NatPool {
            id: 1,
            name: "public".to_string(),
            start_ip: "203.0.113.10".to_string(),
            end_ip: "203.0.113.20".to_string(),
            mask: "255.255.255.0".to_string(),
        });
        device.config.nat.snat_rules.push(SnatRule {
            acl_id: Some(2000),
            pool_id: Some(1),
            outside_interface: "GigabitEthernet0/0".to_string(),
            overload: true,
        });
        device
    }

    #[test]
    fn test_cisco_snat_with_overload() {
        let out = compile_feature(&nat_device(Vendor::Cisco), Feature::Nat, &[]);
        assert!(out.cli.contains("ip nat pool public 203.0.113.10 203.0.113.20 netmask 255.255.255.0"));
        assert!(out.cli.contains("ip nat inside source list 2000 pool public overload"));
        assert!(out.cli.contains("ip nat outside"));
    }

    #[test]
    fn test_huawei_outbound_binding() {
        let out = compile_feature(&nat_device(Vendor::Huawei), Feature::Nat, &[]);
        assert!(out.cli.contains("nat address-group 1"));
        assert!(out.cli.contains("nat outbound 2000 address-group 1"));
    }

    #[test]
    fn test_dangling_acl_reference_omits_rule_without_panic() {
        let mut device = nat_device(Vendor::Cisco);
        device.config.acl.acls.clear();
        let out = compile_feature(&device, Feature::Nat, &[]);
        assert!(!out.cli.contains("source list 2000"));
        assert!(out.explanation.contains("references ACL 2000 which does not exist"));
    }

    #[test]
    fn test_dnat_server_mapping() {
        let mut device = nat_device(Vendor::H3C);
        device.config.nat.dnat_rules.push(DnatRule {
            protocol: "tcp".to_string(),
            global_ip: "203.0.113.5".to_string(),
            global_port: Some(80),
            inside_ip: "192.168.1.10".to_string(),
            inside_port: Some(8080),
        });
        let out = compile_feature(&device, Feature::Nat, &[]);
        assert!(out
            .cli
            .contains("nat server protocol tcp global 203.0.113.5 80 inside 192.168.1.10 8080"));
    }
}
