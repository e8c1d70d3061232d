//! ACL compiler. Rule addressing is stored in subnet-mask form and
//! converted to wildcard form on emission, which all three dialects use.

use crate::model::{Acl, AclKind, AclRule, RuleAction, Vendor};

use super::xref::wildcard_form;
use super::{CompileContext, Emit, FeatureOutput};

fn action_word(action: RuleAction) -> &'static str {
    match action {
        RuleAction::Permit => "permit",
        RuleAction::Deny => "deny",
    }
}

fn rule_protocol(rule: &AclRule) -> &str {
    if rule.protocol.is_empty() {
        "ip"
    } else {
        rule.protocol.as_str()
    }
}

pub fn compile_acl(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.acl;
    let mut emit = Emit::new();

    let acls: Vec<&Acl> = cfg.acls.iter().filter(|a| a.id > 0).collect();
    if acls.is_empty() {
        emit.note("ACL: no access lists defined yet");
        return emit.finish();
    }
    emit.note(format!("ACL: {} access list(s)", acls.len()));

    match ctx.device.vendor {
        Vendor::Cisco => acl_cisco(&acls, &mut emit),
        Vendor::Huawei => acl_comware_style(&acls, &mut emit, true),
        Vendor::H3C => acl_comware_style(&acls, &mut emit, false),
        Vendor::Generic => {}
    }
    emit.finish()
}

fn acl_cisco(acls: &[&Acl], emit: &mut Emit) {
    for acl in acls {
        match acl.kind {
            AclKind::Basic => {
                for rule in &acl.rules {
                    emit.line(format!(
                        "access-list {} {} {}",
                        acl.id,
                        action_word(rule.action),
                        wildcard_form(&rule.source)
                    ));
                }
            }
            AclKind::Advanced => {
                let list_name = if acl.name.is_empty() {
                    acl.id.to_string()
                } else {
                    acl.name.clone()
                };
                emit.line(format!("ip access-list extended {list_name}"));
                for rule in &acl.rules {
                    let mut line = format!(
                        "{} {} {} {}",
                        action_word(rule.action),
                        rule_protocol(rule),
                        wildcard_form(&rule.source),
                        wildcard_form(&rule.destination)
                    );
                    if let Some(port) = rule.dest_port {
                        line.push_str(&format!(" eq {port}"));
                    }
                    emit.line(line);
                }
                emit.line("exit");
            }
        }
    }
}

/// Huawei and H3C share the numbered-ACL rule grammar; they differ only in
/// the list-declaration command.
fn acl_comware_style(acls: &[&Acl], emit: &mut Emit, huawei: bool) {
    for acl in acls {
        let declaration = match (huawei, acl.kind) {
            (true, _) => format!("acl number {}", acl.id),
            (false, AclKind::Basic) => format!("acl basic {}", acl.id),
            (false, AclKind::Advanced) => format!("acl advanced {}", acl.id),
        };
        emit.line(declaration);
        if !acl.name.is_empty() {
            emit.line(format!("description {}", acl.name));
        }
        for (index, rule) in acl.rules.iter().enumerate() {
            let rule_id = (index + 1) * 5;
            match acl.kind {
                AclKind::Basic => {
                    let source = if rule.source.is_any() {
                        "source any".to_string()
                    } else {
                        format!("source {}", wildcard_form(&rule.source))
                    };
                    emit.line(format!(
                        "rule {} {} {}",
                        rule_id,
                        action_word(rule.action),
                        source
                    ));
                }
                AclKind::Advanced => {
                    let mut line = format!(
                        "rule {} {} {} source {} destination {}",
                        rule_id,
                        action_word(rule.action),
                        rule_protocol(rule),
                        wildcard_form(&rule.source),
                        wildcard_form(&rule.destination)
                    );
                    if let Some(port) = rule.dest_port {
                        line.push_str(&format!(" destination-port eq {port}"));
                    }
                    emit.line(line);
                }
            }
        }
        emit.line("quit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{AddressMatch, Device, DeviceType};

    fn acl_device(vendor: Vendor) -> Device {
        let mut device = Device::new("fw1", "fw1", vendor, DeviceType::Firewall);
        device.config.acl.enabled = true;
        device.config.acl.acls.push(Acl {
            id: 2000,
            name: "mgmt".to_string(),
            kind: AclKind::Basic,
            rules: vec![AclRule {
                action: RuleAction::Permit,
                protocol: String::new(),
                source: AddressMatch {
                    ip: "10.1.0.0".to_string(),
                    mask: "255.255.0.0".to_string(),
                },
                destination: AddressMatch::default(),
                dest_port: None,
            }],
        });
        device.config.acl.acls.push(Acl {
            id: 3000,
            name: "web-in".to_string(),
            kind: AclKind::Advanced,
            rules: vec![AclRule {
                action: RuleAction::Permit,
                protocol: "tcp".to_string(),
                source: AddressMatch::default(),
                destination: AddressMatch {
                    ip: "192.168.1.10".to_string(),
                    mask: "255.255.255.255".to_string(),
                },
                dest_port: Some(443),
            }],
        });
        device
    }

    #[test]
    fn test_cisco_wildcard_emission() {
        let out = compile_feature(&acl_device(Vendor::Cisco), Feature::Acl, &[]);
        assert!(out.cli.contains("access-list 2000 permit 10.1.0.0 0.0.255.255"));
        assert!(out.cli.contains("ip access-list extended web-in"));
        assert!(out.cli.contains("permit tcp any 192.168.1.10 0.0.0.0 eq 443"));
    }

    #[test]
    fn test_huawei_numbered_rules() {
        let out = compile_feature(&acl_device(Vendor::Huawei), Feature::Acl, &[]);
        assert!(out.cli.contains("acl number 2000"));
        assert!(out.cli.contains("rule 5 permit source 10.1.0.0 0.0.255.255"));
        assert!(out.cli.contains("destination-port eq 443"));
    }

    #[test]
    fn test_h3c_kind_split_declarations() {
        let out = compile_feature(&acl_device(Vendor::H3C), Feature::Acl, &[]);
        assert!(out.cli.contains("acl basic 2000"));
        assert!(out.cli.contains("acl advanced 3000"));
    }
}
