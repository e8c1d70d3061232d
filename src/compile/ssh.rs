//! SSH management-access compiler. The optional VTY ACL is a
//! cross-reference into the ACL feature.

use crate::model::Vendor;

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

pub fn compile_ssh(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.ssh;
    let mut emit = Emit::new();

    let users: Vec<_> = cfg.users.iter().filter(|u| !u.username.is_empty()).collect();
    if users.is_empty() {
        emit.note("SSH: no login accounts defined yet");
        return emit.finish();
    }
    emit.note(format!("SSH: {} account(s)", users.len()));

    let vty_acl = match cfg.acl_id {
        Some(acl_id) if xref::find_acl(&ctx.device.config, acl_id).is_none() => {
            emit.note(format!(
                "SSH: references ACL {acl_id} which does not exist - VTY restriction omitted"
            ));
            None
        }
        other => other,
    };

    match ctx.device.vendor {
        Vendor::Cisco => {
            if !cfg.domain_name.is_empty() {
                emit.line(format!("ip domain-name {}", cfg.domain_name));
            }
            emit.line("crypto key generate rsa modulus 2048");
            emit.line("ip ssh version 2");
            for user in &users {
                let privilege = if user.admin { 15 } else { 1 };
                emit.line(format!(
                    "username {} privilege {} secret {}",
                    user.username, privilege, user.password
                ));
            }
            emit.line("line vty 0 4");
            emit.line("transport input ssh");
            emit.line("login local");
            if let Some(acl_id) = vty_acl {
                emit.line(format!("access-class {acl_id} in"));
            }
            emit.line("exit");
        }
        Vendor::Huawei => {
            emit.line("stelnet server enable");
            for user in &users {
                emit.line(format!(
                    "aaa local-user {} password irreversible-cipher {}",
                    user.username, user.password
                ));
                emit.line(format!("aaa local-user {} service-type ssh", user.username));
                let level = if user.admin { 15 } else { 1 };
                emit.line(format!("aaa local-user {} privilege level {}", user.username, level));
            }
            for user in &users {
                emit.line(format!("ssh user {} authentication-type password", user.username));
                emit.line(format!("ssh user {} service-type stelnet", user.username));
            }
            emit.line("user-interface vty 0 4");
            emit.line("authentication-mode aaa");
            emit.line("protocol inbound ssh");
            if let Some(acl_id) = vty_acl {
                emit.line(format!("acl {acl_id} inbound"));
            }
            emit.line("quit");
        }
        Vendor::H3C => {
            emit.line("ssh server enable");
            for user in &users {
                emit.line(format!(
                    "local-user {} class manage",
                    user.username
                ));
                emit.line(format!("password simple {}", user.password));
                emit.line("service-type ssh");
                let role = if user.admin { "network-admin" } else { "network-operator" };
                emit.line(format!("authorization-attribute user-role {role}"));
                emit.line("quit");
            }
            emit.line("line vty 0 4");
            emit.line("authentication-mode scheme");
            emit.line("protocol inbound ssh");
            emit.line("quit");
            if let Some(acl_id) = vty_acl {
                emit.line(format!("ssh server acl {acl_id}"));
            }
        }
        Vendor::Generic => {}
    }
    emit.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{Acl, AclKind, Device, DeviceType, SshUser};

    fn ssh_device(vendor: Vendor) -> Device {
        let mut device = Device::new("sw1", "sw1", vendor, DeviceType::L3Switch);
        device.config.ssh.enabled = true;
        device.config.ssh.domain_name = "lab.example".to_string();
        device.config.ssh.users.push(SshUser {
            username: "ops".to_string(),
            password: "hunter2".to_string(),
            admin: true,
        });
        device
    }

    #[test]
    fn test_cisco_vty_setup() {
        let out = compile_feature(&ssh_device(Vendor::Cisco), Feature::Ssh, &[]);
        assert!(out.cli.contains("ip domain-name lab.example"));
        assert!(out.cli.contains("username ops privilege 15 secret hunter2"));
        assert!(out.cli.contains("transport input ssh"));
    }

    #[test]
    fn test_h3c_user_role() {
        let out = compile_feature(&ssh_device(Vendor::H3C), Feature::Ssh, &[]);
        assert!(out.cli.contains("local-user ops class manage"));
        assert!(out.cli.contains("authorization-attribute user-role network-admin"));
    }

    #[test]
    fn test_dangling_vty_acl_degrades_to_note() {
        let mut device = ssh_device(Vendor::Cisco);
        device.config.ssh.acl_id = Some(10);
        let out = compile_feature(&device, Feature::Ssh, &[]);
        assert!(!out.cli.contains("access-class 10 in"));
        assert!(out.explanation.contains("references ACL 10 which does not exist"));

        device.config.acl.enabled = true;
        device.config.acl.acls.push(Acl {
            id: 10,
            name: String::new(),
            kind: AclKind::Basic,
            rules: vec![],
        });
        let out = compile_feature(&device, Feature::Ssh, &[]);
        assert!(out.cli.contains("access-class 10 in"));
    }
}
