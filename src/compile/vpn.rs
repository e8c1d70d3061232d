//! Compilers for the site-to-site VPN features: IPsec and GRE tunnels.

use crate::model::{GreTunnel, IpsecPolicy, Vendor};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

pub fn compile_ipsec(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.ipsec;
    let mut emit = Emit::new();

    if cfg.ike_proposals.is_empty() && cfg.transform_sets.is_empty() && cfg.policies.is_empty() {
        emit.note("IPsec: no proposals or policies defined yet");
        return emit.finish();
    }
    emit.note(format!(
        "IPsec: {} IKE proposal(s), {} transform set(s), {} policy(ies)",
        cfg.ike_proposals.len(),
        cfg.transform_sets.len(),
        cfg.policies.len()
    ));

    match ctx.device.vendor {
        Vendor::Cisco => ipsec_cisco(ctx, &mut emit),
        Vendor::Huawei => ipsec_huawei(ctx, &mut emit),
        Vendor::H3C => ipsec_h3c(ctx, &mut emit),
        Vendor::Generic => {}
    }
    emit.finish()
}

/// Validate a policy's cross-references and completeness. A policy missing
/// its peer or transform sets is still being filled in and is skipped
/// without a note; dangling references are noted.
fn ipsec_policy_ready(ctx: &CompileContext<'_>, policy: &IpsecPolicy, emit: &mut Emit) -> bool {
    if policy.peer_address.is_empty() || policy.transform_sets.is_empty() {
        return false;
    }
    for name in &policy.transform_sets {
        if xref::find_transform_set(&ctx.device.config, name).is_none() {
            emit.note(format!(
                "IPsec: policy '{}' references transform set '{}' which does not exist - policy omitted",
                policy.name, name
            ));
            return false;
        }
    }
    if let Some(acl_id) = policy.acl_id {
        if xref::find_acl(&ctx.device.config, acl_id).is_none() {
            emit.note(format!(
                "IPsec: policy '{}' references ACL {} which does not exist - policy omitted",
                policy.name, acl_id
            ));
            return false;
        }
    }
    true
}

fn ipsec_cisco(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.ipsec;

    for proposal in &cfg.ike_proposals {
        emit.line(format!("crypto isakmp policy {}", proposal.id));
        if !proposal.encryption.is_empty() {
            emit.line(format!("encryption {}", proposal.encryption));
        }
        if !proposal.auth.is_empty() {
            emit.line(format!("hash {}", proposal.auth));
        }
        if proposal.dh_group > 0 {
            emit.line(format!("group {}", proposal.dh_group));
        }
        emit.line("exit");
    }

    for set in &cfg.transform_sets {
        emit.line(format!(
            "crypto ipsec transform-set {} {} {}",
            set.name, set.esp_encryption, set.esp_auth
        ));
        emit.line("exit");
    }

    for policy in &cfg.policies {
        if !ipsec_policy_ready(ctx, policy, emit) {
            continue;
        }
        if !policy.pre_shared_key.is_empty() {
            emit.line(format!(
                "crypto isakmp key {} address {}",
                policy.pre_shared_key, policy.peer_address
            ));
        }
        emit.line(format!("crypto map {} {} ipsec-isakmp", policy.name, policy.seq));
        emit.line(format!("set peer {}", policy.peer_address));
        emit.line(format!("set transform-set {}", policy.transform_sets.join(" ")));
        if let Some(acl_id) = policy.acl_id {
            emit.line(format!("match address {acl_id}"));
        }
        emit.line("exit");
        if !policy.apply_interface.is_empty() {
            emit.line(format!("interface {}", policy.apply_interface));
            emit.line(format!("crypto map {}", policy.name));
            emit.line("exit");
        }
    }
}

fn ipsec_huawei(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.ipsec;

    for proposal in &cfg.ike_proposals {
        emit.line(format!("ike proposal {}", proposal.id));
        if !proposal.encryption.is_empty() {
            emit.line(format!("encryption-algorithm {}", proposal.encryption));
        }
        if !proposal.auth.is_empty() {
            emit.line(format!("authentication-algorithm {}", proposal.auth));
        }
        if proposal.dh_group > 0 {
            emit.line(format!("dh group{}", proposal.dh_group));
        }
        emit.line("quit");
    }

    for set in &cfg.transform_sets {
        emit.line(format!("ipsec proposal {}", set.name));
        emit.line("transform esp");
        if !set.esp_encryption.is_empty() {
            emit.line(format!("esp encryption-algorithm {}", set.esp_encryption));
        }
        if !set.esp_auth.is_empty() {
            emit.line(format!("esp authentication-algorithm {}", set.esp_auth));
        }
        emit.line("quit");
    }

    for policy in &cfg.policies {
        if !ipsec_policy_ready(ctx, policy, emit) {
            continue;
        }
        let peer_name = format!("peer-{}", policy.name);
        emit.line(format!("ike peer {peer_name}"));
        if !policy.pre_shared_key.is_empty() {
            emit.line(format!("pre-shared-key {}", policy.pre_shared_key));
        }
        if let Some(proposal) = policy.ike_proposal {
            emit.line(format!("ike-proposal {proposal}"));
        }
        emit.line(format!("remote-address {}", policy.peer_address));
        emit.line("quit");
        emit.line(format!("ipsec policy {} {} isakmp", policy.name, policy.seq));
        if let Some(acl_id) = policy.acl_id {
            emit.line(format!("security acl {acl_id}"));
        }
        emit.line(format!("ike-peer {peer_name}"));
        for set in &policy.transform_sets {
            emit.line(format!("proposal {set}"));
        }
        emit.line("quit");
        if !policy.apply_interface.is_empty() {
            emit.line(format!("interface {}", policy.apply_interface));
            emit.line(format!("ipsec policy {}", policy.name));
            emit.line("quit");
        }
    }
}

fn ipsec_h3c(ctx: &CompileContext<'_>, emit: &mut Emit) {
    let cfg = &ctx.device.config.ipsec;

    for proposal in &cfg.ike_proposals {
        emit.line(format!("ike proposal {}", proposal.id));
        if !proposal.encryption.is_empty() {
            emit.line(format!("encryption-algorithm {}", proposal.encryption));
        }
        if !proposal.auth.is_empty() {
            emit.line(format!("authentication-algorithm {}", proposal.auth));
        }
        if proposal.dh_group > 0 {
            emit.line(format!("dh group{}", proposal.dh_group));
        }
        emit.line("quit");
    }

    for set in &cfg.transform_sets {
        emit.line(format!("ipsec transform-set {}", set.name));
        if !set.esp_encryption.is_empty() {
            emit.line(format!("esp encryption-algorithm {}", set.esp_encryption));
        }
        if !set.esp_auth.is_empty() {
            emit.line(format!("esp authentication-algorithm {}", set.esp_auth));
        }
        emit.line("quit");
    }

    for policy in &cfg.policies {
        if !ipsec_policy_ready(ctx, policy, emit) {
            continue;
        }
        let keychain = format!("kc-{}", policy.name);
        if !policy.pre_shared_key.is_empty() {
            emit.line(format!("ike keychain {keychain}"));
            emit.line(format!(
                "pre-shared-key address {} key simple {}",
                policy.peer_address, policy.pre_shared_key
            ));
            emit.line("quit");
        }
        let profile = format!("prof-{}", policy.name);
        emit.line(format!("ike profile {profile}"));
        if !policy.pre_shared_key.is_empty() {
            emit.line(format!("keychain {keychain}"));
        }
        emit.line(format!("match remote identity address {}", policy.peer_address));
        emit.line("quit");
        emit.line(format!("ipsec policy {} {} isakmp", policy.name, policy.seq));
        emit.line(format!("remote-address {}", policy.peer_address));
        if let Some(acl_id) = policy.acl_id {
            emit.line(format!("security acl {acl_id}"));
        }
        for set in &policy.transform_sets {
            emit.line(format!("transform-set {set}"));
        }
        emit.line(format!("ike-profile {profile}"));
        emit.line("quit");
        if !policy.apply_interface.is_empty() {
            emit.line(format!("interface {}", policy.apply_interface));
            emit.line(format!("ipsec apply policy {}", policy.name));
            emit.line("quit");
        }
    }
}

pub fn compile_gre(ctx: &CompileContext<'_>) -> FeatureOutput {
    let mut emit = Emit::new();

    let tunnels: Vec<&GreTunnel> = ctx
        .device
        .config
        .gre
        .tunnels
        .iter()
        .filter(|t| !t.destination_ip.is_empty() && !t.tunnel_ip.is_empty())
        .collect();
    if tunnels.is_empty() {
        emit.note("GRE: no tunnels defined yet");
        return emit.finish();
    }
    emit.note(format!("GRE: {} tunnel(s)", tunnels.len()));

    for tunnel in &tunnels {
        let source = tunnel_source(ctx, tunnel);
        let Some(source) = source else {
            emit.note(format!(
                "GRE: tunnel {} has no source interface and none could be derived from topology - tunnel omitted",
                tunnel.id
            ));
            continue;
        };
        match ctx.device.vendor {
            Vendor::Cisco => {
                emit.line(format!("interface Tunnel{}", tunnel.id));
                emit.line(format!("ip address {} {}", tunnel.tunnel_ip, tunnel.tunnel_mask));
                emit.line("tunnel mode gre ip");
                emit.line(format!("tunnel source {source}"));
                emit.line(format!("tunnel destination {}", tunnel.destination_ip));
                if tunnel.keepalive {
                    emit.line("keepalive 10 3");
                }
                emit.line("exit");
            }
            Vendor::Huawei => {
                emit.line(format!("interface Tunnel0/0/{}", tunnel.id));
                emit.line(format!("ip address {} {}", tunnel.tunnel_ip, tunnel.tunnel_mask));
                emit.line("tunnel-protocol gre");
                emit.line(format!("source {source}"));
                emit.line(format!("destination {}", tunnel.destination_ip));
                if tunnel.keepalive {
                    emit.line("keepalive period 10 retry-times 3");
                }
                emit.line("quit");
            }
            Vendor::H3C => {
                emit.line(format!("interface Tunnel{} mode gre", tunnel.id));
                emit.line(format!("ip address {} {}", tunnel.tunnel_ip, tunnel.tunnel_mask));
                emit.line(format!("source {source}"));
                emit.line(format!("destination {}", tunnel.destination_ip));
                if tunnel.keepalive {
                    emit.line("keepalive 10 3");
                }
                emit.line("quit");
            }
            Vendor::Generic => {}
        }
    }
    emit.finish()
}

/// Explicit source interface, or the first connected port found in topology.
fn tunnel_source(ctx: &CompileContext<'_>, tunnel: &GreTunnel) -> Option<String> {
    if !tunnel.source_interface.is_empty() {
        return Some(tunnel.source_interface.clone());
    }
    for conn in ctx.connections {
        if let Some((port, _peer)) = conn.local_port_and_peer(&ctx.device.id) {
            return Some(port.to_string());
        }
    }
    ctx.device
        .connected_port_names()
        .first()
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{
        Acl, AclKind, Connection, Device, DeviceType, Endpoint, IkeProposal, TransformSet,
    };

    fn ipsec_device(vendor: Vendor) -> Device {
        let mut device = Device::new("fw1", "fw1", vendor, DeviceType::Firewall);
        device.config.acl.enabled = true;
        device.config.acl.acls.push(Acl {
            id: 3000,
            name: String::new(),
            kind: AclKind::Advanced,
            rules: vec![],
        });
        let ipsec = &mut device.config.ipsec;
        ipsec.enabled = true;
        ipsec.ike_proposals.push(IkeProposal {
            id: 10,
            encryption: "aes-256".to_string(),
            auth: "sha2-256".to_string(),
            dh_group: 14,
        });
        ipsec.transform_sets.push(TransformSet {
            name: "ts1".to_string(),
            esp_encryption: "aes-256".to_string(),
            esp_auth: "sha2-256".to_string(),
        });
        ipsec.policies.push(IpsecPolicy {
            name: "branch".to_string(),
            seq: 10,
            acl_id: Some(3000),
            transform_sets: vec!["ts1".to_string()],
            ike_proposal: Some(10),
            peer_address: "198.51.100.2".to_string(),
            pre_shared_key: "s3cret".to_string(),
            apply_interface: "GigabitEthernet0/0".to_string(),
        });
        device
    }

    #[test]
    fn test_cisco_crypto_map() {
        let out = compile_feature(&ipsec_device(Vendor::Cisco), Feature::Ipsec, &[]);
        assert!(out.cli.contains("crypto isakmp policy 10"));
        assert!(out.cli.contains("crypto isakmp key s3cret address 198.51.100.2"));
        assert!(out.cli.contains("crypto map branch 10 ipsec-isakmp"));
        assert!(out.cli.contains("match address 3000"));
        assert!(out.cli.contains("crypto map branch"));
    }

    #[test]
    fn test_huawei_ike_peer_and_policy() {
        let out = compile_feature(&ipsec_device(Vendor::Huawei), Feature::Ipsec, &[]);
        assert!(out.cli.contains("ike peer peer-branch"));
        assert!(out.cli.contains("ipsec policy branch 10 isakmp"));
        assert!(out.cli.contains("security acl 3000"));
    }

    #[test]
    fn test_policy_with_dangling_transform_set_is_omitted() {
        let mut device = ipsec_device(Vendor::H3C);
        device.config.ipsec.transform_sets.clear();
        let out = compile_feature(&device, Feature::Ipsec, &[]);
        assert!(!out.cli.contains("ipsec policy branch"));
        assert!(out.explanation.contains("transform set 'ts1' which does not exist"));
    }

    #[test]
    fn test_gre_source_falls_back_to_topology() {
        let mut device = Device::new("r1", "r1", Vendor::Cisco, DeviceType::Router);
        device.config.gre.enabled = true;
        device.config.gre.tunnels.push(GreTunnel {
            id: 1,
            source_interface: String::new(),
            destination_ip: "203.0.113.9".to_string(),
            tunnel_ip: "10.255.0.1".to_string(),
            tunnel_mask: "255.255.255.252".to_string(),
            keepalive: true,
        });
        let connections = vec![Connection {
            a: Endpoint { device_id: "r1".to_string(), port: "GigabitEthernet0/1".to_string() },
            b: Endpoint { device_id: "r2".to_string(), port: "GigabitEthernet0/1".to_string() },
        }];
        let out = compile_feature(&device, Feature::Gre, &connections);
        assert!(out.cli.contains("interface Tunnel1"));
        assert!(out.cli.contains("tunnel source GigabitEthernet0/1"));
        assert!(out.cli.contains("keepalive 10 3"));
    }
}
