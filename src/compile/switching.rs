//! Compilers for the L2 switching features: link aggregation (with
//! topology-driven member auto-detect), port isolation, stacking, M-LAG
//! and spanning tree.

use crate::model::{ports_by_peer, LagGroup, LagMode, StpMode, Vendor};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

// ---------------------------------------------------------------------------
// Link aggregation
// ---------------------------------------------------------------------------

/// Member ports for a LAG group: explicit list, or auto-detected from the
/// topology as the set of local ports wired to the same peer device.
fn lag_members(ctx: &CompileContext<'_>, group: &LagGroup, emit: &mut Emit) -> Vec<String> {
    if !group.auto_detect {
        return group.members.clone();
    }
    let groups = ports_by_peer(&ctx.device.id, ctx.connections);
    let picked = match &group.peer_device_id {
        Some(peer) => groups.iter().find(|(peer_id, _)| peer_id == peer),
        // No peer named: take the first peer with more than one link
        None => groups.iter().find(|(_, ports)| ports.len() > 1),
    };
    match picked {
        Some((peer_id, ports)) => {
            emit.note(format!(
                "Link Aggregation: group {} auto-detected {} member(s) toward {}",
                group.id,
                ports.len(),
                peer_id
            ));
            ports.iter().map(|p| (*p).to_string()).collect()
        }
        None => {
            emit.note(format!(
                "Link Aggregation: group {} auto-detect found no candidate links - members omitted",
                group.id
            ));
            Vec::new()
        }
    }
}

pub fn compile_link_aggregation(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.link_aggregation;
    let mut emit = Emit::new();

    let groups: Vec<&LagGroup> = cfg.groups.iter().filter(|g| g.id > 0).collect();
    if groups.is_empty() {
        emit.note("Link Aggregation: no groups defined yet");
        return emit.finish();
    }
    emit.note(format!("Link Aggregation: {} group(s)", groups.len()));

    for group in &groups {
        let members = lag_members(ctx, group, &mut emit);
        let lag_name = ctx.dialect.lag_interface(group.id);
        match ctx.device.vendor {
            Vendor::Cisco => {
                emit.line(format!("interface {lag_name}"));
                if !group.description.is_empty() {
                    emit.line(format!("description {}", group.description));
                }
                emit.line("exit");
                let channel_mode = match group.mode {
                    LagMode::Lacp => "active",
                    LagMode::Static => "on",
                };
                for port in &members {
                    emit.line(format!("interface {port}"));
                    emit.line(format!("channel-group {} mode {}", group.id, channel_mode));
                    emit.line("exit");
                }
            }
            Vendor::Huawei => {
                emit.line(format!("interface {lag_name}"));
                if !group.description.is_empty() {
                    emit.line(format!("description {}", group.description));
                }
                if group.mode == LagMode::Lacp {
                    emit.line("mode lacp");
                }
                emit.line("quit");
                for port in &members {
                    emit.line(format!("interface {port}"));
                    emit.line(format!("eth-trunk {}", group.id));
                    emit.line("quit");
                }
            }
            Vendor::H3C => {
                emit.line(format!("interface {lag_name}"));
                if !group.description.is_empty() {
                    emit.line(format!("description {}", group.description));
                }
                if group.mode == LagMode::Lacp {
                    emit.line("link-aggregation mode dynamic");
                }
                emit.line("quit");
                for port in &members {
                    emit.line(format!("interface {port}"));
                    emit.line(format!("port link-aggregation group {}", group.id));
                    emit.line("quit");
                }
            }
            Vendor::Generic => {}
        }
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// Port isolation
// ---------------------------------------------------------------------------

pub fn compile_port_isolation(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.port_isolation;
    let mut emit = Emit::new();

    if cfg.isolated_ports.is_empty() {
        emit.note("Port Isolation: no isolated ports selected yet");
        return emit.finish();
    }
    emit.note(format!("Port Isolation: {} port(s) isolated", cfg.isolated_ports.len()));
    if let Some(uplink) = &cfg.uplink_port {
        emit.note(format!("Port Isolation: uplink {} left unisolated", uplink));
    }

    let isolated: Vec<&String> = cfg
        .isolated_ports
        .iter()
        .filter(|p| cfg.uplink_port.as_deref() != Some(p.as_str()))
        .collect();

    match ctx.device.vendor {
        Vendor::Cisco => {
            for port in isolated {
                emit.line(format!("interface {port}"));
                emit.line("switchport protected");
                emit.line("exit");
            }
        }
        Vendor::Huawei => {
            for port in isolated {
                emit.line(format!("interface {port}"));
                emit.line(format!("port-isolate enable group {}", cfg.group_id));
                emit.line("quit");
            }
        }
        Vendor::H3C => {
            emit.line(format!("port-isolate group {}", cfg.group_id));
            emit.line("quit");
            for port in isolated {
                emit.line(format!("interface {port}"));
                emit.line(format!("port-isolate enable group {}", cfg.group_id));
                emit.line("quit");
            }
        }
        Vendor::Generic => {}
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// Stacking (Huawei iStack only)
// ---------------------------------------------------------------------------

pub fn compile_stacking(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.stacking;
    let mut emit = Emit::new();

    // Vendor gate: iStack is a Huawei facility
    if ctx.device.vendor != Vendor::Huawei {
        emit.note(format!(
            "Stacking: not supported on {} devices - nothing generated",
            ctx.device.vendor
        ));
        return emit.finish();
    }
    if cfg.members.is_empty() {
        emit.note("Stacking: no member slots defined yet");
        return emit.finish();
    }
    emit.note(format!("Stacking: {} member slot(s)", cfg.members.len()));

    for member in &cfg.members {
        if member.priority > 0 {
            emit.line(format!("stack slot {} priority {}", member.slot, member.priority));
        }
        if !member.stack_ports.is_empty() {
            emit.line(format!("interface stack-port {}/1", member.slot));
            for port in &member.stack_ports {
                emit.line(format!("port interface {port} enable"));
            }
            emit.line("quit");
        }
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// M-LAG (Huawei dfs-group / H3C DRNI)
// ---------------------------------------------------------------------------

pub fn compile_mlag(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.mlag;
    let mut emit = Emit::new();

    // Vendor gate: cross-chassis LAG here is a Huawei/H3C facility
    if !matches!(ctx.device.vendor, Vendor::Huawei | Vendor::H3C) {
        emit.note(format!(
            "M-LAG: not supported on {} devices - nothing generated",
            ctx.device.vendor
        ));
        return emit.finish();
    }

    // Peer-link cross-reference into the link-aggregation feature
    let peer_link = match cfg.peer_link_lag {
        Some(lag_id) => match xref::find_lag(&ctx.device.config, lag_id) {
            Some(lag) => Some(ctx.dialect.lag_interface(lag.id)),
            None => {
                emit.note(format!(
                    "M-LAG: referenced LAG group {} not found - peer-link omitted",
                    lag_id
                ));
                None
            }
        },
        None => None,
    };

    emit.note(format!("M-LAG: domain {}", cfg.domain_id));

    match ctx.device.vendor {
        Vendor::Huawei => {
            emit.line(format!("dfs-group {}", cfg.domain_id));
            if !cfg.keepalive_source_ip.is_empty() && !cfg.keepalive_peer_ip.is_empty() {
                emit.line(format!(
                    "source ip {} peer {}",
                    cfg.keepalive_source_ip, cfg.keepalive_peer_ip
                ));
            }
            emit.line("quit");
            if let Some(lag_name) = peer_link {
                emit.line(format!("interface {lag_name}"));
                emit.line("peer-link 1");
                emit.line("quit");
            }
        }
        Vendor::H3C => {
            emit.line(format!("drni system-number {}", cfg.domain_id));
            if !cfg.keepalive_source_ip.is_empty() && !cfg.keepalive_peer_ip.is_empty() {
                emit.line(format!(
                    "drni keepalive ip destination {} source {}",
                    cfg.keepalive_peer_ip, cfg.keepalive_source_ip
                ));
            }
            if let Some(lag_name) = peer_link {
                emit.line(format!("interface {lag_name}"));
                emit.line("port drni intra-portal-port 1");
                emit.line("quit");
            }
        }
        _ => {}
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// STP
// ---------------------------------------------------------------------------

/// Resolve an edge-port entry. Plain names pass through; "lag:<id>" entries
/// resolve through the link-aggregation feature to the vendor LAG name.
fn resolve_edge_port(ctx: &CompileContext<'_>, entry: &str, emit: &mut Emit) -> Option<String> {
    let Some(lag_id) = entry.strip_prefix("lag:") else {
        return Some(entry.to_string());
    };
    let id: u32 = match lag_id.parse() {
        Ok(id) => id,
        Err(_) => {
            emit.note(format!("STP: malformed LAG reference '{entry}' - edge port omitted"));
            return None;
        }
    };
    match xref::find_lag(&ctx.device.config, id) {
        Some(lag) => Some(ctx.dialect.lag_interface(lag.id)),
        None => {
            emit.note(format!("STP: referenced LAG group {id} not found - edge port omitted"));
            None
        }
    }
}

pub fn compile_stp(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.stp;
    let mut emit = Emit::new();
    let mode_name = match cfg.mode {
        StpMode::Stp => "stp",
        StpMode::Rstp => "rstp",
        StpMode::Mstp => "mstp",
    };
    emit.note(format!("STP: mode {mode_name}"));

    let edge_ports: Vec<String> = cfg
        .edge_ports
        .iter()
        .filter_map(|entry| resolve_edge_port(ctx, entry, &mut emit))
        .collect();

    match ctx.device.vendor {
        Vendor::Cisco => {
            let mode = match cfg.mode {
                StpMode::Stp => "pvst",
                StpMode::Rstp => "rapid-pvst",
                StpMode::Mstp => "mst",
            };
            emit.line(format!("spanning-tree mode {mode}"));
            if let Some(priority) = cfg.priority {
                emit.line(format!("spanning-tree vlan 1 priority {priority}"));
            }
            for port in &edge_ports {
                emit.line(format!("interface {port}"));
                emit.line("spanning-tree portfast");
                if cfg.bpdu_guard {
                    emit.line("spanning-tree bpduguard enable");
                }
                emit.line("exit");
            }
        }
        Vendor::Huawei => {
            let mode = match cfg.mode {
                StpMode::Stp => "stp",
                StpMode::Rstp => "rstp",
                StpMode::Mstp => "mstp",
            };
            emit.line(format!("stp mode {mode}"));
            if let Some(priority) = cfg.priority {
                emit.line(format!("stp priority {priority}"));
            }
            if cfg.bpdu_guard {
                emit.line("stp bpdu-protection");
            }
            for port in &edge_ports {
                emit.line(format!("interface {port}"));
                emit.line("stp edged-port enable");
                emit.line("quit");
            }
        }
        Vendor::H3C => {
            let mode = match cfg.mode {
                StpMode::Stp => "stp",
                StpMode::Rstp => "rstp",
                StpMode::Mstp => "mstp",
            };
            emit.line("stp global enable");
            emit.line(format!("stp mode {mode}"));
            if let Some(priority) = cfg.priority {
                emit.line(format!("stp priority {priority}"));
            }
            if cfg.bpdu_guard {
                emit.line("stp bpdu-protection");
            }
            for port in &edge_ports {
                emit.line(format!("interface {port}"));
                emit.line("stp edged-port");
                emit.line("quit");
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
    use crate::model::{Connection, Device, DeviceType, Endpoint};

    fn edge(a_dev: &str, a_port: &str, b_dev: &str, b_port: &str) -> Connection {
        Connection {
            a: Endpoint { device_id: a_dev.to_string(), port: a_port.to_string() },
            b: Endpoint { device_id: b_dev.to_string(), port: b_port.to_string() },
        }
    }

    fn lag_device(vendor: Vendor, auto_detect: bool) -> Device {
        let mut device = Device::new("sw1", "sw1", vendor, DeviceType::L3Switch);
        device.config.link_aggregation.enabled = true;
        device.config.link_aggregation.groups.push(LagGroup {
            id: 1,
            description: "uplink".to_string(),
            mode: LagMode::Lacp,
            members: vec!["GigabitEthernet0/1".to_string(), "GigabitEthernet0/2".to_string()],
            auto_detect,
            peer_device_id: None,
        });
        device
    }

    #[test]
    fn test_lag_explicit_members_per_vendor() {
        let cisco = compile_feature(&lag_device(Vendor::Cisco, false), Feature::LinkAggregation, &[]);
        assert!(cisco.cli.contains("interface Port-channel1"));
        assert!(cisco.cli.contains("channel-group 1 mode active"));

        let huawei = compile_feature(&lag_device(Vendor::Huawei, false), Feature::LinkAggregation, &[]);
        assert!(huawei.cli.contains("interface Eth-Trunk1"));
        assert!(huawei.cli.contains("eth-trunk 1"));

        let h3c = compile_feature(&lag_device(Vendor::H3C, false), Feature::LinkAggregation, &[]);
        assert!(h3c.cli.contains("interface Bridge-Aggregation1"));
        assert!(h3c.cli.contains("port link-aggregation group 1"));
    }

    #[test]
    fn test_lag_auto_detect_from_topology() {
        let device = lag_device(Vendor::Cisco, true);
        let conns = vec![
            edge("sw1", "GigabitEthernet0/3", "sw2", "GigabitEthernet0/3"),
            edge("sw1", "GigabitEthernet0/4", "sw2", "GigabitEthernet0/4"),
            edge("sw1", "GigabitEthernet0/5", "rtr1", "GigabitEthernet0/0"),
        ];
        let out = compile_feature(&device, Feature::LinkAggregation, &conns);
        // Auto-detect picks the dual-linked peer, ignoring the explicit list
        assert!(out.cli.contains("interface GigabitEthernet0/3"));
        assert!(out.cli.contains("interface GigabitEthernet0/4"));
        assert!(!out.cli.contains("interface GigabitEthernet0/1"));
        assert!(out.explanation.contains("auto-detected 2 member(s) toward sw2"));
    }

    #[test]
    fn test_stacking_vendor_gate() {
        let mut device = Device::new("sw1", "sw1", Vendor::Cisco, DeviceType::L3Switch);
        device.config.stacking.enabled = true;
        device.config.stacking.members.push(crate::model::StackMember {
            slot: 0,
            priority: 200,
            stack_ports: vec!["XGigabitEthernet0/0/1".to_string()],
        });
        let out = compile_feature(&device, Feature::Stacking, &[]);
        assert_eq!(out.cli, "");
        assert!(out.explanation.contains("not supported on Cisco"));

        device.vendor = Vendor::Huawei;
        let out = compile_feature(&device, Feature::Stacking, &[]);
        assert!(out.cli.contains("stack slot 0 priority 200"));
    }

    #[test]
    fn test_mlag_dangling_peer_link_reference() {
        let mut device = Device::new("sw1", "sw1", Vendor::Huawei, DeviceType::L3Switch);
        device.config.mlag.enabled = true;
        device.config.mlag.domain_id = 1;
        device.config.mlag.peer_link_lag = Some(7);
        let out = compile_feature(&device, Feature::Mlag, &[]);
        assert!(out.cli.contains("dfs-group 1"));
        assert!(!out.cli.contains("peer-link"));
        assert!(out.explanation.contains("LAG group 7 not found"));
    }

    #[test]
    fn test_stp_lag_edge_port_resolution() {
        let mut device = lag_device(Vendor::H3C, false);
        device.config.stp.enabled = true;
        device.config.stp.edge_ports = vec!["lag:1".to_string(), "lag:9".to_string()];
        device.config.stp.bpdu_guard = true;
        let out = compile_feature(&device, Feature::Stp, &[]);
        assert!(out.cli.contains("interface Bridge-Aggregation1"));
        assert!(out.explanation.contains("LAG group 9 not found"));
        assert!(out.cli.contains("stp bpdu-protection"));
    }
}
