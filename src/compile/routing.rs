//! Compilers for routing (static + OSPF) and VRRP.

use crate::model::{OspfConfig, Vendor};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

pub fn compile_routing(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.routing;
    let mut emit = Emit::new();

    let statics: Vec<_> = cfg
        .static_routes
        .iter()
        .filter(|r| !r.destination.is_empty() && !r.next_hop.is_empty())
        .collect();

    if statics.is_empty() && cfg.ospf.is_none() {
        emit.note("Routing: no routes or OSPF process defined yet");
        return emit.finish();
    }
    if !statics.is_empty() {
        emit.note(format!("Routing: {} static route(s)", statics.len()));
    }

    match ctx.device.vendor {
        Vendor::Cisco => {
            for route in &statics {
                emit.line(format!(
                    "ip route {} {} {}",
                    route.destination, route.mask, route.next_hop
                ));
            }
        }
        Vendor::Huawei | Vendor::H3C => {
            for route in &statics {
                emit.line(format!(
                    "ip route-static {} {} {}",
                    route.destination, route.mask, route.next_hop
                ));
            }
        }
        Vendor::Generic => {}
    }

    if let Some(ospf) = &cfg.ospf {
        ospf_section(ctx, ospf, &mut emit);
    }
    emit.finish()
}

fn ospf_section(ctx: &CompileContext<'_>, ospf: &OspfConfig, emit: &mut Emit) {
    emit.note(format!(
        "Routing: OSPF process {} with {} area(s)",
        ospf.process_id,
        ospf.areas.len()
    ));

    match ctx.device.vendor {
        Vendor::Cisco => {
            emit.line(format!("router ospf {}", ospf.process_id));
            if !ospf.router_id.is_empty() {
                emit.line(format!("router-id {}", ospf.router_id));
            }
            for area in &ospf.areas {
                for net in &area.networks {
                    match xref::mask_to_wildcard(&net.mask) {
                        Some(wildcard) => emit.line(format!(
                            "network {} {} area {}",
                            net.network, wildcard, area.id
                        )),
                        None => emit.note(format!(
                            "Routing: OSPF network {} has an invalid mask '{}' - statement omitted",
                            net.network, net.mask
                        )),
                    }
                }
            }
            for vlan_id in &ospf.passive_vlan_ids {
                emit.line(format!(
                    "passive-interface {}",
                    ctx.dialect.vlan_interface(*vlan_id)
                ));
            }
            emit.line("exit");
        }
        Vendor::Huawei | Vendor::H3C => {
            if ospf.router_id.is_empty() {
                emit.line(format!("ospf {}", ospf.process_id));
            } else {
                emit.line(format!("ospf {} router-id {}", ospf.process_id, ospf.router_id));
            }
            for area in &ospf.areas {
                emit.line(format!("area {}", area.id));
                for net in &area.networks {
                    match xref::mask_to_wildcard(&net.mask) {
                        Some(wildcard) => {
                            emit.line(format!("network {} {}", net.network, wildcard));
                        }
                        None => emit.note(format!(
                            "Routing: OSPF network {} has an invalid mask '{}' - statement omitted",
                            net.network, net.mask
                        )),
                    }
                }
                emit.line("quit");
            }
            for vlan_id in &ospf.passive_vlan_ids {
                emit.line(format!(
                    "silent-interface {}",
                    ctx.dialect.vlan_interface(*vlan_id)
                ));
            }
            emit.line("quit");
        }
        Vendor::Generic => {}
    }
}

pub fn compile_vrrp(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.vrrp;
    let mut emit = Emit::new();

    let groups: Vec<_> = cfg.groups.iter().filter(|g| !g.virtual_ip.is_empty()).collect();
    if groups.is_empty() {
        emit.note("VRRP: no groups defined yet");
        return emit.finish();
    }
    emit.note(format!("VRRP: {} group(s)", groups.len()));

    for group in &groups {
        let iface = ctx.dialect.vlan_interface(group.vlan_id);
        emit.line(format!("interface {iface}"));
        match ctx.device.vendor {
            Vendor::Cisco => {
                emit.line(format!("vrrp {} ip {}", group.vrid, group.virtual_ip));
                if let Some(priority) = group.priority {
                    emit.line(format!("vrrp {} priority {}", group.vrid, priority));
                }
                if group.preempt {
                    emit.line(format!("vrrp {} preempt", group.vrid));
                }
                emit.line("exit");
            }
            Vendor::Huawei | Vendor::H3C => {
                emit.line(format!("vrrp vrid {} virtual-ip {}", group.vrid, group.virtual_ip));
                if let Some(priority) = group.priority {
                    emit.line(format!("vrrp vrid {} priority {}", group.vrid, priority));
                }
                if group.preempt {
                    emit.line(format!("vrrp vrid {} preempt-mode timer delay 0", group.vrid));
                }
                emit.line("quit");
            }
            Vendor::Generic => {}
        }
    }
    emit.finish()
}
