//! Compilers for the L3 IP service features: DHCP server, DHCP relay,
//! DHCP snooping, VLAN (with SVIs and port membership) and plain
//! interface addressing.

use crate::model::{DhcpPool, LeaseTime, Vendor, VlanEntry};

use super::xref;
use super::{CompileContext, Emit, FeatureOutput};

// ---------------------------------------------------------------------------
// DHCP server
// ---------------------------------------------------------------------------

pub fn compile_dhcp(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.dhcp;
    let mut emit = Emit::new();

    // Pools without a name or network are still being filled in
    let pools: Vec<&DhcpPool> = cfg
        .pools
        .iter()
        .filter(|p| !p.name.is_empty() && !p.network.is_empty())
        .collect();

    if pools.is_empty() {
        emit.note("DHCP: no complete address pools defined yet");
        return emit.finish();
    }
    emit.note(format!("DHCP: {} address pool(s)", pools.len()));

    match ctx.device.vendor {
        Vendor::Cisco => dhcp_cisco(&pools, &mut emit),
        Vendor::Huawei => dhcp_huawei(&pools, &mut emit),
        Vendor::H3C => dhcp_h3c(&pools, &mut emit),
        Vendor::Generic => {}
    }
    emit.finish()
}

fn dhcp_cisco(pools: &[&DhcpPool], emit: &mut Emit) {
    // Exclusions are global commands on IOS, emitted before the pools
    for pool in pools {
        for range in &pool.excluded {
            emit.line(format!("ip dhcp excluded-address {} {}", range.start, range.end));
        }
    }
    for pool in pools {
        emit.line(format!("ip dhcp pool {}", pool.name));
        emit.line(format!("network {} {}", pool.network, pool.mask));
        if !pool.gateway.is_empty() {
            emit.line(format!("default-router {}", pool.gateway));
        }
        if !pool.dns_servers.is_empty() {
            emit.line(format!("dns-server {}", pool.dns_servers.join(" ")));
        }
        if let Some(domain) = &pool.domain_name {
            emit.line(format!("domain-name {domain}"));
        }
        if !pool.lease.is_zero() {
            // IOS lease granularity stops at minutes
            emit.line(format!(
                "lease {} {} {}",
                pool.lease.days, pool.lease.hours, pool.lease.minutes
            ));
        }
        emit.line("exit");
    }
}

fn dhcp_huawei(pools: &[&DhcpPool], emit: &mut Emit) {
    emit.line("dhcp enable");
    for pool in pools {
        emit.line(format!("ip pool {}", pool.name));
        if !pool.gateway.is_empty() {
            emit.line(format!("gateway-list {}", pool.gateway));
        }
        emit.line(format!("network {} mask {}", pool.network, pool.mask));
        for range in &pool.excluded {
            emit.line(format!("excluded-ip-address {} {}", range.start, range.end));
        }
        if !pool.dns_servers.is_empty() {
            emit.line(format!("dns-list {}", pool.dns_servers.join(" ")));
        }
        if let Some(domain) = &pool.domain_name {
            emit.line(format!("domain-name {domain}"));
        }
        if !pool.lease.is_zero() {
            emit.line(huawei_lease(&pool.lease));
        }
        emit.line("quit");
    }
}

fn huawei_lease(lease: &LeaseTime) -> String {
    format!(
        "lease day {} hour {} minute {}",
        lease.days, lease.hours, lease.minutes
    )
}

fn dhcp_h3c(pools: &[&DhcpPool], emit: &mut Emit) {
    emit.line("dhcp enable");
    for pool in pools {
        for range in &pool.excluded {
            emit.line(format!("dhcp server forbidden-ip {} {}", range.start, range.end));
        }
    }
    for pool in pools {
        emit.line(format!("dhcp server ip-pool {}", pool.name));
        if !pool.gateway.is_empty() {
            emit.line(format!("gateway-list {}", pool.gateway));
        }
        emit.line(format!("network {} mask {}", pool.network, pool.mask));
        if !pool.dns_servers.is_empty() {
            emit.line(format!("dns-list {}", pool.dns_servers.join(" ")));
        }
        if let Some(domain) = &pool.domain_name {
            emit.line(format!("domain-name {domain}"));
        }
        if !pool.lease.is_zero() {
            emit.line(format!(
                "expired day {} hour {} minute {} second {}",
                pool.lease.days, pool.lease.hours, pool.lease.minutes, pool.lease.seconds
            ));
        }
        emit.line("quit");
    }
}

// ---------------------------------------------------------------------------
// DHCP relay
// ---------------------------------------------------------------------------

pub fn compile_dhcp_relay(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.dhcp_relay;
    let mut emit = Emit::new();

    let entries: Vec<_> = cfg.entries.iter().filter(|e| !e.server_ip.is_empty()).collect();
    if entries.is_empty() {
        emit.note("DHCP Relay: no relay entries defined yet");
        return emit.finish();
    }
    emit.note(format!("DHCP Relay: {} VLAN(s) relayed", entries.len()));

    match ctx.device.vendor {
        Vendor::Cisco => {
            for entry in &entries {
                emit.line(format!("interface {}", ctx.dialect.vlan_interface(entry.vlan_id)));
                emit.line(format!("ip helper-address {}", entry.server_ip));
                emit.line("exit");
            }
        }
        Vendor::Huawei => {
            emit.line("dhcp enable");
            for entry in &entries {
                emit.line(format!("interface {}", ctx.dialect.vlan_interface(entry.vlan_id)));
                emit.line("dhcp select relay");
                emit.line(format!("dhcp relay server-ip {}", entry.server_ip));
                emit.line("quit");
            }
        }
        Vendor::H3C => {
            emit.line("dhcp enable");
            for entry in &entries {
                emit.line(format!("interface {}", ctx.dialect.vlan_interface(entry.vlan_id)));
                emit.line("dhcp select relay");
                emit.line(format!("dhcp relay server-address {}", entry.server_ip));
                emit.line("quit");
            }
        }
        Vendor::Generic => {}
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// DHCP snooping
// ---------------------------------------------------------------------------

pub fn compile_dhcp_snooping(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.dhcp_snooping;
    let mut emit = Emit::new();
    emit.note(format!(
        "DHCP Snooping: {} VLAN(s), {} trusted port(s)",
        cfg.vlans.len(),
        cfg.trusted_ports.len()
    ));

    match ctx.device.vendor {
        Vendor::Cisco => {
            emit.line("ip dhcp snooping");
            if !cfg.vlans.is_empty() {
                let vlans: Vec<String> = cfg.vlans.iter().map(|v| v.to_string()).collect();
                emit.line(format!("ip dhcp snooping vlan {}", vlans.join(",")));
            }
            for port in &cfg.trusted_ports {
                emit.line(format!("interface {port}"));
                emit.line("ip dhcp snooping trust");
                emit.line("exit");
            }
        }
        Vendor::Huawei => {
            emit.line("dhcp enable");
            emit.line("dhcp snooping enable");
            for vlan_id in &cfg.vlans {
                emit.line(format!("vlan {vlan_id}"));
                emit.line("dhcp snooping enable");
                emit.line("quit");
            }
            for port in &cfg.trusted_ports {
                emit.line(format!("interface {port}"));
                emit.line("dhcp snooping trusted");
                emit.line("quit");
            }
        }
        Vendor::H3C => {
            emit.line("dhcp snooping enable");
            if !cfg.vlans.is_empty() {
                let vlans: Vec<String> = cfg.vlans.iter().map(|v| v.to_string()).collect();
                emit.line(format!("dhcp snooping enable vlan {}", vlans.join(" ")));
            }
            for port in &cfg.trusted_ports {
                emit.line(format!("interface {port}"));
                emit.line("dhcp snooping trust");
                emit.line("quit");
            }
        }
        Vendor::Generic => {}
    }
    emit.finish()
}

// ---------------------------------------------------------------------------
// VLAN
// ---------------------------------------------------------------------------

pub fn compile_vlan(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.vlan;
    let mut emit = Emit::new();

    let vlans: Vec<&VlanEntry> = cfg.vlans.iter().filter(|v| v.id > 0).collect();
    if vlans.is_empty() {
        emit.note("VLAN: no VLANs defined yet");
        return emit.finish();
    }
    emit.note(format!("VLAN: {} VLAN(s)", vlans.len()));

    match ctx.device.vendor {
        Vendor::Cisco => vlan_cisco(ctx, &vlans, &mut emit),
        Vendor::Huawei => vlan_huawei(ctx, &vlans, &mut emit),
        Vendor::H3C => vlan_h3c(ctx, &vlans, &mut emit),
        Vendor::Generic => {}
    }
    emit.finish()
}

/// Resolve a VLAN interface's DHCP pool reference. Returns the pool name
/// when it exists; records an omission note otherwise.
fn resolve_pool_binding(ctx: &CompileContext<'_>, vlan: &VlanEntry, emit: &mut Emit) -> Option<String> {
    let iface = vlan.interface.as_ref()?;
    let pool_name = iface.dhcp_pool.as_ref()?;
    if xref::find_dhcp_pool(&ctx.device.config, pool_name).is_some() {
        Some(pool_name.clone())
    } else {
        emit.note(format!(
            "VLAN {}: referenced DHCP pool '{}' not found - binding omitted",
            vlan.id, pool_name
        ));
        None
    }
}

fn vlan_cisco(ctx: &CompileContext<'_>, vlans: &[&VlanEntry], emit: &mut Emit) {
    for vlan in vlans {
        emit.line(format!("vlan {}", vlan.id));
        if !vlan.name.is_empty() {
            emit.line(format!("name {}", vlan.name));
        }
        emit.line("exit");
    }
    for vlan in vlans {
        let pool = resolve_pool_binding(ctx, vlan, emit);
        if let Some(iface) = &vlan.interface {
            emit.line(format!("interface {}", ctx.dialect.vlan_interface(vlan.id)));
            if !vlan.description.is_empty() {
                emit.line(format!("description {}", vlan.description));
            }
            emit.line(format!("ip address {} {}", iface.ip, iface.mask));
            emit.line("no shutdown");
            emit.line("exit");
            if let Some(pool_name) = pool {
                // IOS binds pools to SVIs implicitly by network match
                emit.note(format!(
                    "VLAN {}: pool '{}' is selected by network match on IOS",
                    vlan.id, pool_name
                ));
            }
        }
        for port in &vlan.access_ports {
            emit.line(format!("interface {port}"));
            emit.line("switchport mode access");
            emit.line(format!("switchport access vlan {}", vlan.id));
            emit.line("exit");
        }
        for port in &vlan.trunk_ports {
            emit.line(format!("interface {port}"));
            emit.line("switchport mode trunk");
            emit.line(format!("switchport trunk allowed vlan add {}", vlan.id));
            emit.line("exit");
        }
    }
}

fn vlan_huawei(ctx: &CompileContext<'_>, vlans: &[&VlanEntry], emit: &mut Emit) {
    for vlan in vlans {
        emit.line(format!("vlan {}", vlan.id));
        if !vlan.name.is_empty() {
            emit.line(format!("description {}", vlan.name));
        }
        emit.line("quit");
    }
    for vlan in vlans {
        let pool = resolve_pool_binding(ctx, vlan, emit);
        if let Some(iface) = &vlan.interface {
            emit.line(format!("interface {}", ctx.dialect.vlan_interface(vlan.id)));
            if !vlan.description.is_empty() {
                emit.line(format!("description {}", vlan.description));
            }
            emit.line(format!("ip address {} {}", iface.ip, iface.mask));
            if pool.is_some() {
                emit.line("dhcp select global");
            }
            emit.line("quit");
        }
        for port in &vlan.access_ports {
            emit.line(format!("interface {port}"));
            emit.line("port link-type access");
            emit.line(format!("port default vlan {}", vlan.id));
            emit.line("quit");
        }
        for port in &vlan.trunk_ports {
            emit.line(format!("interface {port}"));
            emit.line("port link-type trunk");
            emit.line(format!("port trunk allow-pass vlan {}", vlan.id));
            emit.line("quit");
        }
    }
}

fn vlan_h3c(ctx: &CompileContext<'_>, vlans: &[&VlanEntry], emit: &mut Emit) {
    for vlan in vlans {
        emit.line(format!("vlan {}", vlan.id));
        if !vlan.name.is_empty() {
            emit.line(format!("name {}", vlan.name));
        }
        emit.line("quit");
    }
    for vlan in vlans {
        let pool = resolve_pool_binding(ctx, vlan, emit);
        if let Some(iface) = &vlan.interface {
            emit.line(format!("interface {}", ctx.dialect.vlan_interface(vlan.id)));
            if !vlan.description.is_empty() {
                emit.line(format!("description {}", vlan.description));
            }
            emit.line(format!("ip address {} {}", iface.ip, iface.mask));
            if let Some(pool_name) = pool {
                emit.line(format!("dhcp server apply ip-pool {pool_name}"));
            }
            emit.line("quit");
        }
        for port in &vlan.access_ports {
            emit.line(format!("interface {port}"));
            emit.line(format!("port access vlan {}", vlan.id));
            emit.line("quit");
        }
        for port in &vlan.trunk_ports {
            emit.line(format!("interface {port}"));
            emit.line("port link-type trunk");
            emit.line(format!("port trunk permit vlan {}", vlan.id));
            emit.line("quit");
        }
    }
}

// ---------------------------------------------------------------------------
// Interface IP
// ---------------------------------------------------------------------------

pub fn compile_interface_ip(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.interface_ip;
    let mut emit = Emit::new();

    let interfaces: Vec<_> = cfg
        .interfaces
        .iter()
        .filter(|i| !i.name.is_empty() && !i.ip.is_empty())
        .collect();
    if interfaces.is_empty() {
        emit.note("Interface IP: no addressed interfaces defined yet");
        return emit.finish();
    }
    emit.note(format!("Interface IP: {} interface(s) addressed", interfaces.len()));

    let exit = if ctx.device.vendor == Vendor::Cisco { "exit" } else { "quit" };
    for iface in &interfaces {
        emit.line(format!("interface {}", iface.name));
        if !iface.description.is_empty() {
            emit.line(format!("description {}", iface.description));
        }
        emit.line(format!("ip address {} {}", iface.ip, iface.mask));
        if ctx.device.vendor == Vendor::Cisco {
            emit.line(format!("{}shutdown", ctx.dialect.negation));
        }
        emit.line(exit);
    }
    emit.finish()
}
