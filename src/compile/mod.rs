pub mod acl;
pub mod ha;
pub mod ip_services;
pub mod nat;
pub mod routing;
pub mod security;
pub mod ssh;
pub mod switching;
pub mod vpn;
pub mod wireless;
pub mod xref;

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::applicability::Feature;
use crate::dialect::Dialect;
use crate::model::{Connection, Device, Vendor};

/// The result of compiling one feature: command text plus a human-readable
/// explanation (summary and reference-failure notes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureOutput {
    pub cli: String,
    pub explanation: String,
}

/// Everything a feature compiler reads. Compilers re-derive all cross-feature
/// lookups from this snapshot; no scratch state is shared between features.
pub struct CompileContext<'a> {
    pub device: &'a Device,
    pub dialect: &'static Dialect,
    pub connections: &'a [Connection],
}

/// Line/note accumulator shared by all compilers. Keeps emission order
/// deterministic: lines land in the order they are pushed.
pub(crate) struct Emit {
    lines: Vec<String>,
    notes: Vec<String>,
}

impl Emit {
    pub fn new() -> Self {
        Self { lines: Vec::new(), notes: Vec::new() }
    }

    /// Append one command line
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a formatted explanation note (summaries and omission reasons)
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn finish(self) -> FeatureOutput {
        FeatureOutput {
            cli: self.lines.join("\n"),
            explanation: self.notes.join("\n"),
        }
    }
}

/// Compile a single feature for a device. This is the entry point the
/// scheduler and aggregator share.
///
/// Contract: pure in its inputs; disabled or inapplicable features return
/// empty output; a compiler panic is contained here and degraded to a
/// placeholder so sibling features are never affected.
pub fn compile_feature(device: &Device, feature: Feature, connections: &[Connection]) -> FeatureOutput {
    if !feature.is_applicable(device.device_type) {
        return FeatureOutput::default();
    }
    if !device.config.is_enabled(feature) {
        return FeatureOutput::default();
    }
    if device.vendor == Vendor::Generic {
        return FeatureOutput {
            cli: String::new(),
            explanation: format!("{feature}: select a vendor to generate CLI"),
        };
    }

    let ctx = CompileContext {
        device,
        dialect: Dialect::for_vendor(device.vendor),
        connections,
    };

    match catch_unwind(AssertUnwindSafe(|| dispatch(feature, &ctx))) {
        Ok(output) => wrap_feature(&ctx, output),
        Err(_) => {
            tracing::error!("Compiler for {} panicked on device {}", feature, device.id);
            FeatureOutput {
                cli: "# generation failed".to_string(),
                explanation: format!("{feature} failed to generate"),
            }
        }
    }
}

fn dispatch(feature: Feature, ctx: &CompileContext<'_>) -> FeatureOutput {
    match feature {
        Feature::Dhcp => ip_services::compile_dhcp(ctx),
        Feature::DhcpRelay => ip_services::compile_dhcp_relay(ctx),
        Feature::DhcpSnooping => ip_services::compile_dhcp_snooping(ctx),
        Feature::Vlan => ip_services::compile_vlan(ctx),
        Feature::InterfaceIp => ip_services::compile_interface_ip(ctx),
        Feature::LinkAggregation => switching::compile_link_aggregation(ctx),
        Feature::PortIsolation => switching::compile_port_isolation(ctx),
        Feature::Stacking => switching::compile_stacking(ctx),
        Feature::Mlag => switching::compile_mlag(ctx),
        Feature::Stp => switching::compile_stp(ctx),
        Feature::Routing => routing::compile_routing(ctx),
        Feature::Vrrp => routing::compile_vrrp(ctx),
        Feature::Wireless => wireless::compile_wireless(ctx),
        Feature::Acl => acl::compile_acl(ctx),
        Feature::Nat => nat::compile_nat(ctx),
        Feature::Ssh => ssh::compile_ssh(ctx),
        Feature::Security => security::compile_security(ctx),
        Feature::ObjectGroups => security::compile_object_groups(ctx),
        Feature::Ipsec => vpn::compile_ipsec(ctx),
        Feature::Ha => ha::compile_ha(ctx),
        Feature::Gre => vpn::compile_gre(ctx),
    }
}

/// Huawei/H3C snippets carry their own system-view entry/exit so a single
/// feature panel is deployable on its own; Cisco bodies are left bare and
/// wrapped once by the aggregator.
fn wrap_feature(ctx: &CompileContext<'_>, output: FeatureOutput) -> FeatureOutput {
    if output.cli.is_empty() || !ctx.dialect.wraps_itself || ctx.dialect.enter_config.is_empty() {
        return output;
    }
    FeatureOutput {
        cli: format!("{}\n{}\n{}", ctx.dialect.enter_config, output.cli, ctx.dialect.exit_config),
        explanation: output.explanation,
    }
}
