//! Firewall high-availability compiler: Huawei HRP and H3C RBM. Cisco has no
//! equivalent command set here, so the feature is gated to the two vendors
//! that support it.

use crate::model::{HaRole, Vendor};

use super::{CompileContext, Emit, FeatureOutput};

pub fn compile_ha(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.ha;
    let mut emit = Emit::new();

    if cfg.heartbeat_interface.is_empty() || cfg.local_ip.is_empty() || cfg.peer_ip.is_empty() {
        emit.note("HA: heartbeat interface and peer addressing not set yet");
        return emit.finish();
    }

    match ctx.device.vendor {
        Vendor::Huawei => {
            emit.note(format!(
                "HA: HRP {} via {}",
                role_word(cfg.role),
                cfg.heartbeat_interface
            ));
            emit.line(format!(
                "hrp interface {} remote {}",
                cfg.heartbeat_interface, cfg.peer_ip
            ));
            if cfg.role == HaRole::Standby {
                emit.line("hrp standby-device");
            }
            emit.line("hrp enable");
        }
        Vendor::H3C => {
            emit.note(format!(
                "HA: RBM {} via {}",
                role_word(cfg.role),
                cfg.heartbeat_interface
            ));
            emit.line("remote-backup group");
            emit.line(format!(
                "data-channel interface {}",
                cfg.heartbeat_interface
            ));
            emit.line(format!("local-ip {}", cfg.local_ip));
            emit.line(format!("remote-ip {}", cfg.peer_ip));
            emit.line(format!("device-role {}", role_word(cfg.role)));
            emit.line("backup-mode dual-active");
            emit.line("quit");
        }
        Vendor::Cisco | Vendor::Generic => {
            emit.note(format!(
                "HA: not supported on {} devices - nothing generated",
                ctx.device.vendor
            ));
        }
    }
    emit.finish()
}

fn role_word(role: HaRole) -> &'static str {
    match role {
        HaRole::Primary => "primary",
        HaRole::Standby => "secondary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::Feature;
    use crate::compile::compile_feature;
    use crate::model::{Device, DeviceType};

    fn ha_firewall(vendor: Vendor) -> Device {
        let mut device = Device::new("fw1", "fw1", vendor, DeviceType::Firewall);
        device.config.ha.enabled = true;
        device.config.ha.role = HaRole::Standby;
        device.config.ha.heartbeat_interface = "GigabitEthernet1/0/7".to_string();
        device.config.ha.local_ip = "10.255.255.1".to_string();
        device.config.ha.peer_ip = "10.255.255.2".to_string();
        device
    }

    #[test]
    fn test_huawei_hrp_standby() {
        let out = compile_feature(&ha_firewall(Vendor::Huawei), Feature::Ha, &[]);
        assert!(out.cli.contains("hrp interface GigabitEthernet1/0/7 remote 10.255.255.2"));
        assert!(out.cli.contains("hrp standby-device"));
        assert!(out.cli.contains("hrp enable"));
    }

    #[test]
    fn test_h3c_rbm_group() {
        let out = compile_feature(&ha_firewall(Vendor::H3C), Feature::Ha, &[]);
        assert!(out.cli.contains("remote-backup group"));
        assert!(out.cli.contains("local-ip 10.255.255.1"));
        assert!(out.cli.contains("device-role secondary"));
    }

    #[test]
    fn test_cisco_gets_note_only() {
        let out = compile_feature(&ha_firewall(Vendor::Cisco), Feature::Ha, &[]);
        assert!(out.cli.is_empty());
        assert!(out.explanation.contains("not supported on Cisco"));
    }
}
