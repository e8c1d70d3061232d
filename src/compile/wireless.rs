//! Wireless compiler. Only runs on access controllers; SSIDs bind to VLANs.

use crate::model::{SsidSecurity, Vendor};

use super::{CompileContext, Emit, FeatureOutput};

pub fn compile_wireless(ctx: &CompileContext<'_>) -> FeatureOutput {
    let cfg = &ctx.device.config.wireless;
    let mut emit = Emit::new();

    let ssids: Vec<_> = cfg.ssids.iter().filter(|s| !s.name.is_empty()).collect();
    if ssids.is_empty() {
        emit.note("Wireless: no SSIDs defined yet");
        return emit.finish();
    }
    emit.note(format!("Wireless: {} SSID(s)", ssids.len()));

    let ap_group = if cfg.ap_group.is_empty() { "default" } else { cfg.ap_group.as_str() };

    match ctx.device.vendor {
        Vendor::Cisco => {
            for (index, ssid) in ssids.iter().enumerate() {
                let wlan_id = index + 1;
                emit.line(format!("wlan {} {} {}", ssid.name, wlan_id, ssid.name));
                emit.line(format!("client vlan {}", ssid.vlan_id));
                match ssid.security {
                    SsidSecurity::Open => {
                        emit.line("no security wpa");
                    }
                    SsidSecurity::Wpa2Psk => {
                        emit.line(format!(
                            "security wpa psk set-key ascii 0 {}",
                            ssid.passphrase
                        ));
                    }
                }
                emit.line("no shutdown");
                emit.line("exit");
            }
        }
        Vendor::Huawei => {
            emit.line("wlan");
            for ssid in &ssids {
                if ssid.security == SsidSecurity::Wpa2Psk {
                    emit.line(format!("security-profile name sec-{}", ssid.name));
                    emit.line(format!(
                        "security wpa2 psk pass-phrase {} aes",
                        ssid.passphrase
                    ));
                    emit.line("quit");
                }
                emit.line(format!("ssid-profile name ssid-{}", ssid.name));
                emit.line(format!("ssid {}", ssid.name));
                emit.line("quit");
                emit.line(format!("vap-profile name vap-{}", ssid.name));
                emit.line(format!("service-vlan vlan-id {}", ssid.vlan_id));
                emit.line(format!("ssid-profile ssid-{}", ssid.name));
                if ssid.security == SsidSecurity::Wpa2Psk {
                    emit.line(format!("security-profile sec-{}", ssid.name));
                }
                emit.line("quit");
            }
            emit.line(format!("ap-group name {ap_group}"));
            for (index, ssid) in ssids.iter().enumerate() {
                emit.line(format!(
                    "vap-profile vap-{} wlan {} radio all",
                    ssid.name,
                    index + 1
                ));
            }
            emit.line("quit");
            emit.line("quit");
        }
        Vendor::H3C => {
            for (index, ssid) in ssids.iter().enumerate() {
                emit.line(format!(
                    "wlan service-template {} {}",
                    index + 1,
                    ssid.name
                ));
                emit.line(format!("ssid {}", ssid.name));
                emit.line(format!("vlan {}", ssid.vlan_id));
                if ssid.security == SsidSecurity::Wpa2Psk {
                    emit.line("akm mode psk");
                    emit.line(format!("preshared-key pass-phrase simple {}", ssid.passphrase));
                    emit.line("cipher-suite ccmp");
                    emit.line("security-ie rsn");
                }
                emit.line("service-template enable");
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
    use crate::model::{Device, DeviceType, Ssid};

    fn ac(vendor: Vendor) -> Device {
        let mut device = Device::new("ac1", "ac1", vendor, DeviceType::AccessController);
        device.config.wireless.enabled = true;
        device.config.wireless.ap_group = "floor1".to_string();
        device.config.wireless.ssids.push(Ssid {
            name: "corp".to_string(),
            vlan_id: 30,
            security: SsidSecurity::Wpa2Psk,
            passphrase: "letmein99".to_string(),
        });
        device
    }

    #[test]
    fn test_huawei_profile_chain() {
        let out = compile_feature(&ac(Vendor::Huawei), Feature::Wireless, &[]);
        assert!(out.cli.contains("security-profile name sec-corp"));
        assert!(out.cli.contains("service-vlan vlan-id 30"));
        assert!(out.cli.contains("ap-group name floor1"));
        assert!(out.cli.contains("vap-profile vap-corp wlan 1 radio all"));
    }

    #[test]
    fn test_wireless_only_on_access_controllers() {
        let mut device = ac(Vendor::Huawei);
        device.device_type = DeviceType::L3Switch;
        let out = compile_feature(&device, Feature::Wireless, &[]);
        assert!(out.cli.is_empty());
        assert!(out.explanation.is_empty());
    }

    #[test]
    fn test_open_ssid_has_no_key_material() {
        let mut device = ac(Vendor::H3C);
        device.config.wireless.ssids[0].security = SsidSecurity::Open;
        let out = compile_feature(&device, Feature::Wireless, &[]);
        assert!(out.cli.contains("wlan service-template 1 corp"));
        assert!(!out.cli.contains("preshared-key"));
    }
}
