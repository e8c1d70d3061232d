use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cliforge::config::EngineConfig;
use cliforge::model::{Connection, Device, DeviceType, Vendor};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cliforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = EngineConfig::load();
    let mut args = std::env::args().skip(1);

    match args.next() {
        Some(arg) if arg == "init" => {
            let path = args.next().unwrap_or_else(|| cfg.device_file.clone());
            init_device_file(&path)
        }
        Some(path) => compile_and_print(&path, &cfg),
        None => compile_and_print(&cfg.device_file, &cfg),
    }
}

/// Write a starter device file for the operator to edit
fn init_device_file(path: &str) -> Result<()> {
    let id = uuid::Uuid::new_v4().to_string();
    let device = Device::new(id, "new-device", Vendor::Generic, DeviceType::L3Switch);
    let json = serde_json::to_string_pretty(&device)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;
    tracing::info!("Wrote starter device to {} (id {})", path, device.id);
    Ok(())
}

/// Load a device (and optional topology) and print its full deployment script
fn compile_and_print(path: &str, cfg: &EngineConfig) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read device file {path}"))?;
    let device: Device =
        serde_json::from_str(&json).with_context(|| format!("Invalid device JSON in {path}"))?;

    let connections: Vec<Connection> = if cfg.connections_file.is_empty() {
        Vec::new()
    } else {
        let json = std::fs::read_to_string(&cfg.connections_file)
            .with_context(|| format!("Failed to read topology file {}", cfg.connections_file))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid topology JSON in {}", cfg.connections_file))?
    };

    tracing::info!(
        "Compiling {} ({} {}) with {} topology edge(s)",
        device.name,
        device.vendor,
        device.device_type,
        connections.len()
    );
    let script = cliforge::compile_all(&device, &connections);
    if script.is_empty() {
        tracing::warn!("No features enabled on {} - nothing to print", device.name);
    } else {
        println!("{script}");
    }
    Ok(())
}
