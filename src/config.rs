use std::env;
use std::time::Duration;

/// EngineConfig holds the synthesis engine's runtime settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Quiet period before a feature edit triggers recompilation
    pub debounce_ms: u64,
    /// Device JSON file the CLI entry point loads
    pub device_file: String,
    /// Optional topology JSON file (connection list)
    pub connections_file: String,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            debounce_ms: get_env("CLIFORGE_DEBOUNCE_MS", "500").parse().unwrap_or(500),
            device_file: get_env("CLIFORGE_DEVICE_FILE", "device.json"),
            connections_file: get_env("CLIFORGE_CONNECTIONS_FILE", ""),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = EngineConfig::load();
        assert!(config.debounce_ms > 0);
        assert!(!config.device_file.is_empty());
    }
}
