//! Environment-driven settings for the bridge binary.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SAMPLE_RATE: &str = "LV2_UI_BRIDGE_SAMPLE_RATE";
pub const ENV_MANIFEST: &str = "LV2_UI_BRIDGE_MANIFEST";
pub const ENV_IDLE_MS: &str = "LV2_UI_BRIDGE_IDLE_MS";
pub const ENV_SMOKE_CYCLES: &str = "LV2_UI_BRIDGE_SMOKE_CYCLES";

const DEFAULT_SAMPLE_RATE: f64 = 44100.0;
const DEFAULT_IDLE_MS: u64 = 30;
const DEFAULT_SMOKE_CYCLES: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub sample_rate: f64,
    pub manifest_path: PathBuf,
    pub idle_interval: Duration,
    /// Idle cycles to run when started without a host channel.
    pub smoke_cycles: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            manifest_path: default_manifest_path(),
            idle_interval: Duration::from_millis(DEFAULT_IDLE_MS),
            smoke_cycles: DEFAULT_SMOKE_CYCLES,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to the default
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(rate) = parsed::<f64>(&lookup, ENV_SAMPLE_RATE) {
            if rate > 0.0 && rate.is_finite() {
                config.sample_rate = rate;
            } else {
                log::warn!("{}={} is not a usable sample rate", ENV_SAMPLE_RATE, rate);
            }
        }

        if let Some(path) = lookup(ENV_MANIFEST).filter(|p| !p.is_empty()) {
            config.manifest_path = PathBuf::from(path);
        }

        if let Some(ms) = parsed::<u64>(&lookup, ENV_IDLE_MS) {
            config.idle_interval = Duration::from_millis(ms);
        }

        if let Some(cycles) = parsed::<u32>(&lookup, ENV_SMOKE_CYCLES) {
            config.smoke_cycles = cycles;
        }

        config
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

/// `<config dir>/lv2-ui-bridge/manifest.json`, or `manifest.json` in the
/// working directory when no home directory is known.
pub fn default_manifest_path() -> PathBuf {
    ProjectDirs::from("", "", "lv2-ui-bridge")
        .map(|dirs| dirs.config_dir().join("manifest.json"))
        .unwrap_or_else(|| PathBuf::from("manifest.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = BridgeConfig::from_lookup(|_| None);
        assert_eq!(config.sample_rate, 44100.0);
        assert_eq!(config.idle_interval, Duration::from_millis(30));
        assert_eq!(config.smoke_cycles, 10);
        assert!(config.manifest_path.ends_with("manifest.json"));
    }

    #[test]
    fn overrides_and_bad_values() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (ENV_SAMPLE_RATE, "48000"),
            (ENV_IDLE_MS, "fast"),
            (ENV_SMOKE_CYCLES, "3"),
            (ENV_MANIFEST, "/etc/bridge.json"),
        ]));
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.idle_interval, Duration::from_millis(30));
        assert_eq!(config.smoke_cycles, 3);
        assert_eq!(config.manifest_path, PathBuf::from("/etc/bridge.json"));

        let config = BridgeConfig::from_lookup(lookup(&[(ENV_SAMPLE_RATE, "-1")]));
        assert_eq!(config.sample_rate, 44100.0);
    }
}
