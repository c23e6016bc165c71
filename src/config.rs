use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use action_primitives::WaitConfig;
use anyhow::{Context, Result};
use soulbrowser_event_bus::{Event, InMemoryBus};
use tokio::fs;
use tracing::{info, warn};

/// Overrides `poll_interval_ms` when set.
pub const ENV_POLL_INTERVAL_MS: &str = "SOULBROWSER_POLL_INTERVAL_MS";

pub struct LoadedConfig {
    pub config: WaitConfig,
    pub path: PathBuf,
}

impl LoadedConfig {
    /// In-memory bus sized from the configured buffer.
    pub fn event_bus<E: Event>(&self) -> Arc<InMemoryBus<E>> {
        InMemoryBus::new(self.config.event_buffer)
    }
}

/// Priority: ./config/coord.yaml > ~/.config/soulbrowser/coord.yaml
pub fn default_config_path() -> Result<PathBuf> {
    let local_config = PathBuf::from("config/coord.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("soulbrowser");
    path.push("coord.yaml");
    Ok(path)
}

pub async fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: WaitConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from: {}", path.display());
        config
    } else {
        warn!("Config file not found, using defaults: {}", path.display());
        WaitConfig::default()
    };

    apply_env_overrides(&mut config)?;
    Ok(LoadedConfig { config, path })
}

pub fn apply_env_overrides(config: &mut WaitConfig) -> Result<()> {
    if let Ok(raw) = env::var(ENV_POLL_INTERVAL_MS) {
        config.poll_interval_ms = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {ENV_POLL_INTERVAL_MS}: {raw}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_primitives::NavWait;
    use serial_test::serial;
    use std::io::Write;

    #[tokio::test]
    #[serial]
    async fn reads_yaml_and_keeps_unset_defaults() {
        env::remove_var(ENV_POLL_INTERVAL_MS);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nav_wait: frame_navigated\nevent_buffer: 32").unwrap();

        let loaded = load_config(Some(file.path())).await.unwrap();
        assert_eq!(loaded.config.nav_wait, NavWait::FrameNavigated);
        assert_eq!(loaded.config.event_buffer, 32);
        assert_eq!(loaded.config.poll_interval_ms, 50);
        assert_eq!(loaded.path, file.path());
    }

    #[tokio::test]
    #[serial]
    async fn missing_file_falls_back_to_defaults() {
        env::remove_var(ENV_POLL_INTERVAL_MS);
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.yaml")))
            .await
            .unwrap();
        assert_eq!(loaded.config, WaitConfig::default());
        assert_eq!(loaded.event_bus::<u32>().subscriber_count(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn malformed_yaml_is_an_error() {
        env::remove_var(ENV_POLL_INTERVAL_MS);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nav_wait: [not, an, enum]").unwrap();
        assert!(load_config(Some(file.path())).await.is_err());
    }

    #[test]
    #[serial]
    fn env_override_wins() {
        env::set_var(ENV_POLL_INTERVAL_MS, "125");
        let mut config = WaitConfig::default();
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.poll_interval_ms, 125);

        env::set_var(ENV_POLL_INTERVAL_MS, "soon");
        assert!(apply_env_overrides(&mut config).is_err());
        env::remove_var(ENV_POLL_INTERVAL_MS);
    }
}
