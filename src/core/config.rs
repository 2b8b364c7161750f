//! Arena configuration
//!
//! [`ArenaConfig`] is read from `arena.json` in the user's configuration
//! directory (or an explicit path), then overridden field by field from the
//! environment. A missing file is not an error; defaults apply.
//!
//! # Environment
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ARENA_TURN_SECONDS` | `turn_seconds` |
//! | `ARENA_TICK_MILLIS` | `tick_millis` |
//! | `ARENA_DRAW_SIGNAL` | `draw_signal_address` |
//! | `ARENA_OPERATOR` | `operator_address` |
//! | `ARENA_REFUND_TIMEOUT_SECS` | `refund_timeout_secs` |
//!
//! The binary loads a `.env` file with `dotenvy` before calling
//! [`ArenaConfig::load`].

use super::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const CONFIG_FILENAME: &str = "arena.json";

/// Address the custody contract reads as "no winner, split the pot"
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Length of each turn before it is forfeited
    pub turn_seconds: u64,
    /// Interval between clock tick broadcasts
    pub tick_millis: u64,
    /// Value passed to `resolve` when the game is drawn
    pub draw_signal_address: String,
    /// Identity the coordinator signs custody calls with
    pub operator_address: String,
    /// Age after which an unsettled escrow may be refunded
    pub refund_timeout_secs: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 45,
            tick_millis: 1000,
            draw_signal_address: ZERO_ADDRESS.to_string(),
            operator_address: "arena-operator".to_string(),
            refund_timeout_secs: 24 * 60 * 60,
        }
    }
}

impl ArenaConfig {
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.turn_seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    pub fn refund_timeout(&self) -> Duration {
        Duration::from_secs(self.refund_timeout_secs)
    }

    /// Load from `path` (or the default location) and apply env overrides
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: ArenaConfig = serde_json::from_str(&contents)?;
            info!("[CONFIG] Loaded {}", path.display());
            config
        } else {
            warn!("[CONFIG] {} not found, using defaults", path.display());
            ArenaConfig::default()
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `ARENA_*` variable names
    pub fn with_overrides<F>(mut self, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var(&lookup, "ARENA_TURN_SECONDS")? {
            self.turn_seconds = value;
        }
        if let Some(value) = parse_var(&lookup, "ARENA_TICK_MILLIS")? {
            self.tick_millis = value;
        }
        if let Some(value) = lookup("ARENA_DRAW_SIGNAL") {
            self.draw_signal_address = value;
        }
        if let Some(value) = lookup("ARENA_OPERATOR") {
            self.operator_address = value;
        }
        if let Some(value) = parse_var(&lookup, "ARENA_REFUND_TIMEOUT_SECS")? {
            self.refund_timeout_secs = value;
        }
        Ok(self)
    }

    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> CoreResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::InvalidEnv {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

/// `arena.json` in the platform config dir, or the working directory
pub fn default_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "EscrowChess") {
        proj_dirs.config_dir().join(CONFIG_FILENAME)
    } else {
        PathBuf::from(CONFIG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ArenaConfig::default();
        assert_eq!(config.turn_duration(), Duration::from_secs(45));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.draw_signal_address, ZERO_ADDRESS);
    }

    #[test]
    fn test_env_overrides() {
        let config = ArenaConfig::default()
            .with_overrides(lookup_from(&[
                ("ARENA_TURN_SECONDS", "30"),
                ("ARENA_OPERATOR", "0xabc"),
            ]))
            .unwrap();
        assert_eq!(config.turn_seconds, 30);
        assert_eq!(config.operator_address, "0xabc");
        assert_eq!(config.tick_millis, 1000, "untouched fields keep defaults");
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let err = ArenaConfig::default()
            .with_overrides(lookup_from(&[("ARENA_TICK_MILLIS", "fast")]))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidEnv { ref key, .. } if key == "ARENA_TICK_MILLIS"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ArenaConfig = serde_json::from_str(r#"{"turn_seconds": 10}"#).unwrap();
        assert_eq!(config.turn_seconds, 10);
        assert_eq!(config.refund_timeout_secs, 86_400);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = std::env::temp_dir().join(format!("escrow-chess-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join(CONFIG_FILENAME);
        let config = ArenaConfig {
            turn_seconds: 12,
            ..ArenaConfig::default()
        };
        config.save(&path).unwrap();

        let loaded: ArenaConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(dir).ok();
    }
}
