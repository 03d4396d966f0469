//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing, unreadable or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    pub speed: SpeedConfig,
    pub player: PlayerConfig,
    pub log_filter: String,
    pub sound_enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    /// Vertical world units fallen per tick while airborne.
    pub fall_step: i32,
    /// Vertical world units climbed per tick.
    pub climb_step: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub grappling_hook: bool,
    /// Spawn override `(x, y)` in world units.
    pub start: Option<(i32, i32)>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_fall_step")]
    fall_step: i32,
    #[serde(default = "default_climb_step")]
    climb_step: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_true")]
    grappling_hook: bool,
    start_x: Option<i32>,
    start_y: Option<i32>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_filter")]
    filter: String,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 75 }
fn default_fall_step() -> i32 { 64 }
fn default_climb_step() -> i32 { 64 }
fn default_true() -> bool { true }
fn default_log_filter() -> String { "warn".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            fall_step: default_fall_step(),
            climb_step: default_climb_step(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer { grappling_hook: true, start_x: None, start_y: None }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { filter: default_log_filter() }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: true }
    }
}

impl From<TomlConfig> for CoreConfig {
    fn from(cfg: TomlConfig) -> Self {
        let start = match (cfg.player.start_x, cfg.player.start_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        };
        CoreConfig {
            speed: SpeedConfig {
                tick_rate_ms: cfg.speed.tick_rate_ms,
                fall_step: cfg.speed.fall_step,
                climb_step: cfg.speed.climb_step,
            },
            player: PlayerConfig { grappling_hook: cfg.player.grappling_hook, start },
            log_filter: cfg.log.filter,
            sound_enabled: cfg.sound.enabled,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl CoreConfig {
    /// Load `config.toml` from the first candidate directory that has one.
    /// Missing file or keys fall back to defaults; errors are logged.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!("{e}; using default settings");
                    return Self::default();
                }
            }
        }
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str::<TomlConfig>(&text)
            .map(Into::into)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

/// Candidate directories: exe dir, then CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
