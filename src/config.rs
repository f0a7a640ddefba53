/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Only presentation/pacing knobs live here; simulation rule constants are
/// compile-time so behavior is identical on every install.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Target tick duration, milliseconds. 66 ms ≈ 15 ticks/second.
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub star_count: usize,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub enabled: bool,
    pub file: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_star_count")]
    star_count: usize,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 66 }
fn default_star_count() -> usize { 15 }
fn default_log_file() -> String { "starraid.log".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { star_count: default_star_count() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { enabled: false, file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            },
            display: DisplayConfig {
                star_count: toml_cfg.display.star_count,
            },
            log: LogConfig {
                enabled: toml_cfg.log.enabled,
                file: toml_cfg.log.file,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
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

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let cfg = load_toml(&[PathBuf::from("/nonexistent")]);
        assert_eq!(cfg.speed.tick_rate_ms, 66);
        assert_eq!(cfg.display.star_count, 15);
        assert!(!cfg.log.enabled);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let cfg: TomlConfig = toml::from_str("[speed]\ntick_rate_ms = 33\n").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 33);
        assert_eq!(cfg.display.star_count, 15);
        assert_eq!(cfg.log.file, "starraid.log");
    }
}
