/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::entity::ProfileKind;
use crate::domain::pathfinder::CostProfile;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct NavConfig {
    pub costs: CostConfig,
    pub timing: TimingConfig,
    pub levels_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CostConfig {
    pub fall_cost: f32,
    pub careful_brick_cost: f32,
    pub reckless_brick_cost: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub brick_regen_ms: u64,
}

impl CostConfig {
    pub fn profile(&self, kind: ProfileKind) -> CostProfile {
        match kind {
            ProfileKind::Careful => CostProfile::new(self.fall_cost, self.careful_brick_cost),
            ProfileKind::Reckless => CostProfile::new(self.fall_cost, self.reckless_brick_cost),
        }
    }
}

impl TimingConfig {
    /// Regeneration delay in ticks, rounded up, at least one tick.
    pub fn regen_ticks(&self) -> u64 {
        let rate = self.tick_rate_ms.max(1);
        self.brick_regen_ms.div_ceil(rate).max(1)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    costs: TomlCosts,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlCosts {
    #[serde(default = "default_fall_cost")]
    fall_cost: f32,
    #[serde(default = "default_careful_brick")]
    careful_brick_cost: f32,
    #[serde(default = "default_reckless_brick")]
    reckless_brick_cost: f32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_brick_regen")]
    brick_regen_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

// ── Defaults ──

fn default_fall_cost() -> f32 { 0.9 }
fn default_careful_brick() -> f32 { 3.0 }
fn default_reckless_brick() -> f32 { 48.0 }  // tile width + tile height in px
fn default_tick_rate() -> u64 { 16 }         // ~60 frames per second
fn default_brick_regen() -> u64 { 5000 }
fn default_levels_dir() -> String { "levels".into() }

impl Default for TomlCosts {
    fn default() -> Self {
        TomlCosts {
            fall_cost: default_fall_cost(),
            careful_brick_cost: default_careful_brick(),
            reckless_brick_cost: default_reckless_brick(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            brick_regen_ms: default_brick_regen(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
        }
    }
}

impl From<TomlConfig> for NavConfig {
    fn from(t: TomlConfig) -> Self {
        NavConfig {
            costs: CostConfig {
                fall_cost: t.costs.fall_cost,
                careful_brick_cost: t.costs.careful_brick_cost,
                reckless_brick_cost: t.costs.reckless_brick_cost,
            },
            timing: TimingConfig {
                tick_rate_ms: t.timing.tick_rate_ms,
                brick_regen_ms: t.timing.brick_regen_ms,
            },
            levels_dir: PathBuf::from(t.general.levels_dir),
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl NavConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let mut config = NavConfig::from(toml_cfg);
        if config.levels_dir.is_relative() {
            // Search candidate dirs for the levels folder, default relative to CWD
            if let Some(found) = search_dirs.iter()
                .map(|d| d.join(&config.levels_dir))
                .find(|p| p.is_dir())
            {
                config.levels_dir = found;
            }
        }
        config
    }

    /// Parse one config file; unreadable or malformed files yield defaults.
    pub fn from_file(path: &Path) -> Self {
        read_toml(path).unwrap_or_default().into()
    }

    pub fn profile(&self, kind: ProfileKind) -> CostProfile {
        self.costs.profile(kind)
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/noderunner)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/noderunner");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/noderunner)
    let sys = PathBuf::from("/usr/share/noderunner");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
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
            if let Some(cfg) = read_toml(&path) {
                return cfg;
            }
            return TomlConfig::default();
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!("config.toml parse error: {e}; using default settings");
                None
            }
        },
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            None
        }
    }
}
