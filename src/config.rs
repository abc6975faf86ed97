/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or else from the executable's
/// directory (then CWD). Falls back to sensible defaults if the file is
/// missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::AgentError;
use crate::search::frontier::DEFAULT_NODE_LIMIT;
use crate::search::informed::DEFAULT_STEP_LIMIT;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub connection: ConnectionConfig,
    pub search: SearchConfig,
    pub render_map: bool,
    pub log_filter: String,
}

#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub frontier_node_limit: usize,
    pub informed_step_limit: usize,
    pub max_explore_radius: u32, // exploration tries radius 0..=max
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            frontier_node_limit: default_node_limit(),
            informed_step_limit: default_step_limit(),
            max_explore_radius: default_explore_radius(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    connection: TomlConnection,
    #[serde(default)]
    search: TomlSearch,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlConnection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

#[derive(Deserialize, Debug)]
struct TomlSearch {
    #[serde(default = "default_node_limit")]
    frontier_node_limit: usize,
    #[serde(default = "default_step_limit")]
    informed_step_limit: usize,
    #[serde(default = "default_explore_radius")]
    max_explore_radius: u32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlDisplay {
    #[serde(default)]
    render_map: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_filter")]
    filter: String,
}

// ── Defaults ──

fn default_host() -> String { "localhost".into() }
fn default_port() -> u16 { 31415 }
fn default_node_limit() -> usize { DEFAULT_NODE_LIMIT }
fn default_step_limit() -> usize { DEFAULT_STEP_LIMIT }
fn default_explore_radius() -> u32 { 2 }
fn default_filter() -> String { "info".into() }

impl Default for TomlConnection {
    fn default() -> Self {
        TomlConnection {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TomlSearch {
    fn default() -> Self {
        TomlSearch {
            frontier_node_limit: default_node_limit(),
            informed_step_limit: default_step_limit(),
            max_explore_radius: default_explore_radius(),
        }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging { filter: default_filter() }
    }
}

impl From<TomlConfig> for AgentConfig {
    fn from(cfg: TomlConfig) -> Self {
        AgentConfig {
            connection: ConnectionConfig {
                host: cfg.connection.host,
                port: cfg.connection.port,
            },
            search: SearchConfig {
                frontier_node_limit: cfg.search.frontier_node_limit,
                informed_step_limit: cfg.search.informed_step_limit,
                max_explore_radius: cfg.search.max_explore_radius,
            },
            render_map: cfg.display.render_map,
            log_filter: cfg.logging.filter,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

/// Why the built-in defaults were used instead of a config file. Loading
/// runs before logging is set up, so these are handed back to be logged.
#[derive(Debug, Error)]
pub enum ConfigFallback {
    #[error("no config.toml found in {}, using defaults", .searched.join(", "))]
    NotFound { searched: Vec<String> },
    #[error("could not read {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: std::io::Error },
    #[error("{} does not parse, using defaults: {source}", .path.display())]
    Malformed { path: PathBuf, source: toml::de::Error },
}

impl AgentConfig {
    /// Load config. An explicit path must exist and parse; otherwise
    /// search order is (1) exe directory, (2) current working directory,
    /// and a missing or broken file falls back to defaults, reported in
    /// the returned fallback list.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Vec<ConfigFallback>), AgentError> {
        match explicit {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok((Self::from_toml_str(&text)?, vec![]))
            }
            None => {
                let (cfg, fallbacks) = load_toml(&candidate_dirs());
                Ok((cfg.into(), fallbacks))
            }
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AgentError> {
        Ok(toml::from_str::<TomlConfig>(text)?.into())
    }
}

/// Exe dir, then CWD, without duplicates.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![];
    let exe_dir = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|mut exe| exe.pop().then_some(exe));
    for dir in exe_dir.into_iter().chain(std::env::current_dir().ok()) {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// First readable config.toml in `search_dirs` wins. A file that exists
/// but cannot be read is skipped; one that does not parse stops the
/// search with defaults.
fn load_toml(search_dirs: &[PathBuf]) -> (TomlConfig, Vec<ConfigFallback>) {
    let mut fallbacks = vec![];
    for path in search_dirs.iter().map(|dir| dir.join("config.toml")) {
        if !path.exists() {
            continue;
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => {
                fallbacks.push(ConfigFallback::Unreadable { path, source });
                continue;
            }
        };
        match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => return (cfg, fallbacks),
            Err(source) => {
                fallbacks.push(ConfigFallback::Malformed { path, source });
                return (TomlConfig::default(), fallbacks);
            }
        }
    }
    if fallbacks.is_empty() {
        let searched = search_dirs.iter().map(|d| d.display().to_string()).collect();
        fallbacks.push(ConfigFallback::NotFound { searched });
    }
    (TomlConfig::default(), fallbacks)
}
