use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout_engine::{BoundariesAction, LayoutKind, Orientation};

pub fn config_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("rift").join("dwindle.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Layout of the root container a workspace gets when its first window
    /// is bound.
    #[serde(default)]
    pub default_root_container_layout: LayoutKind,
    #[serde(default = "default_root_orientation")]
    pub default_root_container_orientation: Orientation,
    /// Collapse single-child containers once a window leaves the tiling tree.
    #[serde(default = "yes")]
    pub enable_normalization_flatten_containers: bool,
    /// What move and focus do when there is nothing in the requested
    /// direction. Commands may override it.
    #[serde(default)]
    pub boundaries_action: BoundariesAction,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_root_container_layout: LayoutKind::default(),
            default_root_container_orientation: default_root_orientation(),
            enable_normalization_flatten_containers: true,
            boundaries_action: BoundariesAction::default(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.default_root_container_layout != LayoutKind::Dwindle {
            issues.push(format!(
                "default_root_container_layout is `{}`; new windows will not be split and \
                 directional navigation will stop at the root",
                self.default_root_container_layout
            ));
        }

        issues
    }
}

fn yes() -> bool { true }

fn default_root_orientation() -> Orientation { Orientation::Horizontal }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&buf)
    }

    /// Reads `path` if it exists, falling back to the defaults on any error.
    pub fn load_or_default(path: &Path) -> Config {
        if !path.exists() {
            return Config::default();
        }
        match Self::read(path) {
            Ok(config) => {
                for issue in config.validate() {
                    warn!("{issue}");
                }
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {e:#}", path.display());
                Config::default()
            }
        }
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.layout.validate() }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => {
                let msg = e.to_string();
                bail!("{msg}");
            }
        }
    }
}
