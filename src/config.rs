use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::extract::{ExtractionStrategy, DEFAULT_CONTAINER_TAG, DEFAULT_SEARCH_DEPTH};
use crate::render::DEFAULT_WINDOW;

/// How page content is picked out of a fetched document
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    /// longest text among nodes at the search depth
    Depth,
    /// a single content container such as <article>
    Container,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window_size: usize,
    pub search_depth: usize,
    pub strategy: StrategyKind,
    pub container_tag: String,
    pub relay_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW,
            search_depth: DEFAULT_SEARCH_DEPTH,
            strategy: StrategyKind::Depth,
            container_tag: DEFAULT_CONTAINER_TAG.to_string(),
            relay_url: None,
        }
    }
}

/// Command line values that take precedence over the stored config
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub window_size: Option<usize>,
    pub search_depth: Option<usize>,
    pub strategy: Option<StrategyKind>,
    pub container_tag: Option<String>,
    pub relay_url: Option<String>,
}

impl Config {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(window_size) = overrides.window_size {
            self.window_size = window_size;
        }
        if let Some(search_depth) = overrides.search_depth {
            self.search_depth = search_depth;
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        if let Some(tag) = overrides.container_tag {
            self.container_tag = tag;
        }
        if overrides.relay_url.is_some() {
            self.relay_url = overrides.relay_url;
        }
    }

    pub fn extraction_strategy(&self) -> ExtractionStrategy {
        match self.strategy {
            StrategyKind::Depth => ExtractionStrategy::DepthSearch {
                depth: self.search_depth,
            },
            StrategyKind::Container => ExtractionStrategy::ContentContainer {
                tag: self.container_tag.clone(),
            },
        }
    }

    /// Window size the screen uses; a zero window would hide the text.
    pub fn display_window(&self) -> usize {
        self.window_size.max(1)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
