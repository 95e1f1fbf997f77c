//! Configuration loading with multi-layer merge

use crate::store::StoreOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG: &str = ".campus-store/config.toml";

/// Top-level campus-store configuration
///
/// Every field is optional so a layer only overrides what it sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampusConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[store]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Load the demo data set on startup
    pub seed: Option<bool>,

    /// Fabricate results for unknown owners with a demo session
    pub demo_mode: Option<bool>,

    pub demo_fallback_size: Option<usize>,

    /// Reject applications and reports with dangling references
    pub strict_references: Option<bool>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Base level when neither --debug nor --quiet is given
    pub level: Option<String>,

    /// Append logs to this file as well (`~` and `$VAR` are expanded)
    pub file: Option<String>,
}

impl CampusConfig {
    /// Load configuration from the standard hierarchy
    ///
    /// Load order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. ~/.config/campus-store/config.toml
    /// 3. .campus-store/config.toml (project)
    /// 4. An explicit file, when given
    pub fn load(project_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::defaults();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                let user_config = Self::load_file(&user_config_path)
                    .with_context(|| format!("loading {}", user_config_path.display()))?;
                config.merge(user_config);
            }
        }

        let project_config_path = project_dir
            .map(|p| p.join(PROJECT_CONFIG))
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG));

        if project_config_path.exists() {
            let project_config = Self::load_file(&project_config_path)
                .with_context(|| format!("loading {}", project_config_path.display()))?;
            config.merge(project_config);
        }

        if let Some(path) = explicit {
            let explicit_config =
                Self::load_file(path).with_context(|| format!("loading {}", path.display()))?;
            config.merge(explicit_config);
        }

        Ok(config)
    }

    /// Built-in defaults for the command-line tool
    pub fn defaults() -> Self {
        Self {
            store: StoreSection {
                seed: Some(true),
                demo_mode: Some(true),
                demo_fallback_size: Some(StoreOptions::default().demo_fallback_size),
                strict_references: Some(false),
            },
            logging: LoggingSection {
                level: Some("info".into()),
                file: None,
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Get the user config path (~/.config/campus-store/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("campus-store/config.toml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        let store = other.store;
        if store.seed.is_some() {
            self.store.seed = store.seed;
        }
        if store.demo_mode.is_some() {
            self.store.demo_mode = store.demo_mode;
        }
        if store.demo_fallback_size.is_some() {
            self.store.demo_fallback_size = store.demo_fallback_size;
        }
        if store.strict_references.is_some() {
            self.store.strict_references = store.strict_references;
        }

        let logging = other.logging;
        if logging.level.is_some() {
            self.logging.level = logging.level;
        }
        if logging.file.is_some() {
            self.logging.file = logging.file;
        }
    }

    /// Whether the demo data set should be loaded
    pub fn seed_enabled(&self) -> bool {
        self.store.seed.unwrap_or(true)
    }

    /// Store behaviour derived from the `[store]` table
    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            demo_mode: self.store.demo_mode.unwrap_or(defaults.demo_mode),
            demo_fallback_size: self
                .store
                .demo_fallback_size
                .unwrap_or(defaults.demo_fallback_size),
            strict_references: self
                .store
                .strict_references
                .unwrap_or(defaults.strict_references),
        }
    }

    /// Log file with `~` and environment variables expanded
    pub fn log_file(&self) -> Result<Option<PathBuf>> {
        let Some(ref raw) = self.logging.file else {
            return Ok(None);
        };
        let expanded = shellexpand::full(raw)
            .with_context(|| format!("expanding log file path '{}'", raw))?;
        Ok(Some(PathBuf::from(expanded.as_ref())))
    }
}
