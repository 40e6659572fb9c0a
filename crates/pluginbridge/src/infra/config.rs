//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".pluginbridge/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_catalog_format")]
    pub catalog_format: String,
    /// Catalog template name or path overriding the format's built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Defaults {
    fn default_catalog_format() -> String {
        "markdown".into()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            catalog_format: Self::default_catalog_format(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    #[serde(default = "LoggingConfig::default_filter")]
    pub filter: String,
}

impl LoggingConfig {
    fn default_filter() -> String {
        "info".into()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    /// Log full request envelopes at debug level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl EditorConfig {
    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    log_filter: Option<String>,
    catalog_format: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            log_filter: env::var("PLUGINBRIDGE_LOG").ok(),
            catalog_format: env::var("PLUGINBRIDGE_CATALOG_FORMAT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(log_filter: &str, catalog_format: &str) -> Self {
        Self {
            log_filter: Some(log_filter.to_owned()),
            catalog_format: Some(catalog_format.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            logging: merge_logging(self.logging, other.logging),
            editor: merge_editor(self.editor, other.editor),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        catalog_format: if overlay.catalog_format != Defaults::default_catalog_format() {
            overlay.catalog_format
        } else {
            base.catalog_format
        },
        template: overlay.template.or(base.template),
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        filter: if overlay.filter != LoggingConfig::default_filter() {
            overlay.filter
        } else {
            base.filter
        },
    }
}

fn merge_editor(mut base: EditorConfig, overlay: EditorConfig) -> EditorConfig {
    if let Some(debug) = overlay.debug {
        base.debug = Some(debug);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("pluginbridge/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(filter) = env.log_filter {
        config.logging.filter = filter;
    }
    if let Some(format) = env.catalog_format {
        config.defaults.catalog_format = format;
    }
    config
}
