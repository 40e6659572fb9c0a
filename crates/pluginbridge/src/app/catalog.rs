//! Rendering the host message catalog for plugin authors.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::app::messages::{Facade, HostMessage, PLUGIN_ELEMENT_CLICKED, PLUGIN_ELEMENT_DESELECTED};
use crate::infra::config::Config;

/// Supported catalog formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum CatalogFormat {
    /// Markdown tables.
    Markdown,
    /// Plain text listing.
    Plain,
    /// JSON array of message entries.
    Json,
}

impl CatalogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogFormat::Markdown => "markdown",
            CatalogFormat::Plain => "plain",
            CatalogFormat::Json => "json",
        }
    }

    /// Built-in template for the format, `None` for JSON.
    fn default_template(&self) -> Option<&'static str> {
        match self {
            CatalogFormat::Markdown => Some("catalog_markdown"),
            CatalogFormat::Plain => Some("catalog_plain"),
            CatalogFormat::Json => None,
        }
    }
}

impl FromStr for CatalogFormat {
    type Err = CatalogFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(CatalogFormat::Markdown),
            "plain" | "text" | "txt" => Ok(CatalogFormat::Plain),
            "json" => Ok(CatalogFormat::Json),
            other => Err(CatalogFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`CatalogFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CatalogFormatParseError {
    #[error("unknown catalog format '{0}'")]
    UnknownFormat(String),
}

/// Runtime options for catalog rendering.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub format: CatalogFormat,
    /// Template name or path; `None` uses the format's built-in template.
    pub template: Option<String>,
    pub facade: Option<Facade>,
    pub output_path: Option<PathBuf>,
}

impl CatalogOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        let format = config
            .defaults
            .catalog_format
            .parse::<CatalogFormat>()
            .unwrap_or(CatalogFormat::Markdown);
        Self {
            format,
            template: config.defaults.template.clone(),
            facade: None,
            output_path: None,
        }
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub message: &'static str,
    pub facade: Facade,
    pub payload: String,
}

#[derive(Serialize)]
struct CatalogContext {
    editor: Vec<CatalogEntry>,
    article: Vec<CatalogEntry>,
    events: Vec<&'static str>,
}

/// Renders the wire table through built-in or user-supplied templates.
pub struct CatalogRenderer {
    env: Environment<'static>,
}

impl CatalogRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
        })
    }

    /// Entries for every message, optionally restricted to one facade.
    pub fn entries(facade: Option<Facade>) -> Vec<CatalogEntry> {
        HostMessage::all()
            .iter()
            .filter(|message| facade.is_none_or(|facade| message.facade() == facade))
            .map(|message| CatalogEntry {
                message: message.as_str(),
                facade: message.facade(),
                payload: message.shape().describe(),
            })
            .collect()
    }

    pub fn render(&self, options: &CatalogOptions) -> Result<String> {
        let entries = Self::entries(options.facade);
        if options.format == CatalogFormat::Json {
            return serde_json::to_string_pretty(&entries).context("failed to serialize catalog");
        }

        let (editor, article): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.facade == Facade::Editor);
        let events = if options.facade == Some(Facade::Article) {
            Vec::new()
        } else {
            vec![PLUGIN_ELEMENT_CLICKED, PLUGIN_ELEMENT_DESELECTED]
        };
        let context = CatalogContext {
            editor,
            article,
            events,
        };

        let template = options
            .template
            .as_deref()
            .or_else(|| options.format.default_template())
            .ok_or_else(|| anyhow!("no template for format '{}'", options.format.as_str()))?;
        self.render_with_template(&context, template)
    }

    /// Render and write to the configured output path, if any.
    pub fn export(&self, options: &CatalogOptions) -> Result<String> {
        let rendered = self.render(options)?;
        if let Some(path) = &options.output_path {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create catalog directory: {}", parent.display())
                })?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write catalog to {}", path.display()))?;
        }
        Ok(rendered)
    }

    fn render_with_template(&self, context: &CatalogContext, template_name: &str) -> Result<String> {
        if let Ok(template) = self.env.get_template(template_name) {
            return template
                .render(context)
                .map_err(|err| anyhow!("failed to render template '{template_name}': {err}"));
        }

        let template_path = Path::new(template_name);
        if template_path.exists() {
            let source = fs::read_to_string(template_path).with_context(|| {
                format!("failed to load template from path {}", template_path.display())
            })?;
            let mut env = Environment::new();
            env.set_trim_blocks(true);
            env.set_lstrip_blocks(true);
            env.add_template("external", &source)
                .map_err(|err| anyhow!("invalid template '{template_name}': {err}"))?;
            let template = env
                .get_template("external")
                .map_err(|err| anyhow!("invalid template '{template_name}': {err}"))?;
            return template
                .render(context)
                .map_err(|err| anyhow!("failed to render template '{template_name}': {err}"));
        }

        Err(anyhow!(
            "template '{template_name}' not found (built-in or filesystem)"
        ))
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("catalog_markdown", MARKDOWN_TEMPLATE)
        .map_err(|err| anyhow!("failed to register markdown catalog template: {err}"))?;
    env.add_template("catalog_plain", PLAIN_TEMPLATE)
        .map_err(|err| anyhow!("failed to register plain catalog template: {err}"))?;
    Ok(env)
}

const MARKDOWN_TEMPLATE: &str = r#"# Host Messages
{% if editor %}

## Editor

| Message | Payload |
| --- | --- |
{% for entry in editor %}
| `{{ entry.message }}` | `{{ entry.payload }}` |
{% endfor %}
{% endif %}
{% if article %}

## Article

| Message | Payload |
| --- | --- |
{% for entry in article %}
| `{{ entry.message }}` | `{{ entry.payload }}` |
{% endfor %}
{% endif %}
{% if events %}

## Inbound events

{% for event in events %}
- `{{ event }}`
{% endfor %}
{% endif %}
"#;

const PLAIN_TEMPLATE: &str = r#"{% for entry in editor %}
editor  {{ entry.message }} {{ entry.payload }}
{% endfor %}
{% for entry in article %}
article {{ entry.message }} {{ entry.payload }}
{% endfor %}
{% for event in events %}
event   {{ event }}
{% endfor %}
"#;
