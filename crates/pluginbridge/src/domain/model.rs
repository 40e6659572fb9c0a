//! Domain models for selections, insert options, and embedded assets.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier minted by the host.
///
/// Hosts hand ids out as JSON strings or numbers and expect them back in the same form, so the
/// original representation is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostId {
    Number(Number),
    Text(String),
}

impl HostId {
    /// Read an id from a loosely typed JSON value. Anything but a string or number yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(HostId::Text(text)),
            Value::Number(number) => Some(HostId::Number(number)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, HostId::Text(text) if text.is_empty())
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostId::Number(number) => write!(f, "{number}"),
            HostId::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for HostId {
    fn from(value: &str) -> Self {
        HostId::Text(value.to_owned())
    }
}

impl From<String> for HostId {
    fn from(value: String) -> Self {
        HostId::Text(value)
    }
}

impl From<u64> for HostId {
    fn from(value: u64) -> Self {
        HostId::Number(value.into())
    }
}

/// Describes the plugin-owned element currently selected in the host editor.
///
/// Host payloads are read leniently: ids may be strings or numbers, and missing, `null` or
/// oddly typed fields fall back to their defaults instead of rejecting the whole event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectedElementDescriptor {
    /// DOM id of the selected element.
    #[serde(rename = "id", default, deserialize_with = "lenient_text")]
    pub dom_id: String,
    /// Id correlating the element with storage on the host's article record.
    #[serde(
        rename = "dpArticleId",
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub article_scoped_id: Option<HostId>,
    #[serde(
        rename = "externalId",
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<HostId>,
    #[serde(rename = "isDigitalAsset", default, deserialize_with = "lenient_flag")]
    pub is_digital_asset: bool,
}

impl SelectedElementDescriptor {
    /// The article-scoped id, ignoring empty strings.
    pub fn article_scoped_id(&self) -> Option<&HostId> {
        self.article_scoped_id.as_ref().filter(|id| !id.is_empty())
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<HostId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(HostId::from_value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true") || text == "1",
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Options accepted by `insert_element`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InsertOptions {
    /// Select the element once the host has inserted it.
    #[serde(default)]
    pub select: bool,
}

impl InsertOptions {
    pub fn selected() -> Self {
        Self { select: true }
    }

    /// Resolve options from a loosely-shaped legacy argument.
    ///
    /// Objects contribute their boolean `select` flag. Anything else, including a missing
    /// argument, falls back to the defaults.
    pub fn from_legacy(options: Option<&Value>) -> Self {
        match options {
            Some(Value::Object(map)) => Self {
                select: map.get("select").and_then(Value::as_bool).unwrap_or(false),
            },
            _ => Self::default(),
        }
    }
}

/// The `data` object handed to `insert_embedded_asset`.
///
/// Known keys are typed; everything else is preserved and forwarded to the host untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedAssetData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_type_id: Option<HostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<HostId>,
    /// Whitespace separated classes added to the asset container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    /// Name of the app that owns the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_source: Option<String>,
    /// Filled in with the article-scoped id before the asset update is sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<HostId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmbeddedAssetData {
    pub fn new(embedded_type_id: impl Into<HostId>) -> Self {
        Self {
            embedded_type_id: Some(embedded_type_id.into()),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.asset_source = Some(source.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<HostId>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_class(mut self, asset_class: impl Into<String>) -> Self {
        self.asset_class = Some(asset_class.into());
        self
    }

    /// Attach an arbitrary key forwarded with the asset update.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// External id, ignoring empty strings.
    pub fn external_id(&self) -> Option<&HostId> {
        self.external_id.as_ref().filter(|id| !id.is_empty())
    }
}

/// Result of `insert_embedded_asset`.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedAssetOutcome {
    /// The asset container was inserted or replaced and the asset update was sent.
    Embedded {
        article_scoped_id: HostId,
        replaced: bool,
        /// Host response to the asset update.
        response: Value,
    },
    /// The selected element belongs to another app; nothing was sent to the host.
    Rejected { message: String },
}

impl EmbeddedAssetOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, EmbeddedAssetOutcome::Rejected { .. })
    }
}

/// Anything that can be sent to the editor as markup.
pub trait Markup {
    /// Outer HTML of the element, which is all the host receives.
    fn outer_html(&self) -> String;
}

impl Markup for str {
    fn outer_html(&self) -> String {
        self.to_owned()
    }
}

impl Markup for String {
    fn outer_html(&self) -> String {
        self.clone()
    }
}
