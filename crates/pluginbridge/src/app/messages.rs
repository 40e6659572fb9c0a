//! Wire names and payload shapes of every host message.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::model::SelectedElementDescriptor;

/// Which facade sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facade {
    Editor,
    Article,
}

impl Facade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facade::Editor => "editor",
            Facade::Article => "article",
        }
    }
}

/// Shape of the payload sent with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `null`.
    Null,
    /// A caller supplied value forwarded as-is.
    Opaque,
    /// `{}`.
    EmptyObject,
    /// An object with exactly these keys.
    Keys(&'static [&'static str]),
}

impl PayloadShape {
    /// Whether `payload` has exactly this shape.
    pub fn matches(&self, payload: &Value) -> bool {
        match (self, payload) {
            (PayloadShape::Null, Value::Null) => true,
            (PayloadShape::Opaque, _) => true,
            (PayloadShape::EmptyObject, Value::Object(map)) => map.is_empty(),
            (PayloadShape::Keys(keys), Value::Object(map)) => {
                map.len() == keys.len() && keys.iter().all(|key| map.contains_key(*key))
            }
            _ => false,
        }
    }

    /// Human readable description used by the catalog.
    pub fn describe(&self) -> String {
        match self {
            PayloadShape::Null => "null".into(),
            PayloadShape::Opaque => "value".into(),
            PayloadShape::EmptyObject => "{}".into(),
            PayloadShape::Keys(keys) => format!("{{{}}}", keys.join(",")),
        }
    }
}

macro_rules! host_messages {
    ($($variant:ident => $name:literal, $facade:ident, $shape:expr;)+) => {
        /// Every message the facades send to the host.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HostMessage {
            $($variant,)+
        }

        impl HostMessage {
            /// The wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(HostMessage::$variant => $name,)+
                }
            }

            pub fn facade(&self) -> Facade {
                match self {
                    $(HostMessage::$variant => Facade::$facade,)+
                }
            }

            pub fn shape(&self) -> PayloadShape {
                match self {
                    $(HostMessage::$variant => $shape,)+
                }
            }

            /// All messages in catalog order.
            pub fn all() -> &'static [HostMessage] {
                &[$(HostMessage::$variant,)+]
            }
        }

        impl FromStr for HostMessage {
            type Err = HostMessageParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($name => Ok(HostMessage::$variant),)+
                    other => Err(HostMessageParseError::UnknownMessage(other.to_string())),
                }
            }
        }
    };
}

use PayloadShape::{EmptyObject, Keys, Null, Opaque};

host_messages! {
    GetActiveEditor => "get-active-editor", Editor, Null;
    RegisterMenuAction => "register-menu-action", Editor, Opaque;
    RegisterHoverAction => "register-hover-action", Editor, Opaque;
    DirectionalCastle => "editor-directional-castle", Editor, Opaque;
    RegisterMenuActionGroup => "register-menu-action-group", Editor, Opaque;
    GetEditorType => "editor-get-type", Editor, Null;
    ReplaceElementById => "editor-element-replace-byid", Editor, Keys(&["id", "element"]);
    DeleteElementById => "editor-element-delete-byid", Editor, Keys(&["id"]);
    GetHtmlById => "editor-element-get-byid", Editor, Keys(&["id"]);
    GetHtmlBySelector => "editor-elements-get-byselector", Editor, Keys(&["selector"]);
    GetCategories => "get-categories", Editor, Null;
    GetParentCategories => "get-parent-categories", Editor, Opaque;
    GetParentIds => "get-parent-ids", Editor, Keys(&["id", "selector"]);
    GetTagTypes => "get-tag-types", Editor, Null;
    GetTagType => "get-tag-type", Editor, Keys(&["id"]);
    Clear => "editor-clear", Editor, Null;
    InsertString => "editor-insert-string", Editor, Keys(&["string"]);
    InsertElement => "editor-insert-element", Editor, Keys(&["element", "select"]);
    RemoveClasses => "editor-classes-remove", Editor, Keys(&["id", "classes"]);
    AddClasses => "editor-classes-add", Editor, Keys(&["id", "classes"]);
    MarkAsActive => "editor-mark-as-active", Editor, Keys(&["id"]);
    SetAttributeById => "editor-element-attribute-set-byid", Editor, Keys(&["id", "attribute", "value"]);
    SetStyleById => "editor-element-style-set-byid", Editor, Keys(&["id", "attribute", "value"]);
    InitMenu => "editor-initialize-menu", Editor, Keys(&["menus"]);
    OpenElementEditor => "open-element-editor", Editor, Keys(&["id"]);
    TotalWordCount => "total-word-count", Editor, Null;
    TotalCharCount => "total-char-count", Editor, Null;
    UpdateAssetMedia => "update-asset-media", Editor, Opaque;
    GetAssetData => "get-asset-data", Editor, Opaque;
    UpdateAssetOption => "update-asset-option", Editor, Opaque;
    UpdateEmbeddedAsset => "update-embedded-asset", Editor, Opaque;
    AppStart => "app-start", Article, Keys(&["app", "option"]);
    AppStop => "app-stop", Article, Keys(&["app"]);
    ArticleIdGet => "article-id-get", Article, Null;
    MetaInfoClear => "article-metainfo-clear", Article, Null;
    TagsGet => "article-tags-get", Article, Null;
    TagsSet => "article-tags-set", Article, Keys(&["tags"]);
    TagsAdd => "article-tags-add", Article, Keys(&["tag"]);
    TagsRemove => "article-tags-remove", Article, Keys(&["tag"]);
    SelectedCategoriesGet => "article-categories-selected-get", Article, Null;
    SelectedCategoriesSet => "article-categories-selected-set", Article, Keys(&["categories"]);
    CategoriesAdd => "article-categories-add", Article, Keys(&["categories"]);
    CategoriesRemove => "article-categories-remove", Article, Keys(&["categories"]);
    MainCategorySet => "article-categories-main-set", Article, Keys(&["category"]);
    SourceGet => "article-source-get", Article, Null;
    SourceSet => "article-source-set", Article, Keys(&["source"]);
    StatusGet => "article-status-get", Article, Null;
    StatusSet => "article-status-set", Article, Keys(&["status"]);
    PublishedGet => "article-published-get", Article, Null;
    PublishedSet => "article-published-set", Article, Keys(&["published"]);
    AuthorsGet => "article-authors-get", Article, Null;
    AuthorsSet => "article-authors-set", Article, Keys(&["authors"]);
    AuthorsAdd => "article-authors-add", Article, Keys(&["authors"]);
    AuthorsRemove => "article-authors-remove", Article, Keys(&["authors"]);
    ContentGet => "article-content-get", Article, Null;
    ContentSet => "article-content-set", Article, Keys(&["content"]);
    TypeGet => "article-type-get", Article, Null;
    TypeSet => "article-type-set", Article, Keys(&["articletype"]);
    PaneMaximize => "editor-pane-maximize", Article, Keys(&["title", "event"]);
    RestoreAppWindow => "restore-app-window", Article, EmptyObject;
}

impl fmt::Display for HostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`HostMessage`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HostMessageParseError {
    #[error("unknown host message '{0}'")]
    UnknownMessage(String),
}

pub const PLUGIN_ELEMENT_CLICKED: &str = "pluginElementClicked";
pub const PLUGIN_ELEMENT_DESELECTED: &str = "pluginElementDeselected";

/// Events the host pushes to the editor facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    PluginElementClicked(SelectedElementDescriptor),
    PluginElementDeselected,
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::PluginElementClicked(_) => PLUGIN_ELEMENT_CLICKED,
            HostEvent::PluginElementDeselected => PLUGIN_ELEMENT_DESELECTED,
        }
    }

    /// Decode a raw host event. Unknown event names yield `Ok(None)`.
    pub fn from_wire(name: &str, payload: Value) -> serde_json::Result<Option<Self>> {
        match name {
            PLUGIN_ELEMENT_CLICKED => {
                serde_json::from_value(payload).map(|d| Some(HostEvent::PluginElementClicked(d)))
            }
            PLUGIN_ELEMENT_DESELECTED => Ok(Some(HostEvent::PluginElementDeselected)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use serde_json::json;

    #[test]
    fn wire_names_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for message in HostMessage::all() {
            assert!(seen.insert(message.as_str()), "duplicate {message}");
            assert_eq!(message.as_str().parse::<HostMessage>().unwrap(), *message);
        }
        assert_eq!(HostMessage::all().len(), 60);
    }

    #[test]
    fn unknown_message_fails_to_parse() {
        let err = "article-status-clear".parse::<HostMessage>().unwrap_err();
        assert_eq!(
            err,
            HostMessageParseError::UnknownMessage("article-status-clear".into())
        );
    }

    #[test]
    fn facades_split_the_table() {
        let editor = HostMessage::all()
            .iter()
            .filter(|m| m.facade() == Facade::Editor)
            .count();
        let article = HostMessage::all()
            .iter()
            .filter(|m| m.facade() == Facade::Article)
            .count();
        assert_eq!((editor, article), (31, 29));
    }

    #[test]
    fn shapes_require_exact_keys() {
        let shape = HostMessage::GetParentIds.shape();
        assert!(shape.matches(&json!({"id": "a", "selector": "p"})));
        assert!(!shape.matches(&json!({"id": "a"})));
        assert!(!shape.matches(&json!({"id": "a", "selector": "p", "extra": 1})));
        assert!(HostMessage::Clear.shape().matches(&Value::Null));
        assert!(!HostMessage::Clear.shape().matches(&json!({})));
        assert!(HostMessage::RestoreAppWindow.shape().matches(&json!({})));
        assert_eq!(HostMessage::GetParentIds.shape().describe(), "{id,selector}");
    }

    #[test]
    fn events_decode_from_wire() {
        let clicked = HostEvent::from_wire(
            PLUGIN_ELEMENT_CLICKED,
            json!({"id": "asset-3", "dpArticleId": "3"}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(clicked.name(), PLUGIN_ELEMENT_CLICKED);
        assert_eq!(
            HostEvent::from_wire(PLUGIN_ELEMENT_DESELECTED, Value::Null).unwrap(),
            Some(HostEvent::PluginElementDeselected)
        );
        assert_eq!(HostEvent::from_wire("resize", Value::Null).unwrap(), None);
        assert!(HostEvent::from_wire(PLUGIN_ELEMENT_CLICKED, json!("nope")).is_err());
    }
}
