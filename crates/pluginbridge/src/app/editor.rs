//! Editor facade: typed operations over the host editor's request primitive.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::app::asset::{AssetContainer, element_id_for};
use crate::app::messages::{HostEvent, HostMessage, PLUGIN_ELEMENT_CLICKED, PLUGIN_ELEMENT_DESELECTED};
use crate::app::selection::SelectionTracker;
use crate::domain::errors::DomainError;
use crate::domain::model::{
    EmbeddedAssetData, EmbeddedAssetOutcome, InsertOptions, Markup, SelectedElementDescriptor,
};
use crate::infra::config::EditorConfig;
use crate::infra::host::PluginHost;

/// Functions for talking with the host editor.
///
/// Each facade owns the selection state of one editor session. The host's
/// `pluginElementClicked`/`pluginElementDeselected` events are wired up on construction.
pub struct EditorFacade {
    host: Arc<dyn PluginHost>,
    selection: Arc<SelectionTracker>,
    debug: bool,
}

impl EditorFacade {
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let selection = Arc::new(SelectionTracker::new());
        listen(host.as_ref(), PLUGIN_ELEMENT_CLICKED, &selection);
        listen(host.as_ref(), PLUGIN_ELEMENT_DESELECTED, &selection);

        Self {
            host,
            selection,
            debug: false,
        }
    }

    /// Log full envelopes at debug level instead of trace.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_config(self, config: &EditorConfig) -> Self {
        self.with_debug(config.debug())
    }

    /// Apply a host event delivered outside the host's listener registry.
    pub fn handle_event(&self, event: HostEvent) {
        self.selection.apply(event);
    }

    /// The plugin element currently selected in the editor, if any.
    pub fn selected_element(&self) -> Option<SelectedElementDescriptor> {
        self.selection.current()
    }

    async fn send(&self, message: HostMessage, payload: Value) -> Result<Value> {
        debug_assert!(
            message.shape().matches(&payload),
            "payload for {message} does not match {}",
            message.shape().describe()
        );
        if self.debug {
            debug!(%message, %payload, "editor request");
        } else {
            debug!(%message, "editor request");
            trace!(%payload, "editor request payload");
        }
        self.host.request(message.as_str(), payload).await
    }

    /// Name of the currently active editor.
    pub async fn get_active_editor(&self) -> Result<Value> {
        self.send(HostMessage::GetActiveEditor, Value::Null).await
    }

    /// Register or modify a context menu item for an app element.
    ///
    /// The action carries `label`, and optionally `icon` and a `trigger` css selector.
    pub async fn register_menu_action(&self, action: Value) -> Result<Value> {
        self.send(HostMessage::RegisterMenuAction, action).await
    }

    pub async fn register_hover_action(&self, action: Value) -> Result<Value> {
        self.send(HostMessage::RegisterHoverAction, action).await
    }

    /// Swap the element named in `movement` with its neighbour in the given direction.
    ///
    /// `movement` is `{"elementId": .., "direction": "forward" | "backward"}`.
    pub async fn directional_castle(&self, movement: Value) -> Result<Value> {
        self.send(HostMessage::DirectionalCastle, movement).await
    }

    /// Register or modify a group of context menu items.
    pub async fn register_menu_action_group(&self, group: Value) -> Result<Value> {
        self.send(HostMessage::RegisterMenuActionGroup, group).await
    }

    /// Type of the editor that currently has focus.
    pub async fn get_editor_type(&self) -> Result<Value> {
        self.send(HostMessage::GetEditorType, Value::Null).await
    }

    /// Replace the element `id` with `element`.
    pub async fn replace_element_by_id(&self, id: &str, element: &str) -> Result<Value> {
        self.send(
            HostMessage::ReplaceElementById,
            json!({ "id": id, "element": element }),
        )
        .await
    }

    pub async fn delete_element_by_id(&self, id: &str) -> Result<Value> {
        self.send(HostMessage::DeleteElementById, json!({ "id": id }))
            .await
    }

    /// HTML of the element `id`.
    pub async fn get_html_by_id(&self, id: &str) -> Result<Value> {
        self.send(HostMessage::GetHtmlById, json!({ "id": id })).await
    }

    /// HTML of every element matching `selector`.
    pub async fn get_html_by_selector(&self, selector: &str) -> Result<Value> {
        self.send(
            HostMessage::GetHtmlBySelector,
            json!({ "selector": selector }),
        )
        .await
    }

    /// All categories, each with id, name and pid.
    pub async fn get_categories(&self) -> Result<Value> {
        self.send(HostMessage::GetCategories, Value::Null).await
    }

    pub async fn get_parent_categories(&self, category: Value) -> Result<Value> {
        self.send(HostMessage::GetParentCategories, category).await
    }

    /// Ids of the parents of `id` that match `selector`.
    pub async fn get_parent_ids(&self, id: &str, selector: &str) -> Result<Value> {
        self.send(
            HostMessage::GetParentIds,
            json!({ "id": id, "selector": selector }),
        )
        .await
    }

    pub async fn get_tag_types(&self) -> Result<Value> {
        self.send(HostMessage::GetTagTypes, Value::Null).await
    }

    pub async fn get_tag_type(&self, id: &str) -> Result<Value> {
        self.send(HostMessage::GetTagType, json!({ "id": id })).await
    }

    /// Clear the editor contents.
    pub async fn clear(&self) -> Result<Value> {
        self.send(HostMessage::Clear, Value::Null).await
    }

    /// Insert a string; resolves with the id of the new element if it has one.
    pub async fn insert_string(&self, string: &str) -> Result<Value> {
        self.send(HostMessage::InsertString, json!({ "string": string }))
            .await
    }

    /// Insert an element; resolves with the id of the new element.
    ///
    /// Only the outer HTML is transferred. The host gives the element the `dp-app-element`
    /// class and a unique id when it has none.
    pub async fn insert_element<E>(&self, element: &E, options: InsertOptions) -> Result<Value>
    where
        E: Markup + ?Sized,
    {
        self.send(
            HostMessage::InsertElement,
            json!({ "element": element.outer_html(), "select": options.select }),
        )
        .await
    }

    pub async fn remove_classes(&self, id: &str, classes: &[String]) -> Result<Value> {
        self.send(
            HostMessage::RemoveClasses,
            json!({ "id": id, "classes": classes }),
        )
        .await
    }

    pub async fn add_classes(&self, id: &str, classes: &[String]) -> Result<Value> {
        self.send(
            HostMessage::AddClasses,
            json!({ "id": id, "classes": classes }),
        )
        .await
    }

    /// Mark an element as currently selected.
    pub async fn mark_as_active(&self, id: &str) -> Result<Value> {
        self.send(HostMessage::MarkAsActive, json!({ "id": id })).await
    }

    pub async fn set_attribute_by_id(&self, id: &str, attribute: &str, value: &str) -> Result<Value> {
        self.send(
            HostMessage::SetAttributeById,
            json!({ "id": id, "attribute": attribute, "value": value }),
        )
        .await
    }

    pub async fn set_style_by_id(&self, id: &str, attribute: &str, value: &str) -> Result<Value> {
        self.send(
            HostMessage::SetStyleById,
            json!({ "id": id, "attribute": attribute, "value": value }),
        )
        .await
    }

    /// Initialize pre-registered menus, e.g. `simplePluginMenu`, `editContext`,
    /// `deleteButton`, `floatButtons`.
    pub async fn init_menu(&self, menus: &[String]) -> Result<Value> {
        self.send(HostMessage::InitMenu, json!({ "menus": menus }))
            .await
    }

    /// Open the plugin editor for element `id`. The host's answer is discarded.
    pub async fn open_plugin_element_editor(&self, id: &str) -> Result<()> {
        self.send(HostMessage::OpenElementEditor, json!({ "id": id }))
            .await
            .map(|_| ())
    }

    pub async fn get_total_word_count(&self) -> Result<Value> {
        self.send(HostMessage::TotalWordCount, Value::Null).await
    }

    pub async fn get_total_char_count(&self) -> Result<Value> {
        self.send(HostMessage::TotalCharCount, Value::Null).await
    }

    pub async fn update_asset_data(&self, data: Value) -> Result<Value> {
        self.send(HostMessage::UpdateAssetMedia, data).await
    }

    pub async fn get_asset_data(&self, asset_id: Value) -> Result<Value> {
        self.send(HostMessage::GetAssetData, asset_id).await
    }

    pub async fn update_asset_option(&self, data: Value) -> Result<Value> {
        self.send(HostMessage::UpdateAssetOption, data).await
    }

    /// Insert `markup` as an embedded asset, or update the selected one.
    ///
    /// With a plugin element selected the existing container is replaced in place, provided
    /// `data.asset_source` names this app; otherwise the user sees an error and nothing is sent.
    /// Without a selection a new embedded object of `data.embedded_type_id` is created first.
    /// The asset update is sent only after the insertion has completed.
    pub async fn insert_embedded_asset(
        &self,
        markup: &str,
        mut data: EmbeddedAssetData,
    ) -> Result<EmbeddedAssetOutcome> {
        let selected = self.selection.current();

        if selected.is_some() {
            let app_name = self.host.app_name();
            if data.asset_source.as_deref() != Some(app_name.as_str()) {
                let message = format!(
                    "Can't update selected plugin element since it doesn't belong to the '{app_name}' plugin"
                );
                warn!(app = %app_name, source = ?data.asset_source, "refusing to update foreign plugin element");
                self.host.show_error_msg(&message);
                return Ok(EmbeddedAssetOutcome::Rejected { message });
            }
        }

        let replaced = selected.is_some();
        let article_scoped_id = match &selected {
            Some(descriptor) => descriptor
                .article_scoped_id()
                .cloned()
                .ok_or(DomainError::MissingArticleScopedId)?,
            None => {
                let embedded_type_id = data
                    .embedded_type_id
                    .clone()
                    .ok_or(DomainError::MissingEmbeddedType)?;
                self.host
                    .create_embedded_object(&embedded_type_id)
                    .await
                    .with_context(|| format!("failed to create embedded object of type '{embedded_type_id}'"))?
            }
        };

        data.internal_id = Some(article_scoped_id.clone());
        let container = AssetContainer::build(&article_scoped_id, &data, markup);
        if replaced {
            self.replace_element_by_id(&element_id_for(&article_scoped_id), &container.outer_html())
                .await
                .context("failed to replace embedded asset element")?;
        } else {
            self.insert_element(&container, InsertOptions::selected())
                .await
                .context("failed to insert embedded asset element")?;
        }

        let payload = serde_json::to_value(&data).context("failed to serialize embedded asset data")?;
        let response = self.send(HostMessage::UpdateEmbeddedAsset, payload).await?;
        debug!(id = %article_scoped_id, replaced, "embedded asset stored");

        Ok(EmbeddedAssetOutcome::Embedded {
            article_scoped_id,
            replaced,
            response,
        })
    }
}

/// Feed `event` from the host into `selection`.
///
/// A payload that cannot be read at all clears the selection, so later edits never land on a
/// previously selected element.
fn listen(host: &dyn PluginHost, event: &'static str, selection: &Arc<SelectionTracker>) {
    let tracker = Arc::clone(selection);
    host.on(
        event,
        Arc::new(move |payload: Value| match HostEvent::from_wire(event, payload) {
            Ok(Some(decoded)) => tracker.apply(decoded),
            Ok(None) => {}
            Err(err) => {
                warn!(%err, event, "unreadable plugin element event, clearing selection");
                tracker.deselect();
            }
        }),
    );
}
