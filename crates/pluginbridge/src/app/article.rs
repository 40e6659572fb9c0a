//! Article facade: metadata and content of the article being edited.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::app::messages::HostMessage;
use crate::infra::host::{EventListener, HostTransport};

const PANE_CLOSE_EVENT_PREFIX: &str = "editor-pane-close-";

/// Reads and writes article metadata through the host.
pub struct ArticleFacade {
    host: Arc<dyn HostTransport>,
}

impl ArticleFacade {
    pub fn new(host: Arc<dyn HostTransport>) -> Self {
        Self { host }
    }

    async fn send(&self, message: HostMessage, payload: Value) -> Result<Value> {
        debug_assert!(
            message.shape().matches(&payload),
            "payload for {message} does not match {}",
            message.shape().describe()
        );
        debug!(%message, "article request");
        trace!(%payload, "article request payload");
        self.host.request(message.as_str(), payload).await
    }

    /// Start the app `name` with the given options.
    pub async fn start_app(&self, name: &str, options: Value) -> Result<Value> {
        self.send(HostMessage::AppStart, json!({ "app": name, "option": options }))
            .await
    }

    pub async fn stop_app(&self, name: &str) -> Result<Value> {
        self.send(HostMessage::AppStop, json!({ "app": name })).await
    }

    /// Id of the article currently edited.
    pub async fn get_id(&self) -> Result<Value> {
        self.send(HostMessage::ArticleIdGet, Value::Null).await
    }

    /// Clear the meta information summary.
    pub async fn clear_meta_info(&self) -> Result<Value> {
        self.send(HostMessage::MetaInfoClear, Value::Null).await
    }

    pub async fn get_tags(&self) -> Result<Value> {
        self.send(HostMessage::TagsGet, Value::Null).await
    }

    pub async fn set_tags(&self, tags: Value) -> Result<Value> {
        self.send(HostMessage::TagsSet, json!({ "tags": tags })).await
    }

    pub async fn add_tag(&self, tag: Value) -> Result<Value> {
        self.send(HostMessage::TagsAdd, json!({ "tag": tag })).await
    }

    pub async fn remove_tag(&self, tag: Value) -> Result<Value> {
        self.send(HostMessage::TagsRemove, json!({ "tag": tag })).await
    }

    pub async fn get_selected_categories(&self) -> Result<Value> {
        self.send(HostMessage::SelectedCategoriesGet, Value::Null)
            .await
    }

    /// Persist the categories currently selected in the UI.
    ///
    /// Two round-trips; changes made in the UI between them are not guarded against.
    pub async fn save_categories(&self) -> Result<Value> {
        let categories = self
            .get_selected_categories()
            .await
            .context("failed to read selected categories")?;
        self.set_categories(categories).await
    }

    /// Set the selected categories to the given list of category ids.
    pub async fn set_categories(&self, categories: Value) -> Result<Value> {
        self.send(
            HostMessage::SelectedCategoriesSet,
            json!({ "categories": categories }),
        )
        .await
    }

    pub async fn add_categories(&self, categories: Value) -> Result<Value> {
        self.send(
            HostMessage::CategoriesAdd,
            json!({ "categories": categories }),
        )
        .await
    }

    pub async fn remove_categories(&self, categories: Value) -> Result<Value> {
        self.send(
            HostMessage::CategoriesRemove,
            json!({ "categories": categories }),
        )
        .await
    }

    pub async fn set_main_category(&self, category: Value) -> Result<Value> {
        self.send(
            HostMessage::MainCategorySet,
            json!({ "category": category }),
        )
        .await
    }

    pub async fn get_source(&self) -> Result<Value> {
        self.send(HostMessage::SourceGet, Value::Null).await
    }

    pub async fn set_source(&self, source: &str) -> Result<Value> {
        self.send(HostMessage::SourceSet, json!({ "source": source }))
            .await
    }

    pub async fn get_status(&self) -> Result<Value> {
        self.send(HostMessage::StatusGet, Value::Null).await
    }

    /// Set the status: `draft`, `waiting` or `published`.
    pub async fn set_status(&self, status: &str) -> Result<Value> {
        self.send(HostMessage::StatusSet, json!({ "status": status }))
            .await
    }

    /// Published date of the article.
    ///
    /// Older plugin code reached this through a second `getStatus`; it is its own operation here.
    pub async fn get_published_datetime(&self) -> Result<Value> {
        self.send(HostMessage::PublishedGet, Value::Null).await
    }

    /// Set the published date, formatted `YYYY-MM-DD HH:MM:SS`.
    pub async fn set_published_datetime(&self, published: &str) -> Result<Value> {
        self.send(
            HostMessage::PublishedSet,
            json!({ "published": published }),
        )
        .await
    }

    pub async fn get_authors(&self) -> Result<Value> {
        self.send(HostMessage::AuthorsGet, Value::Null).await
    }

    pub async fn set_authors(&self, authors: Value) -> Result<Value> {
        self.send(HostMessage::AuthorsSet, json!({ "authors": authors }))
            .await
    }

    pub async fn add_authors(&self, authors: Value) -> Result<Value> {
        self.send(HostMessage::AuthorsAdd, json!({ "authors": authors }))
            .await
    }

    pub async fn remove_authors(&self, authors: Value) -> Result<Value> {
        self.send(
            HostMessage::AuthorsRemove,
            json!({ "authors": authors }),
        )
        .await
    }

    pub async fn get_current_content(&self) -> Result<Value> {
        self.send(HostMessage::ContentGet, Value::Null).await
    }

    pub async fn set_current_content(&self, content: &str) -> Result<Value> {
        self.send(HostMessage::ContentSet, json!({ "content": content }))
            .await
    }

    pub async fn get_articletype_id(&self) -> Result<Value> {
        self.send(HostMessage::TypeGet, Value::Null).await
    }

    pub async fn set_articletype_id(&self, articletype_id: Value) -> Result<Value> {
        self.send(
            HostMessage::TypeSet,
            json!({ "articletype": articletype_id }),
        )
        .await
    }

    /// Maximize the app pane under `title`; `on_close` runs when the host closes it.
    ///
    /// The listener is registered before the request goes out, so a pane closed right away is
    /// still reported, and it is removed again if the host refuses to maximize. Resolves with the
    /// per-call close event name.
    pub async fn maximize_app_window(&self, title: &str, on_close: EventListener) -> Result<String> {
        let event = pane_close_event(OffsetDateTime::now_utc());
        self.host.remove_listeners(&event);
        self.host.on(&event, on_close);
        if let Err(err) = self
            .send(
                HostMessage::PaneMaximize,
                json!({ "title": title, "event": event }),
            )
            .await
        {
            self.host.remove_listeners(&event);
            return Err(err);
        }
        Ok(event)
    }

    pub async fn restore_app_window(&self) -> Result<Value> {
        self.send(HostMessage::RestoreAppWindow, json!({})).await
    }
}

fn pane_close_event(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!("{PANE_CLOSE_EVENT_PREFIX}{millis}")
}
