//! Host application seams.
//!
//! The surrounding content editor owns the request/response transport and the event bus. The
//! facades only ever see these traits.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::model::HostId;

/// Callback invoked with the payload of a host event.
pub type EventListener = Arc<dyn Fn(Value) + Send + Sync>;

/// Generic request primitive and event bus supplied by the host.
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Send `payload` under the named message and resolve with whatever the host answers.
    ///
    /// There is no timeout or cancellation at this layer.
    async fn request(&self, message: &str, payload: Value) -> Result<Value>;

    /// Register a listener for a host event.
    fn on(&self, event: &str, listener: EventListener);

    /// Drop every listener registered for `event`.
    fn remove_listeners(&self, event: &str);
}

/// Extra primitives the editor host offers to plugins.
#[async_trait]
pub trait PluginHost: HostTransport {
    /// Name the host knows the calling plugin by.
    fn app_name(&self) -> String;

    /// Create an embedded object of the given type on the article and resolve with its
    /// article-scoped id, in whatever JSON form the host mints it.
    async fn create_embedded_object(&self, embedded_type_id: &HostId) -> Result<HostId>;

    /// Show an error message to the user.
    fn show_error_msg(&self, message: &str);
}
