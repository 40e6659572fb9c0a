//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(
        "selected plugin element: expected article-scoped id not found (tried reading from attribute 'data-internal-id')"
    )]
    MissingArticleScopedId,
    #[error("no element is selected and the asset data names no embedded type to create")]
    MissingEmbeddedType,
}
