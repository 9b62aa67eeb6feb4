//! Validation errors raised by core types

use thiserror::Error;

use crate::catalog::ModelKind;

/// Errors produced while parsing or validating core values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Model is not part of the catalog for this kind
    #[error("unsupported {kind} model: {model}")]
    UnsupportedModel { kind: ModelKind, model: String },

    /// Size string could not be interpreted
    #[error("invalid image size: {0:?}")]
    InvalidSize(String),

    /// Chat role outside system/user/assistant
    #[error("invalid message role: {0:?}")]
    InvalidRole(String),

    /// Embedding encoding outside float/base64
    #[error("invalid encoding format: {0:?}")]
    InvalidEncodingFormat(String),

    /// Unknown message template name
    #[error("invalid message template: {0:?}")]
    InvalidTemplate(String),
}
