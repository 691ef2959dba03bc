//! Typed failures of the injection pipeline

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    /// The host page has not built the element a patch hangs off yet.
    #[error("expected document anchor `{0}` is missing")]
    MissingAnchor(&'static str),

    #[error("browser context has been torn down")]
    Detached,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// A single settings validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct SettingsError {
    pub field: String,
    pub message: String,
}

impl SettingsError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
