//! Validation module

pub mod patch;
pub mod settings;

pub use patch::validate_patch;
pub use settings::{sanitize_custom_css, validate_settings, ValidationReport};
