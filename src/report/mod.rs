//! Report generation

pub mod generator;

pub use generator::describe_message;

use crate::models::{Patch, SettingsModel};
use crate::validator::ValidationReport;
use anyhow::Result;

pub fn generate_report(settings: &SettingsModel, patch: &Patch, validation: &ValidationReport) -> Result<String> {
    generator::generate_markdown_report(settings, patch, validation)
}
