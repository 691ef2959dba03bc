//! Core data models for page-aware content filtering

pub mod page;
pub mod settings;
pub mod preset;
pub mod patch;
pub mod message;

pub use page::*;
pub use settings::*;
pub use preset::*;
pub use patch::*;
pub use message::*;
