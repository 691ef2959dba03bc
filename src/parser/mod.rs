//! Parsing of settings files and export bundles

pub mod settings;

pub use settings::{
    export_bundle, import_bundle, parse_settings, parse_settings_from_file, parse_settings_from_str,
    SettingsBundle,
};
