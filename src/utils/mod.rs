//! Shared helpers

pub mod helpers;
pub mod url;

pub use helpers::{css_string_literal, js_string_literal};
pub use url::{is_host_domain, query_param, split_url, UrlParts};
