//! Command-line front end

pub mod interactive;

pub use interactive::run_interactive_mode;
