//! Searching YAML files and reporting matches.

pub mod engine;
pub mod output;

pub use engine::{find, FileError, FindOptions, Hit, Matches, QueryEngine};
pub use output::{format_hit, format_json, format_text};
