//! YAML file loading functionality.
//!
//! This module provides functions to load YAML documents from files or
//! stdin, parsing them into `YamlNode` trees, one per document.

use crate::document::node::YamlNode;
use crate::document::parser::{parse_documents, ParseError};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a YAML file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Loads and parses a YAML file from the filesystem.
///
/// Returns one `Document` node per document in the file.
///
/// # Examples
///
/// ```no_run
/// use findyml::file::loader::load_yaml_file;
///
/// let documents = load_yaml_file("config.yml").unwrap();
/// println!("{} documents", documents.len());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read or is not valid UTF-8
/// - The file contents are not valid YAML
pub fn load_yaml_file<P: AsRef<Path>>(path: P) -> Result<Vec<YamlNode>, LoadError> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(parse_documents(&content)?)
}

/// Reads standard input until EOF.
///
/// The raw text is returned rather than parsed so callers can attribute
/// parse failures themselves.
///
/// # Errors
///
/// Returns an error if reading from stdin fails or the input is not valid
/// UTF-8.
pub fn load_yaml_from_stdin() -> Result<String, LoadError> {
    use std::io::Read;

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
