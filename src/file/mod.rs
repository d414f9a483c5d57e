//! File I/O for YAML documents.
//!
//! This module finds candidate YAML files below a directory and loads them
//! into structural node trees.

pub mod discovery;
pub mod loader;

pub use discovery::candidate_files;
pub use loader::{load_yaml_file, load_yaml_from_stdin, LoadError};
