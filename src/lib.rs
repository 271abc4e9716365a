//! dirtemplate renders a whole directory tree as a project template.
//! The tree is copied to a new destination, paths containing placeholders are
//! renamed and every file is rendered against a data context.

/// tar.gz archives of generated output
pub mod archive;

/// Command-line interface module for the dirtemplate binary
pub mod cli;

/// Runtime configuration and configuration files
/// Supports JSON and YAML formats
pub mod config;

/// Recursive copy preserving permission bits
pub mod copy;

/// Orchestration of the copy, rename and render phases
pub mod dirtemplate;

/// Error types and handling
pub mod error;

/// Functions exposed inside templates
pub mod functions;

/// Logger setup for the binary
pub mod logger;

/// Rename rules and skip paths
pub mod paths;

/// In-place rendering of a template tree
pub mod processor;

/// Template parsing and rendering functionality
pub mod renderer;

pub use config::Config;
pub use dirtemplate::DirTemplate;
pub use error::{Error, Result};
