//! Configuration of a template-directory run.
//! [`Config`] is the runtime input of [`crate::dirtemplate::DirTemplate`];
//! [`TemplateConfig`] is its on-disk form (JSON or YAML).

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::functions::FunctionTable;

/// Default left delimiter of template placeholders.
pub const DEFAULT_LEFT_DELIMITER: &str = "{{";
/// Default right delimiter of template placeholders.
pub const DEFAULT_RIGHT_DELIMITER: &str = "}}";

/// Everything a single execution needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Template tree (a directory or a single file). Must exist.
    pub source: PathBuf,
    /// Where the tree is generated. Must not exist.
    pub destination: PathBuf,
    /// Left placeholder delimiter, `{{` when empty.
    pub left_delimiter: String,
    /// Right placeholder delimiter, `}}` when empty.
    pub right_delimiter: String,
    /// Data every template is rendered against.
    pub data: serde_json::Value,
    pub functions: FunctionTable,
    /// Paths relative to the source root that are copied but never rendered.
    pub skip_paths: Vec<String>,
    /// Relative path templates mapped to the relative path templates they are
    /// moved to. Rules are independent; no rule may rely on another rule
    /// having been applied first.
    pub rename_paths: HashMap<String, String>,
    /// Render undefined variables as empty strings instead of failing.
    pub lenient: bool,
}

impl Config {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(source: P, destination: Q) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            left_delimiter: String::new(),
            right_delimiter: String::new(),
            data: serde_json::Value::Object(serde_json::Map::new()),
            functions: FunctionTable::new(),
            skip_paths: Vec::new(),
            rename_paths: HashMap::new(),
            lenient: false,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_delimiters<L: Into<String>, R: Into<String>>(mut self, left: L, right: R) -> Self {
        self.left_delimiter = left.into();
        self.right_delimiter = right.into();
        self
    }

    pub fn with_functions(mut self, functions: FunctionTable) -> Self {
        self.functions = functions;
        self
    }

    pub fn skip<S: Into<String>>(mut self, path: S) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    pub fn rename<K: Into<String>, V: Into<String>>(mut self, from: K, to: V) -> Self {
        self.rename_paths.insert(from.into(), to.into());
        self
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Delimiters in effect, falling back to the defaults when empty.
    pub fn delimiters(&self) -> (&str, &str) {
        let left = if self.left_delimiter.is_empty() {
            DEFAULT_LEFT_DELIMITER
        } else {
            &self.left_delimiter
        };
        let right = if self.right_delimiter.is_empty() {
            DEFAULT_RIGHT_DELIMITER
        } else {
            &self.right_delimiter
        };
        (left, right)
    }

    /// Applies the settings of a configuration file on top of this config.
    /// Data objects are merged shallowly with keys already present winning.
    pub fn merge_file(mut self, file: TemplateConfig) -> Self {
        if self.left_delimiter.is_empty() {
            self.left_delimiter = file.left_delimiter;
        }
        if self.right_delimiter.is_empty() {
            self.right_delimiter = file.right_delimiter;
        }
        self.lenient |= file.lenient;
        self.skip_paths.extend(file.skip_paths);
        for (from, to) in file.rename_paths {
            self.rename_paths.entry(from).or_insert(to);
        }
        self.data = merge_data(file.data, self.data);
        self
    }
}

/// Shallow merge of two data objects, `overrides` wins on conflicting keys.
/// A non-object value on either side replaces the base unless it is null.
pub fn merge_data(base: serde_json::Value, overrides: serde_json::Value) -> serde_json::Value {
    match (base, overrides) {
        (serde_json::Value::Object(mut base), serde_json::Value::Object(overrides)) => {
            base.extend(overrides);
            serde_json::Value::Object(base)
        }
        (base, serde_json::Value::Null) => base,
        (_, overrides) => overrides,
    }
}

/// On-disk description of a template run.
///
/// # Example
/// ```yaml
/// left_delimiter: "[["
/// right_delimiter: "]]"
/// skip_paths:
///   - assets/logo.png
/// rename_paths:
///   "cmd/[[ name ]].rs": "cmd/[[ name ]]_main.rs"
/// data:
///   name: billing
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub left_delimiter: String,
    pub right_delimiter: String,
    pub lenient: bool,
    pub skip_paths: Vec<String>,
    pub rename_paths: IndexMap<String, String>,
    pub data: serde_json::Value,
}

/// Parses configuration content, trying JSON first and YAML second.
pub fn parse_config(content: &str) -> Result<TemplateConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Reads and parses a configuration file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TemplateConfig> {
    let config_path = config_path.as_ref();
    if !config_path.is_file() {
        return Err(Error::ConfigError(format!(
            "Invalid configuration path: {}",
            config_path.display()
        )));
    }

    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(config_path)
        .map_err(Error::io("read configuration file", config_path))?;
    parse_config(&content)
}
