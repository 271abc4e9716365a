//! Caller-supplied functions exposed inside templates.

use cruet::Inflector;
use minijinja::Value;
use std::collections::BTreeMap;

/// Named callables made available to every template render.
///
/// The table is passed explicitly through [`crate::config::Config`]; nothing
/// is registered process-wide.
///
/// ```
/// use dirtemplate::functions::FunctionTable;
/// use minijinja::Value;
///
/// let mut functions = FunctionTable::new();
/// functions.insert("shout", Value::from_function(|s: String| s.to_uppercase()));
/// assert!(functions.contains("shout"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, Value>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Casing helpers: `snake_case`, `camel_case`, `pascal_case`,
    /// `kebab_case`, `screaming_snake_case` and `title_case`.
    pub fn with_case_helpers() -> Self {
        let mut table = Self::new();
        table.insert("snake_case", Value::from_function(|s: String| s.as_str().to_snake_case()));
        table.insert("camel_case", Value::from_function(|s: String| s.as_str().to_camel_case()));
        table.insert("pascal_case", Value::from_function(|s: String| s.as_str().to_pascal_case()));
        table.insert("kebab_case", Value::from_function(|s: String| s.as_str().to_kebab_case()));
        table.insert(
            "screaming_snake_case",
            Value::from_function(|s: String| s.as_str().to_screaming_snake_case()),
        );
        table.insert("title_case", Value::from_function(|s: String| s.as_str().to_title_case()));
        table
    }

    /// Registers `function` under `name`, returning the previous entry if any.
    pub fn insert<N: Into<String>>(&mut self, name: N, function: Value) -> Option<Value> {
        self.functions.insert(name.into(), function)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.functions.iter().map(|(name, function)| (name.as_str(), function))
    }
}
