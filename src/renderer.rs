//! Template rendering for file contents and path rules.
//! Wraps a MiniJinja environment configured with the run's delimiters and
//! function table.
use crate::config::Config;
use crate::error::{Error, Result};
use crate::functions::FunctionTable;
use log::debug;
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Renders a template that came from a named source such as a file.
    /// The name only improves error reporting.
    fn render_named(
        &self,
        _name: &str,
        template: &str,
        context: &serde_json::Value,
    ) -> Result<String> {
        self.render(template, context)
    }
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with default `{{ }}` delimiters and no functions.
    pub fn new() -> Self {
        Self { env: base_environment() }
    }

    /// Creates a renderer using custom variable delimiters, a function table
    /// and the given undefined-variable policy.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the delimiters are rejected by the engine
    pub fn with_options(
        left: &str,
        right: &str,
        functions: &FunctionTable,
        lenient: bool,
    ) -> Result<Self> {
        let mut env = base_environment();
        let syntax = SyntaxConfig::builder()
            .block_delimiters("{%", "%}")
            .variable_delimiters(left.to_string(), right.to_string())
            .comment_delimiters("{#", "#}")
            .build()?;
        env.set_syntax(syntax);
        if lenient {
            env.set_undefined_behavior(UndefinedBehavior::Lenient);
        }
        if !functions.is_empty() {
            debug!("Registering {} template function(s)", functions.len());
        }
        for (name, function) in functions.iter() {
            env.add_global(name.to_string(), function.clone());
        }
        Ok(Self { env })
    }

    /// Creates the renderer described by a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let (left, right) = config.delimiters();
        Self::with_options(left, right, &config.functions, config.lenient)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if parsing or rendering fails
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }

    fn render_named(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_named_str(name, template, context).map_err(Error::MinijinjaError)
    }
}
