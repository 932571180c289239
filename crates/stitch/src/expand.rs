//! Template expansion abstraction.
//!
//! Every file the composer reads (content page, page template, component) is
//! first run through a [`TemplateExpander`], which substitutes variables from
//! the render options into the raw text. Only then is the result parsed as
//! HTML, so expressions may appear anywhere, including inside attribute values
//! and tag names.
//!
//! The default implementation is [`MiniJinjaExpander`].

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::{Map, Value};

/// Name under which the whole options value is exposed to templates.
pub const THIS_VAR: &str = "this";

/// Error returned by a [`TemplateExpander`].
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// The template text is malformed.
    #[error("template syntax error: {0}")]
    Syntax(#[source] minijinja::Error),

    /// The template is well-formed but could not be evaluated.
    #[error("template evaluation failed: {0}")]
    Evaluation(#[source] minijinja::Error),

    /// Failure reported by a custom expander.
    #[error("{0}")]
    Custom(String),
}

impl ExpandError {
    /// Create an error for expanders that are not backed by MiniJinja.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

impl From<minijinja::Error> for ExpandError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => ExpandError::Syntax(err),
            _ => ExpandError::Evaluation(err),
        }
    }
}

/// Substitutes render options into raw file text.
///
/// Implementations must not mutate `options`, and must be usable from several
/// renders at once.
pub trait TemplateExpander: Send + Sync {
    /// Expands `source` with `options` and returns the resulting text.
    fn expand(&self, source: &str, options: &Value) -> Result<String, ExpandError>;
}

/// MiniJinja-based expander.
///
/// - `{{ name }}` output is HTML-escaped
/// - Undefined variables render as empty text
/// - Object options expose each key as a top-level variable
/// - The whole options value is always available as `this`, which is the only
///   way to reach a non-object value such as a string returned by a custom tag
///
/// Keys that are not identifiers, such as `for-test`, parse as expressions
/// (`for - test`). Look them up through `this` instead: `{{ this["for-test"] }}`.
///
/// ```rust
/// use stitch::{MiniJinjaExpander, TemplateExpander};
/// use serde_json::json;
///
/// let expander = MiniJinjaExpander::new();
/// let out = expander
///     .expand("{{ a }} {{ b }} {{ c }}", &json!({"a": 1, "b": 2, "c": 3}))
///     .unwrap();
/// assert_eq!(out, "1 2 3");
///
/// let out = expander.expand("<p>{{ this }}</p>", &json!("plain")).unwrap();
/// assert_eq!(out, "<p>plain</p>");
/// ```
pub struct MiniJinjaExpander {
    env: Environment<'static>,
}

impl MiniJinjaExpander {
    /// Creates an expander with HTML auto-escaping and lenient undefined handling.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Use this to register filters or functions shared by every page.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateExpander for MiniJinjaExpander {
    fn expand(&self, source: &str, options: &Value) -> Result<String, ExpandError> {
        Ok(self.env.render_str(source, expansion_context(options))?)
    }
}

/// Builds the variable scope for one expansion.
fn expansion_context(options: &Value) -> Value {
    let mut scope = match options {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    scope
        .entry(THIS_VAR)
        .or_insert_with(|| options.clone());
    Value::Object(scope)
}

/// Expander that returns its input unchanged.
///
/// Useful for static sites whose fragments contain literal `{{` sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughExpander;

impl TemplateExpander for PassthroughExpander {
    fn expand(&self, source: &str, _options: &Value) -> Result<String, ExpandError> {
        Ok(source.to_string())
    }
}
