//! Custom tags and their handlers.
//!
//! A custom tag is an element whose replacement is chosen by host code rather
//! than named directly in markup. When the resolver meets a registered tag it
//! calls the tag's [`TagHandler`] with the current options, the element's
//! attributes, and its inner markup. The handler answers with a
//! [`TagExpansion`]: the component file to merge in place of the element and
//! the options to expand that file with.
//!
//! ```rust
//! use stitch::tags::{handler_fn, TagExpansion, TagRegistry};
//!
//! let registry = TagRegistry::new();
//! registry.register("user-card", handler_fn(|_options, attributes, _inner| async move {
//!     let id = attributes.get("user").cloned().unwrap_or_default();
//!     Ok(TagExpansion::new("components/user_card.html", serde_json::json!({ "id": id })))
//! }));
//! assert_eq!(registry.names(), vec!["user-card"]);
//! ```
//!
//! # Ordering
//!
//! Tags resolve in registration order. Re-registering a tag replaces its
//! handler but keeps its position; unregistering leaves the others in order.

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

/// Attributes of a custom-tag element, in authored order.
pub type Attributes = IndexMap<String, String>;

/// Outcome of a custom-tag handler.
#[derive(Debug, Clone, PartialEq)]
pub struct TagExpansion {
    /// Component file to merge, relative to the content file's directory.
    pub component: String,
    /// Options used to expand the component file.
    pub options: Value,
}

impl TagExpansion {
    /// Creates an expansion.
    pub fn new(component: impl Into<String>, options: Value) -> Self {
        Self {
            component: component.into(),
            options,
        }
    }
}

/// Resolves a custom-tag element to a component file.
#[async_trait]
pub trait TagHandler: Send + Sync {
    /// Chooses the component and options for one element.
    ///
    /// Errors abort the render and surface as
    /// [`ComposeError::Handler`](crate::ComposeError::Handler).
    async fn expand(
        &self,
        options: &Value,
        attributes: &Attributes,
        inner_html: &str,
    ) -> anyhow::Result<TagExpansion>;
}

/// Handler backed by an async closure. Created by [`handler_fn`].
pub struct FnHandler<F>(F);

/// Wraps an async closure taking owned `(options, attributes, inner_html)` as a handler.
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value, Attributes, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<TagExpansion>> + Send + 'static,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> TagHandler for FnHandler<F>
where
    F: Fn(Value, Attributes, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<TagExpansion>> + Send + 'static,
{
    async fn expand(
        &self,
        options: &Value,
        attributes: &Attributes,
        inner_html: &str,
    ) -> anyhow::Result<TagExpansion> {
        (self.0)(options.clone(), attributes.clone(), inner_html.to_string()).await
    }
}

/// Handler that always merges the same component.
///
/// The component is expanded with the element's attributes and an `inner`
/// key holding its inner markup, layered over the caller's options when those
/// are an object.
#[derive(Debug, Clone)]
pub struct ComponentTag {
    component: String,
}

impl ComponentTag {
    /// Creates a handler that always resolves to `component`.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

#[async_trait]
impl TagHandler for ComponentTag {
    async fn expand(
        &self,
        options: &Value,
        attributes: &Attributes,
        inner_html: &str,
    ) -> anyhow::Result<TagExpansion> {
        let mut scope = match options {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        for (name, value) in attributes {
            scope.insert(name.clone(), Value::String(value.clone()));
        }
        scope.insert("inner".to_string(), Value::String(inner_html.to_string()));
        Ok(TagExpansion::new(self.component.clone(), Value::Object(scope)))
    }
}

/// Ordered, shareable mapping from tag name to handler.
///
/// Tag names are stored lowercase, matching how the HTML parser reports
/// element names. Methods take `&self`, so a registry owned by a composer can
/// be updated while the composer is shared.
#[derive(Default)]
pub struct TagRegistry {
    handlers: RwLock<IndexMap<String, Arc<dyn TagHandler>>>,
}

impl TagRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `tag`, replacing any previous handler.
    ///
    /// Returns `true` if a handler was replaced.
    pub fn register(&self, tag: impl AsRef<str>, handler: impl TagHandler + 'static) -> bool {
        self.register_shared(tag, Arc::new(handler))
    }

    /// Registers an already shared handler.
    pub fn register_shared(&self, tag: impl AsRef<str>, handler: Arc<dyn TagHandler>) -> bool {
        self.write()
            .insert(tag.as_ref().to_ascii_lowercase(), handler)
            .is_some()
    }

    /// Removes the handler for `tag`. Returns `true` if one was registered.
    pub fn unregister(&self, tag: impl AsRef<str>) -> bool {
        self.write()
            .shift_remove(&tag.as_ref().to_ascii_lowercase())
            .is_some()
    }

    /// Whether a handler is registered for `tag`.
    pub fn contains(&self, tag: impl AsRef<str>) -> bool {
        self.read()
            .contains_key(&tag.as_ref().to_ascii_lowercase())
    }

    /// Registered tag names in resolution order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copies the current handlers, in order.
    ///
    /// The resolver works from a snapshot so the lock is never held across an
    /// await; changes made mid-render apply from the next pass.
    pub fn snapshot(&self) -> Vec<(String, Arc<dyn TagHandler>)> {
        self.read()
            .iter()
            .map(|(name, handler)| (name.clone(), Arc::clone(handler)))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Arc<dyn TagHandler>>> {
        self.handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Arc<dyn TagHandler>>> {
        self.handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed(component: &'static str) -> impl TagHandler {
        handler_fn(move |_, _, _| async move { Ok(TagExpansion::new(component, Value::Null)) })
    }

    #[test]
    fn test_register_keeps_order() {
        let registry = TagRegistry::new();
        registry.register("alpha", fixed("a.html"));
        registry.register("beta", fixed("b.html"));
        registry.register("gamma", fixed("c.html"));
        assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let registry = TagRegistry::new();
        registry.register("alpha", fixed("a.html"));
        registry.register("beta", fixed("b.html"));
        assert!(registry.register("alpha", fixed("z.html")));
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister() {
        let registry = TagRegistry::new();
        registry.register("alpha", fixed("a.html"));
        registry.register("beta", fixed("b.html"));
        registry.register("gamma", fixed("c.html"));

        assert!(registry.unregister("beta"));
        assert!(!registry.unregister("beta"));
        assert_eq!(registry.names(), vec!["alpha", "gamma"]);
        assert!(!registry.contains("beta"));
    }

    #[test]
    fn test_names_are_lowercased() {
        let registry = TagRegistry::new();
        registry.register("Site-Nav", fixed("nav.html"));
        assert!(registry.contains("site-nav"));
        assert!(registry.contains("SITE-NAV"));
        assert_eq!(registry.names(), vec!["site-nav"]);
    }

    #[tokio::test]
    async fn test_handler_fn_receives_arguments() {
        let handler = handler_fn(|options: Value, attributes: Attributes, inner: String| async move {
            Ok(TagExpansion::new(
                format!("{}.html", attributes["kind"]),
                json!({ "n": options["n"], "inner": inner }),
            ))
        });

        let mut attributes = Attributes::new();
        attributes.insert("kind".into(), "badge".into());

        let expansion = handler
            .expand(&json!({"n": 7}), &attributes, "<b>x</b>")
            .await
            .unwrap();
        assert_eq!(expansion.component, "badge.html");
        assert_eq!(expansion.options, json!({"n": 7, "inner": "<b>x</b>"}));
    }

    #[tokio::test]
    async fn test_component_tag_layers_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("title".into(), "Hi".into());

        let expansion = ComponentTag::new("card.html")
            .expand(&json!({"title": "page", "site": "S"}), &attributes, "body")
            .await
            .unwrap();
        assert_eq!(expansion.component, "card.html");
        assert_eq!(
            expansion.options,
            json!({"title": "Hi", "site": "S", "inner": "body"})
        );
    }
}
