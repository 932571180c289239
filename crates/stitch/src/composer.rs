//! The page composer.
//!
//! [`Composer`] drives a full render:
//!
//! 1. read, expand, and parse the content file;
//! 2. pick the template: the content's `<html pogon-template="…">` value, or
//!    the configured default, resolved against the content file's directory;
//! 3. read, expand, and parse the template with the same options;
//! 4. merge the content into the template's first `<pogon_outlet>` and drop
//!    any others; a template with no outlet fails with
//!    [`ComposeError::MissingOutlet`] rather than rendering without the page;
//! 5. resolve component and custom-tag outlets;
//! 6. apply form default markers;
//! 7. serialize, optionally wrapped in an [`Introspection`] record.
//!
//! # Example
//!
//! ```rust
//! use stitch::{Composer, MemoryLoader};
//! use serde_json::json;
//!
//! let loader = MemoryLoader::new()
//!     .with_file("site/template.html",
//!         "<html><head><title>Site</title></head><body><pogon_outlet></pogon_outlet></body></html>")
//!     .with_file("site/index.html", "<h1>Hello, {{ name }}</h1>");
//!
//! let composer = Composer::new().with_loader(loader);
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let page = runtime
//!     .block_on(composer.render("site/index.html", &json!({"name": "World"})))
//!     .unwrap();
//!
//! assert_eq!(
//!     page.markup(),
//!     "<html><head><title>Site</title></head><body><h1>Hello, World</h1></body></html>"
//! );
//! ```
//!
//! # Concurrency
//!
//! A composer is shared by reference between renders; each render owns its
//! documents. The futures returned by the render methods are not `Send`,
//! because document trees are reference counted, so drive them with
//! `block_on`, a current-thread runtime, or a `LocalSet`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use stitch_dom::Document;
use tracing::{debug, instrument};

use crate::config::{ComposerConfig, OutputMode};
use crate::context::{content_dir, Introspection, RenderContext};
use crate::error::ComposeError;
use crate::expand::{MiniJinjaExpander, TemplateExpander};
use crate::markup::{OUTLET_TAG, TEMPLATE_ATTR};
use crate::merge::merge;
use crate::normalize::normalize_form_defaults;
use crate::resolve::resolve_outlets;
use crate::source::{Fragments, FsLoader, SourceLoader};
use crate::tags::{TagHandler, TagRegistry};

/// Result of a render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// The composed page.
    Markup(String),
    /// A description of the render, produced in [`OutputMode::Introspect`].
    Introspection(Introspection),
}

impl RenderOutput {
    /// The composed page markup, whichever variant this is.
    pub fn markup(&self) -> &str {
        match self {
            RenderOutput::Markup(markup) => markup,
            RenderOutput::Introspection(record) => &record.markup,
        }
    }

    /// Returns the introspection record, if this is one.
    pub fn introspection(&self) -> Option<&Introspection> {
        match self {
            RenderOutput::Introspection(record) => Some(record),
            RenderOutput::Markup(_) => None,
        }
    }

    /// Converts into the text a host sends back: the markup, or the record as JSON.
    pub fn into_string(self) -> Result<String, ComposeError> {
        match self {
            RenderOutput::Markup(markup) => Ok(markup),
            RenderOutput::Introspection(record) => Ok(serde_json::to_string(&record)?),
        }
    }
}

/// Composes pages from content files, templates, and components.
pub struct Composer {
    config: ComposerConfig,
    tags: TagRegistry,
    expander: Box<dyn TemplateExpander>,
    loader: Box<dyn SourceLoader>,
}

impl Composer {
    /// Creates a composer with the default configuration, the MiniJinja
    /// expander, and the filesystem loader.
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    /// Creates a composer with the given configuration.
    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            config,
            tags: TagRegistry::new(),
            expander: Box::new(MiniJinjaExpander::new()),
            loader: Box::new(FsLoader),
        }
    }

    /// Replaces the template expander.
    pub fn with_expander(mut self, expander: impl TemplateExpander + 'static) -> Self {
        self.expander = Box::new(expander);
        self
    }

    /// Replaces the source loader.
    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Requires exclusive access, so settings cannot change under a render
    /// that is in flight.
    pub fn config_mut(&mut self) -> &mut ComposerConfig {
        &mut self.config
    }

    /// Sets the template used by pages without a `pogon-template` attribute.
    pub fn set_default_template(&mut self, name: impl Into<String>) {
        self.config.default_template = name.into();
    }

    /// Sets the result shape returned by [`render`](Self::render).
    pub fn set_mode(&mut self, mode: OutputMode) {
        self.config.mode = mode;
    }

    /// The custom tag registry.
    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Registers a custom tag handler, replacing any existing one for `tag`.
    pub fn register_tag(&self, tag: impl AsRef<str>, handler: impl TagHandler + 'static) -> bool {
        self.tags.register(tag, handler)
    }

    /// Removes a custom tag handler. Returns `true` if one was registered.
    pub fn unregister_tag(&self, tag: impl AsRef<str>) -> bool {
        self.tags.unregister(tag)
    }

    /// Renders `file_path` using the configured output mode.
    pub async fn render(
        &self,
        file_path: impl AsRef<Path>,
        options: &Value,
    ) -> Result<RenderOutput, ComposeError> {
        self.compose(file_path.as_ref(), options, self.config.mode)
            .await
    }

    /// Renders `file_path` with an explicit output mode.
    pub async fn render_with_mode(
        &self,
        file_path: impl AsRef<Path>,
        options: &Value,
        mode: OutputMode,
    ) -> Result<RenderOutput, ComposeError> {
        self.compose(file_path.as_ref(), options, mode).await
    }

    /// Renders `file_path` and hands the outcome to `callback`.
    ///
    /// The callback runs exactly once, with either the output or the error,
    /// and its return value is passed through. This suits hosts that expect a
    /// completion callback from their view engine.
    pub async fn render_file<F, R>(
        &self,
        file_path: impl AsRef<Path>,
        options: &Value,
        callback: F,
    ) -> R
    where
        F: FnOnce(Result<RenderOutput, ComposeError>) -> R,
    {
        callback(self.render(file_path, options).await)
    }

    #[instrument(skip(self, file_path, options), fields(path = %file_path.display()))]
    async fn compose(
        &self,
        file_path: &Path,
        options: &Value,
        mode: OutputMode,
    ) -> Result<RenderOutput, ComposeError> {
        let fragments = Fragments::new(self.loader.as_ref(), self.expander.as_ref());
        let dir = content_dir(file_path);

        let content = fragments.load(file_path, options).await?;
        let template_path = self.template_path(&content, &dir);
        let ctx = RenderContext::new(file_path, dir, template_path);
        debug!(template = %ctx.template_path.display(), "selected template");

        let page = fragments.load(&ctx.template_path, options).await?;
        let mut outlets = page.elements_by_tag(OUTLET_TAG).into_iter();
        let outlet = outlets.next().ok_or_else(|| ComposeError::MissingOutlet {
            path: ctx.template_path.clone(),
        })?;
        for extra in outlets {
            extra.detach();
        }
        merge(&page, &outlet, &content);

        let stats = resolve_outlets(
            &page,
            options,
            &ctx.dir,
            fragments,
            &self.tags,
            self.config.max_passes,
        )
        .await?;
        debug!(
            passes = stats.passes,
            components = stats.components,
            custom_tags = stats.custom_tags,
            "outlets resolved"
        );

        normalize_form_defaults(&page);

        let markup = page.serialize().map_err(|err| ComposeError::Parse {
            path: ctx.template_path.clone(),
            message: err.to_string(),
        })?;

        Ok(match mode {
            OutputMode::Markup => RenderOutput::Markup(markup),
            OutputMode::Introspect => {
                RenderOutput::Introspection(ctx.introspect(markup, options.clone()))
            }
        })
    }

    fn template_path(&self, content: &Document, dir: &Path) -> PathBuf {
        let name = content
            .html_element()
            .and_then(|html| html.attr(TEMPLATE_ATTR))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.config.default_template.clone());
        dir.join(name)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("config", &self.config)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}
