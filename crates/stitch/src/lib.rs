//! # Stitch - HTML Page Composition
//!
//! `stitch` builds finished HTML pages out of three kinds of files:
//!
//! - a content file, one per page;
//! - a page template shared by many pages, with a `<pogon_outlet>` marking
//!   where the content body goes;
//! - reusable components, pulled in with `<pogon_component name="…">` or
//!   through host-registered custom tags.
//!
//! Every file is expanded with MiniJinja before it is parsed, so pages,
//! templates, and components can all use `{{ variables }}` from the render
//! options.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stitch::Composer;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), stitch::ComposeError> {
//! let composer = Composer::new();
//! let page = composer
//!     .render("site/about.html", &json!({"user": "ada"}))
//!     .await?;
//! println!("{}", page.markup());
//! # Ok(())
//! # }
//! ```
//!
//! ## File Conventions
//!
//! | Markup | Meaning |
//! |--------|---------|
//! | `<pogon_outlet></pogon_outlet>` | In a template: where the page body goes |
//! | `<pogon_component name="nav.html"></pogon_component>` | Replaced by `nav.html` |
//! | `<html pogon-template="wide.html">` | In a page: use `wide.html` instead of the default template |
//! | `<input value="a" pogon-checked="{{ v }}">` | Checked when `value` equals the marker |
//! | `<option value="a" pogon-selected="{{ v }}">` | Selected when `value` equals the marker |
//!
//! All names resolve relative to the directory of the content file. Write
//! outlet and component elements with explicit closing tags; HTML ignores the
//! self-closing slash on unknown elements.
//!
//! When both the page and the template define a `<title>`, the page wins.
//! Everything else in the page's `<head>` is appended to the template's head.
//!
//! ## Custom Tags
//!
//! Custom tags hand the choice of component to host code:
//!
//! ```rust
//! use stitch::{Composer, tags::{handler_fn, TagExpansion}};
//!
//! let composer = Composer::new();
//! composer.register_tag("weather", handler_fn(|options, attributes, _inner| async move {
//!     let city = attributes.get("city").cloned().unwrap_or_default();
//!     Ok(TagExpansion::new("components/weather.html", serde_json::json!({
//!         "city": city,
//!         "units": options["units"].clone(),
//!     })))
//! }));
//! ```
//!
//! ## Introspection
//!
//! With [`OutputMode::Introspect`] a render returns an [`Introspection`]
//! record instead of bare markup: the markup plus the options and the paths
//! involved. Tests use it to check which template a page was composed with.
//!
//! ## Modules
//!
//! - [`merge`]: splicing one document into another
//! - [`resolve`]: resolving component and custom-tag outlets
//! - [`normalize`]: form default markers
//! - [`tags`]: custom tag handlers and their registry
//! - [`markup`]: the recognized element and attribute names

mod composer;
pub mod config;
pub mod context;
mod error;
pub mod expand;
pub mod markup;
pub mod merge;
pub mod normalize;
pub mod prelude;
pub mod resolve;
mod source;
pub mod tags;

pub use composer::{Composer, RenderOutput};
pub use config::{ComposerConfig, ConfigError, OutputMode};
pub use context::{Introspection, RenderContext};
pub use error::{ComposeError, ErrorKind};
pub use expand::{ExpandError, MiniJinjaExpander, PassthroughExpander, TemplateExpander};
pub use resolve::ResolveStats;
pub use source::{Fragments, FsLoader, MemoryLoader, SourceLoader};
pub use tags::{Attributes, TagExpansion, TagHandler, TagRegistry};

// Re-export the document model so hosts do not need a separate dependency.
pub use stitch_dom::{Document, DomError, Node};
