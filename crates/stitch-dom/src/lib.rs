//! # Stitch DOM - Mutable HTML Trees
//!
//! `stitch-dom` is the document model behind the `stitch` page composer: it
//! parses markup with html5ever into a reference-counted tree and exposes the
//! small set of queries and mutations composition needs.
//!
//! ## Operations
//!
//! | Need | API |
//! |------|-----|
//! | Parse text | [`Document::parse`] |
//! | Query by tag | [`Document::elements_by_tag`], [`Node::descendants_by_tag`] |
//! | Attributes | [`Node::attr`], [`Node::set_attr`], [`Node::remove_attr`] |
//! | Markup views | [`Node::inner_html`], [`Node::outer_html`] |
//! | Splicing | [`Node::take_children`], [`Node::insert_after`], [`Node::append_children`], [`Node::detach`] |
//! | Serialize | [`Document::serialize`] |
//!
//! Nodes move between documents without a serialize/parse round trip:
//!
//! ```rust
//! use stitch_dom::Document;
//!
//! let page = Document::parse("<body><p>before</p><slot></slot><p>after</p></body>");
//! let fragment = Document::parse("<p>inserted</p>");
//!
//! let slot = page.elements_by_tag("slot").remove(0);
//! slot.insert_after(fragment.body().unwrap().take_children());
//! slot.detach();
//!
//! assert_eq!(
//!     page.body().unwrap().inner_html().unwrap(),
//!     "<p>before</p><p>inserted</p><p>after</p>"
//! );
//! ```
//!
//! ## Unknown elements
//!
//! Custom elements are parsed like any other unknown tag. HTML ignores the
//! self-closing slash on them, so `<x-card />` swallows everything that
//! follows it; write `<x-card></x-card>` instead.

mod document;
mod error;
mod node;

pub use document::Document;
pub use error::DomError;
pub use node::Node;
