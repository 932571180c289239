//! Parsed documents.

use html5ever::serialize::TraversalScope;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::DomError;
use crate::node::Node;

/// An owned, mutable HTML document.
///
/// Parsing always yields a complete `html`/`head`/`body` skeleton, so a bare
/// fragment such as `<p>hi</p>` ends up inside `<body>`.
///
/// The contents of `<template>` elements are ordinary children of the
/// element, so queries, mutations, and serialization all see them.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parses markup into a document tree.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        hoist_template_contents(&dom.document);
        Self { dom }
    }

    /// The document node itself (parent of the doctype and `<html>`).
    pub fn root(&self) -> Node {
        Node::new(self.dom.document.clone())
    }

    /// The root `<html>` element.
    pub fn html_element(&self) -> Option<Node> {
        self.root().children_by_tag("html").into_iter().next()
    }

    /// The `<head>` element.
    pub fn head(&self) -> Option<Node> {
        self.html_element()?.children_by_tag("head").into_iter().next()
    }

    /// The `<body>` element.
    pub fn body(&self) -> Option<Node> {
        self.html_element()?.children_by_tag("body").into_iter().next()
    }

    /// All elements with the given tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<Node> {
        self.root().descendants_by_tag(tag)
    }

    /// The first element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        self.root()
            .descendant_elements()
            .into_iter()
            .find(|node| node.attr("id").as_deref() == Some(id))
    }

    /// Serializes the whole document, doctype included.
    pub fn serialize(&self) -> Result<String, DomError> {
        self.root().serialize_with(TraversalScope::ChildrenOnly(None))
    }
}

/// Moves each `<template>`'s content fragment into the element's children.
///
/// The tree builder parks template contents in a separate fragment that
/// neither child traversal nor the serializer visits.
fn hoist_template_contents(root: &Handle) {
    let mut stack = vec![root.clone()];

    while let Some(handle) = stack.pop() {
        if let NodeData::Element {
            template_contents, ..
        } = &handle.data
        {
            let contents = template_contents.borrow_mut().take();
            if let Some(contents) = contents {
                Node::new(handle.clone()).append_children(Node::new(contents).take_children());
            }
        }
        stack.extend(handle.children.borrow().iter().cloned());
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}
