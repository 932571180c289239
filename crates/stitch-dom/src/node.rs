//! Element handles and in-place tree mutation.
//!
//! A [`Node`] is a cheap, clonable handle into a parsed tree. Handles stay
//! valid after the node is detached or moved into another [`Document`], which
//! is what lets the composer splice a fragment's children into a template
//! without serializing and re-parsing them.
//!
//! [`Document`]: crate::Document

use std::fmt;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};

use crate::error::DomError;

/// A handle to a node in a document tree.
///
/// Equality is identity: two handles are equal when they point at the same
/// node, regardless of content.
#[derive(Clone)]
pub struct Node(pub(crate) Handle);

impl Node {
    pub(crate) fn new(handle: Handle) -> Self {
        Self(handle)
    }

    /// Returns the local tag name if this node is an element.
    ///
    /// The HTML tree builder lowercases tag names, so `<Custom-Tag>` reports
    /// `custom-tag`.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Whether this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element { .. })
    }

    /// Whether this node is an element with the given tag name (ASCII case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Returns the value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string())
    }

    /// Whether the attribute is present (with any value, including empty).
    pub fn has_attr(&self, name: &str) -> bool {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return false;
        };
        attrs.borrow().iter().any(|attr| &*attr.name.local == name)
    }

    /// Sets an attribute, replacing the value in place if it already exists.
    ///
    /// New attributes are appended after the existing ones. Does nothing on
    /// non-element nodes.
    pub fn set_attr(&self, name: &str, value: &str) {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return;
        };
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            Some(existing) => existing.value = StrTendril::from_slice(value),
            None => attrs.push(Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                value: StrTendril::from_slice(value),
            }),
        }
    }

    /// Removes an attribute and returns its previous value.
    pub fn remove_attr(&self, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return None;
        };
        let mut attrs = attrs.borrow_mut();
        let index = attrs.iter().position(|attr| &*attr.name.local == name)?;
        Some(attrs.remove(index).value.to_string())
    }

    /// Returns all attributes as `(name, value)` pairs in authored order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return Vec::new();
        };
        attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect()
    }

    /// Returns the parent node, if attached.
    pub fn parent(&self) -> Option<Node> {
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(|weak| weak.upgrade());
        self.0.parent.set(weak);
        parent.map(Node)
    }

    /// Returns the direct children, including text and comments.
    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().iter().cloned().map(Node).collect()
    }

    /// Returns direct child elements with the given tag name.
    pub fn children_by_tag(&self, tag: &str) -> Vec<Node> {
        self.children()
            .into_iter()
            .filter(|child| child.has_tag(tag))
            .collect()
    }

    /// Returns every descendant element in document order, excluding `self`.
    pub fn descendant_elements(&self) -> Vec<Node> {
        let mut found = Vec::new();
        let mut stack: Vec<Handle> = self.0.children.borrow().iter().rev().cloned().collect();

        while let Some(handle) = stack.pop() {
            stack.extend(handle.children.borrow().iter().rev().cloned());
            if matches!(handle.data, NodeData::Element { .. }) {
                found.push(Node(handle));
            }
        }

        found
    }

    /// Returns descendant elements with the given tag name, in document order.
    pub fn descendants_by_tag(&self, tag: &str) -> Vec<Node> {
        self.descendant_elements()
            .into_iter()
            .filter(|node| node.has_tag(tag))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.0.clone()];

        while let Some(handle) = stack.pop() {
            if let NodeData::Text { contents } = &handle.data {
                text.push_str(&contents.borrow());
            }
            stack.extend(handle.children.borrow().iter().rev().cloned());
        }

        text
    }

    /// Serializes the children of this node.
    pub fn inner_html(&self) -> Result<String, DomError> {
        self.serialize_with(TraversalScope::ChildrenOnly(None))
    }

    /// Serializes this node including its own start and end tags.
    pub fn outer_html(&self) -> Result<String, DomError> {
        self.serialize_with(TraversalScope::IncludeNode)
    }

    pub(crate) fn serialize_with(&self, traversal_scope: TraversalScope) -> Result<String, DomError> {
        let mut bytes = Vec::new();
        let handle: SerializableHandle = self.0.clone().into();
        serialize(
            &mut bytes,
            &handle,
            SerializeOpts {
                traversal_scope,
                ..Default::default()
            },
        )?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Removes this node from its parent. Detached nodes keep their children.
    pub fn detach(&self) {
        let Some(weak) = self.0.parent.take() else {
            return;
        };
        if let Some(parent) = weak.upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, &self.0));
        }
    }

    /// Moves all children out of this node and returns them.
    pub fn take_children(&self) -> Vec<Node> {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in &children {
            child.parent.set(None);
        }
        children.into_iter().map(Node).collect()
    }

    /// Appends nodes to the end of this node's children, detaching them first.
    pub fn append_children(&self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            node.detach();
            node.0.parent.set(Some(Rc::downgrade(&self.0)));
            self.0.children.borrow_mut().push(node.0);
        }
    }

    /// Inserts nodes, in order, as the siblings immediately after this node.
    ///
    /// Does nothing when this node has no parent.
    pub fn insert_after(&self, nodes: impl IntoIterator<Item = Node>) {
        let Some(parent) = self.parent() else {
            return;
        };

        let nodes: Vec<Node> = nodes.into_iter().collect();
        for node in &nodes {
            node.detach();
        }

        let mut siblings = parent.0.children.borrow_mut();
        let Some(index) = siblings.iter().position(|child| Rc::ptr_eq(child, &self.0)) else {
            return;
        };
        let handles = nodes.into_iter().map(|node| {
            node.0.parent.set(Some(Rc::downgrade(&parent.0)));
            node.0
        });
        siblings.splice(index + 1..index + 1, handles);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { name, .. } => write!(f, "<{}>", &*name.local),
            NodeData::Text { contents } => write!(f, "#text({:?})", &**contents.borrow()),
            NodeData::Comment { .. } => f.write_str("#comment"),
            NodeData::Document => f.write_str("#document"),
            NodeData::Doctype { .. } => f.write_str("#doctype"),
            NodeData::ProcessingInstruction { .. } => f.write_str("#pi"),
        }
    }
}
