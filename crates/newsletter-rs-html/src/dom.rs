//! A thin mutable layer over an `html5ever` DOM.
//!
//! [`Fragment`] parses an HTML snippet in a `<body>` context, so the nodes
//! come back in the order and place they were written. The helpers in this module cover exactly what the email passes
//! need: descendant search, class tests, attribute edits, text extraction,
//! node construction, and replacement.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::parse_fragment;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use markup5ever::tendril::StrTendril;
use markup5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use newsletter_rs_core::error::{NewsletterError, NewsletterResult};

/// Maximum fragment size accepted for parsing (5MB).
pub const MAX_FRAGMENT_SIZE: usize = 5 * 1024 * 1024;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed HTML fragment, owned by a single transformation call.
pub struct Fragment {
    // The document owns the tree; dropping it would empty `root`.
    _dom: RcDom,
    root: Handle,
}

impl Fragment {
    /// Parses `html` as the contents of a `<body>` element.
    ///
    /// Leading comments and `<style>`/`<script>` blocks stay where they are
    /// instead of being hoisted into a document head.
    ///
    /// # Errors
    ///
    /// Returns `HtmlError` if the input exceeds [`MAX_FRAGMENT_SIZE`], cannot
    /// be read, or produces no root element.
    pub fn parse(html: &str) -> NewsletterResult<Self> {
        if html.len() > MAX_FRAGMENT_SIZE {
            return Err(NewsletterError::HtmlError(format!(
                "fragment too large: {} bytes (max {MAX_FRAGMENT_SIZE})",
                html.len()
            )));
        }

        let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| NewsletterError::HtmlError(format!("failed to parse fragment: {e}")))?;

        // Fragment parsing hangs every node off a synthetic `<html>` element.
        let root = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|h| is_tag(h, "html"))
            .cloned()
            .ok_or_else(|| NewsletterError::HtmlError("parsed fragment has no root".into()))?;

        Ok(Self { _dom: dom, root })
    }

    /// Returns the synthetic element holding the fragment's top-level nodes.
    pub const fn root(&self) -> &Handle {
        &self.root
    }

    /// Returns every element in the fragment matching `pred`, in document order.
    pub fn find_all<F>(&self, pred: F) -> Vec<Handle>
    where
        F: Fn(&Handle) -> bool,
    {
        descendants(&self.root, pred)
    }

    /// Serializes the fragment's top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns `HtmlError` if serialization fails or yields invalid UTF-8.
    pub fn serialize(&self) -> NewsletterResult<String> {
        let mut bytes = Vec::new();
        let handle: SerializableHandle = self.root.clone().into();
        serialize(
            &mut bytes,
            &handle,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )
        .map_err(|e| NewsletterError::HtmlError(format!("failed to serialize fragment: {e}")))?;

        String::from_utf8(bytes)
            .map_err(|e| NewsletterError::HtmlError(format!("serialized fragment is not UTF-8: {e}")))
    }
}

// ============================================================
// Search
// ============================================================

/// Returns every descendant of `root` (excluding `root`) matching `pred`.
pub fn descendants<F>(root: &Handle, pred: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        if pred(&node) {
            found.push(node.clone());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    found
}

/// Returns the first descendant of `root` matching `pred`, in document order.
pub fn find_first<F>(root: &Handle, pred: F) -> Option<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        if pred(&node) {
            return Some(node);
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}

/// Returns the local tag name of an element.
pub fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Returns `true` if `handle` is an element named `tag`.
pub fn is_tag(handle: &Handle, tag: &str) -> bool {
    tag_name(handle) == Some(tag)
}

/// Returns `true` if the element's `class` attribute contains `class` as a
/// whole token.
pub fn has_class(handle: &Handle, class: &str) -> bool {
    get_attr(handle, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Returns a predicate matching elements named `tag` carrying `class`.
pub fn tag_with_class<'a>(tag: &'a str, class: &'a str) -> impl Fn(&Handle) -> bool + 'a {
    move |h| is_tag(h, tag) && has_class(h, class)
}

// ============================================================
// Attributes
// ============================================================

/// Reads an attribute value.
pub fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Sets an attribute, replacing any existing value.
pub fn set_attr(handle: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
            attr.value = StrTendril::from_slice(value);
        } else {
            attrs.push(attribute(name, value));
        }
    }
}

/// Removes an attribute if present.
pub fn remove_attr(handle: &Handle, name: &str) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        attrs.borrow_mut().retain(|a| a.name.local.as_ref() != name);
    }
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from_slice(value),
    }
}

// ============================================================
// Text
// ============================================================

/// Concatenates all text under `handle`.
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

// ============================================================
// Construction and mutation
// ============================================================

/// Creates a detached HTML element with the given attributes.
pub fn element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(attrs.iter().map(|(n, v)| attribute(n, v)).collect()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Creates a detached text node.
pub fn text(contents: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(contents)),
    })
}

/// Appends `child` as the last child of `parent`, detaching it first.
pub fn append(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Removes `node` from its parent, if it has one.
pub fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
}

/// Puts `replacement` where `old` is. Returns `false` if `old` is detached.
pub fn replace(old: &Handle, replacement: Handle) -> bool {
    let Some(parent) = old.parent.take().and_then(|weak| weak.upgrade()) else {
        return false;
    };
    detach(&replacement);
    replacement.parent.set(Some(Rc::downgrade(&parent)));

    let mut children = parent.children.borrow_mut();
    match children.iter().position(|child| Rc::ptr_eq(child, old)) {
        Some(index) => {
            children[index] = replacement;
            true
        }
        None => false,
    }
}
