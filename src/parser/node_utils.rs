//! html5ever tree helpers for the extraction stages
//!
//! The parsed tree is never mutated. Stages that "remove" structural elements
//! record them in a [`PrunedTree`], a per-verse view in which pruned subtrees
//! are invisible to every traversal and to text extraction.

use std::collections::HashSet;
use std::rc::Rc;

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use tracing::debug;

use crate::common::text_utils::normalize_whitespace;
use crate::styles::{Role, StyleTable};

/// Elements whose boundaries separate words in the rendered text
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "li",
    "ol",
    "p",
    "section",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements whose content is never display text
const IGNORED_TAGS: &[&str] = &["head", "script", "style", "template"];

/// Build a tree from markup; html5ever never fails, it repairs
pub(crate) fn parse_html(markup: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .one(markup.as_bytes())
}

/// Local tag name of an element node
pub(crate) fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub(crate) fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

/// Attribute value of an element, if present
pub(crate) fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Whitespace-separated class names of an element
pub(crate) fn classes(handle: &Handle) -> Vec<String> {
    get_attr(handle, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Roles the style table assigns to an element
pub(crate) fn roles(handle: &Handle, styles: &StyleTable) -> Vec<Role> {
    if !is_element(handle) {
        return Vec::new();
    }
    let classes = classes(handle);
    styles.roles_for(classes.iter().map(String::as_str))
}

pub(crate) fn has_role(handle: &Handle, styles: &StyleTable, pred: impl Fn(&Role) -> bool) -> bool {
    roles(handle, styles).iter().any(pred)
}

/// The `<body>` element html5ever wraps fragments in, or the document itself
pub(crate) fn find_body(dom: &RcDom) -> Handle {
    let tree = PrunedTree::new(dom.document.clone());
    let mut body = None;
    tree.walk(&dom.document, &mut |node| {
        if body.is_some() {
            return Walk::Skip;
        }
        if tag_name(node) == Some("body") {
            body = Some(node.clone());
            return Walk::Skip;
        }
        Walk::Descend
    });
    body.unwrap_or_else(|| dom.document.clone())
}

/// Serialize an element (including itself) back to markup
pub(crate) fn serialize_node(handle: &Handle) -> Option<String> {
    let mut out = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    if let Err(e) = serialize(&mut out, &SerializableHandle::from(handle.clone()), opts) {
        debug!("Could not serialize verse markup: {}", e);
        return None;
    }
    String::from_utf8(out).ok()
}

/// Traversal control returned by [`PrunedTree::walk`] visitors
pub(crate) enum Walk {
    Descend,
    Skip,
}

/// Read-only view of a subtree with some descendants hidden
pub(crate) struct PrunedTree {
    root: Handle,
    pruned: HashSet<*const Node>,
}

impl PrunedTree {
    pub(crate) fn new(root: Handle) -> Self {
        Self {
            root,
            pruned: HashSet::new(),
        }
    }

    pub(crate) fn root(&self) -> &Handle {
        &self.root
    }

    /// Hide a node and its subtree from this view
    pub(crate) fn prune(&mut self, handle: &Handle) {
        self.pruned.insert(Rc::as_ptr(handle));
    }

    pub(crate) fn prune_all(&mut self, handles: &[Handle]) {
        for handle in handles {
            self.prune(handle);
        }
    }

    pub(crate) fn is_pruned(&self, handle: &Handle) -> bool {
        self.pruned.contains(&Rc::as_ptr(handle))
    }

    /// Visible children of a node, in document order
    pub(crate) fn children(&self, handle: &Handle) -> Vec<Handle> {
        handle
            .children
            .borrow()
            .iter()
            .filter(|child| !self.is_pruned(child))
            .cloned()
            .collect()
    }

    /// Visit visible descendant elements of `handle` in document order
    pub(crate) fn walk<F>(&self, handle: &Handle, visit: &mut F)
    where
        F: FnMut(&Handle) -> Walk,
    {
        for child in self.children(handle) {
            if !is_element(&child) {
                continue;
            }
            if let Walk::Descend = visit(&child) {
                self.walk(&child, visit);
            }
        }
    }

    /// Visible descendants of the root playing a matching role
    ///
    /// Matches are not searched for nested matches.
    pub(crate) fn find_all(&self, styles: &StyleTable, pred: impl Fn(&Role) -> bool) -> Vec<Handle> {
        self.find_within(&self.root.clone(), styles, pred)
    }

    pub(crate) fn find_within(
        &self,
        handle: &Handle,
        styles: &StyleTable,
        pred: impl Fn(&Role) -> bool,
    ) -> Vec<Handle> {
        let mut found = Vec::new();
        self.walk(handle, &mut |node| {
            if has_role(node, styles, &pred) {
                found.push(node.clone());
                Walk::Skip
            } else {
                Walk::Descend
            }
        });
        found
    }

    /// Visible descendants of the root with the given tag name
    pub(crate) fn find_tag(&self, tag: &str) -> Vec<Handle> {
        let mut found = Vec::new();
        self.walk(&self.root.clone(), &mut |node| {
            if tag_name(node) == Some(tag) {
                found.push(node.clone());
                Walk::Skip
            } else {
                Walk::Descend
            }
        });
        found
    }

    #[cfg(test)]
    pub(crate) fn find_first(&self, styles: &StyleTable, pred: impl Fn(&Role) -> bool) -> Option<Handle> {
        self.find_all(styles, pred).into_iter().next()
    }

    /// Whether `handle` itself or any visible descendant plays a matching role
    pub(crate) fn contains(&self, handle: &Handle, styles: &StyleTable, pred: impl Fn(&Role) -> bool) -> bool {
        if has_role(handle, styles, &pred) {
            return true;
        }
        !self.find_within(handle, styles, pred).is_empty()
    }

    /// Normalized visible text of a node
    pub(crate) fn text(&self, handle: &Handle) -> String {
        normalize_whitespace(&self.raw_text(handle))
    }

    /// Visible text of a node with whitespace kept as written
    pub(crate) fn raw_text(&self, handle: &Handle) -> String {
        let mut raw = String::new();
        if let NodeData::Text { contents } = &handle.data {
            raw.push_str(&contents.borrow());
        } else {
            self.collect_text(handle, &mut raw);
        }
        raw
    }

    /// Normalized visible text of the whole view
    pub(crate) fn root_text(&self) -> String {
        self.text(&self.root.clone())
    }

    fn collect_text(&self, handle: &Handle, out: &mut String) {
        for child in self.children(handle) {
            match &child.data {
                NodeData::Text { contents } => out.push_str(&contents.borrow()),
                NodeData::Element { name, .. } => {
                    let tag = name.local.as_ref();
                    if IGNORED_TAGS.contains(&tag) {
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&tag);
                    if block {
                        out.push(' ');
                    }
                    self.collect_text(&child, out);
                    if block {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}
