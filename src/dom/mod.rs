//! In-memory host tree.
//!
//! The runtime is written against a DOM-like host that supports five
//! operations: node creation by tag, attribute assignment, event-listener
//! registration, child append, and content clearing. This module is that
//! host. Nodes are shared handles, so event handlers and ref cells can
//! hold onto a node while the tree also owns it.
//!
//! Events are synthetic: [`HostNode::emit`] invokes every listener
//! registered for the event name, which is how tests and demos stand in
//! for real user input.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::HostTag;

// =============================================================================
// Events
// =============================================================================

/// An event delivered to listeners registered on a host node.
#[derive(Clone)]
pub struct Event {
    /// Event name, e.g. `"click"`.
    pub name: String,
    /// The node the event was emitted on.
    pub target: HostNode,
}

/// Event listener callback (Rc for shared ownership in closures).
///
/// Using `Rc<dyn Fn>` instead of `Box<dyn Fn>` allows cloning callbacks
/// into closures without ownership issues.
pub type EventHandler = Rc<dyn Fn(&Event)>;

// =============================================================================
// Host Node
// =============================================================================

struct NodeData {
    tag: HostTag,
    attributes: Vec<(String, String)>,
    listeners: Vec<(String, EventHandler)>,
    children: Vec<HostNode>,
    text: Option<String>,
}

/// A node in the host tree.
///
/// Cloning a `HostNode` clones the handle, not the node; all clones see
/// the same mutations. Use [`HostNode::ptr_eq`] to ask whether two handles
/// refer to the same node.
#[derive(Clone)]
pub struct HostNode {
    data: Rc<RefCell<NodeData>>,
}

impl HostNode {
    /// Create a detached node with the given tag.
    pub fn create(tag: HostTag) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                tag,
                attributes: Vec::new(),
                listeners: Vec::new(),
                children: Vec::new(),
                text: None,
            })),
        }
    }

    /// The node's tag.
    pub fn tag(&self) -> HostTag {
        self.data.borrow().tag
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Assign an attribute, replacing any previous value for the name.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut data = self.data.borrow_mut();
        if let Some(entry) = data.attributes.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            data.attributes.push((name, value));
        }
    }

    /// Read an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.data
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener for an event name. Multiple listeners for the
    /// same name all fire, in registration order.
    pub fn add_listener(&self, event: impl Into<String>, handler: EventHandler) {
        self.data.borrow_mut().listeners.push((event.into(), handler));
    }

    /// Number of listeners registered on this node (all event names).
    pub fn listener_count(&self) -> usize {
        self.data.borrow().listeners.len()
    }

    /// Emit a synthetic event on this node.
    ///
    /// Handlers are collected before any of them run, so a handler may
    /// mutate the tree (including rebuilding it from the root) without
    /// tripping over the node borrow.
    pub fn emit(&self, event: &str) {
        let handlers: Vec<EventHandler> = self
            .data
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, h)| h.clone())
            .collect();

        tracing::trace!(event, handlers = handlers.len(), "emit");

        let ev = Event {
            name: event.to_string(),
            target: self.clone(),
        };
        for handler in handlers {
            handler(&ev);
        }
    }

    // =========================================================================
    // Children & Text
    // =========================================================================

    /// Append a child node.
    pub fn append_child(&self, child: &HostNode) {
        self.data.borrow_mut().children.push(child.clone());
    }

    /// Remove all children and any text content.
    pub fn clear(&self) {
        let mut data = self.data.borrow_mut();
        data.children.clear();
        data.text = None;
    }

    /// Set this node's own text content.
    pub fn set_text(&self, text: impl Into<String>) {
        self.data.borrow_mut().text = Some(text.into());
    }

    /// This node's own text content, if any.
    pub fn text(&self) -> Option<String> {
        self.data.borrow().text.clone()
    }

    /// Snapshot of the current children.
    pub fn children(&self) -> Vec<HostNode> {
        self.data.borrow().children.clone()
    }

    /// Child at `index`, if present.
    pub fn child(&self, index: usize) -> Option<HostNode> {
        self.data.borrow().children.get(index).cloned()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.data.borrow().children.len()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Concatenated text of this node and all descendants, depth-first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.data.borrow();
        if let Some(text) = &data.text {
            out.push_str(text);
        }
        for child in &data.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for the first node with the given tag, starting
    /// at this node.
    pub fn find_by_tag(&self, tag: HostTag) -> Option<HostNode> {
        if self.tag() == tag {
            return Some(self.clone());
        }
        let children = self.children();
        children.iter().find_map(|child| child.find_by_tag(tag))
    }

    /// Indented tree rendering for demos and debugging.
    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        let data = self.data.borrow();
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(data.tag.name());
        for (name, value) in &data.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        if let Some(text) = &data.text {
            out.push_str(text);
        }
        out.push('\n');
        for child in &data.children {
            child.write_pretty(out, depth + 1);
        }
    }
}

impl fmt::Debug for HostNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("HostNode")
            .field("tag", &data.tag)
            .field("children", &data.children.len())
            .field("text", &data.text)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_attributes_replace_by_name() {
        let node = HostNode::create(HostTag::Div);
        node.set_attribute("style", "color: red;");
        node.set_attribute("id", "root");
        node.set_attribute("style", "color: blue;");

        assert_eq!(node.attribute("style").as_deref(), Some("color: blue;"));
        assert_eq!(node.attribute("id").as_deref(), Some("root"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_append_and_clear() {
        let parent = HostNode::create(HostTag::Div);
        let a = HostNode::create(HostTag::P);
        let b = HostNode::create(HostTag::Span);
        parent.append_child(&a);
        parent.append_child(&b);
        parent.set_text("hi");

        assert_eq!(parent.child_count(), 2);
        assert!(parent.child(0).unwrap().ptr_eq(&a));
        assert!(parent.child(1).unwrap().ptr_eq(&b));

        parent.clear();
        assert_eq!(parent.child_count(), 0);
        assert_eq!(parent.text(), None);
    }

    #[test]
    fn test_emit_fires_listeners_in_order() {
        let node = HostNode::create(HostTag::Button);
        let hits = Rc::new(RefCell::new(Vec::new()));

        let hits_a = hits.clone();
        node.add_listener("click", Rc::new(move |_| hits_a.borrow_mut().push("a")));
        let hits_b = hits.clone();
        node.add_listener("click", Rc::new(move |_| hits_b.borrow_mut().push("b")));
        let hits_c = hits.clone();
        node.add_listener("keydown", Rc::new(move |_| hits_c.borrow_mut().push("c")));

        node.emit("click");
        assert_eq!(*hits.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_emit_target_is_the_node() {
        let node = HostNode::create(HostTag::Button);
        let saw_target = Rc::new(Cell::new(false));

        let saw = saw_target.clone();
        let expected = node.clone();
        node.add_listener(
            "click",
            Rc::new(move |ev: &Event| saw.set(ev.target.ptr_eq(&expected))),
        );

        node.emit("click");
        assert!(saw_target.get());
    }

    #[test]
    fn test_handler_may_mutate_the_tree() {
        let node = HostNode::create(HostTag::Div);
        let inner = node.clone();
        node.add_listener(
            "click",
            Rc::new(move |_| {
                inner.clear();
                inner.append_child(&HostNode::create(HostTag::P));
            }),
        );

        node.emit("click");
        assert_eq!(node.child_count(), 1);
    }

    #[test]
    fn test_text_content_is_deep() {
        let root = HostNode::create(HostTag::Div);
        let h1 = HostNode::create(HostTag::H1);
        h1.set_text("Title");
        let p = HostNode::create(HostTag::P);
        p.set_text(" body");
        root.append_child(&h1);
        root.append_child(&p);

        assert_eq!(root.text_content(), "Title body");
    }

    #[test]
    fn test_find_by_tag_depth_first() {
        let root = HostNode::create(HostTag::Div);
        let wrapper = HostNode::create(HostTag::Div);
        let button = HostNode::create(HostTag::Button);
        wrapper.append_child(&button);
        root.append_child(&wrapper);

        let found = root.find_by_tag(HostTag::Button).unwrap();
        assert!(found.ptr_eq(&button));
        assert!(root.find_by_tag(HostTag::H1).is_none());
    }
}
