//! Element Model - virtual element descriptors.
//!
//! A [`VNode`] is an immutable description of something to render: a host
//! tag, a fragment, a text run, or a component function. The kind is an
//! explicit tagged variant decided at construction, never inferred at
//! render time. A fresh tree is built on every render pass; nothing here
//! has behavior.
//!
//! Construction normalizes children the way the JSX-style sugar expects:
//! nested child lists flatten to one level and any non-element child is
//! wrapped in a text element.

use std::fmt;
use std::rc::Rc;

use crate::dom::{Event, EventHandler, HostNode};
use crate::hooks::{Ref, Scope};
use crate::types::HostTag;

// =============================================================================
// Element Kind
// =============================================================================

/// A component is a plain function from render context and props to a
/// virtual subtree. Function items coerce to this pointer type, and the
/// pointer's address takes part in instance identity.
pub type Component = fn(&mut Scope, &Props) -> VNode;

/// A ref cell that receives the host node created for an element.
pub type NodeRef = Ref<Option<HostNode>>;

/// What a virtual element describes, fixed at construction.
#[derive(Clone)]
pub enum ElementKind {
    /// A host node with the given tag.
    Host(HostTag),
    /// No node of its own; children render into the parent container.
    Fragment,
    /// A text run, rendered as the container's text content.
    Text(String),
    /// A component function whose output is rendered into a wrapper node.
    Component(Component),
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(tag) => f.debug_tuple("Host").field(tag).finish(),
            Self::Fragment => f.write_str("Fragment"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Component(func) => f
                .debug_tuple("Component")
                .field(&(*func as usize as *const ()))
                .finish(),
        }
    }
}

// =============================================================================
// Prop Values
// =============================================================================

/// A property value: a scalar applied as a host attribute, an event
/// handler (keys following the `on*` convention), or a node ref (the
/// reserved `ref` key).
#[derive(Clone)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Handler(EventHandler),
    NodeRef(NodeRef),
}

impl PropValue {
    /// Text form for attribute assignment. `None` for handlers and refs,
    /// which are never written as attributes.
    pub fn as_attr_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Handler(_) | Self::NodeRef(_) => None,
        }
    }

    /// The handler, if this value is one.
    pub fn as_handler(&self) -> Option<EventHandler> {
        match self {
            Self::Handler(h) => Some(h.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::NodeRef(_) => f.write_str("NodeRef(..)"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Reserved key holding a [`NodeRef`].
pub const REF_KEY: &str = "ref";

/// Prefix marking an event-handler key; the event name is the remainder,
/// case-folded (`onClick` → `click`).
pub const EVENT_PREFIX: &str = "on";

/// Returns the event name if `key` follows the handler convention.
pub fn handler_event_name(key: &str) -> Option<String> {
    key.strip_prefix(EVENT_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}

/// String-keyed element properties, kept in insertion order (properties
/// apply to the host node in the order they were authored).
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any previous value for it.
    pub fn set(mut self, key: impl Into<String>, value: PropValue) -> Self {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }

    /// Set a scalar attribute value.
    pub fn attr(self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value.into())
    }

    /// Bind an event handler under the `on*` convention.
    pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.set(
            format!("{EVENT_PREFIX}{event}"),
            PropValue::Handler(Rc::new(handler)),
        )
    }

    /// Attach a node ref under the reserved `ref` key.
    pub fn node_ref(self, node_ref: NodeRef) -> Self {
        self.set(REF_KEY, PropValue::NodeRef(node_ref))
    }

    /// Read a value by key.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The node ref attached under the reserved key, if any.
    pub fn get_node_ref(&self) -> Option<NodeRef> {
        match self.get(REF_KEY) {
            Some(PropValue::NodeRef(node_ref)) => Some(node_ref.clone()),
            _ => None,
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Children Normalization
// =============================================================================

/// One child position in a construction call: an element, a primitive to
/// wrap as text, or a nested list to flatten.
pub enum Child {
    Node(VNode),
    Text(String),
    List(Vec<Child>),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Self::List(children)
    }
}

fn flatten_into(child: Child, out: &mut Vec<VNode>) {
    match child {
        Child::Node(node) => out.push(node),
        Child::Text(text) => out.push(VNode::text(text)),
        Child::List(children) => {
            for child in children {
                flatten_into(child, out);
            }
        }
    }
}

// =============================================================================
// Virtual Elements
// =============================================================================

/// An immutable virtual element descriptor.
#[derive(Clone, Debug)]
pub struct VNode {
    pub kind: ElementKind,
    pub props: Props,
    pub children: Vec<VNode>,
}

impl VNode {
    /// Construct an element, normalizing children: nested lists flatten to
    /// one level and primitives become text elements.
    pub fn new(kind: ElementKind, props: Props, children: Vec<Child>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            flatten_into(child, &mut flat);
        }
        Self {
            kind,
            props,
            children: flat,
        }
    }

    /// A text element.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Text(text.into()),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// A fragment: children render directly into the parent container.
    pub fn fragment(children: Vec<Child>) -> Self {
        Self::new(ElementKind::Fragment, Props::new(), children)
    }

    /// A component element.
    pub fn component(component: Component, props: Props) -> Self {
        Self::new(ElementKind::Component(component), props, Vec::new())
    }
}

/// Construct a host element.
pub fn el(tag: HostTag, props: Props, children: Vec<Child>) -> VNode {
    VNode::new(ElementKind::Host(tag), props, children)
}

/// Construct a host element from a tag name; unrecognized names fall back
/// to the generic container tag.
pub fn el_named(tag: &str, props: Props, children: Vec<Child>) -> VNode {
    el(HostTag::from_name(tag), props, children)
}

// =============================================================================
// Tests
// =============================================================================
