//! # wisp-ui
//!
//! Hook-based declarative UI runtime for Rust.
//!
//! A component is a plain function from a render context and props to a
//! virtual element tree. The runtime walks that tree, materializes an
//! in-memory host tree from it, and gives components persistent, ordered,
//! per-instance state through four hooks (state, effect, ref, memo). Any
//! real state change clears the root container and rebuilds the host tree
//! from scratch. There is no diffing, batching, or scheduling.
//!
//! ## Architecture
//!
//! ```text
//! VNode tree → render walk → component fns (Scope → hooks → state store)
//!                  │
//!                  ▼
//!            host tree mutations ←── setter fires → clear root, walk again
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Host tag set and the crate error type
//! - [`dom`] - In-memory host tree with synthetic event dispatch
//! - [`state`] - Component State Store (hook slots, effects, sweeping)
//! - [`hooks`] - The four hook primitives on the [`Scope`] render context
//! - [`element`] - Virtual element descriptors and construction
//! - [`render`] - Render/commit walk and the root re-render trigger
//!
//! ## Example
//!
//! ```
//! use wisp_ui::{el, mount, Event, HostNode, HostTag, Props, Scope, VNode};
//!
//! fn counter(cx: &mut Scope, _props: &Props) -> VNode {
//!     let (count, set_count) = cx.use_state(0i64);
//!     let on_click = {
//!         let set_count = set_count.clone();
//!         move |_: &Event| set_count.update(|n| n + 1)
//!     };
//!     el(
//!         HostTag::Button,
//!         Props::new().on("click", on_click),
//!         vec![format!("Count: {count}").into()],
//!     )
//! }
//!
//! let container = HostNode::create(HostTag::Div);
//! let handle = mount(VNode::component(counter, Props::new()), container.clone()).unwrap();
//!
//! assert_eq!(container.text_content(), "Count: 0");
//! container.find_by_tag(HostTag::Button).unwrap().emit("click");
//! assert_eq!(container.text_content(), "Count: 1");
//! handle.unmount();
//! ```

pub mod dom;
pub mod element;
pub mod hooks;
pub mod render;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::{Error, HostTag};

pub use dom::{Event, EventHandler, HostNode};

pub use element::{
    el, el_named, handler_event_name, Child, Component, ElementKind, NodeRef, PropValue, Props,
    VNode,
};

pub use hooks::{IntoCleanup, Ref, Scope, SetState};

pub use render::{mount, render, rerender_root, MountHandle};

pub use state::{Cleanup, Deps, IntoDeps};
