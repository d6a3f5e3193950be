//! Render/Commit Engine.
//!
//! A single recursive walk turns a virtual element tree into host nodes:
//!
//! - text elements become the container's text content (no node of their
//!   own),
//! - fragments render their children directly into the container,
//! - host and component elements each get a freshly created node
//!   (components are wrapped in the generic container tag), props applied
//!   in insertion order, and the node appended to the container last.
//!
//! Rendering is always a full subtree construction. There is no reuse of
//! previously created host nodes, no keyed matching, no diffing; a
//! re-render clears the root container and rebuilds everything. Component
//! effects are committed right after the component function returns, and
//! only at the instance's first commit.

mod root;

pub use root::{mount, rerender_root, MountHandle};

use crate::dom::HostNode;
use crate::element::{handler_event_name, ElementKind, VNode, REF_KEY};
use crate::hooks::Scope;
use crate::state::InstanceKey;
use crate::types::{Error, HostTag};

// =============================================================================
// Entry Point
// =============================================================================

/// Render `element` into `container`, appending the constructed subtree.
///
/// This is one complete render pass: component instances visited by the
/// walk are stamped, and when the outermost pass ends, instances that were
/// not visited are reclaimed. Errors are hook-protocol violations detected
/// mid-walk; the host tree is left however far construction got (there are
/// no error boundaries).
pub fn render(element: &VNode, container: &HostNode) -> Result<(), Error> {
    let pass = root::RenderPass::begin();
    let mut path = Vec::new();
    render_node(element, container, &mut path, pass.generation())
}

// =============================================================================
// Recursive Walk
// =============================================================================

fn render_node(
    element: &VNode,
    container: &HostNode,
    path: &mut Vec<u32>,
    generation: u64,
) -> Result<(), Error> {
    match &element.kind {
        // Text renders as a property of the existing container; no node is
        // created and no children are processed.
        ElementKind::Text(text) => {
            container.set_text(text.clone());
            return Ok(());
        }
        // Fragments contribute no node; children land in the container.
        ElementKind::Fragment => {
            return render_children(&element.children, container, path, generation);
        }
        ElementKind::Host(_) | ElementKind::Component(_) => {}
    }

    // Host and component elements both resolve a fresh node; component
    // output gets wrapped in the generic container tag.
    let node = match &element.kind {
        ElementKind::Host(tag) => HostNode::create(*tag),
        _ => HostNode::create(HostTag::default()),
    };

    apply_props(element, &node);

    match &element.kind {
        ElementKind::Component(component) => {
            let key = InstanceKey::new(path.clone(), *component as usize);
            let mut scope = Scope::enter(key, generation);

            let rendered = component(&mut scope, &element.props);
            if let Some(err) = scope.take_violation() {
                return Err(err);
            }

            commit_effects(&scope);

            if let Some(node_ref) = element.props.get_node_ref() {
                node_ref.set_current(Some(node.clone()));
            }

            path.push(0);
            let result = render_node(&rendered, &node, path, generation);
            path.pop();
            result?;
        }
        _ => {
            render_children(&element.children, &node, path, generation)?;
        }
    }

    container.append_child(&node);
    Ok(())
}

fn render_children(
    children: &[VNode],
    container: &HostNode,
    path: &mut Vec<u32>,
    generation: u64,
) -> Result<(), Error> {
    for (index, child) in children.iter().enumerate() {
        path.push(index as u32);
        let result = render_node(child, container, path, generation);
        path.pop();
        result?;
    }
    Ok(())
}

// =============================================================================
// Props & Commit
// =============================================================================

/// Apply every property except the reserved `children`/`ref` entries:
/// `on*` keys bind listeners (event name = remainder, case-folded),
/// scalars assign as attributes.
fn apply_props(element: &VNode, node: &HostNode) {
    for (key, value) in element.props.iter() {
        if key == REF_KEY {
            continue;
        }
        if let Some(event) = handler_event_name(key) {
            if let Some(handler) = value.as_handler() {
                node.add_listener(event, handler);
                continue;
            }
        }
        if let Some(text) = value.as_attr_text() {
            node.set_attribute(key, text);
        }
    }
}

/// Run the instance's queued effects if it has not committed before, then
/// mark it mounted. Effects fire once, at first mount; committed records
/// stay queued so their stored cleanups remain reachable.
fn commit_effects(scope: &Scope) {
    let state = scope.state_rc();
    if state.borrow().mounted {
        return;
    }

    // Drain the queue so callbacks run outside the borrow: a callback may
    // call a state setter and re-enter render on this same stack.
    let mut pending = std::mem::take(&mut state.borrow_mut().effects);
    tracing::trace!(effects = pending.len(), "committing mount effects");

    for effect in &mut pending {
        if let Some(cleanup) = effect.cleanup.take() {
            cleanup();
        }
        if let Some(callback) = effect.callback.take() {
            effect.cleanup = callback();
        }
    }

    let mut st = state.borrow_mut();
    let queued_meanwhile = std::mem::take(&mut st.effects);
    st.effects = pending;
    st.effects.extend(queued_meanwhile);
    st.mounted = true;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{el, Props};
    use crate::state::reset_store;

    #[test]
    fn test_text_sets_container_content_without_nodes() {
        reset_store();

        let container = HostNode::create(HostTag::Div);
        render(&VNode::text("plain"), &container).unwrap();

        assert_eq!(container.child_count(), 0);
        assert_eq!(container.text().as_deref(), Some("plain"));
    }

    #[test]
    fn test_host_element_creates_node_with_props() {
        reset_store();

        let container = HostNode::create(HostTag::Div);
        let tree = el(
            HostTag::Button,
            Props::new().attr("style", "padding: 4px;").on("click", |_| {}),
            vec!["press".into()],
        );
        render(&tree, &container).unwrap();

        assert_eq!(container.child_count(), 1);
        let button = container.child(0).unwrap();
        assert_eq!(button.tag(), HostTag::Button);
        assert_eq!(button.attribute("style").as_deref(), Some("padding: 4px;"));
        assert_eq!(button.listener_count(), 1);
        assert_eq!(button.text().as_deref(), Some("press"));
    }

    #[test]
    fn test_fragment_children_land_in_container() {
        reset_store();

        let container = HostNode::create(HostTag::Div);
        let tree = VNode::fragment(vec![
            el(HostTag::P, Props::new(), vec![]).into(),
            el(HostTag::P, Props::new(), vec![]).into(),
            el(HostTag::Span, Props::new(), vec![]).into(),
        ]);
        render(&tree, &container).unwrap();

        assert_eq!(container.child_count(), 3);
        assert_eq!(container.child(2).unwrap().tag(), HostTag::Span);
    }

    #[test]
    fn test_nested_host_children() {
        reset_store();

        let container = HostNode::create(HostTag::Div);
        let tree = el(
            HostTag::Div,
            Props::new(),
            vec![
                el(HostTag::H1, Props::new(), vec!["Title".into()]).into(),
                el(HostTag::P, Props::new(), vec!["Body".into()]).into(),
            ],
        );
        render(&tree, &container).unwrap();

        assert_eq!(container.text_content(), "TitleBody");
        let outer = container.child(0).unwrap();
        assert_eq!(outer.child_count(), 2);
        assert_eq!(outer.child(0).unwrap().tag(), HostTag::H1);
    }
}
