//! Root Re-render Trigger - application mount and rebuild-from-root.
//!
//! A thread-local slot holds the most recently mounted root element and
//! its container. State setters call [`rerender_root`] on a real change:
//! the container's content is cleared entirely and the stored element is
//! rendered again. This is synchronous and unbatched; a setter fired from
//! inside a render re-enters here on the same call stack.
//!
//! The module also owns render-pass bookkeeping: every pass advances a
//! generation counter, and when the outermost pass finishes, component
//! instances the pass did not visit are reclaimed from the state store.

use std::cell::{Cell, RefCell};

use crate::dom::HostNode;
use crate::element::VNode;
use crate::state;
use crate::types::Error;

// =============================================================================
// Root Slot & Pass Bookkeeping
// =============================================================================

struct RootSlot {
    element: VNode,
    container: HostNode,
}

thread_local! {
    /// Last mounted root element and its container.
    static ROOT: RefCell<Option<RootSlot>> = const { RefCell::new(None) };

    /// Monotonic render-pass counter; stamps visited instances.
    static GENERATION: Cell<u64> = const { Cell::new(0) };

    /// Depth of nested render passes (setters fired mid-render recurse).
    static DEPTH: Cell<u32> = const { Cell::new(0) };

    /// Generation of the outermost in-flight pass; the sweep floor.
    static SWEEP_FLOOR: Cell<u64> = const { Cell::new(0) };
}

/// One render pass. Dropping the guard closes the pass; closing the
/// outermost pass sweeps instances that no render reached since the pass
/// began.
pub(crate) struct RenderPass {
    generation: u64,
}

impl RenderPass {
    pub(crate) fn begin() -> Self {
        let generation = GENERATION.with(|g| {
            let next = g.get() + 1;
            g.set(next);
            next
        });
        let depth = DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        if depth == 1 {
            SWEEP_FLOOR.with(|floor| floor.set(generation));
        }
        Self { generation }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        let depth = DEPTH.with(|d| {
            let next = d.get().saturating_sub(1);
            d.set(next);
            next
        });
        if depth == 0 {
            state::sweep(SWEEP_FLOOR.with(Cell::get));
        }
    }
}

// =============================================================================
// Mount
// =============================================================================

/// Handle returned by [`mount`] that allows unmounting.
#[derive(Debug)]
pub struct MountHandle {
    _priv: (),
}

impl MountHandle {
    /// Clear the container, drop the root slot, and drop all component
    /// state. Stored effect cleanups are discarded without running;
    /// cleanups never run on unmount.
    pub fn unmount(self) {
        if let Some(slot) = ROOT.with(|root| root.borrow_mut().take()) {
            slot.container.clear();
        }
        state::reset_store();
        tracing::debug!("unmounted root");
    }
}

/// Mount `element` into `container` and perform the first render.
///
/// The element and container are stored as the root slot so state setters
/// can rebuild from the root later. Mounting a new root replaces the slot.
pub fn mount(element: VNode, container: HostNode) -> Result<MountHandle, Error> {
    ROOT.with(|root| {
        *root.borrow_mut() = Some(RootSlot {
            element: element.clone(),
            container: container.clone(),
        });
    });
    tracing::debug!("mounting root");
    super::render(&element, &container)?;
    Ok(MountHandle { _priv: () })
}

// =============================================================================
// Re-render
// =============================================================================

/// Discard the mounted container's content and render the stored root
/// element again. A no-op (with a trace) when nothing is mounted; the
/// state write that triggered the call still sticks.
pub fn rerender_root() -> Result<(), Error> {
    let Some((element, container)) = ROOT.with(|root| {
        root.borrow()
            .as_ref()
            .map(|slot| (slot.element.clone(), slot.container.clone()))
    }) else {
        tracing::debug!("no mounted root, skipping re-render");
        return Ok(());
    };

    tracing::debug!("re-rendering root");
    container.clear();
    super::render(&element, &container)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{el, Props};
    use crate::types::HostTag;

    #[test]
    fn test_mount_renders_and_stores_root() {
        state::reset_store();

        let container = HostNode::create(HostTag::Div);
        let handle = mount(
            el(HostTag::P, Props::new(), vec!["hello".into()]),
            container.clone(),
        )
        .unwrap();

        assert_eq!(container.text_content(), "hello");

        // Re-render rebuilds the same content from the stored element.
        rerender_root().unwrap();
        assert_eq!(container.child_count(), 1);
        assert_eq!(container.text_content(), "hello");

        handle.unmount();
        assert_eq!(container.child_count(), 0);
    }

    #[test]
    fn test_rerender_replaces_nodes() {
        state::reset_store();

        let container = HostNode::create(HostTag::Div);
        let handle = mount(el(HostTag::P, Props::new(), vec![]), container.clone()).unwrap();

        let before = container.child(0).unwrap();
        rerender_root().unwrap();
        let after = container.child(0).unwrap();

        // Full rebuild: a fresh node, not the old one reused.
        assert!(!before.ptr_eq(&after));
        handle.unmount();
    }

    #[test]
    fn test_rerender_without_mount_is_noop() {
        state::reset_store();

        // Make sure no root is left over from another test on this thread.
        let container = HostNode::create(HostTag::Div);
        let handle = mount(el(HostTag::P, Props::new(), vec![]), container).unwrap();
        handle.unmount();

        assert!(rerender_root().is_ok());
    }
}
