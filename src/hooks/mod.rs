//! Hook Engine - the four hook primitives.
//!
//! Hooks are methods on [`Scope`], the render context the engine hands to
//! every component function. Each call takes the next slot index from the
//! per-render cursor and advances it, so hooks must be called
//! unconditionally, in the same order, on every render of a component.
//! The engine checks slot tags across renders and reports
//! [`Error::HookOrderViolation`](crate::types::Error) instead of silently
//! corrupting unrelated slots.
//!
//! # Example
//!
//! ```ignore
//! use wisp_ui::{Scope, Props, VNode, HostTag, el};
//!
//! fn counter(cx: &mut Scope, _props: &Props) -> VNode {
//!     let (count, set_count) = cx.use_state(0i64);
//!     let doubled = cx.use_memo((count,), move || count * 2);
//!
//!     let on_click = {
//!         let set_count = set_count.clone();
//!         move |_: &wisp_ui::Event| set_count.update(|n| n + 1)
//!     };
//!
//!     el(
//!         HostTag::Button,
//!         Props::new().on("click", on_click),
//!         vec![format!("{count} (x2 = {doubled})").into()],
//!     )
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::state::{self, Cleanup, ComponentState, Deps, Effect, HookSlot, InstanceKey, IntoDeps};
use crate::types::Error;

// =============================================================================
// Ref Cells
// =============================================================================

/// A mutable cell with identity stable across renders.
///
/// Created once by [`Scope::use_ref`]; every subsequent render returns the
/// same cell, regardless of the initial value passed on later calls. Only
/// the contents mutate.
pub struct Ref<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Default> Default for Ref<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Ref<T> {
    /// Create a standalone cell (outside of any component).
    pub fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(initial)),
        }
    }

    /// Clone out the current contents.
    pub fn current(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    /// Replace the contents.
    pub fn set_current(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Read the contents without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    /// Mutate the contents in place.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.borrow_mut())
    }

    /// Whether two handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.cell.borrow()).finish()
    }
}

// =============================================================================
// Effect Cleanup Conversion
// =============================================================================

/// Return type of an effect callback: either nothing, or a cleanup
/// function to store back on the effect record.
pub trait IntoCleanup: Sized + 'static {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl<F: FnOnce() + 'static> IntoCleanup for F {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(Box::new(self))
    }
}

// =============================================================================
// State Setter
// =============================================================================

/// Cloneable setter handle returned by [`Scope::use_state`].
///
/// The handle is `'static` so event closures can own it; it addresses the
/// slot through the state store rather than borrowing the scope. Setting a
/// value strictly equal (`PartialEq`) to the current one is a no-op;
/// otherwise the slot is written and the host tree is rebuilt from the
/// root, synchronously.
pub struct SetState<T> {
    key: InstanceKey,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<T: Clone + PartialEq + 'static> SetState<T> {
    /// Replace the state with a literal next value.
    pub fn set(&self, next: T) {
        self.apply(|_| next);
    }

    /// Compute the next value from the previous one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.apply(f);
    }

    fn apply(&self, f: impl FnOnce(&T) -> T) {
        // A setter can outlive its instance (the instance was swept or the
        // root unmounted). That is the invalid-hook-call case: log and do
        // nothing rather than panic inside an event handler.
        let Some(state) = state::lookup(&self.key) else {
            tracing::warn!(error = %Error::InvalidHookCall, "state setter ignored");
            return;
        };

        let next = {
            let st = state.borrow();
            let Some(HookSlot::State(slot)) = st.hooks.get(self.index) else {
                tracing::warn!(error = %Error::InvalidHookCall, "state setter ignored");
                return;
            };
            let Some(current) = slot.downcast_ref::<T>() else {
                tracing::warn!(error = %Error::InvalidHookCall, "state setter ignored");
                return;
            };
            let next = f(current);
            if *current == next {
                tracing::trace!(slot = self.index, "state unchanged, no re-render");
                return;
            }
            next
        };

        state.borrow_mut().hooks[self.index] = HookSlot::State(Box::new(next));
        tracing::debug!(slot = self.index, "state updated, rebuilding from root");

        if let Err(err) = crate::render::rerender_root() {
            tracing::warn!(%err, "re-render after state update failed");
        }
    }
}

// =============================================================================
// Scope
// =============================================================================

/// The render context passed to a component function for the duration of
/// one render of one instance.
///
/// Holds the instance's state record and the slot cursor; the four hook
/// methods read and write slots through it. Passing the context explicitly
/// (instead of a process-global "currently rendering component" pointer)
/// keeps the engine re-entrant when a setter fires mid-render.
pub struct Scope {
    key: InstanceKey,
    state: Rc<RefCell<ComponentState>>,
    violation: Option<Error>,
}

impl Scope {
    /// Enter a render of the instance identified by `key`: fetch or create
    /// its state record, reset the slot cursor, stamp the generation.
    pub(crate) fn enter(key: InstanceKey, generation: u64) -> Self {
        let state = state::state_for(&key);
        state.borrow_mut().begin_render(generation);
        Self {
            key,
            state,
            violation: None,
        }
    }

    /// The instance's state record, for the commit step.
    pub(crate) fn state_rc(&self) -> Rc<RefCell<ComponentState>> {
        self.state.clone()
    }

    /// First hook-order violation recorded during this render, if any.
    pub(crate) fn take_violation(&mut self) -> Option<Error> {
        self.violation.take()
    }

    fn advance(&mut self) -> usize {
        let state = self.state.clone();
        let mut st = state.borrow_mut();
        let index = st.hook_index;
        st.hook_index += 1;
        index
    }

    fn record_order_violation(
        &mut self,
        index: usize,
        recorded: &'static str,
        requested: &'static str,
    ) {
        let err = Error::HookOrderViolation {
            index,
            recorded,
            requested,
        };
        tracing::warn!(%err, "hook order violation");
        self.violation.get_or_insert(err);
    }

    // =========================================================================
    // State Hook
    // =========================================================================

    /// Persistent state for this slot. Seeds the slot with `initial` on
    /// the first render; returns the current value and a setter.
    pub fn use_state<T>(&mut self, initial: T) -> (T, SetState<T>)
    where
        T: Clone + PartialEq + 'static,
    {
        let index = self.advance();
        let setter = SetState {
            key: self.key.clone(),
            index,
            _marker: PhantomData,
        };

        let state = self.state.clone();
        let mut st = state.borrow_mut();

        if st.hooks.len() == index {
            st.hooks.push(HookSlot::State(Box::new(initial.clone())));
        } else if !matches!(&st.hooks[index], HookSlot::State(v) if v.downcast_ref::<T>().is_some())
        {
            let recorded = st.hooks[index].tag();
            self.record_order_violation(index, recorded, "state");
            st.hooks[index] = HookSlot::State(Box::new(initial.clone()));
        }

        let value = match &st.hooks[index] {
            HookSlot::State(v) => v.downcast_ref::<T>().cloned().unwrap_or(initial),
            _ => initial,
        };
        (value, setter)
    }

    // =========================================================================
    // Effect Hook
    // =========================================================================

    /// Queue an effect with no dependency sequence: it qualifies on every
    /// render (but still only ever fires at first mount).
    pub fn use_effect<F, C>(&mut self, callback: F)
    where
        F: FnOnce() -> C + 'static,
        C: IntoCleanup,
    {
        self.effect_impl(None, callback);
    }

    /// Queue an effect gated on a dependency sequence: it qualifies on the
    /// first render and whenever any positional element of `deps` differs
    /// from the recorded sequence. An empty sequence qualifies only once.
    pub fn use_effect_with<D, F, C>(&mut self, deps: D, callback: F)
    where
        D: IntoDeps,
        F: FnOnce() -> C + 'static,
        C: IntoCleanup,
    {
        self.effect_impl(Some(deps.into_deps()), callback);
    }

    fn effect_impl<F, C>(&mut self, deps: Option<Deps>, callback: F)
    where
        F: FnOnce() -> C + 'static,
        C: IntoCleanup,
    {
        let index = self.advance();
        let state = self.state.clone();
        let mut st = state.borrow_mut();

        let qualifies = if st.hooks.len() == index {
            st.hooks.push(HookSlot::Effect { deps: None });
            true
        } else {
            match &st.hooks[index] {
                HookSlot::Effect { deps: recorded } => match (&deps, recorded) {
                    // No dependency sequence: qualifies every render.
                    (None, _) => true,
                    (Some(new), Some(prev)) => new.changed_from(Some(prev)),
                    // No recorded sequence counts as changed.
                    (Some(_), None) => true,
                },
                other => {
                    let recorded = other.tag();
                    self.record_order_violation(index, recorded, "effect");
                    true
                }
            }
        };

        if qualifies {
            st.effects
                .push(Effect::new(Box::new(move || callback().into_cleanup())));
            st.hooks[index] = HookSlot::Effect { deps };
        }
    }

    // =========================================================================
    // Ref Hook
    // =========================================================================

    /// A cell created once for this slot. The same cell is returned on
    /// every subsequent render; `initial` is ignored after creation.
    pub fn use_ref<T: 'static>(&mut self, initial: T) -> Ref<T> {
        let index = self.advance();
        let state = self.state.clone();
        let mut st = state.borrow_mut();

        if st.hooks.len() == index {
            let cell = Ref::new(initial);
            st.hooks.push(HookSlot::Ref(Box::new(cell.clone())));
            return cell;
        }

        if let HookSlot::Ref(slot) = &st.hooks[index] {
            if let Some(cell) = slot.downcast_ref::<Ref<T>>() {
                return cell.clone();
            }
        }

        let recorded = st.hooks[index].tag();
        self.record_order_violation(index, recorded, "ref");
        let cell = Ref::new(initial);
        st.hooks[index] = HookSlot::Ref(Box::new(cell.clone()));
        cell
    }

    // =========================================================================
    // Memo Hook
    // =========================================================================

    /// Cache the factory's value behind the shared dependency rule. An
    /// unchanged hit returns the cached allocation itself and never
    /// re-invokes the factory.
    pub fn use_memo<T, D>(&mut self, deps: D, factory: impl FnOnce() -> T) -> Rc<T>
    where
        T: 'static,
        D: IntoDeps,
    {
        let index = self.advance();
        let deps = deps.into_deps();
        let state = self.state.clone();

        // Decide under the borrow; run the factory outside it so a factory
        // that touches the store cannot trip the RefCell.
        let cached: Option<Rc<T>> = {
            let mut st = state.borrow_mut();
            if st.hooks.len() == index {
                // Placeholder until the factory's value lands below.
                st.hooks.push(HookSlot::Memo {
                    value: Box::new(()),
                    deps: ().into_deps(),
                });
                None
            } else {
                match &st.hooks[index] {
                    HookSlot::Memo {
                        value,
                        deps: recorded,
                    } => {
                        if deps.changed_from(Some(recorded)) {
                            None
                        } else {
                            // A downcast miss means the cached type changed;
                            // recompute without flagging an order violation.
                            value.downcast_ref::<Rc<T>>().cloned()
                        }
                    }
                    other => {
                        let recorded = other.tag();
                        self.record_order_violation(index, recorded, "memo");
                        None
                    }
                }
            }
        };

        if let Some(value) = cached {
            return value;
        }

        let value = Rc::new(factory());
        state.borrow_mut().hooks[index] = HookSlot::Memo {
            value: Box::new(value.clone()),
            deps,
        };
        value
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{instance_count, reset_store};
    use std::cell::Cell;

    fn test_key() -> InstanceKey {
        InstanceKey::new(vec![0], 0xbeef)
    }

    fn scope() -> Scope {
        Scope::enter(test_key(), 1)
    }

    #[test]
    fn test_use_state_seeds_once_and_persists() {
        reset_store();

        let (value, setter) = scope().use_state(7i32);
        assert_eq!(value, 7);

        setter.set(42);

        // A later render sees the written value, not the initial.
        let (value, _) = scope().use_state(7i32);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_set_state_equal_value_is_noop() {
        reset_store();

        let (_, setter) = scope().use_state(5i32);
        setter.set(5);

        let (value, _) = scope().use_state(0i32);
        assert_eq!(value, 5);
    }

    #[test]
    fn test_set_state_updater_sees_previous() {
        reset_store();

        let (_, setter) = scope().use_state(10i32);
        setter.update(|n| n + 1);
        setter.update(|n| n * 2);

        let (value, _) = scope().use_state(0i32);
        assert_eq!(value, 22);
    }

    #[test]
    fn test_setter_after_sweep_is_ignored() {
        reset_store();

        let (_, setter) = scope().use_state(1i32);
        reset_store();
        assert_eq!(instance_count(), 0);

        // Must not panic, must not resurrect the instance.
        setter.set(2);
        assert_eq!(instance_count(), 0);
    }

    #[test]
    fn test_use_ref_returns_same_cell_every_render() {
        reset_store();

        let first = scope().use_ref(0i32);
        first.set_current(9);

        let second = scope().use_ref(100i32);
        assert!(first.ptr_eq(&second));
        assert_eq!(second.current(), 9);
    }

    #[test]
    fn test_use_memo_caches_by_deps() {
        reset_store();

        let runs = Rc::new(Cell::new(0u32));

        let r = runs.clone();
        let first = scope().use_memo((2i32,), move || {
            r.set(r.get() + 1);
            2 * 2
        });
        assert_eq!(*first, 4);
        assert_eq!(runs.get(), 1);

        // Same deps: cached allocation, factory not re-invoked.
        let r = runs.clone();
        let second = scope().use_memo((2i32,), move || {
            r.set(r.get() + 1);
            0
        });
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(runs.get(), 1);

        // Changed deps: recomputed.
        let r = runs.clone();
        let third = scope().use_memo((3i32,), move || {
            r.set(r.get() + 1);
            3 * 3
        });
        assert_eq!(*third, 9);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_effect_queues_by_dependency_rule() {
        reset_store();

        let queued = |cx: &mut Scope, dep: i32| {
            cx.use_effect_with((dep,), || {});
            cx.state_rc().borrow().effects.len()
        };

        assert_eq!(queued(&mut scope(), 1), 1);
        assert_eq!(queued(&mut scope(), 1), 1); // unchanged deps: not re-queued
        assert_eq!(queued(&mut scope(), 2), 2); // changed deps: re-queued
    }

    #[test]
    fn test_effect_without_deps_queues_every_render() {
        reset_store();

        for expected in 1..=3 {
            let mut cx = scope();
            cx.use_effect(|| {});
            assert_eq!(cx.state_rc().borrow().effects.len(), expected);
        }
    }

    #[test]
    fn test_effect_empty_deps_queues_once() {
        reset_store();

        for _ in 0..3 {
            let mut cx = scope();
            cx.use_effect_with((), || {});
            assert_eq!(cx.state_rc().borrow().effects.len(), 1);
        }
    }

    #[test]
    fn test_slot_count_stable_across_renders() {
        reset_store();

        for _ in 0..5 {
            let mut cx = scope();
            let _ = cx.use_state(0i32);
            cx.use_effect_with((), || {});
            let _ = cx.use_ref(0i32);
            let _ = cx.use_memo((), || 1i32);

            let st = cx.state_rc();
            let st = st.borrow();
            assert_eq!(st.hooks.len(), 4);
            assert_eq!(st.hooks[0].tag(), "state");
            assert_eq!(st.hooks[1].tag(), "effect");
            assert_eq!(st.hooks[2].tag(), "ref");
            assert_eq!(st.hooks[3].tag(), "memo");
        }
    }

    #[test]
    fn test_hook_order_violation_is_recorded() {
        reset_store();

        {
            let mut cx = scope();
            let _ = cx.use_state(0i32);
            assert!(cx.take_violation().is_none());
        }

        // Same slot requested as a ref on the next render.
        let mut cx = scope();
        let _ = cx.use_ref(0i32);
        assert_eq!(
            cx.take_violation(),
            Some(Error::HookOrderViolation {
                index: 0,
                recorded: "state",
                requested: "ref",
            })
        );
    }
}
