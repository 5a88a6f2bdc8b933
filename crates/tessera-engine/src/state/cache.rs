use core::fmt;
use core::ops::{Deref, DerefMut};

/// Describes one piece of GPU pipeline state.
///
/// Implementors are zero-sized markers; all behavior lives in the associated
/// functions so `State<K>` is fully monomorphized.
pub trait StateKind {
    type Value: Clone + PartialEq + fmt::Debug;

    /// Context captured at slot construction (e.g. a texture unit), passed back
    /// to every `set`/`get`. Use `()` when the state is global.
    type Args: fmt::Debug;

    /// The submission target.
    type Backend: ?Sized;

    /// Value the GPU holds before anything has been submitted.
    fn default_value() -> Self::Value;

    /// Submits `value` to the backend.
    fn set(backend: &mut Self::Backend, value: &Self::Value, args: &Self::Args);

    /// Reads the value the backend currently holds.
    fn get(backend: &Self::Backend, args: &Self::Args) -> Self::Value;
}

/// Cached slot for one piece of GPU state.
///
/// Slots start dirty: the first assignment always submits, since the real GPU
/// value is unknown until then.
pub struct State<K: StateKind> {
    current: K::Value,
    dirty: bool,
    args: K::Args,
}

impl<K: StateKind> State<K> {
    pub fn new(args: K::Args) -> Self {
        Self {
            current: K::default_value(),
            dirty: true,
            args,
        }
    }

    /// Submits `value` unless the slot is clean and already holds it.
    ///
    /// Returns whether a submission happened.
    pub fn assign(&mut self, backend: &mut K::Backend, value: K::Value) -> bool {
        if !self.differs_from(&value) {
            return false;
        }
        self.set_current_value(value);
        K::set(backend, &self.current, &self.args);
        true
    }

    /// `true` if assigning `value` would submit.
    #[inline]
    pub fn differs_from(&self, value: &K::Value) -> bool {
        self.dirty || self.current != *value
    }

    /// Records `value` as current without submitting.
    ///
    /// For callers that changed the GPU state through another path and want the
    /// cache to reflect it.
    #[inline]
    pub fn set_current_value(&mut self, value: K::Value) {
        self.dirty = false;
        self.current = value;
    }

    /// Forces the next assignment to submit, whatever the cached value.
    ///
    /// Use after the real state may have changed behind the cache (new render
    /// pass, device loss, raw backend calls).
    #[inline]
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn current(&self) -> &K::Value {
        &self.current
    }

    #[inline]
    pub fn args(&self) -> &K::Args {
        &self.args
    }
}

impl<K: StateKind<Args = ()>> Default for State<K> {
    fn default() -> Self {
        Self::new(())
    }
}

impl<K: StateKind> fmt::Debug for State<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("current", &self.current)
            .field("dirty", &self.dirty)
            .field("args", &self.args)
            .finish()
    }
}

/// Scoped override: captures the backend's real value on construction and
/// submits it again when dropped, including during unwinding.
///
/// The guard dereferences to the backend, so the scope changes state through
/// the guard with raw `K::set` calls. Do not assign through a cached [`State`]
/// slot of the same kind inside the scope; the slot would remember the
/// temporary value while the guard restores the old one.
pub struct Preserve<'a, K: StateKind> {
    backend: &'a mut K::Backend,
    args: K::Args,
    value: K::Value,
}

impl<'a, K: StateKind> Preserve<'a, K> {
    pub fn new(backend: &'a mut K::Backend, args: K::Args) -> Self {
        let value = K::get(backend, &args);
        Self { backend, args, value }
    }

    /// The value that will be restored.
    #[inline]
    pub fn saved(&self) -> &K::Value {
        &self.value
    }
}

impl<K: StateKind> Deref for Preserve<'_, K> {
    type Target = K::Backend;

    fn deref(&self) -> &K::Backend {
        self.backend
    }
}

impl<K: StateKind> DerefMut for Preserve<'_, K> {
    fn deref_mut(&mut self) -> &mut K::Backend {
        self.backend
    }
}

impl<K: StateKind> Drop for Preserve<'_, K> {
    fn drop(&mut self) {
        K::set(self.backend, &self.value, &self.args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend counting submissions for a single integer register bank.
    #[derive(Debug, Default)]
    struct Registers {
        values: [i32; 4],
        submissions: usize,
    }

    #[derive(Debug)]
    struct Register;

    #[derive(Debug, Clone, Copy)]
    struct Slot {
        index: usize,
    }

    impl StateKind for Register {
        type Value = i32;
        type Args = Slot;
        type Backend = Registers;

        fn default_value() -> i32 {
            0
        }

        fn set(backend: &mut Registers, value: &i32, args: &Slot) {
            backend.values[args.index] = *value;
            backend.submissions += 1;
        }

        fn get(backend: &Registers, args: &Slot) -> i32 {
            backend.values[args.index]
        }
    }

    fn slot(index: usize) -> State<Register> {
        State::new(Slot { index })
    }

    // ── State ─────────────────────────────────────────────────────────────

    #[test]
    fn first_assignment_submits_even_default() {
        let mut regs = Registers::default();
        let mut s = slot(0);
        assert!(s.is_dirty());
        assert!(s.assign(&mut regs, 0));
        assert_eq!(regs.submissions, 1);
        assert!(!s.is_dirty());
    }

    #[test]
    fn same_value_twice_submits_once() {
        let mut regs = Registers::default();
        let mut s = slot(1);
        s.assign(&mut regs, 5);
        assert!(!s.assign(&mut regs, 5));
        assert_eq!(regs.submissions, 1);
        assert_eq!(regs.values[1], 5);
    }

    #[test]
    fn different_value_submits() {
        let mut regs = Registers::default();
        let mut s = slot(0);
        s.assign(&mut regs, 5);
        s.assign(&mut regs, 6);
        assert_eq!(regs.submissions, 2);
        assert_eq!(*s.current(), 6);
    }

    #[test]
    fn set_dirty_forces_resubmission() {
        let mut regs = Registers::default();
        let mut s = slot(0);
        s.assign(&mut regs, 5);
        s.set_dirty();
        assert!(s.assign(&mut regs, 5));
        assert_eq!(regs.submissions, 2);
    }

    #[test]
    fn set_current_value_does_not_submit() {
        let mut regs = Registers::default();
        let mut s = slot(0);
        s.set_current_value(9);
        assert!(!s.differs_from(&9));
        assert!(!s.assign(&mut regs, 9));
        assert_eq!(regs.submissions, 0);
    }

    #[test]
    fn args_route_to_their_register() {
        let mut regs = Registers::default();
        let mut a = slot(2);
        let mut b = slot(3);
        a.assign(&mut regs, 1);
        b.assign(&mut regs, 2);
        assert_eq!(regs.values, [0, 0, 1, 2]);
    }

    // ── Preserve ──────────────────────────────────────────────────────────

    #[test]
    fn preserve_restores_on_scope_exit() {
        let mut regs = Registers { values: [7, 0, 0, 0], submissions: 0 };
        {
            let mut guard = Preserve::<Register>::new(&mut regs, Slot { index: 0 });
            assert_eq!(*guard.saved(), 7);
            Register::set(&mut guard, &42, &Slot { index: 0 });
            assert_eq!(guard.values[0], 42);
        }
        assert_eq!(regs.values[0], 7);
    }

    #[test]
    fn preserve_restores_on_early_return() {
        fn scoped(regs: &mut Registers, bail: bool) -> Option<()> {
            let mut guard = Preserve::<Register>::new(regs, Slot { index: 1 });
            Register::set(&mut guard, &99, &Slot { index: 1 });
            if bail {
                return None;
            }
            Some(())
        }

        let mut regs = Registers { values: [0, 3, 0, 0], submissions: 0 };
        assert!(scoped(&mut regs, true).is_none());
        assert_eq!(regs.values[1], 3);
    }

    #[test]
    fn preserve_restores_on_unwind() {
        let mut regs = Registers { values: [0, 0, 11, 0], submissions: 0 };
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = Preserve::<Register>::new(&mut regs, Slot { index: 2 });
            Register::set(&mut guard, &-1, &Slot { index: 2 });
            panic!("sub-pass failed");
        }));
        assert!(result.is_err());
        assert_eq!(regs.values[2], 11);
    }
}
