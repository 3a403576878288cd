//! Thread affinity checks for the primary context.
//!
//! The layout engine keeps its live snapshots, update batch and transition
//! caches on a single primary context (typically the host's UI thread). A
//! [`ThreadAffinity`] records that thread so the dispatch queue can decide
//! whether a hop is needed and so primary-only operations can assert where
//! they run.
//!
//! ```
//! use cascade_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.debug_assert_same_thread("prepare");
//! ```

use std::thread::{self, ThreadId};

/// The thread a value is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the bound one.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the bound thread.
    ///
    /// `operation` names the primary-only call being guarded and shows up in
    /// the panic message.
    pub fn assert_same_thread(&self, operation: &'static str) {
        if !self.is_same_thread() {
            self.violation(operation);
        }
    }

    /// [`assert_same_thread`](Self::assert_same_thread) in debug builds,
    /// nothing in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self, operation: &'static str) {
        if cfg!(debug_assertions) {
            self.assert_same_thread(operation);
        }
    }

    #[cold]
    #[inline(never)]
    fn violation(&self, operation: &'static str) -> ! {
        let caller = thread::current();
        panic!(
            "`{operation}` must run on the primary context (thread {:?}), \
             but was called from {:?} ({:?}); route it through MainHandle instead",
            self.owner,
            caller.name().unwrap_or("<unnamed>"),
            caller.id(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_to_creating_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        assert_eq!(affinity.thread_id(), thread::current().id());
        affinity.assert_same_thread("test");
    }

    #[test]
    fn test_other_thread_is_detected() {
        let affinity = ThreadAffinity::current();
        let elsewhere = thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!elsewhere);
    }

    #[test]
    fn test_violation_panics_with_operation_name() {
        let affinity = ThreadAffinity::current();
        let panic = thread::spawn(move || affinity.assert_same_thread("commit"))
            .join()
            .unwrap_err();

        let message = panic.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(message.contains("`commit`"), "{message}");
    }
}
