//! Hook records: per-substep callbacks registered by plugins.
//!
//! A [`Hook`] binds a substep index to a core-level callback (run
//! serially by the scheduler after all workers complete the substep),
//! a thread-level callback (run concurrently by every worker during
//! the substep), or both. At least one callback must be present; the
//! engine rejects empty hooks when the dispatch table is built.

use std::fmt;

use crate::context::RunContext;
use crate::error::HookError;
use crate::id::WorkerId;

/// A core-level hook callback.
///
/// Invoked exactly once per visited (step, substep) on the scheduler
/// thread, strictly after every worker has completed the substep.
pub type CoreFn = Box<dyn Fn(&RunContext) -> Result<(), HookError> + Send + Sync>;

/// A thread-level hook callback.
///
/// Invoked once per worker per visited (step, substep), concurrently
/// across workers, with the calling worker's id and name. Any shared
/// state it mutates across workers is the plugin's to protect.
pub type ThreadFn =
    Box<dyn Fn(&RunContext, WorkerId, &str) -> Result<(), HookError> + Send + Sync>;

/// A callback registration for one substep.
///
/// Immutable once handed to the engine. Constructed via
/// [`Hook::core`], [`Hook::thread`], or [`Hook::new`] plus the
/// `with_*` combinators for hooks carrying both callbacks.
pub struct Hook {
    /// Substep this hook fires at. Must satisfy
    /// `substep < substeps-per-step`; the hook table builder rejects
    /// out-of-range registrations.
    pub substep: u32,
    /// Core-level callback, if any.
    pub core: Option<CoreFn>,
    /// Thread-level callback, if any.
    pub thread: Option<ThreadFn>,
    /// Human-readable description used in logs and error reports.
    pub description: String,
}

impl Hook {
    /// A hook with no callbacks yet. Attach at least one via
    /// [`with_core`](Self::with_core) or [`with_thread`](Self::with_thread).
    pub fn new(substep: u32, description: impl Into<String>) -> Self {
        Self {
            substep,
            core: None,
            thread: None,
            description: description.into(),
        }
    }

    /// A hook with only a core-level callback.
    pub fn core<F>(substep: u32, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RunContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self::new(substep, description).with_core(f)
    }

    /// A hook with only a thread-level callback.
    pub fn thread<F>(substep: u32, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RunContext, WorkerId, &str) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self::new(substep, description).with_thread(f)
    }

    /// Attach a core-level callback, replacing any existing one.
    pub fn with_core<F>(mut self, f: F) -> Self
    where
        F: Fn(&RunContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.core = Some(Box::new(f));
        self
    }

    /// Attach a thread-level callback, replacing any existing one.
    pub fn with_thread<F>(mut self, f: F) -> Self
    where
        F: Fn(&RunContext, WorkerId, &str) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.thread = Some(Box::new(f));
        self
    }

    /// Whether a core-level callback is present.
    pub fn has_core(&self) -> bool {
        self.core.is_some()
    }

    /// Whether a thread-level callback is present.
    pub fn has_thread(&self) -> bool {
        self.thread.is_some()
    }

    /// Whether the hook carries no callback at all.
    ///
    /// Such a hook is invalid; the hook table builder rejects it.
    pub fn is_empty(&self) -> bool {
        self.core.is_none() && self.thread.is_none()
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("substep", &self.substep)
            .field("core", &self.core.is_some())
            .field("thread", &self.thread.is_some())
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_constructor_sets_only_core() {
        let hook = Hook::core(1, "tally", |_ctx| Ok(()));
        assert!(hook.has_core());
        assert!(!hook.has_thread());
        assert!(!hook.is_empty());
        assert_eq!(hook.substep, 1);
        assert_eq!(hook.description, "tally");
    }

    #[test]
    fn thread_constructor_sets_only_thread() {
        let hook = Hook::thread(0, "advance", |_ctx, _id, _name| Ok(()));
        assert!(!hook.has_core());
        assert!(hook.has_thread());
    }

    #[test]
    fn combinators_build_dual_hooks() {
        let hook = Hook::new(2, "both")
            .with_core(|_ctx| Ok(()))
            .with_thread(|_ctx, _id, _name| Ok(()));
        assert!(hook.has_core());
        assert!(hook.has_thread());
    }

    #[test]
    fn new_without_callbacks_is_empty() {
        assert!(Hook::new(0, "nothing").is_empty());
    }

    #[test]
    fn debug_shows_callback_presence_not_bodies() {
        let hook = Hook::core(3, "tally", |_ctx| Ok(()));
        let debug = format!("{hook:?}");
        assert!(debug.contains("substep: 3"));
        assert!(debug.contains("core: true"));
        assert!(debug.contains("thread: false"));
    }

    #[test]
    fn callbacks_receive_worker_identity() {
        let hook = Hook::thread(0, "check identity", |_ctx, id, name| {
            if id == crate::WorkerId(1) && name == "worker-1" {
                Ok(())
            } else {
                Err(HookError::ExecutionFailed {
                    reason: format!("unexpected identity {id}/{name}"),
                })
            }
        });
        let ctx = RunContext::new(2, 0);
        let f = hook.thread.as_ref().unwrap();
        assert!(f(&ctx, crate::WorkerId(1), "worker-1").is_ok());
        assert!(f(&ctx, crate::WorkerId(0), "worker-0").is_err());
    }
}
