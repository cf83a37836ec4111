//! The hook dispatch table.
//!
//! [`HookTable::build`] flattens every registered plugin's hooks into
//! per-substep dispatch lists, split by level: core entries run on the
//! scheduler thread, thread entries run on every worker. Order is
//! registry order, then each plugin's own hook order. Built exactly
//! once per run and read-only thereafter, so sharing it across worker
//! threads needs no locking.
//!
//! Out-of-range substeps and hooks with no callback are rejected here,
//! before any thread spawns — a registration that could never fire is
//! a configuration bug, not something to ignore silently.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use stride_core::{CoreFn, HookError, PluginRegistry, RunContext, ThreadFn, WorkerId};

// ── Entries ────────────────────────────────────────────────────────

/// A core-level hook bound into the table, with its provenance.
pub struct CoreEntry {
    plugin: String,
    description: String,
    callback: CoreFn,
}

impl CoreEntry {
    /// Invoke the callback.
    pub fn call(&self, ctx: &RunContext) -> Result<(), HookError> {
        (self.callback)(ctx)
    }

    /// Name of the plugin that registered this hook.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// The hook's description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for CoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreEntry")
            .field("plugin", &self.plugin)
            .field("description", &self.description)
            .finish()
    }
}

/// A thread-level hook bound into the table, with its provenance.
pub struct ThreadEntry {
    plugin: String,
    description: String,
    callback: ThreadFn,
}

impl ThreadEntry {
    /// Invoke the callback with the calling worker's identity.
    pub fn call(&self, ctx: &RunContext, worker: WorkerId, name: &str) -> Result<(), HookError> {
        (self.callback)(ctx, worker, name)
    }

    /// Name of the plugin that registered this hook.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// The hook's description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for ThreadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadEntry")
            .field("plugin", &self.plugin)
            .field("description", &self.description)
            .finish()
    }
}

// ── HookTableError ─────────────────────────────────────────────────

/// Errors detected while building the dispatch table.
#[derive(Debug, PartialEq, Eq)]
pub enum HookTableError {
    /// A hook targets a substep outside `[0, substeps)`.
    SubStepOutOfRange {
        /// Plugin that registered the hook.
        plugin: String,
        /// The hook's description.
        description: String,
        /// The out-of-range substep.
        substep: u32,
        /// The configured substeps-per-step bound.
        substeps: u32,
    },
    /// A hook carries neither a core nor a thread callback.
    EmptyHook {
        /// Plugin that registered the hook.
        plugin: String,
        /// The hook's description.
        description: String,
    },
}

impl fmt::Display for HookTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubStepOutOfRange {
                plugin,
                description,
                substep,
                substeps,
            } => write!(
                f,
                "hook '{description}' from plugin '{plugin}' targets substep {substep}, \
                 outside the configured range [0, {substeps})"
            ),
            Self::EmptyHook {
                plugin,
                description,
            } => write!(
                f,
                "hook '{description}' from plugin '{plugin}' has no callback"
            ),
        }
    }
}

impl Error for HookTableError {}

// ── HookTable ──────────────────────────────────────────────────────

/// Per-substep dispatch lists for core and thread hooks.
pub struct HookTable {
    core: Vec<SmallVec<[CoreEntry; 2]>>,
    thread: Vec<SmallVec<[ThreadEntry; 2]>>,
    substeps: u32,
}

impl HookTable {
    /// Flatten every plugin's hooks into a dispatch table.
    ///
    /// Iterates the registry in registration order and each plugin's
    /// `hooks()` in their returned order, so dispatch order within a
    /// substep is fully determined. No deduplication or conflict
    /// detection: two plugins registering at the same substep both run.
    pub fn build(registry: &PluginRegistry, substeps: u32) -> Result<Self, HookTableError> {
        let mut core: Vec<SmallVec<[CoreEntry; 2]>> =
            std::iter::repeat_with(SmallVec::new).take(substeps as usize).collect();
        let mut thread: Vec<SmallVec<[ThreadEntry; 2]>> =
            std::iter::repeat_with(SmallVec::new).take(substeps as usize).collect();

        for plugin in registry.iter() {
            for hook in plugin.hooks() {
                if hook.substep >= substeps {
                    return Err(HookTableError::SubStepOutOfRange {
                        plugin: plugin.name().to_string(),
                        description: hook.description,
                        substep: hook.substep,
                        substeps,
                    });
                }
                if hook.is_empty() {
                    return Err(HookTableError::EmptyHook {
                        plugin: plugin.name().to_string(),
                        description: hook.description,
                    });
                }
                trace!(
                    plugin = plugin.name(),
                    hook = %hook.description,
                    substep = hook.substep,
                    core = hook.has_core(),
                    thread = hook.has_thread(),
                    "registered hook"
                );
                let slot = hook.substep as usize;
                if let Some(callback) = hook.core {
                    core[slot].push(CoreEntry {
                        plugin: plugin.name().to_string(),
                        description: hook.description.clone(),
                        callback,
                    });
                }
                if let Some(callback) = hook.thread {
                    thread[slot].push(ThreadEntry {
                        plugin: plugin.name().to_string(),
                        description: hook.description,
                        callback,
                    });
                }
            }
        }

        let table = Self {
            core,
            thread,
            substeps,
        };
        debug!(
            substeps,
            core_hooks = table.core_hook_count(),
            thread_hooks = table.thread_hook_count(),
            "hook table built"
        );
        Ok(table)
    }

    /// A table with no hooks at all.
    pub fn empty(substeps: u32) -> Self {
        Self {
            core: std::iter::repeat_with(SmallVec::new).take(substeps as usize).collect(),
            thread: std::iter::repeat_with(SmallVec::new).take(substeps as usize).collect(),
            substeps,
        }
    }

    /// The substeps-per-step bound this table was built against.
    pub fn substeps(&self) -> u32 {
        self.substeps
    }

    /// Core-level hooks registered at `substep`, in dispatch order.
    pub fn core_hooks(&self, substep: u32) -> &[CoreEntry] {
        self.core
            .get(substep as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Thread-level hooks registered at `substep`, in dispatch order.
    pub fn thread_hooks(&self, substep: u32) -> &[ThreadEntry] {
        self.thread
            .get(substep as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of core-level entries.
    pub fn core_hook_count(&self) -> usize {
        self.core.iter().map(SmallVec::len).sum()
    }

    /// Total number of thread-level entries.
    pub fn thread_hook_count(&self) -> usize {
        self.thread.iter().map(SmallVec::len).sum()
    }

    /// Whether the table holds no hooks.
    pub fn is_empty(&self) -> bool {
        self.core_hook_count() == 0 && self.thread_hook_count() == 0
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("substeps", &self.substeps)
            .field("core_hooks", &self.core_hook_count())
            .field("thread_hooks", &self.thread_hook_count())
            .finish()
    }
}
