//! Synthetic plugins for Stride development.
//!
//! These implement the [`Plugin`] capability contract in-process — no
//! dynamic loading involved — so engine behavior can be tested against
//! known hook bodies: counting dispatches, recording global dispatch
//! order, failing on schedule, or contributing nothing at all.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use stride_core::{Hook, HookError, Plugin, PluginError, RunContext, Version, WorkerId};

fn guard_double_init(
    filename: &mut Option<PathBuf>,
    name: &str,
    path: &Path,
) -> Result<(), PluginError> {
    if filename.is_some() {
        return Err(PluginError::AlreadyInitialized {
            name: name.to_string(),
        });
    }
    *filename = Some(path.to_path_buf());
    Ok(())
}

// ── CountingPlugin ─────────────────────────────────────────────────

/// Registers one dual-level hook at a fixed substep and counts every
/// dispatch. Share the counters via [`core_calls`](CountingPlugin::core_calls)
/// / [`thread_calls`](CountingPlugin::thread_calls) before handing the
/// plugin to a registry.
pub struct CountingPlugin {
    name: String,
    substep: u32,
    core_calls: Arc<AtomicU64>,
    thread_calls: Arc<AtomicU64>,
    filename: Option<PathBuf>,
}

impl CountingPlugin {
    pub fn new(substep: u32) -> Self {
        Self::named("counting", substep)
    }

    pub fn named(name: impl Into<String>, substep: u32) -> Self {
        Self {
            name: name.into(),
            substep,
            core_calls: Arc::new(AtomicU64::new(0)),
            thread_calls: Arc::new(AtomicU64::new(0)),
            filename: None,
        }
    }

    /// Handle to the core dispatch counter.
    pub fn core_calls(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.core_calls)
    }

    /// Handle to the thread dispatch counter (summed across workers).
    pub fn thread_calls(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.thread_calls)
    }
}

impl Plugin for CountingPlugin {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        guard_double_init(&mut self.filename, &self.name, filename)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn description(&self) -> &str {
        "counts hook dispatches"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        let core = Arc::clone(&self.core_calls);
        let thread = Arc::clone(&self.thread_calls);
        vec![Hook::new(self.substep, "count dispatches")
            .with_core(move |_ctx| {
                core.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .with_thread(move |_ctx, _worker, _name| {
                thread.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })]
    }
}

// ── RecordingPlugin ────────────────────────────────────────────────

/// One dispatch observed by [`RecordingPlugin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Core { substep: u32 },
    Thread { substep: u32, worker: WorkerId },
}

/// Registers a dual-level hook at every substep and appends each
/// dispatch to a shared, globally-ordered log. The mutex makes the
/// interleaving of thread events across workers observable, which is
/// what barrier-ordering tests assert on.
pub struct RecordingPlugin {
    substeps: u32,
    events: Arc<Mutex<Vec<Event>>>,
    filename: Option<PathBuf>,
}

impl RecordingPlugin {
    pub fn new(substeps: u32) -> Self {
        Self {
            substeps,
            events: Arc::new(Mutex::new(Vec::new())),
            filename: None,
        }
    }

    /// Handle to the shared event log.
    pub fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        Arc::clone(&self.events)
    }
}

impl Plugin for RecordingPlugin {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        guard_double_init(&mut self.filename, "recording", filename)
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn description(&self) -> &str {
        "records global dispatch order"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        (0..self.substeps)
            .map(|substep| {
                let core_log = Arc::clone(&self.events);
                let thread_log = Arc::clone(&self.events);
                Hook::new(substep, format!("record substep {substep}"))
                    .with_core(move |_ctx| {
                        core_log.lock().unwrap().push(Event::Core { substep });
                        Ok(())
                    })
                    .with_thread(move |_ctx, worker, _name| {
                        thread_log
                            .lock()
                            .unwrap()
                            .push(Event::Thread { substep, worker });
                        Ok(())
                    })
            })
            .collect()
    }
}

// ── FailingPlugin ──────────────────────────────────────────────────

/// When a [`FailingPlugin`] hook errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailMode {
    /// The core hook fails on its `on_call`-th dispatch (0-based).
    Core { on_call: u64 },
    /// The thread hook fails on the target worker's `on_call`-th
    /// dispatch (0-based); other workers always succeed.
    Thread { worker: WorkerId, on_call: u64 },
}

/// Registers one hook at a fixed substep that fails on schedule,
/// for exercising the engine's abort-and-drain paths.
pub struct FailingPlugin {
    substep: u32,
    mode: FailMode,
    calls: Arc<AtomicU64>,
    filename: Option<PathBuf>,
}

impl FailingPlugin {
    pub fn new(substep: u32, mode: FailMode) -> Self {
        Self {
            substep,
            mode,
            calls: Arc::new(AtomicU64::new(0)),
            filename: None,
        }
    }
}

impl Plugin for FailingPlugin {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        guard_double_init(&mut self.filename, "failing", filename)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn description(&self) -> &str {
        "fails on schedule"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        match self.mode {
            FailMode::Core { on_call } => {
                let calls = Arc::clone(&self.calls);
                vec![Hook::core(self.substep, "scheduled core failure", move |_ctx| {
                    let seen = calls.fetch_add(1, Ordering::Relaxed);
                    if seen >= on_call {
                        return Err(HookError::ExecutionFailed {
                            reason: format!("scheduled failure at call {seen}"),
                        });
                    }
                    Ok(())
                })]
            }
            FailMode::Thread { worker, on_call } => {
                let calls = Arc::clone(&self.calls);
                vec![Hook::thread(
                    self.substep,
                    "scheduled thread failure",
                    move |_ctx, id, _name| {
                        if id != worker {
                            return Ok(());
                        }
                        let seen = calls.fetch_add(1, Ordering::Relaxed);
                        if seen >= on_call {
                            return Err(HookError::ExecutionFailed {
                                reason: format!("scheduled failure at call {seen}"),
                            });
                        }
                        Ok(())
                    },
                )]
            }
        }
    }
}

// ── InertPlugin ────────────────────────────────────────────────────

/// A plugin contributing no hooks at all.
pub struct InertPlugin {
    name: String,
    filename: Option<PathBuf>,
}

impl InertPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
        }
    }
}

impl Plugin for InertPlugin {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        guard_double_init(&mut self.filename, &self.name, filename)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn description(&self) -> &str {
        "contributes no hooks"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        Vec::new()
    }
}

// ── EmptyHookPlugin ────────────────────────────────────────────────

/// Registers a hook that carries no callback — invalid by contract.
/// Exists to exercise build-time rejection.
pub struct EmptyHookPlugin {
    substep: u32,
    filename: Option<PathBuf>,
}

impl EmptyHookPlugin {
    pub fn new(substep: u32) -> Self {
        Self {
            substep,
            filename: None,
        }
    }
}

impl Plugin for EmptyHookPlugin {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        guard_double_init(&mut self.filename, "empty-hook", filename)
    }

    fn name(&self) -> &str {
        "empty-hook"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn description(&self) -> &str {
        "registers a callback-less hook"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::new(self.substep, "does nothing")]
    }
}
