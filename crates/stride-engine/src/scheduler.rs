//! The barrier-synchronized step scheduler.
//!
//! [`Scheduler::run`] owns the (step, substep) grid. It spawns one
//! worker thread per configured thread, then per substep: releases
//! every worker, collects exactly one completion signal from each (the
//! scheduler's sole blocking point), runs the substep's core-level
//! hooks serially, and loops. One rendezvous channel pair per worker
//! enforces the two-phase barrier — a send blocks until the matching
//! receive, so neither side can drift.
//!
//! # Shutdown
//!
//! A `Halt` report from any worker, or a failing core hook, triggers a
//! coordinated drain: the in-flight substep finishes collecting, every
//! worker receives `Halt` at its next release point, and the scheduler
//! joins all workers before surfacing the originating error. Library
//! code never aborts the process; exit policy belongs to the embedder.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, error, info};

use stride_core::{PluginRegistry, RunContext, WorkerId};

use crate::config::{ConfigError, RunConfig};
use crate::hooks::{HookTable, HookTableError};
use crate::metrics::RunReport;
use crate::worker::{EngineSignal, Worker};

// ── RunError ───────────────────────────────────────────────────────

/// Errors surfaced by [`Scheduler::new`] and [`Scheduler::run`].
#[derive(Debug, PartialEq, Eq)]
pub enum RunError {
    /// The run configuration failed validation.
    Config(ConfigError),
    /// The hook table could not be built.
    Table(HookTableError),
    /// A table built for a different substep bound was supplied.
    TableMismatch {
        /// Substeps the table was built against.
        table_substeps: u32,
        /// Substeps in the run configuration.
        config_substeps: u32,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
    /// A core-level hook returned an error.
    CoreHookFailed {
        /// Plugin that registered the hook.
        plugin: String,
        /// The hook's description.
        description: String,
        /// The underlying hook error.
        source: stride_core::HookError,
    },
    /// A thread-level hook returned an error on one worker.
    ThreadHookFailed {
        /// Worker the hook was running on.
        worker: WorkerId,
        /// Plugin that registered the hook.
        plugin: String,
        /// The hook's description.
        description: String,
        /// The underlying hook error.
        source: stride_core::HookError,
    },
    /// A worker thread terminated without completing the protocol.
    WorkerPanicked {
        /// The worker that disappeared.
        worker: WorkerId,
    },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Table(e) => write!(f, "hook table: {e}"),
            Self::TableMismatch {
                table_substeps,
                config_substeps,
            } => write!(
                f,
                "hook table built for {table_substeps} substeps, config has {config_substeps}"
            ),
            Self::ThreadSpawnFailed { reason } => write!(f, "worker spawn failed: {reason}"),
            Self::CoreHookFailed {
                plugin,
                description,
                source,
            } => write!(
                f,
                "core hook '{description}' from plugin '{plugin}' failed: {source}"
            ),
            Self::ThreadHookFailed {
                worker,
                plugin,
                description,
                source,
            } => write!(
                f,
                "thread hook '{description}' from plugin '{plugin}' failed on worker {worker}: {source}"
            ),
            Self::WorkerPanicked { worker } => {
                write!(f, "worker {worker} terminated unexpectedly")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::CoreHookFailed { source, .. } | Self::ThreadHookFailed { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HookTableError> for RunError {
    fn from(e: HookTableError) -> Self {
        Self::Table(e)
    }
}

// ── Scheduler ──────────────────────────────────────────────────────

/// Scheduler-side endpoints for one worker.
struct WorkerLink {
    id: WorkerId,
    release: Sender<EngineSignal>,
    report: Receiver<EngineSignal>,
    handle: thread::JoinHandle<Result<(), RunError>>,
}

/// Why the grid loop stopped early.
enum Failure {
    Worker(WorkerId),
    Core(RunError),
}

/// The coordinating side of a lockstep run.
///
/// Created from a validated [`RunConfig`] and a [`PluginRegistry`]
/// (or a prebuilt [`HookTable`]); consumed by [`run`](Self::run).
///
/// # Example
///
/// ```ignore
/// let scheduler = Scheduler::new(config, &registry)?;
/// let report = scheduler.run()?;
/// println!("completed {} steps", report.completed_steps());
/// ```
pub struct Scheduler {
    config: RunConfig,
    ctx: Arc<RunContext>,
    table: Arc<HookTable>,
}

impl Scheduler {
    /// Validate the configuration, build the hook table from the
    /// registry, and return a ready-to-run scheduler.
    pub fn new(config: RunConfig, registry: &PluginRegistry) -> Result<Self, RunError> {
        config.validate()?;
        let table = HookTable::build(registry, config.substeps)?;
        Ok(Self {
            ctx: Arc::new(config.context()),
            table: Arc::new(table),
            config,
        })
    }

    /// Build a scheduler from an already-constructed hook table.
    ///
    /// The table's substep bound must match the configuration.
    pub fn with_table(config: RunConfig, table: HookTable) -> Result<Self, RunError> {
        config.validate()?;
        if table.substeps() != config.substeps {
            return Err(RunError::TableMismatch {
                table_substeps: table.substeps(),
                config_substeps: config.substeps,
            });
        }
        Ok(Self {
            ctx: Arc::new(config.context()),
            table: Arc::new(table),
            config,
        })
    }

    /// The run context workers and hooks will observe.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// The dispatch table this scheduler will drive.
    pub fn hook_table(&self) -> &HookTable {
        &self.table
    }

    /// Execute the full (step, substep) grid and join every worker.
    pub fn run(self) -> Result<RunReport, RunError> {
        let span = self.ctx.span().clone();
        let _enter = span.enter();

        let RunConfig {
            threads,
            steps,
            substeps,
            ..
        } = self.config;

        info!(threads, steps, substeps, "run starting");
        let start = Instant::now();
        let links = self.spawn_workers()?;

        // Initial unconditional release into (0, 0).
        for link in &links {
            let _ = link.release.send(EngineSignal::Continue);
        }

        let mut report = RunReport {
            threads,
            steps,
            substeps,
            step_durations: Vec::with_capacity(steps.min(1 << 20) as usize),
            total: Default::default(),
        };
        let mut failure: Option<Failure> = None;
        let mut step_timer = Instant::now();

        'grid: for step in 0..steps {
            for substep in 0..substeps {
                // Collect phase: exactly one signal per worker, in
                // worker-index order. This is the scheduler's sole
                // blocking point.
                let mut halted: Option<WorkerId> = None;
                for link in &links {
                    match link.report.recv() {
                        Ok(EngineSignal::Continue) => {}
                        Ok(EngineSignal::Halt) | Err(_) => {
                            halted.get_or_insert(link.id);
                        }
                    }
                }
                if let Some(worker) = halted {
                    debug!(%worker, step, substep, "halt reported, draining run");
                    failure = Some(Failure::Worker(worker));
                    break 'grid;
                }

                // Core hooks run serially, after every worker has
                // completed the substep and before any is released
                // into the next one.
                for entry in self.table.core_hooks(substep) {
                    if let Err(err) = entry.call(&self.ctx) {
                        error!(
                            step,
                            substep,
                            plugin = entry.plugin(),
                            hook = entry.description(),
                            %err,
                            "core hook failed, draining run"
                        );
                        failure = Some(Failure::Core(RunError::CoreHookFailed {
                            plugin: entry.plugin().to_string(),
                            description: entry.description().to_string(),
                            source: err,
                        }));
                        break 'grid;
                    }
                }

                if substep == substeps - 1 {
                    let elapsed = step_timer.elapsed();
                    info!(step, elapsed_us = elapsed.as_micros() as u64, "step finished");
                    report.step_durations.push(elapsed);
                    step_timer = Instant::now();
                }

                // Release phase: open the next substep (or, after the
                // final substep, let workers run off the end of their
                // grids and terminate).
                for link in &links {
                    let _ = link.release.send(EngineSignal::Continue);
                }
            }
        }

        if failure.is_some() {
            for link in &links {
                let _ = link.release.send(EngineSignal::Halt);
            }
        }

        let mut first_worker_error: Option<RunError> = None;
        for link in links {
            match link.handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_worker_error.get_or_insert(e);
                }
                Err(_) => {
                    first_worker_error.get_or_insert(RunError::WorkerPanicked { worker: link.id });
                }
            }
        }

        match (failure, first_worker_error) {
            (None, None) => {
                report.total = start.elapsed();
                info!(
                    steps = report.completed_steps(),
                    total_us = report.total.as_micros() as u64,
                    "run complete"
                );
                Ok(report)
            }
            (Some(Failure::Core(e)), _) => Err(e),
            (_, Some(e)) => Err(e),
            (Some(Failure::Worker(worker)), None) => Err(RunError::WorkerPanicked { worker }),
        }
    }

    fn spawn_workers(&self) -> Result<Vec<WorkerLink>, RunError> {
        let mut links = Vec::with_capacity(self.config.threads as usize);
        for i in 0..self.config.threads {
            let (release_tx, release_rx) = bounded(0);
            let (report_tx, report_rx) = bounded(0);
            let id = WorkerId(i);
            let name = format!("worker-{i}");
            let worker = Worker {
                id,
                name: name.clone(),
                steps: self.config.steps,
                substeps: self.config.substeps,
                table: Arc::clone(&self.table),
                ctx: Arc::clone(&self.ctx),
                release: release_rx,
                report: report_tx,
            };
            match thread::Builder::new().name(name).spawn(move || worker.run()) {
                Ok(handle) => links.push(WorkerLink {
                    id,
                    release: release_tx,
                    report: report_rx,
                    handle,
                }),
                Err(e) => {
                    // Tear down what was spawned: dropping a release
                    // sender unblocks its worker's first receive.
                    for link in links {
                        drop(link.release);
                        let _ = link.handle.join();
                    }
                    return Err(RunError::ThreadSpawnFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(links)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("table", &self.table)
            .finish()
    }
}
