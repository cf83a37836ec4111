//! Stride: a lockstep simulation engine with dynamically loaded plugins.
//!
//! A fixed pool of worker threads executes a shared grid of
//! (step, substep) iterations in strict synchrony. Plugins — loaded
//! from dynamic modules or registered in-process — inject behavior at
//! substep boundaries through two kinds of hooks: thread-level hooks
//! run concurrently on every worker, core-level hooks run serially on
//! the scheduler once all workers have completed the substep.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Stride sub-crates. For most users, adding `stride` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::path::{Path, PathBuf};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use stride::prelude::*;
//!
//! // A minimal plugin that tallies core dispatches at substep 1.
//! struct Census {
//!     filename: Option<PathBuf>,
//!     tallies: Arc<AtomicU64>,
//! }
//!
//! impl Plugin for Census {
//!     fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
//!         if self.filename.is_some() {
//!             return Err(PluginError::AlreadyInitialized {
//!                 name: self.name().to_string(),
//!             });
//!         }
//!         self.filename = Some(filename.to_path_buf());
//!         Ok(())
//!     }
//!     fn name(&self) -> &str { "census" }
//!     fn version(&self) -> Version { Version::new(1, 0, 0) }
//!     fn description(&self) -> &str { "tallies core dispatches" }
//!     fn filename(&self) -> Option<&Path> { self.filename.as_deref() }
//!     fn hooks(&self) -> Vec<Hook> {
//!         let tallies = Arc::clone(&self.tallies);
//!         vec![Hook::core(1, "tally", move |_ctx| {
//!             tallies.fetch_add(1, Ordering::Relaxed);
//!             Ok(())
//!         })]
//!     }
//! }
//!
//! let tallies = Arc::new(AtomicU64::new(0));
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(Census {
//!     filename: None,
//!     tallies: Arc::clone(&tallies),
//! }));
//!
//! let config = RunConfig { threads: 2, steps: 3, substeps: 2, seed: 42 };
//! let report = Scheduler::new(config, &registry).unwrap().run().unwrap();
//!
//! assert_eq!(report.completed_steps(), 3);
//! assert_eq!(tallies.load(Ordering::Relaxed), 3);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stride-core` | IDs, run context, hooks, the plugin contract, ABI |
//! | [`engine`] | `stride-engine` | Configuration, hook table, scheduler, workers |
//! | [`loader`] | `stride-loader` | Module discovery and dynamic loading |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, the plugin contract, and the module ABI (`stride-core`).
pub use stride_core as types;

/// Scheduler, workers, hook table, and run configuration
/// (`stride-engine`).
pub use stride_engine as engine;

/// Plugin discovery and dynamic loading (`stride-loader`).
pub use stride_loader as loader;

pub use stride_core::declare_plugin;

/// The most commonly used items, re-exported flat.
pub mod prelude {
    pub use stride_core::{
        Hook, HookError, Plugin, PluginError, PluginRegistry, RunContext, Version, WorkerId,
    };
    pub use stride_engine::{
        ConfigError, EngineSignal, HookTable, HookTableError, RunConfig, RunError, RunReport,
        Scheduler,
    };
    pub use stride_loader::{LoadError, PluginLoader};
}
