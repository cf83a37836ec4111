//! Minimal lockstep run: one in-process plugin, two workers.
//!
//! Run with: `cargo run --example quickstart -p stride-engine`

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use stride_core::{Hook, Plugin, PluginError, PluginRegistry, RunContext, Version};
use stride_engine::{RunConfig, Scheduler};

/// Counts how often each hook level fires.
struct Census {
    filename: Option<PathBuf>,
    core_tallies: Arc<AtomicU64>,
    thread_tallies: Arc<AtomicU64>,
}

impl Plugin for Census {
    fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        if self.filename.is_some() {
            return Err(PluginError::AlreadyInitialized {
                name: self.name().to_string(),
            });
        }
        self.filename = Some(filename.to_path_buf());
        Ok(())
    }

    fn name(&self) -> &str {
        "census"
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn description(&self) -> &str {
        "tallies hook dispatches"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        let core = Arc::clone(&self.core_tallies);
        let thread = Arc::clone(&self.thread_tallies);
        vec![
            Hook::thread(0, "advance local state", move |_ctx, _worker, _name| {
                thread.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }),
            Hook::core(1, "tally the substep", move |_ctx| {
                core.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }),
        ]
    }
}

fn main() {
    let core_tallies = Arc::new(AtomicU64::new(0));
    let thread_tallies = Arc::new(AtomicU64::new(0));

    let mut registry = PluginRegistry::new();
    registry.register(Box::new(Census {
        filename: None,
        core_tallies: Arc::clone(&core_tallies),
        thread_tallies: Arc::clone(&thread_tallies),
    }));

    let config = RunConfig {
        threads: 2,
        steps: 10,
        substeps: 2,
        seed: 42,
    };
    let report = Scheduler::new(config, &registry)
        .expect("valid configuration")
        .run()
        .expect("clean run");

    println!(
        "completed {} steps in {:?}: {} core tallies, {} thread tallies",
        report.completed_steps(),
        report.total,
        core_tallies.load(Ordering::Relaxed),
        thread_tallies.load(Ordering::Relaxed),
    );
}
