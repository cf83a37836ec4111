//! Dynamic-load fixture: a minimal plugin exercising the full module
//! contract — ABI handshake, init with filename recording, and one
//! hook at each level.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use stride_core::{declare_plugin, Hook, Plugin, PluginError, RunContext, Version};

struct PulsePlugin {
    filename: Option<PathBuf>,
    core_pulses: Arc<AtomicU64>,
    thread_pulses: Arc<AtomicU64>,
}

impl PulsePlugin {
    fn new() -> Self {
        Self {
            filename: None,
            core_pulses: Arc::new(AtomicU64::new(0)),
            thread_pulses: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Plugin for PulsePlugin {
    fn init(&mut self, ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
        if self.filename.is_some() {
            return Err(PluginError::AlreadyInitialized {
                name: self.name().to_string(),
            });
        }
        if ctx.thread_count() == 0 {
            return Err(PluginError::InitFailed {
                reason: "thread count must be at least 1".to_string(),
            });
        }
        self.filename = Some(filename.to_path_buf());
        Ok(())
    }

    fn name(&self) -> &str {
        "pulse"
    }

    fn version(&self) -> Version {
        Version::new(1, 0, 0)
    }

    fn description(&self) -> &str {
        "counts substep pulses at both hook levels"
    }

    fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    fn hooks(&self) -> Vec<Hook> {
        let thread_pulses = Arc::clone(&self.thread_pulses);
        let core_pulses = Arc::clone(&self.core_pulses);
        vec![
            Hook::thread(0, "thread pulse", move |_ctx, _worker, _name| {
                thread_pulses.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }),
            Hook::core(1, "core pulse", move |_ctx| {
                core_pulses.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }),
        ]
    }
}

declare_plugin!(PulsePlugin::new());
