//! The typed per-run context handed to plugins and hooks.
//!
//! [`RunContext`] replaces the dynamically-typed context bag a host
//! might otherwise thread through plugin calls: every value a plugin
//! may need at init or dispatch time is a plain field, so "required
//! context value absent" is unrepresentable. The context is built once
//! per run and shared read-only between the scheduler and all workers.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::Span;

use crate::id::WorkerId;

/// Immutable per-run parameters visible to plugins.
///
/// Carries the logger handle (a [`tracing::Span`] scoping all plugin
/// diagnostics to the run), the configured worker thread count, and the
/// run seed. Passed by shared reference into [`Plugin::init`] and every
/// hook invocation.
///
/// [`Plugin::init`]: crate::plugin::Plugin::init
#[derive(Clone, Debug)]
pub struct RunContext {
    thread_count: u32,
    seed: u64,
    span: Span,
}

impl RunContext {
    /// Create a context for a run with `thread_count` workers and the
    /// given seed.
    pub fn new(thread_count: u32, seed: u64) -> Self {
        let span = tracing::info_span!("run", threads = thread_count, seed);
        Self {
            thread_count,
            seed,
            span,
        }
    }

    /// Number of worker threads participating in the run.
    pub fn thread_count(&self) -> u32 {
        self.thread_count
    }

    /// The run seed.
    ///
    /// Core-level hooks that need randomness should derive their RNG
    /// from this value; thread-level hooks should prefer
    /// [`worker_rng`](Self::worker_rng) so streams stay per-worker.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Span scoping diagnostics emitted during this run.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// A deterministic RNG stream for one worker.
    ///
    /// Seeded from `seed XOR worker-id`, so the stream is a pure
    /// function of the run configuration: identical across repeated
    /// runs, distinct across workers.
    pub fn worker_rng(&self, worker: WorkerId) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ u64::from(worker.0))
    }
}
