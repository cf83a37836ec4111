//! Run configuration and validation.
//!
//! [`RunConfig`] is the complete operator-supplied input to a run.
//! How the values arrive (CLI, config file) is the embedder's concern;
//! the engine only requires that [`validate()`](RunConfig::validate)
//! passes before any thread is spawned.

use std::error::Error;
use std::fmt;

use stride_core::RunContext;

/// Complete configuration for one lockstep run.
///
/// Immutable for the duration of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of worker threads. Must be at least 1.
    pub threads: u32,
    /// Total steps to execute. Zero is a valid (empty) run.
    pub steps: u64,
    /// Substeps per step. Must be at least 1; hook substep indices are
    /// validated against this bound when the hook table is built.
    pub substeps: u32,
    /// Seed for deterministic per-worker RNG streams.
    pub seed: u64,
}

impl RunConfig {
    /// Validate structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.substeps == 0 {
            return Err(ConfigError::ZeroSubSteps);
        }
        Ok(())
    }

    /// Build the [`RunContext`] this configuration describes.
    ///
    /// The same values yield the same context; the loader and the
    /// scheduler may each derive one from a shared `RunConfig` and
    /// plugins observe identical parameters at init and dispatch time.
    pub fn context(&self) -> RunContext {
        RunContext::new(self.threads, self.seed)
    }
}

/// Errors detected during [`RunConfig::validate()`].
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Thread count is zero; the barrier needs at least one party.
    ZeroThreads,
    /// Substeps-per-step is zero; the grid would be empty and every
    /// hook registration unrepresentable.
    ZeroSubSteps,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreads => write!(f, "thread count must be at least 1"),
            Self::ZeroSubSteps => write!(f, "substeps per step must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
