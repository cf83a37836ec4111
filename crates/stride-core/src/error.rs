//! Error types shared across the Stride workspace.
//!
//! Organized by subsystem: plugin lifecycle ([`PluginError`]) and hook
//! execution ([`HookError`]). Loader and engine errors live in their
//! own crates and wrap these where a cause chain is useful.

use std::error::Error;
use std::fmt;

/// Errors from the plugin lifecycle (`init` and friends).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginError {
    /// `init` was called on a plugin instance whose filename is already
    /// set — each loaded module instance may be initialized at most once.
    AlreadyInitialized {
        /// Name of the plugin that rejected the second `init`.
        name: String,
    },
    /// The plugin's one-time setup failed.
    InitFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized { name } => {
                write!(f, "plugin '{name}' is already initialized")
            }
            Self::InitFailed { reason } => write!(f, "plugin init failed: {reason}"),
        }
    }
}

impl Error for PluginError {}

/// Errors from individual hook execution.
///
/// Returned by core-level and thread-level hook callbacks. Any hook
/// error aborts the run; the engine reports it together with the
/// originating hook's description and plugin name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookError {
    /// The hook's callback failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A plugin-defined invariant was violated.
    ConstraintViolation {
        /// Description of the violated constraint.
        constraint: String,
    },
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::ConstraintViolation { constraint } => {
                write!(f, "constraint violation: {constraint}")
            }
        }
    }
}

impl Error for HookError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_error_display() {
        let err = PluginError::AlreadyInitialized {
            name: "census".to_string(),
        };
        assert_eq!(err.to_string(), "plugin 'census' is already initialized");

        let err = PluginError::InitFailed {
            reason: "no state dir".to_string(),
        };
        assert!(err.to_string().contains("no state dir"));
    }

    #[test]
    fn hook_error_display() {
        let err = HookError::ExecutionFailed {
            reason: "overflow".to_string(),
        };
        assert_eq!(err.to_string(), "execution failed: overflow");

        let err = HookError::ConstraintViolation {
            constraint: "population must be finite".to_string(),
        };
        assert!(err.to_string().contains("population must be finite"));
    }
}
