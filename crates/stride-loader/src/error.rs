//! Load-time error types.
//!
//! Every variant is fatal: a failed load aborts startup before the
//! scheduler ever runs. There are no partial-load or rollback
//! semantics.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use stride_core::PluginError;

/// Errors surfaced while discovering or loading plugin modules.
#[derive(Debug, PartialEq)]
pub enum LoadError {
    /// A configured search directory does not exist or is not a
    /// directory.
    DirectoryMissing {
        /// The offending search path entry.
        path: PathBuf,
    },
    /// Walking a search directory failed partway.
    Walk {
        /// The directory being walked.
        path: PathBuf,
        /// Description of the filesystem error.
        reason: String,
    },
    /// The module could not be opened as a dynamic library.
    OpenFailed {
        /// The module file.
        path: PathBuf,
        /// Description of the loader error.
        reason: String,
    },
    /// A required exported symbol is absent.
    SymbolMissing {
        /// The module file.
        path: PathBuf,
        /// The symbol that could not be resolved.
        symbol: &'static str,
        /// Description of the resolution error.
        reason: String,
    },
    /// The module was built against a different ABI revision.
    ApiVersionMismatch {
        /// The module file.
        path: PathBuf,
        /// Revision reported by the module.
        module: u32,
        /// Revision this host was built with.
        host: u32,
    },
    /// The module's entry function returned a null plugin pointer.
    NullPlugin {
        /// The module file.
        path: PathBuf,
    },
    /// The plugin's `init` failed.
    Init {
        /// The module file.
        path: PathBuf,
        /// The underlying plugin error.
        source: PluginError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryMissing { path } => {
                write!(f, "plugin directory '{}' is missing", path.display())
            }
            Self::Walk { path, reason } => {
                write!(f, "walking '{}' failed: {reason}", path.display())
            }
            Self::OpenFailed { path, reason } => {
                write!(f, "cannot open module '{}': {reason}", path.display())
            }
            Self::SymbolMissing {
                path,
                symbol,
                reason,
            } => write!(
                f,
                "module '{}' lacks symbol '{symbol}': {reason}",
                path.display()
            ),
            Self::ApiVersionMismatch { path, module, host } => write!(
                f,
                "module '{}' targets plugin ABI v{module}, host speaks v{host}",
                path.display()
            ),
            Self::NullPlugin { path } => {
                write!(f, "module '{}' returned a null plugin", path.display())
            }
            Self::Init { path, source } => {
                write!(f, "initializing module '{}' failed: {source}", path.display())
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Init { source, .. } => Some(source),
            _ => None,
        }
    }
}
