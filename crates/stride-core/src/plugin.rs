//! The [`Plugin`] capability trait and semantic [`Version`].
//!
//! A plugin is a unit of behavior bound into the engine at run time:
//! either compiled in and registered directly, or loaded from a dynamic
//! module by the loader. The engine never inspects plugin-internal
//! state; it calls only through this interface — the metadata accessors
//! and `init` at load time, the hook callbacks while stepping.

use std::fmt;
use std::path::Path;

use crate::context::RunContext;
use crate::error::PluginError;
use crate::hook::Hook;

/// Semantic version reported by a plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl Version {
    /// Create a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The capability contract every plugin implements.
///
/// # Contract
///
/// - `init` performs one-time setup and records the originating module
///   filename. It must fail with [`PluginError::AlreadyInitialized`]
///   if called a second time on the same instance.
/// - `hooks()` may be called more than once and must return equivalent
///   registrations each time; callbacks capture shared plugin state.
/// - Thread-level callbacks run concurrently across workers; any
///   cross-worker state they mutate is the plugin's to protect.
///
/// # Object safety
///
/// The trait is object-safe; registries store plugins as
/// `Box<dyn Plugin>`.
///
/// # Examples
///
/// A minimal plugin that counts core dispatches:
///
/// ```
/// use std::path::{Path, PathBuf};
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
/// use stride_core::{Hook, Plugin, PluginError, RunContext, Version};
///
/// struct Census {
///     filename: Option<PathBuf>,
///     tallies: Arc<AtomicU64>,
/// }
///
/// impl Plugin for Census {
///     fn init(&mut self, _ctx: &RunContext, filename: &Path) -> Result<(), PluginError> {
///         if self.filename.is_some() {
///             return Err(PluginError::AlreadyInitialized {
///                 name: self.name().to_string(),
///             });
///         }
///         self.filename = Some(filename.to_path_buf());
///         Ok(())
///     }
///
///     fn name(&self) -> &str { "census" }
///     fn version(&self) -> Version { Version::new(1, 0, 0) }
///     fn description(&self) -> &str { "counts core dispatches" }
///     fn filename(&self) -> Option<&Path> { self.filename.as_deref() }
///
///     fn hooks(&self) -> Vec<Hook> {
///         let tallies = Arc::clone(&self.tallies);
///         vec![Hook::core(0, "tally", move |_ctx| {
///             tallies.fetch_add(1, Ordering::Relaxed);
///             Ok(())
///         })]
///     }
/// }
///
/// let plugin = Census { filename: None, tallies: Arc::new(AtomicU64::new(0)) };
/// assert_eq!(plugin.name(), "census");
/// assert_eq!(plugin.version().to_string(), "1.0.0");
/// ```
pub trait Plugin: Send + 'static {
    /// One-time setup with the run context and originating module path.
    ///
    /// The filename is set exactly once here; a second call must fail
    /// with [`PluginError::AlreadyInitialized`] and leave the recorded
    /// filename unchanged.
    fn init(&mut self, ctx: &RunContext, filename: &Path) -> Result<(), PluginError>;

    /// Short identifying name, used in logs and error reports.
    fn name(&self) -> &str;

    /// The plugin's semantic version.
    fn version(&self) -> Version;

    /// One-line human description.
    fn description(&self) -> &str;

    /// Path of the module this instance was loaded from.
    ///
    /// `None` until a successful [`init`](Self::init).
    fn filename(&self) -> Option<&Path>;

    /// The hook registrations this plugin contributes.
    ///
    /// Dispatch order within the table is registry order, then the
    /// order of this vector.
    fn hooks(&self) -> Vec<Hook>;
}
