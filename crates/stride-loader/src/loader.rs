//! The dynamic module loader.

use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::{debug, info};

use stride_core::abi::{
    PluginApiVersionFn, PluginEntryFn, PLUGIN_API_VERSION, PLUGIN_API_VERSION_SYMBOL,
    PLUGIN_ENTRY_SYMBOL,
};
use stride_core::{Plugin, PluginRegistry, RunContext};

use crate::discover::{default_extension, discover, parse_search_path};
use crate::error::LoadError;

/// Loads plugins from dynamic modules and keeps their libraries alive.
///
/// Every successfully opened [`Library`] is retained for the loader's
/// lifetime: the plugin instances a load produced point into that
/// mapped code, so the loader must outlive every registry it returned.
pub struct PluginLoader {
    libraries: Vec<Library>,
}

impl PluginLoader {
    /// A loader with no modules opened yet.
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
        }
    }

    /// Number of modules currently held open.
    pub fn loaded_modules(&self) -> usize {
        self.libraries.len()
    }

    /// Discover and load every module under `dirs` with the given
    /// extension, initializing each against `ctx`.
    ///
    /// Plugins are appended to the returned registry in discovery
    /// order. The first failure aborts the entire load.
    pub fn load_dirs(
        &mut self,
        dirs: &[PathBuf],
        extension: &str,
        ctx: &RunContext,
    ) -> Result<PluginRegistry, LoadError> {
        let candidates = discover(dirs, extension)?;
        let mut registry = PluginRegistry::new();
        for path in candidates {
            let plugin = self.load_file(&path, ctx)?;
            registry.register(plugin);
        }
        info!(plugins = registry.len(), "plugin load complete");
        Ok(registry)
    }

    /// Load from a colon-separated search path using the platform's
    /// dynamic-library extension.
    pub fn load_search_path(
        &mut self,
        raw: &str,
        ctx: &RunContext,
    ) -> Result<PluginRegistry, LoadError> {
        self.load_dirs(&parse_search_path(raw), default_extension(), ctx)
    }

    /// Open one module, verify the ABI handshake, and initialize the
    /// plugin it exports.
    pub fn load_file(
        &mut self,
        path: &Path,
        ctx: &RunContext,
    ) -> Result<Box<dyn Plugin>, LoadError> {
        debug!(path = %path.display(), "loading plugin module");

        // SAFETY: opening a module runs its initializers; the
        // trusted-plugin contract covers this.
        let lib = unsafe { Library::new(path) }.map_err(|e| LoadError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let module_api = {
            // SAFETY: symbol type matches the ABI contract.
            let version: Symbol<'_, PluginApiVersionFn> = unsafe {
                lib.get(PLUGIN_API_VERSION_SYMBOL.as_bytes()).map_err(|e| {
                    LoadError::SymbolMissing {
                        path: path.to_path_buf(),
                        symbol: PLUGIN_API_VERSION_SYMBOL,
                        reason: e.to_string(),
                    }
                })?
            };
            // SAFETY: the version function takes no arguments and
            // returns a plain u32.
            unsafe { version() }
        };
        if module_api != PLUGIN_API_VERSION {
            return Err(LoadError::ApiVersionMismatch {
                path: path.to_path_buf(),
                module: module_api,
                host: PLUGIN_API_VERSION,
            });
        }

        let raw = {
            // SAFETY: symbol type matches the ABI contract, revision
            // checked above.
            let entry: Symbol<'_, PluginEntryFn> = unsafe {
                lib.get(PLUGIN_ENTRY_SYMBOL.as_bytes())
                    .map_err(|e| LoadError::SymbolMissing {
                        path: path.to_path_buf(),
                        symbol: PLUGIN_ENTRY_SYMBOL,
                        reason: e.to_string(),
                    })?
            };
            // SAFETY: the entry function leaks a Box<dyn Plugin>.
            unsafe { entry() }
        };
        if raw.is_null() {
            return Err(LoadError::NullPlugin {
                path: path.to_path_buf(),
            });
        }
        // SAFETY: non-null pointer produced by Box::into_raw inside
        // the module's entry function; reclaiming it transfers
        // ownership to the host.
        let mut plugin = unsafe { Box::from_raw(raw) };

        if let Err(source) = plugin.init(ctx, path) {
            // The instance must die before its library unmaps.
            drop(plugin);
            return Err(LoadError::Init {
                path: path.to_path_buf(),
                source,
            });
        }

        let version = plugin.version();
        let hooks = plugin.hooks();
        info!(
            name = plugin.name(),
            version = %version,
            description = plugin.description(),
            file = %path.display(),
            hooks = hooks.len(),
            "plugin loaded"
        );

        self.libraries.push(lib);
        Ok(plugin)
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLoader")
            .field("loaded_modules", &self.libraries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_file_rejects_non_library_files() {
        let temp = tempfile::tempdir().unwrap();
        let junk = temp.path().join("junk.so");
        fs::write(&junk, b"this is not a shared object").unwrap();

        let ctx = RunContext::new(1, 0);
        let mut loader = PluginLoader::new();
        match loader.load_file(&junk, &ctx) {
            Err(LoadError::OpenFailed { path, .. }) => assert_eq!(path, junk),
            other => panic!("expected OpenFailed, got {other:?}"),
        }
        assert_eq!(loader.loaded_modules(), 0);
    }

    #[test]
    fn load_dirs_aborts_on_first_bad_module() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("broken.so"), b"junk").unwrap();

        let ctx = RunContext::new(1, 0);
        let mut loader = PluginLoader::new();
        let result = loader.load_dirs(&[temp.path().to_path_buf()], "so", &ctx);
        assert!(matches!(result, Err(LoadError::OpenFailed { .. })));
    }

    #[test]
    fn load_dirs_with_no_candidates_yields_empty_registry() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = RunContext::new(1, 0);
        let mut loader = PluginLoader::new();
        let registry = loader
            .load_dirs(&[temp.path().to_path_buf()], "so", &ctx)
            .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn load_search_path_propagates_missing_directory() {
        let ctx = RunContext::new(1, 0);
        let mut loader = PluginLoader::new();
        match loader.load_search_path("/definitely/not/a/real/dir", &ctx) {
            Err(LoadError::DirectoryMissing { .. }) => {}
            other => panic!("expected DirectoryMissing, got {other:?}"),
        }
    }

    #[test]
    fn debug_reports_module_count() {
        let loader = PluginLoader::new();
        assert!(format!("{loader:?}").contains("loaded_modules: 0"));
    }
}
