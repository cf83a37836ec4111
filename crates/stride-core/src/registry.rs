//! The ordered plugin registry.
//!
//! An explicit registry object constructed by the loader (or by tests
//! from synthetic plugins) and passed to the engine — there is no
//! process-wide plugin state. Registration order is significant: it
//! fixes hook dispatch order for hooks sharing a substep.

use std::fmt;

use crate::plugin::Plugin;

/// An append-only, ordered collection of loaded plugins.
///
/// Append-only during load, read-only during a run. Plugins are owned
/// exclusively by the registry once registered.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Registration order is dispatch order.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry holds no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// The plugin at `index` in registration order.
    pub fn get(&self, index: usize) -> Option<&dyn Plugin> {
        self.plugins.get(index).map(|p| p.as_ref())
    }

    /// Mutable access to the plugin at `index`.
    ///
    /// Exists for embedders that initialize plugins after registering
    /// them; the engine itself never mutates registered plugins.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Plugin + 'static)> {
        self.plugins.get_mut(index).map(|p| p.as_mut())
    }

    /// Iterate plugins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }
}

impl From<Vec<Box<dyn Plugin>>> for PluginRegistry {
    fn from(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }
}

// Manual Debug: plugins are trait objects, so list their names.
impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginRegistry")
            .field("plugins", &names)
            .finish()
    }
}
