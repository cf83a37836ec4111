//! The dynamic module ABI.
//!
//! A plugin compiled as a `cdylib` exports two well-known symbols:
//!
//! - [`PLUGIN_API_VERSION_SYMBOL`]: `extern "C" fn() -> u32` returning
//!   [`PLUGIN_API_VERSION`]. The loader resolves this first and refuses
//!   modules built against a different contract revision.
//! - [`PLUGIN_ENTRY_SYMBOL`]: `extern "C" fn() -> *mut dyn Plugin`
//!   returning a leaked `Box<dyn Plugin>`. The loader reclaims the box
//!   and owns the instance from then on.
//!
//! Host and module must be built by the same compiler against the same
//! `stride-core` version; the version handshake catches contract skew,
//! not toolchain skew. Use [`declare_plugin!`](crate::declare_plugin)
//! to emit both symbols correctly.

use crate::plugin::Plugin;

/// Revision of the plugin ABI contract. Bumped whenever the
/// [`Plugin`] trait or the entry symbol shape changes incompatibly.
pub const PLUGIN_API_VERSION: u32 = 1;

/// Name of the exported entry symbol.
pub const PLUGIN_ENTRY_SYMBOL: &str = "stride_plugin_entry";

/// Name of the exported API-version symbol.
pub const PLUGIN_API_VERSION_SYMBOL: &str = "stride_plugin_api_version";

/// Type of the entry function exported by plugin modules.
pub type PluginEntryFn = unsafe extern "C" fn() -> *mut dyn Plugin;

/// Type of the API-version function exported by plugin modules.
pub type PluginApiVersionFn = unsafe extern "C" fn() -> u32;

/// Emit the two exported symbols a plugin module must carry.
///
/// The argument is an expression constructing the plugin value; it is
/// evaluated once per entry call.
///
/// ```ignore
/// stride_core::declare_plugin!(PulsePlugin::new());
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($ctor:expr) => {
        #[no_mangle]
        pub extern "C" fn stride_plugin_api_version() -> u32 {
            $crate::abi::PLUGIN_API_VERSION
        }

        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn stride_plugin_entry() -> *mut dyn $crate::Plugin {
            let plugin: ::std::boxed::Box<dyn $crate::Plugin> = ::std::boxed::Box::new($ctor);
            ::std::boxed::Box::into_raw(plugin)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_names_are_stable() {
        // Loaders and modules agree on these by name; changing either
        // is an ABI break and must come with a version bump.
        assert_eq!(PLUGIN_ENTRY_SYMBOL, "stride_plugin_entry");
        assert_eq!(PLUGIN_API_VERSION_SYMBOL, "stride_plugin_api_version");
        assert_eq!(PLUGIN_API_VERSION, 1);
    }
}
