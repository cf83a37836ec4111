//! Dynamic plugin discovery and loading.
//!
//! Walks configured search directories for modules carrying the
//! platform's dynamic-library extension, opens each with `libloading`,
//! verifies the ABI handshake ([`stride_core::abi`]), initializes the
//! plugin with the run context, and appends it to a
//! [`PluginRegistry`](stride_core::PluginRegistry) in discovery order.
//!
//! Loading is all-or-nothing: the first failure aborts the whole load
//! with no rollback semantics, before any stepping begins.
//!
//! # Safety
//!
//! Loading a module executes foreign code. The loader verifies the
//! contract revision, not the code — only load trusted plugins.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod discover;
pub mod error;
mod loader;

pub use discover::{default_extension, discover, discover_search_path, parse_search_path};
pub use error::LoadError;
pub use loader::PluginLoader;
