//! Core types and the plugin capability contract for the Stride engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by the engine, the loader, and every plugin:
//! worker identifiers, the typed run context, hook records, the
//! [`Plugin`] capability trait, the plugin registry, and the dynamic
//! module ABI ([`abi`]).
//!
//! Plugins depend on this crate alone; they never see the engine or the
//! loader.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod abi;
pub mod context;
pub mod error;
pub mod hook;
pub mod id;
pub mod plugin;
pub mod registry;

pub use context::RunContext;
pub use error::{HookError, PluginError};
pub use hook::{CoreFn, Hook, ThreadFn};
pub use id::WorkerId;
pub use plugin::{Plugin, Version};
pub use registry::PluginRegistry;
