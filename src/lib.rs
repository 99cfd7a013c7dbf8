//! # Disposable Registry
//!
//! A thread-safe registry that keeps at most one live instance per type of an
//! expensive, disposable resource (a window, a connection, a device handle).
//!
//! Instances are built lazily on first access, rebuilt after they have been
//! disposed, and torn down in bulk with [`RegistryApi::cleanup`].
//!
//! ## Quick Start
//!
//! ```rust
//! use disposable_registry::{Disposable, Init, OnDisposed, Registry, RegistryApi};
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! #[derive(Default)]
//! struct Splash {
//!     closed: AtomicBool,
//! }
//!
//! impl Disposable for Splash {
//!     fn dispose(&self) -> anyhow::Result<()> {
//!         self.closed.store(true, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     fn is_disposed(&self) -> bool {
//!         self.closed.load(Ordering::SeqCst)
//!     }
//! }
//!
//! let registry = Registry::new();
//! assert!(registry.register::<Splash>(Init::Lazy));
//!
//! let splash = registry.get::<Splash>(OnDisposed::Reinitialize).unwrap();
//! registry.cleanup();
//! assert!(splash.is_disposed());
//! ```
//!
//! ## Features
//!
//! - **Lazy or eager**: construction is deferred to the first `get` unless [`Init::Eager`] is used
//! - **Disposal-aware**: a disposed instance is transparently rebuilt on the next `get`
//! - **Failure containment**: factory errors and panics surface as `false`/`None`, never as a panic
//! - **Two flavours**: an explicit [`Registry`] context object, or a process-wide
//!   registry module generated by [`define_registry!`]
//! - **Tracing support**: optional callback receiving a [`RegistryEvent`] per operation,
//!   plus `tracing` logs
//!
//! ## Main Operations
//!
//! - [`RegistryApi::register`] / [`RegistryApi::register_with`] - declare a kind
//! - [`RegistryApi::get`] - obtain (and construct if needed) the instance of a kind
//! - [`RegistryApi::unregister`] - forget a kind, optionally disposing its instance
//! - [`RegistryApi::unregister_all`] - forget every kind without disposing anything
//! - [`RegistryApi::cleanup`] - dispose everything and empty the registry
//! - [`RegistryApi::is_registered`] - check whether a kind is declared

mod disposable;
mod entry;
mod guard;
mod macros;
mod policy;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

// Factories and `Disposable` impls return `anyhow::Result`.
pub use anyhow;

pub use disposable::Disposable;
pub use entry::{Entry, Storage};
pub use guard::CleanupGuard;
pub use policy::{Init, OnDisposed, Teardown};
pub use registry::Registry;
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::{RegistryApi, TraceCallback, TraceSlot};
