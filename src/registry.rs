//! An explicit, instance-scoped registry.
//!
//! [`Registry`] owns its storage and trace callback, so it can be created by
//! whatever owns the application's main loop and passed down, instead of being
//! reached through global state. For a process-wide registry use
//! [`define_registry!`](crate::define_registry).

use std::fmt;

use crate::registry_trait::TraceSlot;
use crate::{RegistryApi, Storage};

/// A registry context object.
///
/// All operations come from [`RegistryApi`].
///
/// # Examples
///
/// ```rust
/// use disposable_registry::{Disposable, Init, OnDisposed, Registry, RegistryApi, Teardown};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct Palette {
///     closed: AtomicBool,
/// }
///
/// impl Disposable for Palette {
///     fn dispose(&self) -> anyhow::Result<()> {
///         self.closed.store(true, Ordering::SeqCst);
///         Ok(())
///     }
///
///     fn is_disposed(&self) -> bool {
///         self.closed.load(Ordering::SeqCst)
///     }
/// }
///
/// let registry = Registry::new();
/// registry.register::<Palette>(Init::Lazy);
///
/// let first = registry.get::<Palette>(OnDisposed::Reinitialize).unwrap();
/// first.dispose().unwrap();
///
/// // A disposed instance is rebuilt on the next access.
/// let second = registry.get::<Palette>(OnDisposed::Reinitialize).unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&first, &second));
///
/// assert!(registry.unregister::<Palette>(Teardown::Dispose));
/// assert!(second.is_disposed());
/// ```
#[derive(Default)]
pub struct Registry {
    storage: Storage,
    trace: TraceSlot,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryApi for Registry {
    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn trace(&self) -> &TraceSlot {
        &self.trace
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.registered_type_names())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
