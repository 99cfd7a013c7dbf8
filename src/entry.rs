//! Per-kind registry entries.
//!
//! An [`Entry`] owns the factory of a kind and the slot its instance lives in.
//! The slot is either empty (lazy and not built yet, or discarded after a
//! failed rebuild) or holds an [`Instance`] that is live or disposed.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Disposable, RegistryError};

/// Backing map of a registry: one entry per registered kind.
pub type Storage = Mutex<HashMap<TypeId, Arc<Entry>>>;

type Factory = Box<dyn Fn() -> anyhow::Result<Instance> + Send + Sync>;

/// A constructed instance, viewed both as `Any` (to hand out `Arc<T>`) and as
/// `Disposable` (to check and end its lifetime without knowing `T`).
#[derive(Clone)]
pub(crate) struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    lifecycle: Arc<dyn Disposable>,
}

impl Instance {
    pub(crate) fn new<T: Disposable>(value: T) -> Self {
        let value = Arc::new(value);
        Self {
            value: value.clone(),
            lifecycle: value,
        }
    }

    /// Whether the instance has not been disposed. A panic raised by
    /// `is_disposed` becomes `StateCheckFailed`.
    pub(crate) fn is_live(&self, type_name: &'static str) -> Result<bool, RegistryError> {
        let lifecycle = &self.lifecycle;
        panic::catch_unwind(AssertUnwindSafe(|| !lifecycle.is_disposed())).map_err(|payload| {
            RegistryError::StateCheckFailed {
                type_name,
                reason: panic_message(&*payload),
            }
        })
    }

    /// Dispose the instance unless it is disposed already. Returns whether
    /// `dispose` was called.
    pub(crate) fn dispose_if_live(&self, type_name: &'static str) -> Result<bool, RegistryError> {
        if self.is_live(type_name)? {
            self.dispose(type_name)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn downcast<T: Disposable>(&self) -> Result<Arc<T>, RegistryError> {
        self.value
            .clone()
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Dispose the instance. Errors and panics raised by the resource are
    /// turned into `DisposalFailed`.
    pub(crate) fn dispose(&self, type_name: &'static str) -> Result<(), RegistryError> {
        let lifecycle = &self.lifecycle;
        match panic::catch_unwind(AssertUnwindSafe(|| lifecycle.dispose())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(RegistryError::DisposalFailed {
                type_name,
                reason: format!("{err:#}"),
            }),
            Err(payload) => Err(RegistryError::DisposalFailed {
                type_name,
                reason: panic_message(&*payload),
            }),
        }
    }
}

/// Registry entry of a single kind.
///
/// Entries are created by `register`/`register_with` and only ever reached
/// through a registry's [`Storage`].
pub struct Entry {
    type_name: &'static str,
    factory: Factory,
    slot: Mutex<Option<Instance>>,
}

impl Entry {
    pub(crate) fn new<T, F>(factory: F) -> Self
    where
        T: Disposable,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            factory: Box::new(move || factory().map(Instance::new)),
            slot: Mutex::new(None),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Lock the instance slot, recovering from poisoning.
    pub(crate) fn slot(&self) -> MutexGuard<'_, Option<Instance>> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Run the factory. Errors and panics become `ConstructionFailed`; nothing
    /// is stored in the slot here.
    pub(crate) fn construct(&self) -> Result<Instance, RegistryError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.factory)())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(err)) => Err(RegistryError::ConstructionFailed {
                type_name: self.type_name,
                reason: format!("{err:#}"),
            }),
            Err(payload) => Err(RegistryError::ConstructionFailed {
                type_name: self.type_name,
                reason: panic_message(&*payload),
            }),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}
