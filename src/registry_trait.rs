//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! registering kinds, lazily constructing their instances, and tearing them down.
//!
//! The registry is type-based: each type (`TypeId`) has at most one entry, and each
//! entry holds at most one instance. Registering an already registered type is a no-op.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::entry::{Entry, Storage};
use crate::{CleanupGuard, Disposable, Init, OnDisposed, RegistryError, RegistryEvent, Teardown};

/// Type alias for the user-supplied tracing callback.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Storage for an optional trace callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

fn lock_storage(storage: &Storage) -> MutexGuard<'_, HashMap<TypeId, Arc<Entry>>> {
    // Poisoning only occurs if a thread panicked while holding the lock; the map
    // itself is never left half-updated.
    storage.lock().unwrap_or_else(|p| p.into_inner())
}

fn entry_of(storage: &Storage, key: TypeId) -> Option<Arc<Entry>> {
    lock_storage(storage).get(&key).cloned()
}

/// Whether `entry` is still the one registered under `key`. Checked with the
/// entry's slot lock held, so a removal that happened since the lookup is seen.
fn is_current(storage: &Storage, key: TypeId, entry: &Arc<Entry>) -> bool {
    lock_storage(storage)
        .get(&key)
        .is_some_and(|current| Arc::ptr_eq(current, entry))
}

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// Locking: the storage lock is held only for map lookups and updates. Each entry has
/// its own slot lock, held while its instance is checked, (re)built or disposed by
/// `unregister`, so concurrent `get` calls construct a kind once. The storage lock is
/// only ever taken after a slot lock, never before.
///
/// A factory may `get` other kinds, but kinds must not have cyclic construction
/// dependencies: a factory that `get`s its own kind, or two factories that `get` each
/// other, deadlock on the slot locks (on one thread, or across two threads). For the
/// same reason `Disposable::dispose` must not `get` its own kind.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked once per operation, after all registry locks have
    /// been released.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Registered kinds and their instances are not affected.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit a registry event using the current callback, if any.
    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the entry storage.
    fn storage(&self) -> &Storage;

    /// Register `T`, built with `T::default()`.
    ///
    /// Returns `false` only if `init` is [`Init::Eager`] and construction failed.
    fn register<T: Disposable + Default>(&self, init: Init) -> bool {
        self.try_register::<T>(init).is_ok()
    }

    /// Same as [`register`](Self::register), reporting why it failed.
    fn try_register<T: Disposable + Default>(&self, init: Init) -> Result<(), RegistryError> {
        self.try_register_with(init, || Ok(T::default()))
    }

    /// Register `T` with an explicit factory.
    ///
    /// Kinds that need constructor arguments capture them in the factory.
    fn register_with<T, F>(&self, init: Init, factory: F) -> bool
    where
        T: Disposable,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.try_register_with::<T, F>(init, factory).is_ok()
    }

    /// Same as [`register_with`](Self::register_with), reporting why it failed.
    ///
    /// - Already registered: succeeds without touching the existing entry or instance.
    /// - [`Init::Lazy`]: inserts an entry with an empty slot.
    /// - [`Init::Eager`]: builds the instance first. If that fails the type stays
    ///   unregistered. If another thread registered the type in the meantime, the
    ///   instance built here is disposed and the existing entry is kept.
    fn try_register_with<T, F>(&self, init: Init, factory: F) -> Result<(), RegistryError>
    where
        T: Disposable,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let key = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if lock_storage(self.storage()).contains_key(&key) {
            debug!(type_name, "already registered");
            return Ok(());
        }

        let entry = Entry::new::<T, F>(factory);
        if init == Init::Eager {
            let built = entry.construct();
            self.emit_event(&RegistryEvent::Construct {
                type_name,
                success: built.is_ok(),
            });
            let instance = built.inspect_err(|err| {
                warn!(type_name, error = %err, "eager construction failed, not registering");
            })?;
            *entry.slot() = Some(instance);
        }

        let redundant = {
            let mut entries = lock_storage(self.storage());
            if entries.contains_key(&key) {
                Some(entry)
            } else {
                entries.insert(key, Arc::new(entry));
                None
            }
        };

        match redundant {
            Some(entry) => {
                let instance = entry.slot().take();
                if let Some(instance) = instance {
                    if let Err(err) = instance.dispose(type_name) {
                        warn!(type_name, error = %err, "failed to dispose redundant instance");
                    }
                }
                debug!(type_name, "registered concurrently, kept existing entry");
            }
            None => {
                debug!(type_name, ?init, "registered");
                self.emit_event(&RegistryEvent::Register {
                    type_name,
                    lazy: init == Init::Lazy,
                });
            }
        }

        Ok(())
    }

    /// Unregister `T`.
    ///
    /// Returns `false` if `T` is not registered, or if disposing its instance failed;
    /// in the latter case `T` stays registered.
    fn unregister<T: Disposable>(&self, teardown: Teardown) -> bool {
        self.try_unregister::<T>(teardown).is_ok()
    }

    /// Same as [`unregister`](Self::unregister), reporting why it failed.
    ///
    /// With [`Teardown::Dispose`] a live instance is disposed before the entry is
    /// removed. Instances that are disposed already, or were never built, are left alone.
    ///
    /// If the entry is removed or replaced by another thread (or by the instance's own
    /// `dispose`) before this call removes it, the call fails with `NotRegistered` and
    /// the replacement entry is left in place.
    fn try_unregister<T: Disposable>(&self, teardown: Teardown) -> Result<(), RegistryError> {
        let key = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        let Some(entry) = entry_of(self.storage(), key) else {
            self.emit_event(&RegistryEvent::Unregister {
                type_name,
                disposed: false,
                success: false,
            });
            return Err(RegistryError::NotRegistered { type_name });
        };

        let outcome = {
            // Held until the entry is removed, so `get` cannot rebuild in between.
            let slot = entry.slot();
            if !is_current(self.storage(), key, &entry) {
                Err((RegistryError::NotRegistered { type_name }, false))
            } else {
                let disposal = match (teardown, slot.as_ref()) {
                    (Teardown::Dispose, Some(instance)) => instance.dispose_if_live(type_name),
                    _ => Ok(false),
                };

                match disposal {
                    Err(err) => {
                        warn!(type_name, error = %err, "disposal failed, keeping registration");
                        Err((err, false))
                    }
                    Ok(disposed) => {
                        let mut entries = lock_storage(self.storage());
                        // Only remove the entry we looked at, not one registered after it.
                        if entries
                            .get(&key)
                            .is_some_and(|current| Arc::ptr_eq(current, &entry))
                        {
                            entries.remove(&key);
                            Ok(disposed)
                        } else {
                            Err((RegistryError::NotRegistered { type_name }, disposed))
                        }
                    }
                }
            }
        };

        match outcome {
            Ok(disposed) => {
                debug!(type_name, disposed, "unregistered");
                self.emit_event(&RegistryEvent::Unregister {
                    type_name,
                    disposed,
                    success: true,
                });
                Ok(())
            }
            Err((err, disposed)) => {
                self.emit_event(&RegistryEvent::Unregister {
                    type_name,
                    disposed,
                    success: false,
                });
                Err(err)
            }
        }
    }

    /// Remove every entry without disposing any instance.
    ///
    /// Instances still held elsewhere stay alive; their owners are now responsible
    /// for disposing them.
    fn unregister_all(&self) {
        let entries = std::mem::take(&mut *lock_storage(self.storage()));
        let count = entries.len();
        drop(entries);

        debug!(count, "unregistered all entries");
        self.emit_event(&RegistryEvent::UnregisterAll { count });
    }

    /// Dispose every live instance and remove every entry.
    ///
    /// Each disposal is attempted independently; failures (including a panicking
    /// `is_disposed`) are logged and counted but do not stop the others. Afterwards
    /// the registry is empty.
    fn cleanup(&self) {
        let entries = std::mem::take(&mut *lock_storage(self.storage()));

        let mut disposed: usize = 0;
        let mut failed: usize = 0;
        for entry in entries.into_values() {
            let Some(instance) = entry.slot().take() else { continue };

            match instance.dispose_if_live(entry.type_name()) {
                Ok(false) => {}
                Ok(true) => disposed += 1,
                Err(err) => {
                    failed += 1;
                    warn!(type_name = entry.type_name(), error = %err, "disposal failed during cleanup");
                }
            }
        }

        info!(disposed, failed, "registry cleaned up");
        self.emit_event(&RegistryEvent::Cleanup { disposed, failed });
    }

    /// Check whether `T` is registered.
    fn is_registered<T: 'static>(&self) -> bool {
        let found = lock_storage(self.storage()).contains_key(&TypeId::of::<T>());

        self.emit_event(&RegistryEvent::IsRegistered {
            type_name: std::any::type_name::<T>(),
            found,
        });

        found
    }

    /// Get the instance of `T`, constructing it if needed.
    ///
    /// Returns `None` if `T` is not registered or its construction failed. A failed
    /// construction is not remembered: the next call tries again.
    fn get<T: Disposable>(&self, on_disposed: OnDisposed) -> Option<Arc<T>> {
        self.try_get::<T>(on_disposed).ok()
    }

    /// Same as [`get`](Self::get), reporting why it failed.
    ///
    /// - Empty slot: build, store and return the instance.
    /// - Live instance: return it.
    /// - Disposed instance: with [`OnDisposed::Reinitialize`] the disposed instance is
    ///   dropped and a fresh one built (a failed rebuild leaves the slot empty);
    ///   with [`OnDisposed::ReturnStale`] the disposed instance is returned as is.
    ///   An instance whose `is_disposed` panics counts as disposed.
    ///
    /// If the entry is removed concurrently (by `cleanup` or `unregister`), the call
    /// fails with `NotRegistered` rather than building into the removed entry.
    fn try_get<T: Disposable>(&self, on_disposed: OnDisposed) -> Result<Arc<T>, RegistryError> {
        let key = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        let Some(entry) = entry_of(self.storage(), key) else {
            self.emit_event(&RegistryEvent::Get {
                type_name,
                found: false,
            });
            return Err(RegistryError::NotRegistered { type_name });
        };

        let (result, constructed) = {
            let mut slot = entry.slot();
            let reusable = match slot.as_ref() {
                Some(instance) if on_disposed == OnDisposed::ReturnStale => Some(instance.clone()),
                Some(instance) => match instance.is_live(type_name) {
                    Ok(live) => live.then(|| instance.clone()),
                    Err(err) => {
                        warn!(type_name, error = %err, "state check failed, treating instance as disposed");
                        None
                    }
                },
                None => None,
            };

            if !is_current(self.storage(), key, &entry) {
                (Err(RegistryError::NotRegistered { type_name }), None)
            } else if let Some(instance) = reusable {
                (instance.downcast::<T>(), None)
            } else {
                if slot.take().is_some() {
                    debug!(type_name, "instance disposed, reinitializing");
                }
                match entry.construct() {
                    Ok(instance) => {
                        let value = instance.downcast::<T>();
                        *slot = Some(instance);
                        (value, Some(true))
                    }
                    Err(err) => (Err(err), Some(false)),
                }
            }
        };

        if let Some(success) = constructed {
            if success {
                debug!(type_name, "constructed");
            } else if let Err(err) = &result {
                warn!(type_name, error = %err, "construction failed");
            }
            self.emit_event(&RegistryEvent::Construct { type_name, success });
        }

        self.emit_event(&RegistryEvent::Get {
            type_name,
            found: result.is_ok(),
        });

        result
    }

    /// Number of registered kinds.
    fn len(&self) -> usize {
        lock_storage(self.storage()).len()
    }

    /// Whether no kind is registered.
    fn is_empty(&self) -> bool {
        lock_storage(self.storage()).is_empty()
    }

    /// Names of the registered kinds, sorted.
    fn registered_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = lock_storage(self.storage())
            .values()
            .map(|entry| entry.type_name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Return a guard that runs [`cleanup`](Self::cleanup) when dropped.
    fn cleanup_on_drop(&self) -> CleanupGuard<'_, Self>
    where
        Self: Sized,
    {
        CleanupGuard::new(self)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
