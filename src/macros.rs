//! Macros for creating process-wide registries.
//!
//! This module provides a macro-based approach to create isolated, thread-safe
//! registries backed by module-private statics.

/// Creates a complete process-wide registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, and an `API` constant
/// - Free functions for every registry operation
///
/// # Examples
///
/// ```rust
/// use disposable_registry::{define_registry, Disposable, Init, OnDisposed};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct Inspector {
///     closed: AtomicBool,
/// }
///
/// impl Disposable for Inspector {
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
/// define_registry!(windows);
///
/// windows::register::<Inspector>(Init::Lazy);
/// let inspector = windows::get::<Inspector>(OnDisposed::Reinitialize).unwrap();
///
/// windows::cleanup();
/// assert!(inspector.is_disposed());
/// assert!(!windows::is_registered::<Inspector>());
/// ```
///
/// # Trait-Based Usage
///
/// The `API` constant gives access to the full [`RegistryApi`](crate::RegistryApi):
///
/// ```rust
/// use disposable_registry::{define_registry, RegistryApi};
///
/// define_registry!(app);
///
/// assert!(app::API.is_empty());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Storage for registered kinds (module-private)
            static STORAGE: LazyLock<$crate::Storage> = LazyLock::new(Default::default);

            // Trace callback storage (module-private)
            static TRACE: LazyLock<$crate::TraceSlot> = LazyLock::new(Default::default);

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `RegistryApi` trait's
            /// default implementations. This struct only provides access to the statics.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn storage(&self) -> &$crate::Storage {
                    &STORAGE
                }

                fn trace(&self) -> &$crate::TraceSlot {
                    &TRACE
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Register `T`, built with `T::default()`.
            pub fn register<T: $crate::Disposable + Default>(init: $crate::Init) -> bool {
                use $crate::RegistryApi;
                API.register::<T>(init)
            }

            /// Register `T` with an explicit factory.
            pub fn register_with<T, F>(init: $crate::Init, factory: F) -> bool
            where
                T: $crate::Disposable,
                F: Fn() -> $crate::anyhow::Result<T> + Send + Sync + 'static,
            {
                use $crate::RegistryApi;
                API.register_with::<T, F>(init, factory)
            }

            /// Register `T`, reporting why it failed.
            pub fn try_register<T: $crate::Disposable + Default>(
                init: $crate::Init,
            ) -> Result<(), $crate::RegistryError> {
                use $crate::RegistryApi;
                API.try_register::<T>(init)
            }

            /// Unregister `T`, optionally disposing its instance.
            pub fn unregister<T: $crate::Disposable>(teardown: $crate::Teardown) -> bool {
                use $crate::RegistryApi;
                API.unregister::<T>(teardown)
            }

            /// Unregister `T`, reporting why it failed.
            pub fn try_unregister<T: $crate::Disposable>(
                teardown: $crate::Teardown,
            ) -> Result<(), $crate::RegistryError> {
                use $crate::RegistryApi;
                API.try_unregister::<T>(teardown)
            }

            /// Remove every entry without disposing anything.
            pub fn unregister_all() {
                use $crate::RegistryApi;
                API.unregister_all()
            }

            /// Dispose every live instance and remove every entry.
            pub fn cleanup() {
                use $crate::RegistryApi;
                API.cleanup()
            }

            /// Return a guard that runs `cleanup` when dropped.
            pub fn cleanup_on_drop() -> $crate::CleanupGuard<'static, Api> {
                $crate::CleanupGuard::new(&API)
            }

            /// Check whether `T` is registered.
            pub fn is_registered<T: 'static>() -> bool {
                use $crate::RegistryApi;
                API.is_registered::<T>()
            }

            /// Get the instance of `T`, constructing it if needed.
            pub fn get<T: $crate::Disposable>(on_disposed: $crate::OnDisposed) -> Option<Arc<T>> {
                use $crate::RegistryApi;
                API.get::<T>(on_disposed)
            }

            /// Get the instance of `T`, reporting why it failed.
            pub fn try_get<T: $crate::Disposable>(
                on_disposed: $crate::OnDisposed,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.try_get::<T>(on_disposed)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                use $crate::RegistryApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::RegistryApi;
                API.clear_trace_callback()
            }
        }
    };
}
