use crate::RegistryApi;

/// Runs [`RegistryApi::cleanup`] on the wrapped registry when dropped.
///
/// Returned by [`RegistryApi::cleanup_on_drop`]; keep it alive for as long as
/// the registered instances are in use, typically the whole of `main`.
///
/// # Examples
///
/// ```rust
/// use disposable_registry::{Registry, RegistryApi};
///
/// let registry = Registry::new();
/// {
///     let _teardown = registry.cleanup_on_drop();
///     // ... register kinds and run the application ...
/// }
/// assert!(registry.is_empty());
/// ```
#[must_use = "cleanup runs when the guard is dropped"]
pub struct CleanupGuard<'a, R: RegistryApi> {
    registry: &'a R,
}

impl<'a, R: RegistryApi> CleanupGuard<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// The registry this guard will clean up.
    pub fn registry(&self) -> &'a R {
        self.registry
    }
}

impl<R: RegistryApi> Drop for CleanupGuard<'_, R> {
    fn drop(&mut self) {
        self.registry.cleanup();
    }
}
