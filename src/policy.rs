//! Per-call policies.
//!
//! Each enum's `Default` is the behaviour callers get when they don't care,
//! and `From<bool>` maps the plain flag form (`lazy`, `dispose`,
//! `reinitialize_when_disposed`) onto the enum.

/// When a registered kind gets its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Init {
    /// Construct on the first `get`.
    #[default]
    Lazy,
    /// Construct during `register`; a failing factory fails the registration.
    Eager,
}

impl From<bool> for Init {
    /// `true` means lazy.
    fn from(lazy: bool) -> Self {
        if lazy {
            Init::Lazy
        } else {
            Init::Eager
        }
    }
}

/// What `unregister` does with the current instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Teardown {
    /// Drop the registry's handle only; the instance stays alive for other holders.
    #[default]
    Detach,
    /// Dispose a live instance before forgetting the kind.
    Dispose,
}

impl From<bool> for Teardown {
    /// `true` means dispose.
    fn from(dispose: bool) -> Self {
        if dispose {
            Teardown::Dispose
        } else {
            Teardown::Detach
        }
    }
}

/// What `get` does when the stored instance has been disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnDisposed {
    /// Build a fresh instance and replace the disposed one.
    #[default]
    Reinitialize,
    /// Hand back the disposed instance; the caller checks liveness.
    ReturnStale,
}

impl From<bool> for OnDisposed {
    /// `true` means reinitialize.
    fn from(reinitialize: bool) -> Self {
        if reinitialize {
            OnDisposed::Reinitialize
        } else {
            OnDisposed::ReturnStale
        }
    }
}
