use thiserror::Error;

/// Failures reported by registry operations.
///
/// The plain operations (`register`, `get`, `unregister`) collapse these into
/// `bool`/`Option`; the `try_` variants return them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The kind has no entry in the registry.
    #[error("Type not registered: {type_name}")]
    NotRegistered { type_name: &'static str },

    /// The factory returned an error or panicked.
    #[error("Failed to construct {type_name}: {reason}")]
    ConstructionFailed {
        type_name: &'static str,
        reason: String,
    },

    /// `Disposable::dispose` returned an error or panicked.
    #[error("Failed to dispose {type_name}: {reason}")]
    DisposalFailed {
        type_name: &'static str,
        reason: String,
    },

    /// `Disposable::is_disposed` panicked.
    #[error("Failed to check the state of {type_name}: {reason}")]
    StateCheckFailed {
        type_name: &'static str,
        reason: String,
    },

    /// The stored instance is not of the requested type.
    #[error("Type mismatch in registry for type: {type_name}")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    /// Name of the kind the error refers to.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryError::NotRegistered { type_name }
            | RegistryError::ConstructionFailed { type_name, .. }
            | RegistryError::DisposalFailed { type_name, .. }
            | RegistryError::StateCheckFailed { type_name, .. }
            | RegistryError::TypeMismatch { type_name } => type_name,
        }
    }
}
