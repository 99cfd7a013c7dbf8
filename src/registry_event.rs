/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use disposable_registry::RegistryEvent;
///
/// let event = RegistryEvent::Register { type_name: "MainForm", lazy: true };
/// assert_eq!(event.to_string(), "register { type_name: MainForm, lazy: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A kind was registered (only emitted when it was not registered before).
    Register {
        type_name: &'static str,
        lazy: bool,
    },

    /// The factory of a kind was run.
    Construct {
        type_name: &'static str,
        success: bool,
    },

    /// An instance was requested.
    Get {
        type_name: &'static str,
        /// Whether an instance was handed out
        found: bool,
    },

    /// A registration check was performed.
    IsRegistered {
        type_name: &'static str,
        found: bool,
    },

    /// A kind was unregistered, or an attempt failed.
    Unregister {
        type_name: &'static str,
        /// Whether the live instance was disposed on the way out
        disposed: bool,
        success: bool,
    },

    /// Every entry was dropped without disposal.
    UnregisterAll { count: usize },

    /// Every live instance was disposed and the registry emptied.
    Cleanup { disposed: usize, failed: usize },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { type_name, lazy } => {
                write!(f, "register {{ type_name: {type_name}, lazy: {lazy} }}")
            }
            RegistryEvent::Construct { type_name, success } => {
                write!(f, "construct {{ type_name: {type_name}, success: {success} }}")
            }
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::IsRegistered { type_name, found } => {
                write!(f, "is_registered {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Unregister {
                type_name,
                disposed,
                success,
            } => write!(
                f,
                "unregister {{ type_name: {type_name}, disposed: {disposed}, success: {success} }}"
            ),
            RegistryEvent::UnregisterAll { count } => {
                write!(f, "unregister_all {{ count: {count} }}")
            }
            RegistryEvent::Cleanup { disposed, failed } => {
                write!(f, "cleanup {{ disposed: {disposed}, failed: {failed} }}")
            }
        }
    }
}
