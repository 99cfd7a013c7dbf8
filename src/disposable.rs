/// Capability a resource must provide to be managed by a registry.
///
/// The registry hands out shared `Arc<T>` handles, so disposal works through
/// `&self`; implementors keep their torn-down state behind interior mutability
/// (an `AtomicBool`, a `Mutex`, ...).
///
/// # Examples
///
/// ```rust
/// use disposable_registry::Disposable;
/// use std::sync::Mutex;
///
/// struct Connection {
///     socket: Mutex<Option<String>>,
/// }
///
/// impl Disposable for Connection {
///     fn dispose(&self) -> anyhow::Result<()> {
///         self.socket.lock().unwrap().take();
///         Ok(())
///     }
///
///     fn is_disposed(&self) -> bool {
///         self.socket.lock().unwrap().is_none()
///     }
/// }
/// ```
pub trait Disposable: Send + Sync + 'static {
    /// Release the resource. After a successful call `is_disposed` must return `true`.
    fn dispose(&self) -> anyhow::Result<()>;

    /// Whether the resource has already been torn down.
    fn is_disposed(&self) -> bool;
}
