//! The global container instance and the process-level shortcuts around it.

use crate::concrete::IntoConcrete;
use crate::container::Container;
use crate::receiver::IntoReceiver;
use once_cell::sync::Lazy;

// The one and only global container instance.
// It will be created on its first access in a thread-safe manner.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the global container instance.
///
/// # Examples
///
/// ```
/// use fibre_binder::global;
///
/// fn register_services() {
///   global().instance(String::from("Hello from global!"));
/// }
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}

/// Binds `resolver` as a singleton in the global container.
pub fn singleton<M>(resolver: impl IntoConcrete<M>) {
  global().singleton(resolver);
}

/// Binds `resolver` as a transient in the global container.
pub fn transient<M>(resolver: impl IntoConcrete<M>) {
  global().transient(resolver);
}

/// Fills `receiver` from the global container, panicking on failure.
pub fn make<'a, M>(receiver: impl IntoReceiver<'a, M>) {
  global().make(receiver);
}

/// Clears every binding of the global container.
pub fn reset() {
  global().reset();
}
