//! Public macros for ergonomic resolution.

/// Resolves an abstraction from the global container.
///
/// Panics with the container's error message if the abstraction is not bound or
/// cannot be built. For a non-panicking version, use `global().resolve::<T>()`.
///
/// # Examples
///
/// ```
/// use fibre_binder::{global, resolve};
///
/// global().singleton(|| String::from("hello"));
///
/// let message = resolve!(String);
/// assert_eq!(message, "hello");
/// ```
///
/// ```
/// use fibre_binder::{global, resolve};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global().singleton(|| Arc::new(EnglishGreeter) as Arc<dyn Greeter>);
///
/// // `trait Greeter` is shorthand for `Arc<dyn Greeter>`.
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  (trait $trait_ident:ident) => {
    $crate::global()
      .resolve::<std::sync::Arc<dyn $trait_ident>>()
      .unwrap_or_else(|e| panic!("{}", e))
  };

  ($type:ty) => {
    $crate::global()
      .resolve::<$type>()
      .unwrap_or_else(|e| panic!("{}", e))
  };
}
