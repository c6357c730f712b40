//! # Fibre Binder
//!
//! A type-driven Inversion of Control (IoC) registry for Rust.
//!
//! Factories are plain closures. The closure's return type is the abstraction it is
//! bound to, and its parameter types are the abstractions the container supplies when
//! the factory runs. Instances are requested either by reference (fill a variable) or
//! by callback (call a closure with its parameters resolved).
//!
//! ## Core Concepts
//!
//! - **Abstraction**: any `Clone + Send + Sync + 'static` type. `Circle` and
//!   `Arc<Circle>` are different abstractions; traits are bound as `Arc<dyn Trait>`.
//! - **Lifetime**: a singleton is built once and reused, a transient is built on
//!   every resolution.
//! - **Container**: the registry. A process-wide one is available through
//!   [`global()`]; isolated ones are created with [`Container::new`].
//! - **Failures**: misuse is fatal. `make`, `singleton` and friends panic with a
//!   descriptive message; the `try_*` methods return an [`Error`] instead.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_binder::Container;
//! use std::sync::Arc;
//!
//! trait Shape: Send + Sync {
//!   fn area(&self) -> i32;
//! }
//!
//! struct Circle {
//!   area: i32,
//! }
//!
//! impl Shape for Circle {
//!   fn area(&self) -> i32 {
//!     self.area
//!   }
//! }
//!
//! #[derive(Clone)]
//! struct Report {
//!   text: String,
//! }
//!
//! let container = Container::new();
//! container.singleton(|| Arc::new(Circle { area: 5 }) as Arc<dyn Shape>);
//! container.transient(|shape: Arc<dyn Shape>| Report {
//!   text: format!("area is {}", shape.area()),
//! });
//!
//! // By callback.
//! container.make(|shape: Arc<dyn Shape>, report: Report| {
//!   assert_eq!(shape.area(), 5);
//!   assert_eq!(report.text, "area is 5");
//! });
//!
//! // By reference.
//! let mut report = Report { text: String::new() };
//! container.make(&mut report);
//! assert_eq!(report.text, "area is 5");
//! ```

mod binding;
mod concrete;
mod config;
mod container;
mod core;
mod error;
mod global;
mod macros;
mod receiver;

pub use crate::core::{Abstraction, Injectable, Lifetime};
pub use concrete::{Concrete, IntoConcrete};
pub use config::ContainerConfig;
pub use container::Container;
pub use error::{Error, Result};
pub use global::{global, make, reset, singleton, transient};
pub use receiver::{IntoReceiver, Receiver};

#[doc(hidden)]
pub use receiver::ByReference;
