//! The main `Container` struct and its associated methods.

use crate::binding::Binding;
use crate::concrete::{Concrete, IntoConcrete};
use crate::config::ContainerConfig;
use crate::core::{downcast, Abstraction, Injectable, Instance, Lifetime, ResolutionGuard};
use crate::error::{Error, Result};
use crate::receiver::{IntoReceiver, Receiver};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(0);

/// The Inversion of Control (IoC) container.
///
/// Maps abstractions (Rust types) to bindings. Registration inspects a factory closure:
/// its return type is the abstraction being bound and its parameter types are the
/// abstractions it depends on. Resolution builds those dependencies depth-first from
/// the same container.
///
/// The container is thread-safe. Bindings are cloned out of the map before their
/// factory runs, so factories may use the container themselves.
pub struct Container {
  id: usize,
  config: ContainerConfig,
  bindings: DashMap<Abstraction, Arc<Binding>>,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_config(ContainerConfig::default())
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` with the given configuration.
  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
      config,
      bindings: DashMap::new(),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- PRIVATE HELPERS ---

  fn bind(&self, binding: Binding) -> Result<()> {
    let abstraction = binding.concrete().abstraction();
    let lifetime = binding.lifetime();
    let dependencies = binding.concrete().dependencies().len();
    let binding = Arc::new(binding);

    if self.config.allow_overriding {
      if let Some(previous) = self.bindings.insert(abstraction, binding) {
        tracing::debug!(
          abstraction = %abstraction,
          previous_lifetime = ?previous.lifetime(),
          "binding overridden"
        );
      }
    } else {
      match self.bindings.entry(abstraction) {
        Entry::Occupied(_) => return Err(Error::DuplicateBinding(abstraction)),
        Entry::Vacant(vacant) => {
          vacant.insert(binding);
        }
      }
    }

    tracing::debug!(abstraction = %abstraction, ?lifetime, dependencies, "binding registered");
    Ok(())
  }

  fn ensure_bindable(&self, abstraction: Abstraction) -> Result<()> {
    if !self.config.allow_overriding && self.bindings.contains_key(&abstraction) {
      return Err(Error::DuplicateBinding(abstraction));
    }
    Ok(())
  }

  fn resolve_abstraction(&self, abstraction: Abstraction) -> Result<Instance> {
    let binding = self
      .bindings
      .get(&abstraction)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or(Error::NoConcrete(abstraction))?;

    // Fails instead of recursing forever when the abstraction is already being resolved
    // further up this thread's stack. Waits across threads are checked by the binding.
    let _guard = ResolutionGuard::new(self.id, abstraction)?;

    tracing::trace!(abstraction = %abstraction, lifetime = ?binding.lifetime(), "resolving");
    binding.instance(self.id, |concrete| self.construct(concrete))
  }

  fn resolve_all(&self, abstractions: &[Abstraction]) -> Result<Vec<Instance>> {
    abstractions
      .iter()
      .map(|abstraction| self.resolve_abstraction(*abstraction))
      .collect()
  }

  fn construct(&self, concrete: &Concrete) -> Result<Instance> {
    let arguments = self.resolve_all(concrete.dependencies())?;
    concrete.construct(arguments)
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Binds the factory's return type to the factory with the given lifetime.
  ///
  /// Any earlier binding for the same abstraction, including its cached singleton, is
  /// replaced unless overriding is disabled in the configuration.
  pub fn try_register<M>(&self, resolver: impl IntoConcrete<M>, lifetime: Lifetime) -> Result<()> {
    let binding = Binding::new(resolver.into_concrete(), lifetime);

    if lifetime == Lifetime::Singleton && self.config.eager_singletons {
      self.ensure_bindable(binding.concrete().abstraction())?;
      binding.instance(self.id, |concrete| self.construct(concrete))?;
    }

    self.bind(binding)
  }

  /// Panicking version of [`Container::try_register`].
  pub fn register<M>(&self, resolver: impl IntoConcrete<M>, lifetime: Lifetime) {
    if let Err(e) = self.try_register(resolver, lifetime) {
      panic!("{}", e);
    }
  }

  pub fn singleton<M>(&self, resolver: impl IntoConcrete<M>) {
    self.register(resolver, Lifetime::Singleton);
  }

  pub fn transient<M>(&self, resolver: impl IntoConcrete<M>) {
    self.register(resolver, Lifetime::Transient);
  }

  /// Binds an already built value as a singleton.
  pub fn try_instance<T: Injectable>(&self, value: T) -> Result<()> {
    let instance: Instance = Arc::new(value.clone());
    self.bind(Binding::instantiated(Concrete::from_value(value), instance))
  }

  /// Panicking version of [`Container::try_instance`].
  pub fn instance<T: Injectable>(&self, value: T) {
    if let Err(e) = self.try_instance(value) {
      panic!("{}", e);
    }
  }

  /// Registers a type-erased resolver. The box must hold a [`Concrete`].
  pub fn try_register_any(&self, resolver: Box<dyn Any + Send + Sync>, lifetime: Lifetime) -> Result<()> {
    let concrete = resolver
      .downcast::<Concrete>()
      .map_err(|_| Error::ResolverNotFunction)?;
    self.try_register(*concrete, lifetime)
  }

  /// Panicking version of [`Container::try_register_any`].
  pub fn register_any(&self, resolver: Box<dyn Any + Send + Sync>, lifetime: Lifetime) {
    if let Err(e) = self.try_register_any(resolver, lifetime) {
      panic!("{}", e);
    }
  }

  /// Removes every binding, returning the container to its empty state.
  pub fn reset(&self) {
    let cleared = self.bindings.len();
    self.bindings.clear();
    tracing::debug!(cleared, "container reset");
  }

  // --- Resolution ---

  /// Fills the receiver: assigns into a reference or calls a callback with its
  /// parameters resolved.
  ///
  /// Every requirement is resolved before the receiver is touched, so a failure leaves
  /// references unchanged and callbacks uncalled.
  pub fn try_make<'a, M>(&self, receiver: impl IntoReceiver<'a, M>) -> Result<()> {
    let receiver = receiver.into_receiver();
    let requirements = receiver.requirements();
    let instances = self.resolve_all(&requirements)?;

    tracing::trace!(callback = receiver.is_callback(), requirements = requirements.len(), "filling receiver");
    receiver.satisfy(instances)
  }

  /// Panicking version of [`Container::try_make`].
  pub fn make<'a, M>(&self, receiver: impl IntoReceiver<'a, M>) {
    if let Err(e) = self.try_make(receiver) {
      panic!("{}", e);
    }
  }

  /// Fills a type-erased receiver. The box must hold a [`Receiver`]; `None` carries no
  /// type information at all.
  pub fn try_make_any(&self, receiver: Option<Box<dyn Any>>) -> Result<()> {
    let receiver = receiver.ok_or(Error::ReceiverNotReference)?;
    let receiver = receiver
      .downcast::<Receiver<'static>>()
      .map_err(|_| Error::UnsupportedReceiver)?;
    self.try_make(*receiver)
  }

  /// Panicking version of [`Container::try_make_any`].
  pub fn make_any(&self, receiver: Option<Box<dyn Any>>) {
    if let Err(e) = self.try_make_any(receiver) {
      panic!("{}", e);
    }
  }

  /// Resolves a single abstraction directly.
  pub fn resolve<T: Injectable>(&self) -> Result<T> {
    let instance = self.resolve_abstraction(Abstraction::of::<T>())?;
    downcast::<T>(&instance)
  }

  // --- Introspection ---

  pub fn is_bound<T: ?Sized + Any>(&self) -> bool {
    self.bindings.contains_key(&Abstraction::of::<T>())
  }

  /// Whether a singleton for `T` has been built. Always `false` for transient bindings.
  pub fn is_instantiated<T: ?Sized + Any>(&self) -> bool {
    self
      .bindings
      .get(&Abstraction::of::<T>())
      .map(|entry| entry.value().is_instantiated())
      .unwrap_or(false)
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }
}
