//! Binding records stored by a container.

use crate::concrete::Concrete;
use crate::core::{Instance, Lifetime, WaitGuard};
use crate::error::Result;
use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// A concrete bound under its abstraction, plus the singleton cache.
pub(crate) struct Binding {
  concrete: Concrete,
  lifetime: Lifetime,
  instance: OnceCell<Instance>,
  // Thread currently running the singleton's factory, if any.
  builder: Mutex<Option<ThreadId>>,
  built: Condvar,
}

enum Slot<'a> {
  Ready(Instance),
  Claimed(BuildClaim<'a>),
}

/// Exclusive right to build a singleton. Dropping it wakes the threads waiting on it,
/// whether or not the build succeeded.
struct BuildClaim<'a> {
  binding: &'a Binding,
}

impl Drop for BuildClaim<'_> {
  fn drop(&mut self) {
    let mut builder = self.binding.builder.lock();
    *builder = None;
    WaitGuard::release(self.binding.address());
    drop(builder);
    self.binding.built.notify_all();
  }
}

impl Binding {
  pub(crate) fn new(concrete: Concrete, lifetime: Lifetime) -> Self {
    Self::with_cell(concrete, lifetime, OnceCell::new())
  }

  /// A singleton binding that starts out instantiated.
  pub(crate) fn instantiated(concrete: Concrete, instance: Instance) -> Self {
    Self::with_cell(concrete, Lifetime::Singleton, OnceCell::with_value(instance))
  }

  fn with_cell(concrete: Concrete, lifetime: Lifetime, instance: OnceCell<Instance>) -> Self {
    Self {
      concrete,
      lifetime,
      instance,
      builder: Mutex::new(None),
      built: Condvar::new(),
    }
  }

  pub(crate) fn concrete(&self) -> &Concrete {
    &self.concrete
  }

  pub(crate) fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  pub(crate) fn is_instantiated(&self) -> bool {
    self.instance.get().is_some()
  }

  fn address(&self) -> usize {
    self as *const Self as usize
  }

  /// Returns the cached singleton, or claims the right to build it. Blocks while another
  /// thread is building, unless that thread is waiting on this one.
  fn claim(&self, container_id: usize) -> Result<Slot<'_>> {
    let mut builder = self.builder.lock();
    loop {
      if let Some(instance) = self.instance.get() {
        return Ok(Slot::Ready(Arc::clone(instance)));
      }
      let owner = *builder;
      match owner {
        None => {
          *builder = Some(thread::current().id());
          return Ok(Slot::Claimed(BuildClaim { binding: self }));
        }
        Some(owner) => {
          let _wait = WaitGuard::new(container_id, owner, self.address(), self.concrete.abstraction())?;
          self.built.wait(&mut builder);
        }
      }
    }
  }

  /// Produces the instance for this binding.
  ///
  /// `build` resolves the concrete's dependencies and invokes it. Transient bindings
  /// call it every time; singletons call it until it first succeeds and reuse that value.
  pub(crate) fn instance(
    &self,
    container_id: usize,
    build: impl FnOnce(&Concrete) -> Result<Instance>,
  ) -> Result<Instance> {
    if self.lifetime == Lifetime::Transient {
      return build(&self.concrete);
    }
    if let Some(instance) = self.instance.get() {
      return Ok(Arc::clone(instance));
    }

    let _claim = match self.claim(container_id)? {
      Slot::Ready(instance) => return Ok(instance),
      Slot::Claimed(claim) => claim,
    };
    let instance = build(&self.concrete)?;
    tracing::debug!(abstraction = %self.concrete.abstraction(), "singleton instantiated");
    // Only the claim holder fills the cell.
    let _ = self.instance.set(Arc::clone(&instance));
    Ok(instance)
  }
}
