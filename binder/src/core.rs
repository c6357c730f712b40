//! Core data structures shared by the registry and the resolution engine.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// A type-erased, shared value produced by a concrete.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

/// Marker for types that can be bound, resolved and injected.
///
/// Resolution hands out clones of the produced value, so anything that should be
/// shared between consumers (and observe each other's mutations) is bound as an
/// `Arc<..>` or another handle type.
pub trait Injectable: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Injectable for T {}

/// How long a produced value lives inside a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifetime {
  /// Built on first resolution, then cached until reset or re-registration.
  Singleton,
  /// Built anew on every resolution.
  Transient,
}

/// Runtime type token identifying an abstraction.
///
/// Two tokens are equal iff they describe the same Rust type. `Circle` and
/// `Arc<Circle>` are different abstractions.
#[derive(Clone, Copy)]
pub struct Abstraction {
  type_id: TypeId,
  name: &'static str,
}

impl Abstraction {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      name: type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  /// The fully qualified type name, e.g. `alloc::sync::Arc<my_app::Shape>`.
  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for Abstraction {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for Abstraction {}

impl Hash for Abstraction {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for Abstraction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Abstraction({})", self.name)
  }
}

impl fmt::Display for Abstraction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Clones the typed value out of an erased instance.
pub(crate) fn downcast<T: Injectable>(instance: &Instance) -> Result<T> {
  instance
    .downcast_ref::<T>()
    .cloned()
    .ok_or_else(|| Error::IncompatibleConcrete(Abstraction::of::<T>()))
}

thread_local! {
  // Abstractions currently being resolved on this thread, tagged with the id of the
  // container resolving them. Nested resolutions in another container are not cycles.
  static RESOLVING_STACK: RefCell<Vec<(usize, Abstraction)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard that detects circular dependencies.
///
/// Creating it pushes the abstraction onto the thread-local resolution stack and fails
/// if the same container is already resolving it. Dropping it pops the entry again.
pub(crate) struct ResolutionGuard {
  container_id: usize,
  abstraction: Abstraction,
}

impl ResolutionGuard {
  pub(crate) fn new(container_id: usize, abstraction: Abstraction) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      let entry = (container_id, abstraction);
      if let Some(start) = stack.iter().position(|active| *active == entry) {
        let mut chain: Vec<Abstraction> = stack[start..]
          .iter()
          .filter(|(id, _)| *id == container_id)
          .map(|(_, active)| *active)
          .collect();
        chain.push(abstraction);
        tracing::warn!(abstraction = %abstraction, depth = chain.len(), "circular dependency detected");
        return Err(Error::CircularDependency(chain));
      }
      stack.push(entry);
      Ok(())
    })?;

    Ok(Self {
      container_id,
      abstraction,
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      let entry = (self.container_id, self.abstraction);
      if let Some(position) = stack.iter().rposition(|active| *active == entry) {
        stack.remove(position);
      }
    });
  }
}

/// The abstractions this thread is resolving in the given container, outermost first.
fn resolution_chain(container_id: usize) -> Vec<Abstraction> {
  RESOLVING_STACK.with(|stack| {
    stack
      .borrow()
      .iter()
      .filter(|(id, _)| *id == container_id)
      .map(|(_, active)| *active)
      .collect()
  })
}

struct Wait {
  owner: ThreadId,
  binding: usize,
  abstraction: Abstraction,
}

// Blocked thread -> the thread building the singleton it waits for. Kept acyclic: an
// edge that would close a cycle is refused.
static WAITS_FOR: Lazy<Mutex<HashMap<ThreadId, Wait>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Records that the current thread is about to block on a singleton another thread is
/// building.
///
/// Fails with [`Error::CircularDependency`] if the owner is (transitively) waiting for
/// the current thread, which would otherwise deadlock both.
pub(crate) struct WaitGuard {
  waiter: ThreadId,
  binding: usize,
}

impl WaitGuard {
  pub(crate) fn new(
    container_id: usize,
    owner: ThreadId,
    binding: usize,
    abstraction: Abstraction,
  ) -> Result<Self> {
    let waiter = thread::current().id();
    let mut waits = WAITS_FOR.lock();

    let mut chain = resolution_chain(container_id);
    let mut next = owner;
    while next != waiter {
      match waits.get(&next) {
        Some(wait) => {
          chain.push(wait.abstraction);
          next = wait.owner;
        }
        None => {
          waits.insert(
            waiter,
            Wait {
              owner,
              binding,
              abstraction,
            },
          );
          return Ok(Self { waiter, binding });
        }
      }
    }

    tracing::warn!(abstraction = %abstraction, depth = chain.len(), "circular dependency across threads detected");
    Err(Error::CircularDependency(chain))
  }

  /// Drops every wait on the given binding once its builder has finished.
  pub(crate) fn release(binding: usize) {
    WAITS_FOR.lock().retain(|_, wait| wait.binding != binding);
  }
}

impl Drop for WaitGuard {
  fn drop(&mut self) {
    let mut waits = WAITS_FOR.lock();
    if matches!(waits.get(&self.waiter), Some(wait) if wait.binding == self.binding) {
      waits.remove(&self.waiter);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn value_and_arc_are_distinct_abstractions() {
    struct Circle;

    assert_eq!(Abstraction::of::<Circle>(), Abstraction::of::<Circle>());
    assert_ne!(Abstraction::of::<Circle>(), Abstraction::of::<Arc<Circle>>());
    assert!(Abstraction::of::<Arc<Circle>>().name().starts_with("alloc::sync::Arc<"));
  }

  #[test]
  fn guard_rejects_reentry_for_the_same_container() {
    let abstraction = Abstraction::of::<u8>();

    let outer = ResolutionGuard::new(7, abstraction).unwrap();
    match ResolutionGuard::new(7, abstraction) {
      Err(Error::CircularDependency(chain)) => assert_eq!(chain, vec![abstraction, abstraction]),
      other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
    }

    // Another container may resolve the same abstraction while the first is busy.
    let other = ResolutionGuard::new(8, abstraction);
    assert!(other.is_ok());
    drop(other);
    drop(outer);

    assert!(ResolutionGuard::new(7, abstraction).is_ok());
  }

  #[test]
  fn wait_guard_refuses_to_close_a_cycle() {
    let first = Abstraction::of::<u16>();
    let second = Abstraction::of::<u32>();
    let here = thread::current().id();

    // Another thread blocks on a binding this thread is building.
    let there = thread::spawn(move || {
      let guard = WaitGuard::new(11, here, 1, first).unwrap();
      let id = thread::current().id();
      std::mem::forget(guard);
      id
    })
    .join()
    .unwrap();

    // Waiting on that thread in turn would deadlock.
    match WaitGuard::new(11, there, 2, second) {
      Err(Error::CircularDependency(chain)) => assert_eq!(chain, vec![first]),
      other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
    }

    WaitGuard::release(1);
    assert!(WaitGuard::new(11, there, 2, second).is_ok());
  }
}
