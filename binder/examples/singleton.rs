use fibre_binder::{resolve, singleton, transient};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// Transients are bound under their own newtype so both lifetimes can coexist.
#[derive(Clone)]
struct TransientTracker(Arc<RequestTracker>);

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // --- Singleton Registration ---
  // This factory will only be called ONCE.
  singleton(|| {
    println!("Creating SINGLETON RequestTracker...");
    Arc::new(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    })
  });

  // --- Transient Registration ---
  // This factory will be called EVERY time the abstraction is resolved.
  transient(|| {
    println!("Creating TRANSIENT RequestTracker...");
    TransientTracker(Arc::new(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }))
  });

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(Arc<RequestTracker>);
  let s2 = resolve!(Arc<RequestTracker>);
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Resolving Transients ---");
  let t1 = resolve!(TransientTracker);
  let t2 = resolve!(TransientTracker);
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.0.id, t2.0.id);
  assert_eq!(t1.0.id, 1);
  assert_eq!(t2.0.id, 2);
  assert!(!Arc::ptr_eq(&t1.0, &t2.0), "Transient instances should be different");
}
