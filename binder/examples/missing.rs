use fibre_binder::{global, make};
use std::panic;

#[derive(Clone)]
struct UnregisteredService;

fn main() {
  // --- Using the panicking `make` ---
  println!("Attempting to make a service that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    make(|_service: UnregisteredService| {});
  });

  assert!(result.is_err(), "make should have panicked.");
  println!("Successfully caught the expected panic from make.");

  // --- Using the fallible `try_make` ---
  println!("\nNow, attempting the same with `try_make`...");

  match global().try_make(|_service: UnregisteredService| {}) {
    Ok(()) => panic!("Should not have found the service!"),
    Err(e) => println!("Correctly received an error: {}", e),
  }
}
