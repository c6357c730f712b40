use fibre_binder::{global, Container};

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be run against a controlled environment.
fn process_data(container: &Container) -> String {
  // Register a data source ONLY within this container.
  container.instance("test data".to_string());

  let mut data = String::new();
  container.make(&mut data);
  format!("Processed: {}", data.to_uppercase())
}

fn main() {
  println!("--- Running with a local container ---");
  let test_container = Container::new();
  let result = process_data(&test_container);

  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // The binding registered in `test_container` should NOT exist in the global container.
  assert!(
    !global().is_bound::<String>(),
    "Dependency should not have leaked into the global container!"
  );

  println!("\nVerified that the local container is isolated from the global one.");
}
