use fibre_binder::{Container, ContainerConfig, Lifetime};

#[derive(Clone, Debug)]
struct Settings {
  retries: u32,
}

fn main() -> fibre_binder::Result<()> {
  let config = ContainerConfig::from_yaml_str(
    r#"
eager_singletons: true
allow_overriding: false
"#,
  )?;
  let container = Container::with_config(config);

  // Built right away because singletons are eager.
  container.try_register(
    || {
      println!("Building Settings...");
      Settings { retries: 3 }
    },
    Lifetime::Singleton,
  )?;

  // A second binding for the same abstraction is refused.
  if let Err(e) = container.try_register(|| Settings { retries: 5 }, Lifetime::Singleton) {
    println!("Refused: {}", e);
  }

  let settings = container.resolve::<Settings>()?;
  println!("Resolved {:?}", settings);
  assert_eq!(settings.retries, 3);
  Ok(())
}
