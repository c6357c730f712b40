use fibre_binder::{make, singleton};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  // Bind the concrete ConsoleLogger to the `Arc<dyn Logger>` abstraction.
  singleton(|| Arc::new(ConsoleLogger) as Arc<dyn Logger>);

  // The factory's parameter is supplied by the container.
  singleton(|logger: Arc<dyn Logger>| Arc::new(ReportService { logger }));

  println!("Resolving the high-level service through a callback...");
  make(|report_service: Arc<ReportService>| {
    report_service.generate_report();
  });
}
