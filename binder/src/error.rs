use crate::core::Abstraction;
use thiserror::Error;

/// The error type for registration and resolution failures.
///
/// The first four variants describe programmer misuse and carry messages that
/// the panicking API (`make`, `singleton`, `resolve!`, ...) reproduces verbatim.
#[derive(Debug, Error)]
pub enum Error {
  #[error("the resolver must be a function")]
  ResolverNotFunction,

  #[error("the receiver must be either a reference or a callback")]
  UnsupportedReceiver,

  #[error("cannot detect type of the receiver, make sure your are passing reference of the object")]
  ReceiverNotReference,

  #[error("no concrete found for the abstraction {0}")]
  NoConcrete(Abstraction),

  #[error("circular dependency detected: {}", display_chain(.0))]
  CircularDependency(Vec<Abstraction>),

  #[error("the abstraction {0} is already bound and overriding is disabled")]
  DuplicateBinding(Abstraction),

  #[error("the concrete supplied for {0} does not hold a value of that type")]
  IncompatibleConcrete(Abstraction),

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),
}

fn display_chain(chain: &[Abstraction]) -> String {
  chain
    .iter()
    .map(|abstraction| abstraction.name())
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// A specialized `Result` type for `fibre_binder` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
