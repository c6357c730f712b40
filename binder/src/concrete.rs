//! Type-erased factories and the conversion from plain closures.

use crate::core::{downcast, Abstraction, Injectable, Instance};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

type ConstructFn = dyn Fn(Vec<Instance>) -> Result<Instance> + Send + Sync;

/// A type-erased resolver.
///
/// Records the abstraction it produces and, in declaration order, the abstractions
/// it needs as arguments. Built from closures through [`IntoConcrete`].
pub struct Concrete {
  abstraction: Abstraction,
  dependencies: Vec<Abstraction>,
  construct: Box<ConstructFn>,
}

impl Concrete {
  /// Wraps any closure accepted by [`IntoConcrete`].
  pub fn new<M>(resolver: impl IntoConcrete<M>) -> Self {
    resolver.into_concrete()
  }

  /// A concrete that always hands out clones of `value`.
  pub fn from_value<T: Injectable>(value: T) -> Self {
    Self::new(move || value.clone())
  }

  fn from_parts(
    abstraction: Abstraction,
    dependencies: Vec<Abstraction>,
    construct: impl Fn(Vec<Instance>) -> Result<Instance> + Send + Sync + 'static,
  ) -> Self {
    Self {
      abstraction,
      dependencies,
      construct: Box::new(construct),
    }
  }

  pub fn abstraction(&self) -> Abstraction {
    self.abstraction
  }

  pub fn dependencies(&self) -> &[Abstraction] {
    &self.dependencies
  }

  /// Invokes the factory with already resolved arguments.
  pub(crate) fn construct(&self, arguments: Vec<Instance>) -> Result<Instance> {
    (self.construct)(arguments)
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Concrete")
      .field("abstraction", &self.abstraction)
      .field("dependencies", &self.dependencies)
      .finish_non_exhaustive()
  }
}

/// Conversion of a factory closure into a [`Concrete`].
///
/// Implemented for every `Fn(A1, .., An) -> T` with up to eight parameters where the
/// parameters and the return type are [`Injectable`]. `M` only disambiguates arities.
pub trait IntoConcrete<M>: Send + Sync + 'static {
  fn into_concrete(self) -> Concrete;
}

impl IntoConcrete<Concrete> for Concrete {
  fn into_concrete(self) -> Concrete {
    self
  }
}

pub(crate) fn argument<T: Injectable>(arguments: &mut impl Iterator<Item = Instance>) -> Result<T> {
  let instance = arguments
    .next()
    .ok_or_else(|| Error::IncompatibleConcrete(Abstraction::of::<T>()))?;
  downcast::<T>(&instance)
}

macro_rules! impl_into_concrete {
  ($($arg:ident: $ty:ident),*) => {
    impl<Func, Out, $($ty,)*> IntoConcrete<fn($($ty,)*) -> Out> for Func
    where
      Func: Fn($($ty),*) -> Out + Send + Sync + 'static,
      Out: Injectable,
      $($ty: Injectable,)*
    {
      #[allow(unused_mut, unused_variables)]
      fn into_concrete(self) -> Concrete {
        let factory = self;
        Concrete::from_parts(
          Abstraction::of::<Out>(),
          vec![$(Abstraction::of::<$ty>()),*],
          move |arguments: Vec<Instance>| {
            let mut arguments = arguments.into_iter();
            $(let $arg = argument::<$ty>(&mut arguments)?;)*
            Ok(Arc::new(factory($($arg),*)) as Instance)
          },
        )
      }
    }
  };
}

impl_into_concrete!();
impl_into_concrete!(a1: A1);
impl_into_concrete!(a1: A1, a2: A2);
impl_into_concrete!(a1: A1, a2: A2, a3: A3);
impl_into_concrete!(a1: A1, a2: A2, a3: A3, a4: A4);
impl_into_concrete!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
impl_into_concrete!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
impl_into_concrete!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
impl_into_concrete!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
