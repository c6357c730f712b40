//! Destinations of a `make` request.

use crate::concrete::argument;
use crate::core::{downcast, Abstraction, Injectable, Instance};
use crate::error::{Error, Result};
use std::fmt;

type AssignFn<'a> = dyn FnOnce(Instance) -> Result<()> + 'a;
type InvokeFn<'a> = dyn FnOnce(Vec<Instance>) -> Result<()> + 'a;

enum Kind<'a> {
  Reference {
    target: Abstraction,
    assign: Box<AssignFn<'a>>,
  },
  Callback {
    parameters: Vec<Abstraction>,
    invoke: Box<InvokeFn<'a>>,
  },
}

/// A classified receiver: either a settable location or a callback.
///
/// Usually built implicitly through [`IntoReceiver`], e.g. by passing `&mut value` or
/// a closure to `make`.
pub struct Receiver<'a> {
  kind: Kind<'a>,
}

impl<'a> Receiver<'a> {
  /// Classifies anything accepted by [`IntoReceiver`], e.g. to box it for
  /// [`Container::make_any`](crate::Container::make_any).
  pub fn new<M>(receiver: impl IntoReceiver<'a, M>) -> Self {
    receiver.into_receiver()
  }

  /// A receiver that overwrites `*slot` with the resolved `T`.
  pub fn reference<T: Injectable>(slot: &'a mut T) -> Self {
    Self {
      kind: Kind::Reference {
        target: Abstraction::of::<T>(),
        assign: Box::new(move |instance| {
          *slot = downcast::<T>(&instance)?;
          Ok(())
        }),
      },
    }
  }

  /// A receiver that stores `Some(resolved)` into an empty or filled slot.
  pub fn option<T: Injectable>(slot: &'a mut Option<T>) -> Self {
    Self {
      kind: Kind::Reference {
        target: Abstraction::of::<T>(),
        assign: Box::new(move |instance| {
          *slot = Some(downcast::<T>(&instance)?);
          Ok(())
        }),
      },
    }
  }

  fn callback(
    parameters: Vec<Abstraction>,
    invoke: impl FnOnce(Vec<Instance>) -> Result<()> + 'a,
  ) -> Self {
    Self {
      kind: Kind::Callback {
        parameters,
        invoke: Box::new(invoke),
      },
    }
  }

  /// Every abstraction that must be resolved before the receiver can be satisfied.
  pub fn requirements(&self) -> Vec<Abstraction> {
    match &self.kind {
      Kind::Reference { target, .. } => vec![*target],
      Kind::Callback { parameters, .. } => parameters.clone(),
    }
  }

  pub fn is_callback(&self) -> bool {
    matches!(self.kind, Kind::Callback { .. })
  }

  /// Hands the resolved instances over, in the order of [`Receiver::requirements`].
  pub(crate) fn satisfy(self, mut instances: Vec<Instance>) -> Result<()> {
    match self.kind {
      Kind::Reference { target, assign } => {
        let instance = instances
          .pop()
          .ok_or(Error::NoConcrete(target))?;
        assign(instance)
      }
      Kind::Callback { invoke, .. } => invoke(instances),
    }
  }
}

impl fmt::Debug for Receiver<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      Kind::Reference { target, .. } => f.debug_struct("Reference").field("target", target).finish(),
      Kind::Callback { parameters, .. } => f
        .debug_struct("Callback")
        .field("parameters", parameters)
        .finish(),
    }
  }
}

#[doc(hidden)]
pub struct ByReference;

/// Conversion into a [`Receiver`].
///
/// Implemented for `&mut T`, for [`Receiver`] itself and for every `FnOnce(A1, .., An)`
/// with up to eight [`Injectable`] parameters. `M` only disambiguates the impls.
pub trait IntoReceiver<'a, M> {
  fn into_receiver(self) -> Receiver<'a>;
}

impl<'a> IntoReceiver<'a, Receiver<'a>> for Receiver<'a> {
  fn into_receiver(self) -> Receiver<'a> {
    self
  }
}

impl<'a, T: Injectable> IntoReceiver<'a, ByReference> for &'a mut T {
  fn into_receiver(self) -> Receiver<'a> {
    Receiver::reference(self)
  }
}

macro_rules! impl_into_receiver {
  ($($arg:ident: $ty:ident),*) => {
    impl<'a, Func, $($ty,)*> IntoReceiver<'a, fn($($ty,)*)> for Func
    where
      Func: FnOnce($($ty),*) + 'a,
      $($ty: Injectable,)*
    {
      #[allow(unused_mut, unused_variables)]
      fn into_receiver(self) -> Receiver<'a> {
        let callback = self;
        Receiver::callback(vec![$(Abstraction::of::<$ty>()),*], move |instances: Vec<Instance>| {
          let mut instances = instances.into_iter();
          $(let $arg = argument::<$ty>(&mut instances)?;)*
          callback($($arg),*);
          Ok(())
        })
      }
    }
  };
}

impl_into_receiver!();
impl_into_receiver!(a1: A1);
impl_into_receiver!(a1: A1, a2: A2);
impl_into_receiver!(a1: A1, a2: A2, a3: A3);
impl_into_receiver!(a1: A1, a2: A2, a3: A3, a4: A4);
impl_into_receiver!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
impl_into_receiver!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
impl_into_receiver!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
impl_into_receiver!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
