//! Single-hop operator builders.
//!
//! No concrete operators live in this crate; these three adapters are the
//! building blocks for them. Each wraps a source and decides how a
//! downstream observer gets attached to it.

use std::{marker::PhantomData, sync::Arc};

use super::Observable;
use crate::{
  observer::{BoxedObserver, Observer, SafeObserver},
  subscription::BoxedSubscription,
};

// ============================================================================
// Operate
// ============================================================================

/// Interposes the observer built by an operator function between a source
/// and each downstream observer.
///
/// This struct is created by [`Observable::operate`].
pub struct Operate<S, F, R, RErr> {
  source: S,
  operator: F,
  _marker: PhantomData<fn() -> (R, RErr)>,
}

impl<S, F, R, RErr> Operate<S, F, R, RErr> {
  pub fn new(source: S, operator: F) -> Self { Self { source, operator, _marker: PhantomData } }
}

impl<S, F, R, RErr> Observable for Operate<S, F, R, RErr>
where
  S: Observable,
  F: Fn(BoxedObserver<R, RErr>) -> BoxedObserver<S::Item, S::Err> + Send + Sync,
{
  type Item = R;
  type Err = RErr;

  fn actual_subscribe(&self, observer: BoxedObserver<R, RErr>) -> BoxedSubscription {
    self.source.actual_subscribe((self.operator)(observer))
  }
}

// ============================================================================
// OperateNext
// ============================================================================

/// Handles every upstream item with a callback that emits into the
/// downstream observer.
///
/// This struct is created by [`Observable::operate_next`].
pub struct OperateNext<S, F, R> {
  source: S,
  on_next: Arc<F>,
  _marker: PhantomData<fn() -> R>,
}

impl<S, F, R> OperateNext<S, F, R> {
  pub fn new(source: S, on_next: F) -> Self {
    Self { source, on_next: Arc::new(on_next), _marker: PhantomData }
  }
}

struct NextObserver<R, Err, F> {
  downstream: BoxedObserver<R, Err>,
  on_next: Arc<F>,
}

impl<Item, R, Err, F> Observer<Item, Err> for NextObserver<R, Err, F>
where
  F: Fn(&BoxedObserver<R, Err>, Item) + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item) { (self.on_next)(&self.downstream, value) }

  #[inline]
  fn error(&self, err: Err) { self.downstream.error(err) }

  #[inline]
  fn complete(&self) { self.downstream.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

impl<S, F, R> Observable for OperateNext<S, F, R>
where
  S: Observable,
  S::Err: 'static,
  R: 'static,
  F: Fn(&BoxedObserver<R, S::Err>, S::Item) + Send + Sync + 'static,
{
  type Item = R;
  type Err = S::Err;

  fn actual_subscribe(&self, downstream: BoxedObserver<R, S::Err>) -> BoxedSubscription {
    let on_next = self.on_next.clone();
    self
      .source
      .subscribe_with(SafeObserver::new(NextObserver { downstream, on_next }))
  }
}

// ============================================================================
// SubscriptionOperate
// ============================================================================

/// Delegates the whole subscription to a function of the source and the
/// downstream observer.
///
/// This struct is created by [`Observable::subscription_operate`].
pub struct SubscriptionOperate<S, F> {
  source: S,
  subscribe: F,
}

impl<S, F> SubscriptionOperate<S, F> {
  pub fn new(source: S, subscribe: F) -> Self { Self { source, subscribe } }
}

impl<S, F> Observable for SubscriptionOperate<S, F>
where
  S: Observable,
  F: Fn(&S, BoxedObserver<S::Item, S::Err>) -> BoxedSubscription + Send + Sync,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(&self, observer: BoxedObserver<S::Item, S::Err>) -> BoxedSubscription {
    (self.subscribe)(&self.source, observer)
  }
}
