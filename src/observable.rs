//! The subscription source contract.
//!
//! An [`Observable`] has exactly one required operation, `actual_subscribe`,
//! which attaches a type-erased observer and hands back the subscription that
//! detaches it. Everything else on the trait is layered on top of it:
//!
//! - the `subscribe*` conveniences build a terminal-gated observer out of
//!   closures;
//! - `operate`, `operate_next` and `subscription_operate` build derived
//!   sources;
//! - `merge`, `publish` and `multicast` combine and share sources.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxcore::prelude::*;
//!
//! let source = generate(|observer: BoxedObserver<i32, ()>| {
//!   observer.next(1);
//!   observer.next(2);
//!   observer.complete();
//! });
//!
//! let seen = Arc::new(Mutex::new(vec![]));
//! let c_seen = seen.clone();
//! source.subscribe(move |v| c_seen.lock().unwrap().push(v));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

mod boxed;
mod connectable;
mod generate;
mod merge;
mod operate;

pub use boxed::*;
pub use connectable::*;
pub use generate::*;
pub use merge::*;
pub use operate::*;

use std::sync::Arc;

use crate::{
  observer::{BoxedObserver, FnObserver, Observer, SafeObserver},
  subject::Subject,
  subscription::BoxedSubscription,
};

/// A producer of a notification sequence that consumers attach to.
///
/// The trait is object safe; every provided method is restricted to sized
/// implementors, so `dyn Observable<Item = _, Err = _>` only exposes
/// `actual_subscribe`. See [`BoxedObservable`].
pub trait Observable: Send + Sync {
  type Item;
  type Err;

  /// Attaches `observer` and returns the subscription that detaches it.
  fn actual_subscribe(&self, observer: BoxedObserver<Self::Item, Self::Err>) -> BoxedSubscription;

  /// Attaches a concrete observer as is, without terminal gating.
  fn subscribe_with<O>(&self, observer: O) -> BoxedSubscription
  where
    Self: Sized,
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self.actual_subscribe(Arc::new(observer))
  }

  /// Subscribes and discards every notification.
  fn subscribe_empty(&self) -> BoxedSubscription
  where
    Self: Sized,
  {
    self.subscribe_all(|_| {}, |_| {}, || {})
  }

  /// Invokes an execution of an Observable and registers a handler for the
  /// values it emits. Errors and completion are ignored.
  fn subscribe<N>(&self, next: N) -> BoxedSubscription
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
  {
    self.subscribe_all(next, |_| {}, || {})
  }

  /// * `error`: A handler for a terminal event resulting from an error.
  fn subscribe_err<N, E>(&self, next: N, error: E) -> BoxedSubscription
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
  {
    self.subscribe_all(next, error, || {})
  }

  /// * `complete`: A handler for a terminal event resulting from successful
  ///   completion.
  fn subscribe_complete<N, C>(&self, next: N, complete: C) -> BoxedSubscription
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    self.subscribe_all(next, |_| {}, complete)
  }

  /// Registers handlers for all three notifications. The handlers are gated:
  /// after the first terminal notification nothing else reaches them.
  fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> BoxedSubscription
  where
    Self: Sized,
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    self.subscribe_with(SafeObserver::new(FnObserver::new(next, error, complete)))
  }

  /// Builds a derived source. Every downstream observer is passed through
  /// `operator`, and whatever observer it returns is subscribed to `self`.
  fn operate<R, RErr, F>(self, operator: F) -> Operate<Self, F, R, RErr>
  where
    Self: Sized,
    F: Fn(BoxedObserver<R, RErr>) -> BoxedObserver<Self::Item, Self::Err> + Send + Sync,
  {
    Operate::new(self, operator)
  }

  /// Builds a derived source that handles each item with `on_next`, which
  /// receives the downstream observer to emit into. Error and completion are
  /// forwarded untouched, at most once.
  fn operate_next<R, F>(self, on_next: F) -> OperateNext<Self, F, R>
  where
    Self: Sized,
    F: Fn(&BoxedObserver<R, Self::Err>, Self::Item) + Send + Sync,
  {
    OperateNext::new(self, on_next)
  }

  /// Builds a derived source whose subscription is fully delegated to
  /// `subscribe`, which receives this source and the downstream observer.
  fn subscription_operate<F>(self, subscribe: F) -> SubscriptionOperate<Self, F>
  where
    Self: Sized,
    F: Fn(&Self, BoxedObserver<Self::Item, Self::Err>) -> BoxedSubscription + Send + Sync,
  {
    SubscriptionOperate::new(self, subscribe)
  }

  /// Combines this source with `other`; see [`merge`](fn@merge).
  fn merge<S>(self, other: S) -> Merge<Self::Item, Self::Err>
  where
    Self: Sized + 'static,
    S: Observable<Item = Self::Item, Err = Self::Err> + 'static,
  {
    merge([self.box_it(), other.box_it()])
  }

  /// Erases the concrete source type.
  fn box_it(self) -> BoxedObservable<Self::Item, Self::Err>
  where
    Self: Sized + 'static,
  {
    Arc::new(self)
  }

  /// Shares one upstream subscription through `subject`, established on
  /// `connect`.
  fn multicast(self, subject: Subject<Self::Item, Self::Err>) -> ConnectableObservable<Self>
  where
    Self: Sized,
  {
    ConnectableObservable::with_subject(self, subject)
  }

  /// `multicast` through a fresh subject.
  fn publish(self) -> ConnectableObservable<Self>
  where
    Self: Sized,
  {
    self.multicast(Subject::new())
  }
}

impl<T> Observable for Arc<T>
where
  T: Observable + ?Sized,
{
  type Item = T::Item;
  type Err = T::Err;

  #[inline]
  fn actual_subscribe(&self, observer: BoxedObserver<Self::Item, Self::Err>) -> BoxedSubscription {
    (**self).actual_subscribe(observer)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
  };

  use super::*;
  use crate::subscription::Subscription;

  fn numbers() -> Generate<i32, &'static str> {
    generate(|o: BoxedObserver<i32, &'static str>| {
      o.next(1);
      o.next(2);
      o.complete();
    })
  }

  #[test]
  fn subscribe_receives_values() {
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();

    numbers().subscribe(move |v| c_seen.lock().unwrap().push(v));

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn subscribe_complete_runs_on_completion() {
    let completed = Arc::new(AtomicUsize::new(0));
    let c_completed = completed.clone();

    numbers().subscribe_complete(
      |_| {},
      move || {
        c_completed.fetch_add(1, Ordering::SeqCst);
      },
    );

    assert_eq!(completed.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn subscribe_all_is_terminal_gated() {
    let source = generate(|o: BoxedObserver<i32, &'static str>| {
      o.next(1);
      o.error("first");
      o.next(2);
      o.error("second");
      o.complete();
    });
    let log = Arc::new(Mutex::new(vec![]));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());

    source.subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {v}")),
      move |err| e.lock().unwrap().push(format!("error {err}")),
      move || c.lock().unwrap().push("complete".to_string()),
    );

    assert_eq!(*log.lock().unwrap(), vec!["next 1", "error first"]);
  }

  #[test]
  fn subscribe_err_receives_error() {
    let source = generate(|o: BoxedObserver<(), String>| o.error("broken".to_string()));
    let err = Arc::new(Mutex::new(None));
    let c_err = err.clone();

    source.subscribe_err(|_| {}, move |e| *c_err.lock().unwrap() = Some(e));

    assert_eq!(err.lock().unwrap().as_deref(), Some("broken"));
  }

  #[test]
  fn subscribe_empty_drives_source() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let source = generate(move |o: BoxedObserver<i32, ()>| {
      c_calls.fetch_add(1, Ordering::SeqCst);
      o.next(1);
    });

    let sub = source.subscribe_empty();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(sub.is_closed());
  }

  #[test]
  fn boxed_source_behaves_like_source() {
    let boxed: BoxedObservable<i32, &'static str> = numbers().box_it();
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();

    boxed.subscribe(move |v| c_seen.lock().unwrap().push(v * 10));

    assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
  }
}
