//! Consumers of notification sequences.
//!
//! An [`Observer`] receives any number of `next` calls followed by at most
//! one terminal call, `error` or `complete`. [`FnObserver`] builds one from
//! closures and [`SafeObserver`] enforces the at-most-one-terminal rule.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Observers are shared between the source that feeds them
/// and whoever holds their subscription, possibly across threads, so every
/// method takes `&self`.
///
/// Producers promise not to call anything after `error` or `complete`; the
/// bare trait does not enforce that. Wrap an observer in [`SafeObserver`] to
/// have the promise enforced on the consumer side.
pub trait Observer<Item, Err>: Send + Sync {
  /// Receive the next value from the observable
  fn next(&self, value: Item);

  /// Handle an error from the observable. Terminal.
  fn error(&self, err: Err);

  /// Handle completion of the observable. Terminal.
  fn complete(&self);

  /// Checks if the observer is closed.
  ///
  /// Returns `true` if the observer is closed and will not accept more values.
  fn is_closed(&self) -> bool;
}

/// Type-erased observer shared by reference count.
pub type BoxedObserver<Item, Err> = Arc<dyn Observer<Item, Err>>;

impl<Item, Err, O> Observer<Item, Err> for Arc<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// FnObserver - Closure adapter
// ============================================================================

/// An observer assembled from three callbacks.
///
/// This is what the `subscribe*` conveniences of `Observable` build; they
/// always wrap it in a [`SafeObserver`].
#[derive(Clone)]
pub struct FnObserver<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> FnObserver<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { FnObserver { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for FnObserver<N, E, C>
where
  N: Fn(Item) + Send + Sync,
  E: Fn(Err) + Send + Sync,
  C: Fn() + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(&self) { (self.complete)(); }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// SafeObserver - terminal gate
// ============================================================================

/// Decorator enforcing the terminal contract on any observer.
///
/// The first `error` or `complete` wins and is forwarded; every later
/// terminal call is dropped, and so is every `next` arriving after it. The
/// winner is picked by a compare-and-set, so concurrent terminal calls
/// forward exactly one notification.
pub struct SafeObserver<O> {
  inner: O,
  stopped: AtomicBool,
}

impl<O> SafeObserver<O> {
  pub fn new(inner: O) -> Self { Self { inner, stopped: AtomicBool::new(false) } }

  /// Whether a terminal notification already went through.
  #[inline]
  pub fn is_stopped(&self) -> bool { self.stopped.load(Ordering::Acquire) }

  pub fn get_ref(&self) -> &O { &self.inner }

  #[inline]
  fn stop(&self) -> bool {
    self
      .stopped
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }
}

impl<O, Item, Err> Observer<Item, Err> for SafeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&self, value: Item) {
    if !self.is_stopped() {
      self.inner.next(value);
    }
  }

  fn error(&self, err: Err) {
    if self.stop() {
      self.inner.error(err);
    }
  }

  fn complete(&self) {
    if self.stop() {
      self.inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.is_stopped() || self.inner.is_closed() }
}

impl<O> Debug for SafeObserver<O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SafeObserver")
      .field("stopped", &self.is_stopped())
      .finish()
  }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::{
    sync::{atomic::AtomicUsize, Barrier, Mutex},
    thread,
  };

  use super::*;

  #[derive(Default)]
  struct TestObserver {
    values: Mutex<Vec<i32>>,
    errors: AtomicUsize,
    completes: AtomicUsize,
  }

  impl Observer<i32, &'static str> for TestObserver {
    fn next(&self, value: i32) { self.values.lock().unwrap().push(value); }

    fn error(&self, _: &'static str) { self.errors.fetch_add(1, Ordering::SeqCst); }

    fn complete(&self) { self.completes.fetch_add(1, Ordering::SeqCst); }

    fn is_closed(&self) -> bool { false }
  }

  #[test]
  fn test_observer_trait() {
    let obs = TestObserver::default();
    obs.next(1);
    obs.next(2);
    assert_eq!(*obs.values.lock().unwrap(), vec![1, 2]);
    assert!(!Observer::<i32, &str>::is_closed(&obs));
  }

  #[test]
  fn test_closure_as_observer() {
    let count = Arc::new(AtomicUsize::new(0));
    let c_count = count.clone();
    let obs = FnObserver::new(
      move |v: usize| {
        c_count.fetch_add(v, Ordering::SeqCst);
      },
      |_: ()| {},
      || {},
    );

    obs.next(10);
    obs.next(20);
    assert_eq!(count.load(Ordering::SeqCst), 30);
  }

  #[test]
  fn safe_observer_first_terminal_wins() {
    let obs = SafeObserver::new(TestObserver::default());

    obs.next(1);
    obs.complete();
    obs.error("late");
    obs.complete();
    obs.next(2);

    let inner = obs.get_ref();
    assert_eq!(*inner.values.lock().unwrap(), vec![1]);
    assert_eq!(inner.completes.load(Ordering::SeqCst), 1);
    assert_eq!(inner.errors.load(Ordering::SeqCst), 0);
    assert!(obs.is_closed());
  }

  #[test]
  fn safe_observer_concurrent_terminals() {
    let obs = SafeObserver::new(TestObserver::default());
    let barrier = Barrier::new(8);

    thread::scope(|s| {
      for i in 0..8 {
        let obs = &obs;
        let barrier = &barrier;
        s.spawn(move || {
          barrier.wait();
          if i % 2 == 0 {
            obs.complete();
          } else {
            obs.error("racing");
          }
        });
      }
    });

    let inner = obs.get_ref();
    let terminals = inner.completes.load(Ordering::SeqCst) + inner.errors.load(Ordering::SeqCst);
    assert_eq!(terminals, 1);
  }

  #[test]
  fn arc_observer_delegates() {
    let shared = Arc::new(TestObserver::default());
    let boxed: BoxedObserver<i32, &'static str> = shared.clone();

    boxed.next(5);
    boxed.complete();

    assert_eq!(*shared.values.lock().unwrap(), vec![5]);
    assert_eq!(shared.completes.load(Ordering::SeqCst), 1);
  }
}
