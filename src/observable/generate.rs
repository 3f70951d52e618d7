use std::fmt::{Debug, Formatter};

use super::Observable;
use crate::{
  observer::BoxedObserver,
  subscription::{BoxedSubscription, Subscription},
};

type Producer<Item, Err> = dyn Fn(BoxedObserver<Item, Err>) -> BoxedSubscription + Send + Sync;

/// Observable created from a producer callback.
///
/// This struct is created by [`generate`].
pub struct Generate<Item, Err> {
  producer: Box<Producer<Item, Err>>,
}

/// Creates a source that runs `producer` against every new observer.
///
/// Whatever subscription the producer returns becomes the subscriber's
/// handle. A producer that returns `()` yields an already-closed handle,
/// which is the right thing for sources that finish synchronously.
///
/// The observer is handed over as is; a producer is trusted not to emit after
/// a terminal notification.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let ticks = generate(|o: BoxedObserver<u32, ()>| {
///   o.next(1);
///   o.complete();
///   ClosureSubscription::new(|| println!("torn down"))
/// });
/// ticks.subscribe(|v| println!("tick {}", v)).unsubscribe().unwrap();
/// ```
pub fn generate<Item, Err, F, U>(producer: F) -> Generate<Item, Err>
where
  F: Fn(BoxedObserver<Item, Err>) -> U + Send + Sync + 'static,
  U: Subscription + 'static,
{
  Generate { producer: Box::new(move |observer| BoxedSubscription::new(producer(observer))) }
}

impl<Item, Err> Observable for Generate<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> BoxedSubscription {
    (self.producer)(observer)
  }
}

impl<Item, Err> Debug for Generate<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Generate").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use super::*;
  use crate::{observer::Observer, subscription::ClosureSubscription};

  #[test]
  fn test_generate_next_complete() {
    let emitted = Arc::new(Mutex::new(vec![]));
    let emitted_clone = emitted.clone();

    generate(|o: BoxedObserver<i32, ()>| {
      o.next(1);
      o.next(2);
      o.complete();
    })
    .subscribe(move |v| emitted_clone.lock().unwrap().push(v));

    assert_eq!(*emitted.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn test_generate_runs_per_subscription() {
    let runs = Arc::new(AtomicUsize::new(0));
    let c_runs = runs.clone();
    let source = generate(move |_: BoxedObserver<(), ()>| {
      c_runs.fetch_add(1, Ordering::SeqCst);
    });

    source.subscribe_empty();
    source.subscribe_empty();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn test_generate_teardown() {
    let unsubscribed = Arc::new(AtomicUsize::new(0));
    let unsub_clone = unsubscribed.clone();

    let subscription = generate(move |o: BoxedObserver<i32, ()>| {
      o.next(1);
      let unsub_clone = unsub_clone.clone();
      ClosureSubscription::new(move || {
        unsub_clone.fetch_add(1, Ordering::SeqCst);
      })
    })
    .subscribe(|_| {});

    assert!(!subscription.is_closed());
    subscription.unsubscribe().unwrap();
    subscription.unsubscribe().unwrap();
    assert_eq!(unsubscribed.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_generate_without_teardown_returns_closed_handle() {
    let subscription = generate(|o: BoxedObserver<i32, ()>| o.complete()).subscribe(|_| {});

    assert!(subscription.is_closed());
    assert!(subscription.unsubscribe().is_ok());
  }
}
