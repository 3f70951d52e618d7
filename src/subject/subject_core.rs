use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use tracing::{debug, trace};

use super::{subject_subscription::SubjectSubscription, subscribers::Subscribers};
use crate::{
  error::Result,
  observable::Observable,
  observer::{BoxedObserver, Observer},
  subscription::{BoxedSubscription, Subscription},
};

/// Subject: A hot observable that multicasts values to many observers.
///
/// The `Subject` acts as both an [`Observer`] and an [`Observable`]. Every
/// observer attached through `actual_subscribe` receives the notifications
/// fed into the subject from that point on, in the order the observers were
/// registered.
///
/// # Terminal state
///
/// The first `error` or `complete` wins. It takes every observer out of the
/// subject and hands each one the terminal notification. From then on the
/// subject is stopped: `next` and further terminals are dropped, and a
/// subscription attempt gets the closed [`BoxedSubscription::empty`] handle
/// without its observer ever being called.
///
/// Clones share the same observers and the same terminal state.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let subject = Subject::<i32, ()>::new();
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
///
/// let subscription = subject.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));
/// subject.next(1);
/// subscription.unsubscribe().unwrap();
/// subject.next(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1]);
/// ```
pub struct Subject<Item, Err> {
  observers: Arc<Subscribers<Item, Err>>,
  stopped: Arc<AtomicBool>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self {
    Self { observers: self.observers.clone(), stopped: self.stopped.clone() }
  }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Self { observers: Arc::new(Subscribers::default()), stopped: Arc::new(AtomicBool::new(false)) }
  }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of observers currently attached.
  #[inline]
  pub fn subscriber_count(&self) -> usize { self.observers.len() }

  /// Whether no observer is attached.
  #[inline]
  pub fn is_empty(&self) -> bool { self.observers.is_empty() }

  /// Whether the subject received a terminal notification.
  #[inline]
  pub fn is_stopped(&self) -> bool { self.stopped.load(Ordering::Acquire) }

  /// Same as [`Self::is_stopped`]; spares callers from picking between the
  /// `Observer` and `Subscription` flavours.
  #[inline]
  pub fn is_closed(&self) -> bool { self.is_stopped() }

  fn stop(&self) -> bool {
    self
      .stopped
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }
}

impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&self, value: Item) {
    if !self.is_stopped() {
      self.observers.broadcast_value(value);
    }
  }

  fn error(&self, err: Err) {
    if self.stop() {
      let count = self.observers.broadcast_error(err);
      debug!(observers = count, "subject errored");
    }
  }

  fn complete(&self) {
    if self.stop() {
      let count = self.observers.broadcast_complete();
      debug!(observers = count, "subject completed");
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.is_stopped() }
}

impl<Item, Err> Observable for Subject<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> BoxedSubscription {
    if self.is_stopped() {
      trace!("subscribe to a stopped subject");
      return BoxedSubscription::empty();
    }

    let id = self.observers.add(observer);
    // Lost a race with a terminal notification that already drained the
    // observers: the entry must not outlive the subject.
    if self.is_stopped() {
      self.observers.remove(id);
      return BoxedSubscription::empty();
    }
    BoxedSubscription::new(SubjectSubscription::new(self.observers.clone(), id))
  }
}

/// Releasing a subject completes it, so every attached observer is notified
/// and detached.
impl<Item, Err> Subscription for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn unsubscribe(&self) -> Result<()> {
    Observer::complete(self);
    self.observers.clear();
    Ok(())
  }

  #[inline]
  fn is_closed(&self) -> bool { self.is_stopped() }
}

impl<Item, Err> Debug for Subject<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subject")
      .field("observers", &self.subscriber_count())
      .field("stopped", &self.is_stopped())
      .finish()
  }
}
