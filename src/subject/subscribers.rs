use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{observer::BoxedObserver, registry::ConcurrentRegistry};

/// A registered observer tagged with the id its subscription removes it by.
pub(crate) struct Subscriber<Item, Err> {
  id: usize,
  observer: BoxedObserver<Item, Err>,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self { Self { id: self.id, observer: self.observer.clone() } }
}

/// Subscribers container with id-based management.
///
/// Storage is a [`ConcurrentRegistry`], so broadcasting walks a snapshot and
/// never blocks a concurrent subscribe or unsubscribe. An observer added while
/// a broadcast is running only sees the next notification.
pub struct Subscribers<Item, Err> {
  next_id: AtomicUsize,
  inner: ConcurrentRegistry<Subscriber<Item, Err>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { next_id: AtomicUsize::new(0), inner: ConcurrentRegistry::new() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Add an observer and return its unique id.
  pub fn add(&self, observer: BoxedObserver<Item, Err>) -> usize {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self.inner.add(Subscriber { id, observer });
    id
  }

  /// Remove an observer by id.
  #[inline]
  pub fn remove(&self, id: usize) -> bool { self.inner.remove_where(|s| s.id == id) }

  /// Check if an id exists.
  pub fn contains(&self, id: usize) -> bool { self.inner.snapshot().iter().any(|s| s.id == id) }

  #[inline]
  pub fn len(&self) -> usize { self.inner.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.inner.is_empty() }

  #[inline]
  pub fn clear(&self) { self.inner.clear() }

  /// Broadcast value to every current observer.
  ///
  /// The value is cloned for all observers except the last one, which
  /// receives the moved value.
  pub(crate) fn broadcast_value(&self, value: Item)
  where
    Item: Clone,
  {
    let snapshot = self.inner.snapshot();
    let mut iter = snapshot.iter().peekable();
    while let Some(s) = iter.next() {
      if iter.peek().is_some() {
        s.observer.next(value.clone());
      } else {
        s.observer.next(value);
        break;
      }
    }
  }

  /// Takes every observer out of the container, then sends the error to
  /// each. Returns how many observers were notified.
  pub(crate) fn broadcast_error(&self, err: Err) -> usize
  where
    Err: Clone,
  {
    let drained = self.inner.take();
    let count = drained.len();
    let mut iter = drained.iter().peekable();
    while let Some(s) = iter.next() {
      if iter.peek().is_some() {
        s.observer.error(err.clone());
      } else {
        s.observer.error(err);
        break;
      }
    }
    count
  }

  /// Takes every observer out of the container, then completes each.
  /// Returns how many observers were notified.
  pub(crate) fn broadcast_complete(&self) -> usize {
    let drained = self.inner.take();
    for s in drained.iter() {
      s.observer.complete();
    }
    drained.len()
  }
}
