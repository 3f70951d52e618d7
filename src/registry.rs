//! Lock-free copy-on-write registry.
//!
//! `ConcurrentRegistry` keeps its elements in an immutable `Vec` behind an
//! [`ArcSwap`]. Every mutation builds a new vector from the current one and
//! publishes it with a compare-and-swap, retrying when another writer got
//! there first. Readers never block: iteration pins the vector that was
//! current when it started and is unaffected by anything published later.
//!
//! # Example
//!
//! ```rust
//! use rxcore::registry::ConcurrentRegistry;
//!
//! let registry = ConcurrentRegistry::default();
//! registry.add(1);
//! registry.add(2);
//!
//! let snapshot = registry.snapshot();
//! registry.add(3);
//!
//! assert_eq!(&*snapshot, &[1, 2]);
//! assert_eq!(registry.len(), 3);
//! ```

use std::{
  fmt::{Debug, Formatter},
  ops::Deref,
  sync::Arc,
};

use arc_swap::ArcSwap;

/// A thread-safe, unordered-on-removal container.
///
/// Elements are cloned whenever a writer rebuilds the backing vector, so `T`
/// should be cheap to clone (ids, `Arc`s, handles).
pub struct ConcurrentRegistry<T> {
  items: ArcSwap<Vec<T>>,
}

impl<T> Default for ConcurrentRegistry<T> {
  fn default() -> Self { Self { items: ArcSwap::from_pointee(Vec::new()) } }
}

impl<T> ConcurrentRegistry<T> {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn len(&self) -> usize { self.items.load().len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.load().is_empty() }

  /// Pins the current contents. Later mutations of the registry are not
  /// visible through the returned snapshot.
  #[inline]
  pub fn snapshot(&self) -> Snapshot<T> { Snapshot(self.items.load_full()) }

  /// Drops every element.
  pub fn clear(&self) { self.items.store(Arc::new(Vec::new())); }

  /// Atomically empties the registry and returns what it held. Nothing added
  /// before the swap is lost and nothing added after it is returned.
  pub fn take(&self) -> Snapshot<T> { Snapshot(self.items.swap(Arc::new(Vec::new()))) }
}

impl<T: Clone> ConcurrentRegistry<T> {
  /// A fresh snapshot iterator. Each call observes the registry as it is at
  /// the moment of the call.
  #[inline]
  pub fn iter(&self) -> Iter<T> { self.snapshot().into_iter() }

  /// Appends `item`.
  pub fn add(&self, item: T) {
    self.items.rcu(|current| {
      let mut next = Vec::with_capacity(current.len() + 1);
      next.extend(current.iter().cloned());
      next.push(item.clone());
      next
    });
  }

  /// Removes the first element matching `predicate`. Returns whether an
  /// element was removed.
  pub fn remove_where<F>(&self, predicate: F) -> bool
  where
    F: Fn(&T) -> bool,
  {
    let prev = self.items.rcu(|current| match current.iter().position(&predicate) {
      Some(pos) => Arc::new(splice(current, pos)),
      None => Arc::clone(current),
    });
    prev.iter().any(predicate)
  }
}

impl<T: Clone + PartialEq> ConcurrentRegistry<T> {
  /// Removes the first element equal to `item`. Returns whether an element
  /// was removed.
  pub fn remove(&self, item: &T) -> bool { self.remove_where(|e| e == item) }

  pub fn contains(&self, item: &T) -> bool { self.items.load().contains(item) }
}

impl<T: Debug> Debug for ConcurrentRegistry<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_list()
      .entries(self.items.load().iter())
      .finish()
  }
}

fn splice<T: Clone>(items: &[T], pos: usize) -> Vec<T> {
  let mut next = Vec::with_capacity(items.len() - 1);
  next.extend_from_slice(&items[..pos]);
  next.extend_from_slice(&items[pos + 1..]);
  next
}

/// A point-in-time view of a [`ConcurrentRegistry`].
pub struct Snapshot<T>(Arc<Vec<T>>);

impl<T> Clone for Snapshot<T> {
  fn clone(&self) -> Self { Snapshot(self.0.clone()) }
}

impl<T> Deref for Snapshot<T> {
  type Target = [T];

  #[inline]
  fn deref(&self) -> &[T] { &self.0 }
}

impl<T: Clone> IntoIterator for Snapshot<T> {
  type Item = T;
  type IntoIter = Iter<T>;

  fn into_iter(self) -> Iter<T> { Iter { items: self.0, pos: 0 } }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

/// Owning iterator over a pinned snapshot.
pub struct Iter<T> {
  items: Arc<Vec<T>>,
  pos: usize,
}

impl<T: Clone> Iterator for Iter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    let item = self.items.get(self.pos)?.clone();
    self.pos += 1;
    Some(item)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.items.len() - self.pos;
    (remaining, Some(remaining))
  }
}

impl<T: Clone> ExactSizeIterator for Iter<T> {}
