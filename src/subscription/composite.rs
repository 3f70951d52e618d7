use std::{
  any::Any,
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use super::{release_all, BoxedSubscription, Subscription};
use crate::{error::Result, registry::ConcurrentRegistry};

/// An aggregate of subscriptions released as one.
///
/// The first `unsubscribe` releases every member, keeps going past members
/// that fail and reports all failures at once as a
/// [`DisposeError::Aggregate`](crate::error::DisposeError::Aggregate). Members
/// may be added at any time; a member added after the composite was released
/// is released on the spot.
///
/// Clones share the same set of members.
#[derive(Clone, Default)]
pub struct CompositeSubscription(Arc<Inner>);

#[derive(Default)]
struct Inner {
  closed: AtomicBool,
  teardown: ConcurrentRegistry<BoxedSubscription>,
}

impl CompositeSubscription {
  pub fn new<I>(subscriptions: I) -> Self
  where
    I: IntoIterator,
    I::Item: Subscription + 'static,
  {
    let composite = Self::default();
    for s in subscriptions {
      composite.0.teardown.add(BoxedSubscription::new(s));
    }
    composite
  }

  /// Adds a member. If the composite is already released the member is
  /// released immediately and the outcome of that release is returned.
  pub fn add<S: Subscription + 'static>(&self, subscription: S) -> Result<()> {
    if self.is_same(&subscription) {
      return Ok(());
    }
    let subscription = BoxedSubscription::new(subscription);
    if self.is_closed() {
      return subscription.unsubscribe();
    }

    self.0.teardown.add(subscription.clone());
    // Lost a race with `unsubscribe`: whoever removes the entry releases it.
    if self.is_closed() && self.0.teardown.remove(&subscription) {
      return subscription.unsubscribe();
    }
    Ok(())
  }

  /// Detaches a member without releasing it. Returns whether it was found.
  pub fn remove(&self, subscription: &BoxedSubscription) -> bool {
    self.0.teardown.remove(subscription)
  }

  /// Number of members still attached.
  pub fn teardown_size(&self) -> usize { self.0.teardown.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<Self>()
      .is_some_and(|other| Arc::ptr_eq(&self.0, &other.0))
  }
}

impl Subscription for CompositeSubscription {
  fn unsubscribe(&self) -> Result<()> {
    if self
      .0
      .closed
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return Ok(());
    }
    release_all(self.0.teardown.take())
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.closed.load(Ordering::Acquire) }
}

impl Debug for CompositeSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompositeSubscription")
      .field("closed", &self.is_closed())
      .field("teardown_count", &self.teardown_size())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{atomic::AtomicUsize, Barrier},
    thread,
  };

  use super::*;
  use crate::{error::DisposeError, subscription::ClosureSubscription};

  fn counting() -> (Arc<AtomicUsize>, ClosureSubscription<impl Fn() + Send + Sync>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    (hits, ClosureSubscription::new(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    }))
  }

  #[test]
  fn add_members() {
    let composite = CompositeSubscription::default();
    composite.add(ClosureSubscription::new(|| {})).unwrap();
    assert_eq!(composite.teardown_size(), 1);
    composite.add(ClosureSubscription::new(|| {})).unwrap();
    assert_eq!(composite.teardown_size(), 2);

    let third = BoxedSubscription::new(ClosureSubscription::new(|| {}));
    composite.add(third.clone()).unwrap();
    assert_eq!(composite.teardown_size(), 3);
    assert!(composite.remove(&third));
    assert_eq!(composite.teardown_size(), 2);
  }

  #[test]
  fn release_is_idempotent() {
    let (hits, sub) = counting();
    let composite = CompositeSubscription::new([sub]);

    composite.unsubscribe().unwrap();
    composite.unsubscribe().unwrap();

    assert!(composite.is_closed());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(composite.teardown_size(), 0);
  }

  #[test]
  fn add_after_release_releases_immediately() {
    let composite = CompositeSubscription::default();
    composite.unsubscribe().unwrap();

    let (hits, sub) = counting();
    composite.add(sub).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(composite.teardown_size(), 0);
  }

  #[test]
  fn close_with_attaches_handle() {
    let composite = CompositeSubscription::default();
    let (hits, sub) = counting();
    let sub = BoxedSubscription::new(sub).close_with(&composite);

    assert!(!sub.is_closed());
    composite.unsubscribe().unwrap();
    assert!(sub.is_closed());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn adding_itself_is_ignored() {
    let composite = CompositeSubscription::default();
    composite.add(composite.clone()).unwrap();

    assert_eq!(composite.teardown_size(), 0);
  }

  #[test]
  fn collates_failures_without_short_circuit() {
    let (h1, s1) = counting();
    let (h3, s3) = counting();
    let h2 = Arc::new(AtomicUsize::new(0));
    let c_h2 = h2.clone();
    let s2 = ClosureSubscription::new(move || {
      c_h2.fetch_add(1, Ordering::SeqCst);
      Err::<(), _>(DisposeError::msg("second"))
    });

    let composite = CompositeSubscription::default();
    composite.add(s1).unwrap();
    composite.add(s2).unwrap();
    composite.add(s3).unwrap();

    let err = composite.unsubscribe().unwrap_err();
    assert_eq!(h1.load(Ordering::SeqCst), 1);
    assert_eq!(h2.load(Ordering::SeqCst), 1);
    assert_eq!(h3.load(Ordering::SeqCst), 1);
    assert_eq!(err.causes().len(), 1);
    assert_eq!(err.causes()[0].to_string(), "release failed: second");

    // already released, nothing left to report
    assert!(composite.unsubscribe().is_ok());
  }

  #[test]
  fn add_racing_release_releases_every_member_once() {
    for _ in 0..500 {
      let composite = CompositeSubscription::default();
      let members: Vec<_> = (0..4)
        .map(|_| {
          let (hits, sub) = counting();
          (hits, BoxedSubscription::new(sub))
        })
        .collect();
      let barrier = Barrier::new(5);

      thread::scope(|s| {
        for (_, sub) in &members {
          let (composite, barrier, sub) = (&composite, &barrier, sub.clone());
          s.spawn(move || {
            barrier.wait();
            composite.add(sub).unwrap();
          });
        }
        let (composite, barrier) = (&composite, &barrier);
        s.spawn(move || {
          barrier.wait();
          composite.unsubscribe().unwrap();
        });
      });

      assert!(composite.is_closed());
      assert_eq!(composite.teardown_size(), 0);
      for (hits, _) in &members {
        assert_eq!(hits.load(Ordering::SeqCst), 1);
      }
    }
  }
}
