use std::{
  fmt::{Debug, Formatter},
  sync::atomic::{AtomicBool, Ordering},
};

use super::Subscription;
use crate::error::{DisposeError, Result};

/// Outcome of a teardown closure. Lets [`ClosureSubscription`] accept both
/// infallible closures and ones that report a release failure.
pub trait TeardownResult {
  fn into_result(self) -> Result<()>;
}

impl TeardownResult for () {
  #[inline]
  fn into_result(self) -> Result<()> { Ok(()) }
}

impl TeardownResult for std::result::Result<(), DisposeError> {
  #[inline]
  fn into_result(self) -> Result<()> { self }
}

/// A subscription backed by a single teardown closure.
///
/// The closure runs on the first `unsubscribe` only; the gate is a
/// compare-and-set on an atomic flag, so racing callers cannot run it twice.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let sub = ClosureSubscription::new(|| println!("released"));
/// sub.unsubscribe().unwrap(); // prints once
/// sub.unsubscribe().unwrap(); // no-op
/// assert!(sub.is_closed());
/// ```
pub struct ClosureSubscription<F> {
  teardown: F,
  closed: AtomicBool,
}

impl<F> ClosureSubscription<F> {
  pub fn new(teardown: F) -> Self { Self { teardown, closed: AtomicBool::new(false) } }
}

impl<F, R> Subscription for ClosureSubscription<F>
where
  F: Fn() -> R + Send + Sync,
  R: TeardownResult,
{
  fn unsubscribe(&self) -> Result<()> {
    if self
      .closed
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
    {
      (self.teardown)().into_result()
    } else {
      Ok(())
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}

impl<F> Debug for ClosureSubscription<F> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClosureSubscription")
      .field("closed", &self.closed.load(Ordering::Relaxed))
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{atomic::AtomicUsize, Arc, Barrier},
    thread,
  };

  use super::*;

  #[test]
  fn teardown_runs_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let sub = ClosureSubscription::new(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!sub.is_closed());
    for _ in 0..5 {
      sub.unsubscribe().unwrap();
    }
    assert!(sub.is_closed());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn failure_is_reported_once() {
    let sub = ClosureSubscription::new(|| Err::<(), _>(DisposeError::msg("busy")));

    assert!(matches!(sub.unsubscribe(), Err(DisposeError::Message(_))));
    assert!(sub.unsubscribe().is_ok());
  }

  #[test]
  fn racing_unsubscribe_runs_teardown_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let sub = ClosureSubscription::new(move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    });
    let barrier = Barrier::new(8);

    thread::scope(|s| {
      for _ in 0..8 {
        s.spawn(|| {
          barrier.wait();
          sub.unsubscribe().unwrap();
        });
      }
    });

    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }
}
