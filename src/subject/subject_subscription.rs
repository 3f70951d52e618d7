use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use super::subscribers::Subscribers;
use crate::{error::Result, subscription::Subscription};

/// Subscription handle for a Subject.
///
/// Holds a shared pointer to the Subject's observers list, not the Subject
/// itself. Releasing it removes exactly the observer it was created for; a
/// second release, or a release after the Subject already terminated, does
/// nothing.
pub struct SubjectSubscription<Item, Err> {
  observers: Arc<Subscribers<Item, Err>>,
  id: usize,
  closed: AtomicBool,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  pub(crate) fn new(observers: Arc<Subscribers<Item, Err>>, id: usize) -> Self {
    Self { observers, id, closed: AtomicBool::new(false) }
  }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(&self) -> Result<()> {
    if self
      .closed
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
    {
      self.observers.remove(self.id);
    }
    Ok(())
  }

  fn is_closed(&self) -> bool {
    self.closed.load(Ordering::Acquire) || !self.observers.contains(self.id)
  }
}

impl<Item, Err> Debug for SubjectSubscription<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubjectSubscription")
      .field("id", &self.id)
      .field("closed", &self.closed.load(Ordering::Relaxed))
      .finish()
  }
}
