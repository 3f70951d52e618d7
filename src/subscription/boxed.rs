use std::{
  any::Any,
  fmt::{Debug, Formatter},
  sync::Arc,
};

use once_cell::sync::Lazy;
use tracing::warn;

use super::{CompositeSubscription, Subscription, SubscriptionGuard};
use crate::error::Result;

static EMPTY: Lazy<BoxedSubscription> = Lazy::new(|| BoxedSubscription(Arc::new(())));

/// A type-erased, cheaply clonable subscription handle.
///
/// Clones share the same underlying subscription, so releasing any clone
/// releases them all. Two handles compare equal when they point at the same
/// subscription.
///
/// # Examples
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let sub1 = BoxedSubscription::new(ClosureSubscription::new(|| {}));
/// let sub2 = BoxedSubscription::empty();
///
/// let subs: Vec<BoxedSubscription> = vec![sub1, sub2];
/// for sub in subs {
///   sub.unsubscribe().unwrap();
/// }
/// ```
#[derive(Clone)]
pub struct BoxedSubscription(Arc<dyn Subscription>);

impl BoxedSubscription {
  /// Boxes `subscription`. Passing a `BoxedSubscription` returns a clone of
  /// it instead of wrapping it again, and `()` maps to [`Self::empty`].
  pub fn new(subscription: impl Subscription + 'static) -> Self {
    let any = &subscription as &dyn Any;
    if let Some(boxed) = any.downcast_ref::<Self>() {
      return boxed.clone();
    }
    if any.is::<()>() {
      return Self::empty();
    }
    Self(Arc::new(subscription))
  }

  /// The shared no-op handle. It is always closed and releasing it does
  /// nothing.
  pub fn empty() -> Self { EMPTY.clone() }

  /// Registers this handle with `composite`, so it is released together with
  /// it, and hands it back.
  ///
  /// If `composite` is already released, the handle is released on the spot;
  /// a failure of that release is logged, the handle is closed either way.
  pub fn close_with(self, composite: &CompositeSubscription) -> Self {
    if let Err(err) = composite.add(self.clone()) {
      warn!(error = %err, "subscription added to a released composite failed to release");
    }
    self
  }

  /// Turns the handle into a [`SubscriptionGuard`] that releases it when
  /// dropped. Bind the guard to a named variable; `let _ = ...` drops it,
  /// and so releases the subscription, right away.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn unsubscribe(&self) -> Result<()> { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl PartialEq for BoxedSubscription {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
  }
}

impl Eq for BoxedSubscription {}

impl Debug for BoxedSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxedSubscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}
