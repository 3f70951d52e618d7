//! Subscription handles and their composition.
//!
//! A [`Subscription`] is the release capability handed back by every
//! `subscribe` call. Releasing is idempotent: the first `unsubscribe` runs the
//! teardown, every later call is a no-op returning `Ok(())`.

mod boxed;
mod closure;
mod composite;

pub use boxed::*;
pub use closure::*;
pub use composite::*;

use std::sync::Arc;

use tracing::warn;

use crate::error::{DisposeError, Result};

/// A releasable resource, usually the link between an observer and the
/// source it subscribed to.
pub trait Subscription: Send + Sync {
  /// Releases the resource. Only the first call has an effect.
  fn unsubscribe(&self) -> Result<()>;

  fn is_closed(&self) -> bool;
}

/// The unit subscription owns nothing and is always closed.
impl Subscription for () {
  #[inline]
  fn unsubscribe(&self) -> Result<()> { Ok(()) }

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T> Subscription for Arc<T>
where
  T: Subscription + ?Sized,
{
  #[inline]
  fn unsubscribe(&self) -> Result<()> { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Releases every subscription, even when some of them fail. All failures
/// are collated into a single [`DisposeError::Aggregate`].
pub fn release_all<I>(subscriptions: I) -> Result<()>
where
  I: IntoIterator,
  I::Item: Subscription,
{
  let failures: Vec<DisposeError> = subscriptions
    .into_iter()
    .filter_map(|s| s.unsubscribe().err())
    .collect();
  if !failures.is_empty() {
    warn!(failures = failures.len(), "subscriptions failed to release");
  }
  DisposeError::collate(failures)
}

/// Scope guard around a subscription: dropping the guard releases it.
///
/// A release failure during drop cannot be returned, so it is logged.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }

  pub fn get_ref(&self) -> &T { &self.0 }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) {
    if let Err(err) = self.0.unsubscribe() {
      warn!(error = %err, "subscription guard failed to release");
    }
  }
}
