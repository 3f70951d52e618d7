//! Connect-once multicasting.
//!
//! A [`ConnectableObservable`] bridges a source and a [`Subject`]. Observers
//! subscribe to the subject; nothing flows until [`Connectable::connect`]
//! subscribes the subject to the source. However many times `connect` is
//! called, and from however many threads, the source is subscribed at most
//! once.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxcore::prelude::*;
//!
//! let source = generate(|o: BoxedObserver<i32, ()>| {
//!   o.next(1);
//!   o.next(2);
//!   o.complete();
//! });
//! let connectable = source.publish();
//!
//! let seen = Arc::new(Mutex::new(vec![]));
//! let (a, b) = (seen.clone(), seen.clone());
//! connectable.subscribe(move |v| a.lock().unwrap().push(("first", v)));
//! connectable.subscribe(move |v| b.lock().unwrap().push(("second", v)));
//! assert!(seen.lock().unwrap().is_empty());
//!
//! connectable.connect();
//! assert_eq!(seen.lock().unwrap().len(), 4);
//! ```

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use arc_swap::ArcSwapOption;
use tracing::{debug, trace, warn};

use super::Observable;
use crate::{
  error::Result,
  observer::BoxedObserver,
  subject::Subject,
  subscription::{BoxedSubscription, Subscription},
};

/// An observable whose upstream subscription is established on demand.
pub trait Connectable: Observable {
  /// Subscribes the shared upstream if that has not happened yet, and
  /// returns the handle that releases it.
  fn connect(&self) -> BoxedSubscription;
}

/// A source shared through a subject, connected at most once.
///
/// This struct is created by [`Observable::publish`] and
/// [`Observable::multicast`]. Clones share the same subject and the same
/// connection.
pub struct ConnectableObservable<S: Observable> {
  inner: Arc<Inner<S>>,
}

struct Inner<S: Observable> {
  source: S,
  subject: Subject<S::Item, S::Err>,
  connected: AtomicBool,
  connection: Arc<Connection>,
  handle: BoxedSubscription,
}

impl<S: Observable> Clone for ConnectableObservable<S> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<S: Observable> ConnectableObservable<S> {
  pub fn new(source: S) -> Self { Self::with_subject(source, Subject::new()) }

  pub fn with_subject(source: S, subject: Subject<S::Item, S::Err>) -> Self {
    let connection = Arc::new(Connection::default());
    let handle = BoxedSubscription::new(connection.clone());
    let connected = AtomicBool::new(false);
    Self { inner: Arc::new(Inner { source, subject, connected, connection, handle }) }
  }

  /// Whether `connect` was called at least once.
  #[inline]
  pub fn is_connected(&self) -> bool { self.inner.connected.load(Ordering::Acquire) }

  /// The subject the upstream is broadcast through.
  pub fn subject(&self) -> &Subject<S::Item, S::Err> { &self.inner.subject }
}

impl<S> Observable for ConnectableObservable<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  #[inline]
  fn actual_subscribe(&self, observer: BoxedObserver<S::Item, S::Err>) -> BoxedSubscription {
    self.inner.subject.actual_subscribe(observer)
  }
}

impl<S> Connectable for ConnectableObservable<S>
where
  S: Observable,
  S::Item: Clone + 'static,
  S::Err: Clone + 'static,
{
  fn connect(&self) -> BoxedSubscription {
    let inner = &self.inner;
    if inner
      .connected
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
    {
      debug!(observers = inner.subject.subscriber_count(), "connecting upstream");
      let upstream = inner.source.subscribe_with(inner.subject.clone());
      if let Err(err) = inner.connection.attach(upstream) {
        warn!(error = %err, "upstream released while connecting failed to release");
      }
    } else {
      trace!("already connected");
    }
    inner.handle.clone()
  }
}

impl<S: Observable> Debug for ConnectableObservable<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConnectableObservable")
      .field("connected", &self.is_connected())
      .field("subject", &self.inner.subject)
      .finish()
  }
}

/// Owns the upstream subscription of a connectable.
///
/// The upstream handle only exists once the source subscription returned, so
/// a release may arrive first. Both sides are ordered through `released` and
/// an atomic swap of the slot: whichever side comes second performs the
/// release, exactly once.
#[derive(Default)]
struct Connection {
  upstream: ArcSwapOption<BoxedSubscription>,
  released: AtomicBool,
}

impl Connection {
  fn attach(&self, upstream: BoxedSubscription) -> Result<()> {
    self.upstream.store(Some(Arc::new(upstream)));
    if self.released.load(Ordering::SeqCst) { self.detach() } else { Ok(()) }
  }

  fn detach(&self) -> Result<()> {
    match self.upstream.swap(None) {
      Some(upstream) => upstream.unsubscribe(),
      None => Ok(()),
    }
  }
}

impl Subscription for Connection {
  fn unsubscribe(&self) -> Result<()> {
    if self
      .released
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return Ok(());
    }
    debug!("connection released");
    self.detach()
  }

  #[inline]
  fn is_closed(&self) -> bool { self.released.load(Ordering::SeqCst) }
}
