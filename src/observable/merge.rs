use smallvec::SmallVec;

use super::{BoxedObservable, Observable};
use crate::{
  observer::BoxedObserver,
  subscription::{BoxedSubscription, CompositeSubscription},
};

/// Fans every subscriber out to a fixed set of sources.
///
/// This struct is created by [`merge`] and [`Observable::merge`].
pub struct Merge<Item, Err> {
  sources: SmallVec<[BoxedObservable<Item, Err>; 2]>,
}

/// Combines several sources into one.
///
/// Subscribing attaches the same observer to every source, in order, and
/// returns one subscription releasing all of them. Emissions are not
/// reordered or mixed in any way, and each source's terminal notification is
/// passed straight through: the first one to arrive ends the merged stream
/// for a gated observer such as the ones built by `subscribe*`.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let numbers = Subject::<i32, ()>::new();
/// let hundred = generate(|o: BoxedObserver<i32, ()>| o.next(100));
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// merge([numbers.clone().box_it(), hundred.box_it()])
///   .subscribe(move |v| c_seen.lock().unwrap().push(v));
///
/// numbers.next(1);
/// assert_eq!(*seen.lock().unwrap(), vec![100, 1]);
/// ```
pub fn merge<I, Item, Err>(sources: I) -> Merge<Item, Err>
where
  I: IntoIterator<Item = BoxedObservable<Item, Err>>,
{
  Merge { sources: sources.into_iter().collect() }
}

impl<Item, Err> Merge<Item, Err> {
  /// Number of merged sources.
  pub fn len(&self) -> usize { self.sources.len() }

  pub fn is_empty(&self) -> bool { self.sources.is_empty() }
}

impl<Item, Err> Observable for Merge<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> BoxedSubscription {
    let subscriptions = self
      .sources
      .iter()
      .map(|source| source.actual_subscribe(observer.clone()));
    BoxedSubscription::new(CompositeSubscription::new(subscriptions))
  }
}
