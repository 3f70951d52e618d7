//! # rxcore: a thread-safe push-based reactive core
//!
//! The minimal set of pieces every reactive pipeline is built from: sources
//! that push notifications, consumers that receive them, handles that stop
//! them, and a hub that fans one stream out to many consumers.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let subject = Subject::<i32, ()>::new();
//! let subscription = subject
//!   .clone()
//!   .operate_next(|o: &BoxedObserver<i32, ()>, v: i32| {
//!     if v % 2 == 0 {
//!       o.next(v * 2)
//!     }
//!   })
//!   .subscribe(|v| println!("Value: {}", v));
//!
//! (0..10).for_each(|v| subject.next(v));
//! subscription.unsubscribe().unwrap();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The source contract: attach an observer, get a subscription |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Multicast hub, both observer and observable |
//! | [`ConnectableObservable`] | Shares one upstream subscription, connected once |
//! | [`ConcurrentRegistry`] | Lock-free copy-on-write collection backing the hub |
//!
//! Everything is `Send + Sync`: notifications, subscriptions and releases may
//! happen from any thread.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`ConnectableObservable`]: observable::ConnectableObservable
//! [`ConcurrentRegistry`]: registry::ConcurrentRegistry

pub mod error;
pub mod observable;
pub mod observer;
pub mod prelude;
pub mod registry;
pub mod subject;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;

// Bring the README into Cargo-driven doctests. This module is only compiled
// for rustdoc doctest builds.
#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
