//! Multicast hub.
//!
//! A [`Subject`] is fed like an observer and subscribed to like an
//! observable; every notification it receives is forwarded to all of its
//! current observers.

mod subject_core;
mod subject_subscription;
mod subscribers;

pub use subject_core::*;
pub use subject_subscription::*;
pub use subscribers::Subscribers;
