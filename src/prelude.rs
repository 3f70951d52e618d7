//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::DisposeError;
// Core traits, sources and combinators
pub use crate::observable::{
  generate, merge, BoxedObservable, Connectable, ConnectableObservable, Generate, Merge,
  Observable, Operate, OperateNext, SubscriptionOperate,
};
// Observer trait and adapters
pub use crate::observer::{BoxedObserver, FnObserver, Observer, SafeObserver};
// Registry
pub use crate::registry::ConcurrentRegistry;
// Subject
pub use crate::subject::{Subject, SubjectSubscription};
// Subscription
pub use crate::subscription::*;
