//! Boxed Observable types for type erasure
//!
//! `BoxedObservable` lets heterogeneous sources be stored or passed around
//! behind one type, e.g. the member list of [`Merge`](super::Merge).

use std::sync::Arc;

use super::Observable;

// ============================================================================
// Type Aliases for Boxed Observable Types
// ============================================================================

/// A shared, type-erased source of `Item`s failing with `Err`.
pub type BoxedObservable<Item, Err> = Arc<dyn Observable<Item = Item, Err = Err>>;
