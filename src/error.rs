//! Errors raised while releasing subscriptions.
//!
//! Terminal error notifications travel through `Observer::error` as the
//! stream's own `Err` type and never show up here. `DisposeError` only covers
//! the release side: a single teardown that failed, or an aggregate of
//! several.

use std::error::Error as StdError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, DisposeError>;

#[derive(Debug, thiserror::Error)]
pub enum DisposeError {
  /// A teardown action reported a failure.
  #[error("release failed: {0}")]
  Message(String),

  /// A foreign error surfaced by a teardown action.
  #[error(transparent)]
  Other(#[from] Box<dyn StdError + Send + Sync>),

  /// One or more members of an aggregate release failed. Every member was
  /// still released; `causes` keeps the failures in member order.
  #[error("{} of the aggregated subscriptions failed to release", causes.len())]
  Aggregate { causes: Vec<DisposeError> },
}

impl DisposeError {
  pub fn msg(reason: impl Into<String>) -> Self { DisposeError::Message(reason.into()) }

  /// The secondary causes carried by an aggregate failure. Empty for any
  /// other variant.
  pub fn causes(&self) -> &[DisposeError] {
    match self {
      DisposeError::Aggregate { causes } => causes,
      _ => &[],
    }
  }

  pub fn is_aggregate(&self) -> bool { matches!(self, DisposeError::Aggregate { .. }) }

  /// Collapses collected failures into one result. An empty list is success.
  pub(crate) fn collate(causes: Vec<DisposeError>) -> Result<()> {
    if causes.is_empty() {
      Ok(())
    } else {
      Err(DisposeError::Aggregate { causes })
    }
  }
}
