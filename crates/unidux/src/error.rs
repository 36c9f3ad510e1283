//! Errors raised by the store and its dispatch pipeline.

use thiserror::Error;

/// Boxed error carried by middleware and thunk failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while dispatching.
///
/// None of these leave the store in a partially-updated state: the current
/// state is only replaced after the whole pipeline returned successfully.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dispatched value has no usable type tag, or a thunk reached the
    /// reducer without passing through a thunk middleware.
    #[error("Invalid action: {reason}")]
    InvalidAction { reason: String },

    /// `dispatch` was called while another dispatch was still in progress.
    #[error("Dispatch called while a dispatch is already in progress")]
    ReentrantDispatch,

    /// A combined sub-reducer was handed a slice it does not own.
    #[error("Reducer contract violated for slice `{key}`: {reason}")]
    ReducerContractViolation { key: String, reason: String },

    /// A middleware or a thunk continuation failed.
    #[error("Middleware `{name}` failed: {source}")]
    Middleware {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        StoreError::InvalidAction {
            reason: reason.into(),
        }
    }

    pub fn middleware(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::Middleware {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, StoreError>;
