//! Transition errors.
//!
//! Two kinds of failure exist:
//!
//! - **Recoverable** conditions are returned as [`TransitionError`]: the
//!   per-shape edge limit, the per-chain property limit, and allocator
//!   failure while growing an array.
//! - **Integrity violations** (bad indices, index access on an empty table, a
//!   target whose last descriptor does not match its edge) are bugs upstream.
//!   They panic through [`integrity_violation!`] instead of returning a value
//!   that could be mistaken for a real answer.
//!
//! A lookup miss or a cleared weak target is neither: it is `None`.

use std::collections::TryReserveError;
use thiserror::Error;

/// Recoverable transition insertion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The shape already carries the maximum number of live edges.
    #[error("shape already has the maximum of {limit} transitions")]
    TooManyTransitions {
        /// Configured per-shape limit.
        limit: usize,
    },
    /// The shape chain already holds the maximum number of properties.
    #[error("shape already has the maximum of {limit} properties")]
    TooManyProperties {
        /// Configured per-chain limit.
        limit: usize,
    },
    /// Allocating a larger transition array failed. The previous array is
    /// left untouched.
    #[error("transition array allocation failed")]
    OutOfMemory(#[from] TryReserveError),
}

/// Abort on a broken transition invariant.
macro_rules! integrity_violation {
    ($($arg:tt)*) => {
        panic!("transition integrity violation: {}", format_args!($($arg)*))
    };
}

pub(crate) use integrity_violation;
