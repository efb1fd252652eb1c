//! Planning error abstractions.

use thiserror::Error;

/// Planning error variants.
#[derive(Debug, Error)]
pub enum PlanError {
    /// An operation was invoked with inputs outside of its domain.
    ///
    /// These are configuration errors on the part of the operator, and retrying with the same
    /// inputs will always fail.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
    /// The given input was invalid.
    #[error("validation error: {0}")]
    InvalidInput(String),
    /// The referenced cluster member does not exist in the inventory.
    #[error("cluster member `{0}` not found in inventory")]
    UnknownMember(String),
    /// The referenced group does not exist in the inventory.
    #[error("group `{0}` not found in inventory")]
    UnknownGroup(String),
}
