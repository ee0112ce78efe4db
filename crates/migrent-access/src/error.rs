//! Error types for the access crate.

use thiserror::Error;

/// Failures reported by access collaborators.
///
/// The controller never surfaces these to its caller: any of them during a
/// role check resolves to a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The session could not be resolved.
    #[error("session resolution failed: {0}")]
    Session(String),

    /// The user-record lookup failed.
    #[error("role lookup failed: {0}")]
    Lookup(String),

    /// The user-record store has no row for this identity.
    #[error("no user record for '{0}'")]
    NotFound(String),

    /// The collaborator answered with something unreadable.
    #[error("malformed response: {0}")]
    Malformed(String),
}
