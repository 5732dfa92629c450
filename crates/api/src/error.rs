// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API-level errors.
//!
//! Every layer below has its own error type. These are translated here
//! into the stable, caller-facing taxonomy so that callers never match on
//! domain, core, or storage internals.

use roombook::CoreError;
use roombook_domain::DomainError;
use roombook_persistence::PersistenceError;

/// Authorization failures raised by `AuthorizationService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The actor's role does not allow the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor's account is inactive.
    InactiveAccount {
        /// The inactive account.
        username: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InactiveAccount { username } => {
                write!(f, "Account '{username}' is inactive")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Errors returned by every API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed input: a blank required field, `start >= end`, or an
    /// unrecognized enumerated value.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The requested slot overlaps a booking that still holds the room.
    Conflict {
        /// A user-facing description that does not reveal the other booking.
        message: String,
    },
    /// The status change is not legal from the booking's current status.
    InvalidTransition {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The repository call failed. The operation may be retried.
    PersistenceFailure {
        /// A description of the storage failure.
        message: String,
    },
    /// The uploaded CSV could not be read at all.
    InvalidCsvFormat {
        /// Why the file was rejected.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns true if retrying the same call may succeed.
    ///
    /// Only storage failures are retryable. Nothing is retried internally.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { message } => write!(f, "Booking conflict: {message}"),
            Self::InvalidTransition { message } => write!(f, "Invalid transition: {message}"),
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized to {action}: {reason}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PersistenceFailure { message } => {
                write!(f, "Could not persist the change: {message}")
            }
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV format: {reason}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                reason: format!("requires {required_role} role"),
            },
            AuthError::InactiveAccount { username } => Self::Unauthorized {
                action: String::from("act"),
                reason: format!("account '{username}' is inactive"),
            },
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatusTransition { .. } => ApiError::InvalidTransition {
            message: err.to_string(),
        },
        _ => ApiError::InvalidInput {
            field: String::from(err.field()),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Conflict { .. } => ApiError::Conflict {
            message: String::from("The room is already booked for part of the requested time"),
        },
        CoreError::Unauthorized { action, reason } => ApiError::Unauthorized {
            action: String::from(action),
            reason,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// A status mismatch means another caller changed the booking first, so it
/// is reported as an illegal transition rather than a storage failure.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::StatusMismatch { booking_id, .. } => ApiError::InvalidTransition {
            message: format!("booking {booking_id} status changed concurrently"),
        },
        PersistenceError::ReconstructionError(message) => ApiError::Internal { message },
        other => ApiError::PersistenceFailure {
            message: other.to_string(),
        },
    }
}
