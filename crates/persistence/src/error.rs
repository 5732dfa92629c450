// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::BookingStatus;

/// Failures of the booking repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Diesel reported an error while running a statement.
    DatabaseError(String),
    /// The database file or in-memory database could not be opened.
    ConnectionFailed(String),
    /// Embedded schema migrations could not be applied.
    MigrationFailed(String),
    /// A connection PRAGMA or raw statement failed.
    QueryFailed(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// The database path is not valid UTF-8.
    InvalidPath(String),
    /// `PRAGMA foreign_keys` reads back as off after configuration.
    ForeignKeysDisabled,
    /// A plain-text password could not be hashed.
    PasswordHashFailed(String),
    /// A timestamp could not be written as RFC 3339.
    TimestampEncoding(String),
    /// No row matched.
    NotFound(String),
    /// A conditional status update found the booking in a different status.
    StatusMismatch {
        booking_id: i64,
        expected: BookingStatus,
        actual: BookingStatus,
    },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ConnectionFailed(msg) => write!(f, "Could not open database: {msg}"),
            Self::MigrationFailed(msg) => write!(f, "Schema migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Statement failed: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Stored data is invalid: {msg}"),
            Self::InvalidPath(path) => write!(f, "Database path is not valid UTF-8: {path}"),
            Self::ForeignKeysDisabled => f.write_str("SQLite foreign key enforcement is off"),
            Self::PasswordHashFailed(msg) => write!(f, "Could not hash password: {msg}"),
            Self::TimestampEncoding(msg) => write!(f, "Could not encode timestamp: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::StatusMismatch {
                booking_id,
                expected,
                actual,
            } => write!(f, "Booking {booking_id} is {actual}, expected {expected}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(String::from("no matching row")),
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}
