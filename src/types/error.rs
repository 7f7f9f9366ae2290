//! Error types for the canteen ledger
//!
//! This module defines every error a core operation can return. Errors are
//! designed to be rendered directly to the person at the console, so each
//! display string reads as a complete sentence fragment.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: missing items, users or students
//! - **Validation Errors**: non-positive amounts, malformed input, bad passwords
//! - **Balance Errors**: insufficient wallet balance, arithmetic overflow
//! - **Store Errors**: unwritable files, malformed records, bad configuration

use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;

/// Convenience result alias used across the crate
pub type Result<T> = std::result::Result<T, CanteenError>;

/// Main error type for the canteen ledger
///
/// Every variant is recoverable at the console boundary: the message is shown
/// and control returns to the enclosing menu.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanteenError {
    /// A food item, student or wallet record does not exist
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Kind of record that was looked up
        entity: String,
        /// Key used for the lookup
        key: String,
    },

    /// Non-positive price/quantity/amount or malformed input
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was wrong
        message: String,
    },

    /// Login password or wallet password mismatch
    #[error("Invalid password")]
    InvalidPassword,

    /// No user record matches the supplied username
    #[error("User '{username}' not found")]
    UserNotFound {
        /// The username that was not found
        username: String,
    },

    /// Registration attempted with a username that is already taken
    #[error("User '{username}' already exists")]
    UserAlreadyExists {
        /// The duplicated username
        username: String,
    },

    /// Debit exceeds the current wallet balance
    ///
    /// The wallet is left untouched.
    #[error(
        "Insufficient balance for student {student_id}: available {available}, requested {requested}"
    )]
    InsufficientBalance {
        /// Student whose wallet was debited
        student_id: String,
        /// Balance at the time of the check
        available: Decimal,
        /// Requested debit
        requested: Decimal,
    },

    /// Money arithmetic would overflow the decimal range
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// A record file could not be read or written
    #[error("Store unavailable at {path}: {message}")]
    StoreUnavailable {
        /// Path of the file involved
        path: String,
        /// Underlying I/O failure
        message: String,
    },

    /// A record file contains a malformed record
    ///
    /// Aborts the load of that file only.
    #[error("Parse error in {path}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Path of the file being loaded
        path: String,
        /// Line number of the malformed record (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Configuration file missing or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl From<std::io::Error> for CanteenError {
    fn from(error: std::io::Error) -> Self {
        CanteenError::StoreUnavailable {
            path: String::from("<unknown>"),
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for CanteenError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        CanteenError::ParseError {
            path: String::from("<unknown>"),
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl CanteenError {
    /// Create a NotFound error
    pub fn not_found(entity: &str, key: impl ToString) -> Self {
        CanteenError::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CanteenError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(username: &str) -> Self {
        CanteenError::UserNotFound {
            username: username.to_string(),
        }
    }

    /// Create a UserAlreadyExists error
    pub fn user_already_exists(username: &str) -> Self {
        CanteenError::UserAlreadyExists {
            username: username.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(student_id: &str, available: Decimal, requested: Decimal) -> Self {
        CanteenError::InsufficientBalance {
            student_id: student_id.to_string(),
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        CanteenError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a StoreUnavailable error for a specific file
    pub fn store_unavailable(path: &Path, error: impl ToString) -> Self {
        CanteenError::StoreUnavailable {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create a ParseError for a specific file
    pub fn parse_error(path: &Path, line: Option<u64>, message: impl Into<String>) -> Self {
        CanteenError::ParseError {
            path: path.display().to_string(),
            line,
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        CanteenError::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::not_found(
        CanteenError::not_found("Food item", 7),
        "Food item '7' not found"
    )]
    #[case::invalid_argument(
        CanteenError::invalid_argument("price must be greater than 0"),
        "Invalid argument: price must be greater than 0"
    )]
    #[case::invalid_password(CanteenError::InvalidPassword, "Invalid password")]
    #[case::user_not_found(CanteenError::user_not_found("ghost"), "User 'ghost' not found")]
    #[case::user_already_exists(
        CanteenError::user_already_exists("student1"),
        "User 'student1' already exists"
    )]
    #[case::insufficient_balance(
        CanteenError::insufficient_balance("STD101", dec!(300.0), dec!(400)),
        "Insufficient balance for student STD101: available 300.0, requested 400"
    )]
    #[case::parse_error_with_line(
        CanteenError::parse_error(Path::new("wallet.txt"), Some(3), "expected 2 fields, found 1"),
        "Parse error in wallet.txt at line 3: expected 2 fields, found 1"
    )]
    #[case::parse_error_without_line(
        CanteenError::parse_error(Path::new("wallet.txt"), None, "bad record"),
        "Parse error in wallet.txt: bad record"
    )]
    #[case::store_unavailable(
        CanteenError::store_unavailable(Path::new("users.txt"), "Permission denied"),
        "Store unavailable at users.txt: Permission denied"
    )]
    fn test_error_display(#[case] error: CanteenError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: CanteenError = io_error.into();
        assert!(matches!(error, CanteenError::StoreUnavailable { .. }));
        assert!(error.to_string().ends_with("Permission denied"));
    }
}
