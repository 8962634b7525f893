//! Domain-level error types.
//!
//! These errors are transport agnostic. The inbound HTTP adapter maps them
//! to status codes and a consistent JSON envelope; nothing in this module
//! knows about Actix.

use thiserror::Error;

/// Authentication failures raised while issuing or verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The presented invite code does not match any guest in the directory.
    #[error("no invitation matches that code")]
    CodeNotFound,

    /// The presented credential does not resolve to any guest.
    #[error("identification token not recognised")]
    InvalidCredential,
}

/// Which course a rejected menu choice belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCourse {
    /// The starter course.
    Starter,
    /// The main course.
    Main,
}

impl std::fmt::Display for MenuCourse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starter => write!(f, "starter"),
            Self::Main => write!(f, "main"),
        }
    }
}

/// Business-rule violations in a submitted RSVP.
///
/// Each variant names the rule that failed so clients receive an error
/// message specific enough to correct the submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Attendance was omitted, either overall or on a per-person entry.
    #[error("attendance must be stated explicitly")]
    MissingAttendance,

    /// The per-person entry list does not cover the invited party exactly.
    #[error("expected {expected} guest entries, got {actual}")]
    WrongPartySize {
        /// Number of names on the invitation.
        expected: usize,
        /// Number of entries submitted.
        actual: usize,
    },

    /// Two entries name the same member of a two-person party.
    #[error("guest entries both name '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// An entry names somebody who is not on the invitation.
    #[error("'{name}' is not named on this invitation")]
    UnrecognisedName {
        /// The unrecognised name.
        name: String,
    },

    /// A menu choice is missing or not offered.
    #[error("'{choice}' is not on the {course} menu")]
    InvalidMenuChoice {
        /// Course the choice was submitted for.
        course: MenuCourse,
        /// The rejected choice.
        choice: String,
    },

    /// An evening invitation included meal selections.
    #[error("menu choices are not available for evening invitations")]
    MenuNotAllowedForGuestType,
}

/// Conflicts with already-recorded state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// An RSVP has already been accepted for this code.
    #[error("an RSVP has already been recorded for this invitation")]
    AlreadyRecorded,
}

/// Failures of the durable RSVP table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The RSVP table could not be written to durable storage.
    #[error("failed to write RSVP data: {message}")]
    WriteFailed {
        /// Description of the underlying I/O error.
        message: String,
    },

    /// The RSVP table exists but could not be read or parsed.
    #[error("failed to read RSVP data: {message}")]
    ReadFailed {
        /// Description of the underlying I/O or parse error.
        message: String,
    },
}

/// Failures reported by the outbound notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The confirmation message could not be handed to the provider.
    #[error("failed to send confirmation: {message}")]
    SendFailed {
        /// Description of the provider or transport error.
        message: String,
    },
}

/// Umbrella error for request handling.
///
/// Handlers return this so the HTTP adapter can map every failure class to
/// one status code and one JSON envelope. The conversions are lossless;
/// [`Error::code`] exposes a stable machine-readable identifier per variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// See [`AuthError`].
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// See [`ConflictError`].
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// See [`PersistenceError`].
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// See [`DeliveryError`].
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl Error {
    /// Stable machine-readable identifier for the concrete failure.
    ///
    /// # Examples
    /// ```
    /// use rsvp_backend::domain::{AuthError, Error};
    ///
    /// let err = Error::from(AuthError::CodeNotFound);
    /// assert_eq!(err.code(), "code_not_found");
    /// ```
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(AuthError::CodeNotFound) => "code_not_found",
            Self::Auth(AuthError::InvalidCredential) => "invalid_credential",
            Self::Validation(ValidationError::MissingAttendance) => "missing_attendance",
            Self::Validation(ValidationError::WrongPartySize { .. }) => "wrong_party_size",
            Self::Validation(ValidationError::DuplicateName { .. }) => "duplicate_name",
            Self::Validation(ValidationError::UnrecognisedName { .. }) => "unrecognised_name",
            Self::Validation(ValidationError::InvalidMenuChoice { .. }) => "invalid_menu_choice",
            Self::Validation(ValidationError::MenuNotAllowedForGuestType) => {
                "menu_not_allowed_for_guest_type"
            }
            Self::Conflict(ConflictError::AlreadyRecorded) => "already_recorded",
            Self::Persistence(_) => "persistence_failure",
            Self::Delivery(_) => "delivery_failure",
        }
    }
}

/// Convenient result alias for fallible domain and handler code.
pub type ApiResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::from(AuthError::InvalidCredential), "invalid_credential")]
    #[case(
        Error::from(ValidationError::MenuNotAllowedForGuestType),
        "menu_not_allowed_for_guest_type"
    )]
    #[case(Error::from(ConflictError::AlreadyRecorded), "already_recorded")]
    #[case(
        Error::from(PersistenceError::WriteFailed { message: "disk full".into() }),
        "persistence_failure"
    )]
    fn codes_are_stable(#[case] err: Error, #[case] expected: &str) {
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn messages_name_the_violated_rule() {
        let err = ValidationError::InvalidMenuChoice {
            course: MenuCourse::Starter,
            choice: "Chips".into(),
        };
        assert_eq!(err.to_string(), "'Chips' is not on the starter menu");

        let err = ValidationError::WrongPartySize {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "expected 2 guest entries, got 1");
    }

    #[rstest]
    fn transparent_conversion_preserves_message() {
        let inner = ConflictError::AlreadyRecorded;
        let outer = Error::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
