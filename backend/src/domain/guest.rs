//! Guest identity records and the loaded-once guest directory.
//!
//! The directory is built at startup from the configuration file and is
//! immutable for the lifetime of the process. Handlers receive it behind an
//! `Arc` so lookups never need locking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on party size; templates exist for one, two, and three
/// person parties only.
pub const MAX_PARTY_SIZE: usize = 3;

/// A single invitation: the secret code, the invited names, and whether the
/// party is invited to the day (meal service) or the evening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    code: String,
    names: Vec<String>,
    day: bool,
}

impl Guest {
    /// Construct a guest record. Used directly by tests; production records
    /// come from the configuration file via serde.
    #[must_use]
    pub fn new(code: impl Into<String>, names: Vec<String>, day: bool) -> Self {
        Self {
            code: code.into(),
            names,
            day,
        }
    }

    /// The case-preserved secret invite code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display names of everyone on the invitation, in invitation order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether this party is invited to the meal service.
    #[must_use]
    pub fn is_day_guest(&self) -> bool {
        self.day
    }

    /// Number of people on the invitation.
    #[must_use]
    pub fn party_size(&self) -> usize {
        self.names.len()
    }
}

/// The allowed starter and main course choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuVocabulary {
    starters: Vec<String>,
    mains: Vec<String>,
}

impl MenuVocabulary {
    /// Construct a vocabulary from explicit course lists.
    #[must_use]
    pub fn new(starters: Vec<String>, mains: Vec<String>) -> Self {
        Self { starters, mains }
    }

    /// Whether `choice` is an offered starter.
    #[must_use]
    pub fn offers_starter(&self, choice: &str) -> bool {
        self.starters.iter().any(|s| s == choice)
    }

    /// Whether `choice` is an offered main.
    #[must_use]
    pub fn offers_main(&self, choice: &str) -> bool {
        self.mains.iter().any(|m| m == choice)
    }
}

/// Rejected directory contents discovered while building the directory.
///
/// Any of these is fatal at startup: the service must not run with an
/// ambiguous or malformed guest list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// A guest record has no names at all.
    #[error("invitation '{code}' lists no names")]
    EmptyNames {
        /// Code of the offending record.
        code: String,
    },

    /// A guest record lists more names than any message template supports.
    #[error("invitation '{code}' lists {actual} names, the maximum is {max}")]
    TooManyNames {
        /// Code of the offending record.
        code: String,
        /// Number of names found.
        actual: usize,
        /// Largest supported party.
        max: usize,
    },

    /// Two records share a code, which would make credential resolution
    /// ambiguous.
    #[error("invite code '{code}' appears more than once")]
    DuplicateCode {
        /// The repeated code.
        code: String,
    },
}

/// Read-only registry of invitees plus the menu vocabulary.
#[derive(Debug, Clone)]
pub struct GuestDirectory {
    guests: Vec<Guest>,
    menu: MenuVocabulary,
}

impl GuestDirectory {
    /// Build a directory, rejecting records that would break downstream
    /// invariants (empty parties, oversized parties, duplicate codes).
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] naming the first offending record.
    pub fn new(guests: Vec<Guest>, menu: MenuVocabulary) -> Result<Self, DirectoryError> {
        for (index, guest) in guests.iter().enumerate() {
            if guest.names.is_empty() {
                return Err(DirectoryError::EmptyNames {
                    code: guest.code.clone(),
                });
            }
            if guest.names.len() > MAX_PARTY_SIZE {
                return Err(DirectoryError::TooManyNames {
                    code: guest.code.clone(),
                    actual: guest.names.len(),
                    max: MAX_PARTY_SIZE,
                });
            }
            let duplicated = guests
                .iter()
                .skip(index + 1)
                .any(|other| other.code.eq_ignore_ascii_case(&guest.code));
            if duplicated {
                return Err(DirectoryError::DuplicateCode {
                    code: guest.code.clone(),
                });
            }
        }
        Ok(Self { guests, menu })
    }

    /// Look up a guest by invite code.
    ///
    /// Matching is case-insensitive so codes survive being read out loud or
    /// typed from a paper invitation; the stored code keeps its original
    /// case for credential derivation.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Guest> {
        self.guests
            .iter()
            .find(|guest| guest.code.eq_ignore_ascii_case(code))
    }

    /// All guests, in configuration order.
    #[must_use]
    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    /// The menu vocabulary loaded alongside the guest list.
    #[must_use]
    pub fn menu(&self) -> &MenuVocabulary {
        &self.menu
    }
}
