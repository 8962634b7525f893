//! Domain primitives and core services.
//!
//! Purpose: the credential issuance/verification and RSVP validation state
//! machine, kept free of transport and storage concerns. Inbound adapters
//! map these types onto HTTP; outbound adapters implement the ports.
//!
//! Public surface:
//! - [`GuestDirectory`], [`Guest`], [`MenuVocabulary`]: the loaded-once
//!   invitee registry.
//! - [`CredentialIssuer`], [`Credential`]: stateless session credentials.
//! - [`validate`]: the submission rule set.
//! - [`RsvpStore`], [`NotificationDispatcher`]: driven ports.
//! - [`Error`] and the per-concern error enums.

pub mod credential;
pub mod error;
pub mod guest;
pub mod notification;
pub mod ports;
pub mod rsvp;
pub mod validation;

pub use self::credential::{Credential, CredentialIssuer};
pub use self::error::{
    ApiResult, AuthError, ConflictError, DeliveryError, Error, MenuCourse, PersistenceError,
    ValidationError,
};
pub use self::guest::{DirectoryError, Guest, GuestDirectory, MenuVocabulary};
pub use self::notification::{MessageVariant, format_names, select_variant};
pub use self::ports::{InMemoryRsvpStore, NoopDispatcher, NotificationDispatcher, RsvpStore};
pub use self::rsvp::{GuestEntry, RsvpRecord, RsvpSubmission};
pub use self::validation::validate;
