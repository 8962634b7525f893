//! Stateless session credentials derived from invite codes.
//!
//! A credential is the hex-encoded SHA-256 digest of a guest's stored code
//! concatenated with a server-held salt. Nothing is persisted: verification
//! recomputes the derivation for each directory entry and compares. That
//! scan is linear in the guest count, which stays small and bounded for a
//! single event, and it removes the need for a session table entirely.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::error::AuthError;
use super::guest::{Guest, GuestDirectory};

/// An opaque token proving prior possession of a valid invite code.
///
/// The token does not encode the code; without the server salt it can
/// neither be forged for another guest nor reversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token presented by a client, for example from a cookie.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text handed to clients.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues and verifies credentials against the guest directory.
///
/// Pure and stateless apart from the immutable directory reference, so it
/// is freely shareable across request handlers without locking.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    directory: Arc<GuestDirectory>,
    salt: String,
}

impl CredentialIssuer {
    /// Create an issuer bound to a directory and a server salt.
    #[must_use]
    pub fn new(directory: Arc<GuestDirectory>, salt: impl Into<String>) -> Self {
        Self {
            directory,
            salt: salt.into(),
        }
    }

    /// Exchange an invite code for a credential and the matching guest.
    ///
    /// Code matching is case-insensitive; the derivation input is the
    /// case-preserved code from the directory so the presented casing never
    /// changes the resulting token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CodeNotFound`] when no guest matches.
    pub fn issue(&self, code: &str) -> Result<(Credential, &Guest), AuthError> {
        let guest = self
            .directory
            .find_by_code(code)
            .ok_or(AuthError::CodeNotFound)?;
        Ok((self.derive(guest), guest))
    }

    /// Resolve a presented credential back to its guest.
    ///
    /// Recomputes the derivation for every directory entry and returns the
    /// first match. Distinct codes cannot collide without a SHA-256
    /// collision, so "first" is also "only".
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] when no entry matches.
    pub fn verify(&self, credential: &Credential) -> Result<&Guest, AuthError> {
        self.directory
            .guests()
            .iter()
            .find(|guest| self.derive(guest) == *credential)
            .ok_or(AuthError::InvalidCredential)
    }

    fn derive(&self, guest: &Guest) -> Credential {
        let mut hasher = Sha256::new();
        hasher.update(guest.code().as_bytes());
        hasher.update(self.salt.as_bytes());
        Credential(hex::encode(hasher.finalize()))
    }
}
