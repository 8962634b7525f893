//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data`. Ports are
//! held as trait objects so handler tests can substitute in-memory doubles
//! without touching the filesystem or a mail provider.

use std::sync::Arc;

use crate::domain::{CredentialIssuer, GuestDirectory, NotificationDispatcher, RsvpStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The loaded-once guest directory.
    pub directory: Arc<GuestDirectory>,
    /// Credential issuance and verification.
    pub issuer: Arc<CredentialIssuer>,
    /// Durable RSVP table.
    pub store: Arc<dyn RsvpStore>,
    /// Outbound confirmation messaging.
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    /// Whether issued cookies carry the `Secure` attribute. Disable only
    /// for plain-HTTP local development.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Bundle the core services for injection into handlers.
    #[must_use]
    pub fn new(
        directory: Arc<GuestDirectory>,
        issuer: Arc<CredentialIssuer>,
        store: Arc<dyn RsvpStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            directory,
            issuer,
            store,
            dispatcher,
            cookie_secure,
        }
    }
}
