//! Ports between the core and its collaborators.
//!
//! In hexagonal terms these are *driven* ports: the core calls them, the
//! adapters in `outbound/` implement them. Handlers depend only on the
//! traits, so tests substitute in-memory doubles instead of wiring files
//! or a mail provider.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{ConflictError, DeliveryError, Error};
use super::guest::Guest;
use super::rsvp::{RsvpRecord, RsvpSubmission};

/// Keyed, durable table of accepted RSVPs, at most one per guest code.
#[async_trait]
pub trait RsvpStore: Send + Sync {
    /// Commit `record` under `code` unless one already exists.
    ///
    /// Check-then-set must be one logical step: of two concurrent calls for
    /// the same code exactly one may succeed, and the record must be
    /// durable before this returns `Ok`.
    ///
    /// # Errors
    ///
    /// [`ConflictError::AlreadyRecorded`] when a record exists,
    /// [`crate::domain::PersistenceError::WriteFailed`] when the durable
    /// write fails (in which case nothing was recorded).
    async fn record_if_absent(&self, code: &str, record: RsvpRecord) -> Result<(), Error>;

    /// Fetch the recorded RSVP for `code`, if any.
    async fn get(&self, code: &str) -> Option<RsvpRecord>;
}

/// Outbound confirmation messaging.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Compose and send the confirmation for an accepted submission.
    ///
    /// Called only after the record is committed; failures are reported but
    /// never roll the record back.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::SendFailed`] when the provider rejects the message
    /// or cannot be reached.
    async fn dispatch(&self, guest: &Guest, submission: &RsvpSubmission)
    -> Result<(), DeliveryError>;
}

/// Volatile [`RsvpStore`] with the same check-then-set semantics as the
/// file-backed adapter, minus durability. Used by handler tests and local
/// development.
#[derive(Debug, Default)]
pub struct InMemoryRsvpStore {
    table: Mutex<HashMap<String, RsvpRecord>>,
}

impl InMemoryRsvpStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RsvpRecord>> {
        self.table
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RsvpStore for InMemoryRsvpStore {
    async fn record_if_absent(&self, code: &str, record: RsvpRecord) -> Result<(), Error> {
        let mut table = self.lock();
        if table.contains_key(code) {
            return Err(ConflictError::AlreadyRecorded.into());
        }
        table.insert(code.to_owned(), record);
        Ok(())
    }

    async fn get(&self, code: &str) -> Option<RsvpRecord> {
        self.lock().get(code).cloned()
    }
}

/// Dispatcher that logs instead of sending. Used when no mail provider is
/// configured and as a default in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDispatcher;

#[async_trait]
impl NotificationDispatcher for NoopDispatcher {
    async fn dispatch(
        &self,
        guest: &Guest,
        submission: &RsvpSubmission,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            code = %guest.code(),
            attending = ?submission.attending,
            "notification dispatch skipped: no mail provider configured"
        );
        Ok(())
    }
}
