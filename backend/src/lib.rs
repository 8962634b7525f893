//! Guest-list gated RSVP backend.
//!
//! Guests authenticate with a secret invite code, receive a stateless
//! credential cookie, and submit exactly one structured response which is
//! validated, durably recorded, and confirmed by email.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::{RateLimit, Trace};
