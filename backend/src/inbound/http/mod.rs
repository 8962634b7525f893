//! Inbound HTTP adapter.
//!
//! Maps Actix requests onto the domain services and domain errors onto
//! HTTP responses. Handlers stay thin: extraction, one or two domain
//! calls, response shaping.

pub mod auth;
pub mod error;
pub mod health;
pub mod rsvp;
pub mod session;
pub mod state;

pub use self::state::HttpState;
pub use crate::domain::ApiResult;
