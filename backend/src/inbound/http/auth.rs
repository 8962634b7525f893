//! Credential issuance and revocation handlers.
//!
//! ```text
//! POST   /auth {"code":"ABC123"}   issue a credential cookie
//! DELETE /auth                     expire the credential cookie
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ApiResult, Guest};
use crate::inbound::http::session::{credential_cookie, removal_cookie};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /auth`.
#[derive(Debug, Deserialize, Serialize)]
pub struct AuthRequest {
    /// The secret invite code from the invitation.
    pub code: String,
}

/// Identity details returned to a guest who has not yet responded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    /// Display names on the invitation.
    pub names: Vec<String>,
    /// Whether the party is invited to the meal service.
    pub day: bool,
}

impl IdentityResponse {
    /// Project a guest's public identity.
    #[must_use]
    pub fn for_guest(guest: &Guest) -> Self {
        Self {
            names: guest.names().to_vec(),
            day: guest.is_day_guest(),
        }
    }
}

/// Exchange an invite code for a credential cookie.
///
/// The body is the guest's identity, or the previously recorded RSVP when
/// one exists, so returning visitors land straight on their answer.
pub async fn issue(
    state: web::Data<HttpState>,
    payload: web::Json<AuthRequest>,
) -> ApiResult<HttpResponse> {
    let (credential, guest) = state.issuer.issue(&payload.code)?;
    info!(code = %guest.code(), "credential issued");

    let cookie = credential_cookie(&credential, state.cookie_secure);
    let mut response = HttpResponse::Ok();
    response.cookie(cookie);

    match state.store.get(guest.code()).await {
        Some(record) => Ok(response.json(record)),
        None => Ok(response.json(IdentityResponse::for_guest(guest))),
    }
}

/// Revoke the client's credential.
///
/// Credentials are stateless, so revocation is purely instructing the
/// client to discard its cookie. Always succeeds.
pub async fn revoke() -> HttpResponse {
    HttpResponse::NoContent().cookie(removal_cookie()).finish()
}
