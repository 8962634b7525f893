//! Credential cookie plumbing.
//!
//! The credential issued at authentication is carried in a long-lived
//! cookie. The cookie is the whole session: there is no server-side state,
//! so "logging out" is nothing more than telling the client to discard it.
//! Handlers extract [`PresentedCredential`] instead of touching the request
//! directly.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{ApiResult, AuthError, Credential};

/// Name of the credential cookie.
pub const CREDENTIAL_COOKIE: &str = "rsvp_credential";

/// Credential lifetime. Invitations go out well before the event, so the
/// cookie must survive months of inactivity.
const CREDENTIAL_TTL: Duration = Duration::days(365);

/// Build the cookie that hands a freshly issued credential to the client.
///
/// `HttpOnly` keeps the token out of reach of page scripts; `secure`
/// should only be disabled for plain-HTTP local development.
#[must_use]
pub fn credential_cookie(credential: &Credential, secure: bool) -> Cookie<'static> {
    Cookie::build(CREDENTIAL_COOKIE, credential.as_str().to_owned())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CREDENTIAL_TTL)
        .finish()
}

/// Build the cookie that revokes the client's credential by expiring it.
/// There is no server-side state to clear.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(CREDENTIAL_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

/// The credential a request presented, if any.
///
/// Extraction itself never fails; handlers that require authentication call
/// [`PresentedCredential::require`].
#[derive(Debug, Clone)]
pub struct PresentedCredential(Option<Credential>);

impl PresentedCredential {
    /// The presented credential, or `InvalidCredential` when the cookie is
    /// missing. A missing token and an unrecognised one get the same
    /// response so probing reveals nothing.
    pub fn require(&self) -> ApiResult<&Credential> {
        self.0
            .as_ref()
            .ok_or_else(|| AuthError::InvalidCredential.into())
    }
}

impl FromRequest for PresentedCredential {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credential = req
            .cookie(CREDENTIAL_COOKIE)
            .map(|cookie| Credential::from_token(cookie.value()));
        ready(Ok(Self(credential)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn issued_cookie_is_long_lived_and_script_proof() {
        let credential = Credential::from_token("deadbeef");
        let cookie = credential_cookie(&credential, true);
        assert_eq!(cookie.name(), CREDENTIAL_COOKIE);
        assert_eq!(cookie.value(), "deadbeef");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(CREDENTIAL_TTL));
    }

    #[::core::prelude::v1::test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.name(), CREDENTIAL_COOKIE);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[actix_web::test]
    async fn extractor_reads_the_cookie() {
        let app = test::init_service(App::new().route(
            "/",
            web::get().to(|presented: PresentedCredential| async move {
                match presented.require() {
                    Ok(credential) => HttpResponse::Ok().body(credential.as_str().to_owned()),
                    Err(_) => HttpResponse::Unauthorized().finish(),
                }
            }),
        ))
        .await;

        let bare = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, bare).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let with_cookie = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(CREDENTIAL_COOKIE, "deadbeef"))
            .to_request();
        let res = test::call_service(&app, with_cookie).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "deadbeef");
    }
}
