//! RSVP submission and retrieval handlers.
//!
//! ```text
//! GET  /rsvp    the recorded answer, or bare identity if none yet
//! POST /rsvp    submit the one-and-only answer
//! ```

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{
    ApiResult, ConflictError, RsvpRecord, RsvpSubmission,
    validate,
};
use crate::inbound::http::auth::IdentityResponse;
use crate::inbound::http::session::PresentedCredential;
use crate::inbound::http::state::HttpState;

/// Outcome of the post-commit notification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The confirmation was handed to the provider.
    Sent,
    /// The provider could not be reached or rejected the message. The RSVP
    /// itself is recorded.
    Failed,
    /// No contact email was supplied, so nothing was sent.
    Skipped,
}

/// Success body for `POST /rsvp`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Always `"recorded"`; the submission is durable by the time the
    /// client sees this.
    pub status: &'static str,
    /// What happened to the confirmation message.
    pub notification: NotificationStatus,
}

/// Return the guest's recorded submission, or their identity if they have
/// not answered yet.
pub async fn retrieve(
    state: web::Data<HttpState>,
    presented: PresentedCredential,
) -> ApiResult<HttpResponse> {
    let credential = presented.require()?;
    let guest = state.issuer.verify(credential)?;
    match state.store.get(guest.code()).await {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::Ok().json(IdentityResponse::for_guest(guest))),
    }
}

/// Validate and commit a submission, then trigger the confirmation.
///
/// An already-recorded guest is told so before validation runs; that is a
/// clearer answer than any rule failure. Delivery failures never roll back
/// the committed record; they are reported in the success body instead.
pub async fn submit(
    state: web::Data<HttpState>,
    presented: PresentedCredential,
    payload: web::Json<RsvpSubmission>,
) -> ApiResult<HttpResponse> {
    let credential = presented.require()?;
    let guest = state.issuer.verify(credential)?;

    if state.store.get(guest.code()).await.is_some() {
        return Err(ConflictError::AlreadyRecorded.into());
    }

    let submission = payload.into_inner();
    validate(guest, state.directory.menu(), &submission)?;

    let record = RsvpRecord::accepted(guest, submission.clone());
    state.store.record_if_absent(guest.code(), record).await?;
    info!(code = %guest.code(), attending = ?submission.attending, "RSVP recorded");

    let notification = if submission.contact_email().is_some() {
        match state.dispatcher.dispatch(guest, &submission).await {
            Ok(()) => NotificationStatus::Sent,
            Err(error) => {
                warn!(code = %guest.code(), %error, "confirmation delivery failed; record stands");
                NotificationStatus::Failed
            }
        }
    } else {
        NotificationStatus::Skipped
    };

    Ok(HttpResponse::Ok().json(SubmissionResponse {
        status: "recorded",
        notification,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{
        CredentialIssuer, DeliveryError, Guest, GuestDirectory, InMemoryRsvpStore, MenuVocabulary,
        NotificationDispatcher, RsvpStore,
    };
    use crate::inbound::http::auth;
    use crate::inbound::http::session::CREDENTIAL_COOKIE;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    /// Dispatcher double that always fails, for the delivery-failure path.
    struct FailingDispatcher;

    #[async_trait]
    impl NotificationDispatcher for FailingDispatcher {
        async fn dispatch(
            &self,
            _guest: &Guest,
            _submission: &RsvpSubmission,
        ) -> Result<(), DeliveryError> {
            Err(DeliveryError::SendFailed {
                message: "provider unreachable".into(),
            })
        }
    }

    fn fixture_state(dispatcher: Arc<dyn NotificationDispatcher>) -> HttpState {
        let directory = Arc::new(
            GuestDirectory::new(
                vec![
                    Guest::new("SOLO11", vec!["Alex".into()], true),
                    Guest::new("PAIR22", vec!["Sam".into(), "Jo".into()], true),
                    Guest::new("EVE456", vec!["Robin".into()], false),
                ],
                MenuVocabulary::new(
                    vec!["Soup".into(), "Salad".into()],
                    vec!["Beef".into(), "Risotto".into()],
                ),
            )
            .expect("fixture directory is valid"),
        );
        let issuer = Arc::new(CredentialIssuer::new(directory.clone(), "test-salt"));
        HttpState::new(
            directory,
            issuer,
            Arc::new(InMemoryRsvpStore::new()),
            dispatcher,
            false,
        )
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
                actix_web::dev::ServiceRequest,
                Config = (),
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
                InitError = (),
            >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/auth").route(web::post().to(auth::issue)))
            .service(
                web::resource("/rsvp")
                    .route(web::get().to(retrieve))
                    .route(web::post().to(submit)),
            )
    }

    async fn credential_for(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        code: &str,
    ) -> Cookie<'static> {
        let req = test::TestRequest::post()
            .uri("/auth")
            .set_json(json!({ "code": code }))
            .to_request();
        let res = test::call_service(app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        res.response()
            .cookies()
            .find(|c| c.name() == CREDENTIAL_COOKIE)
            .expect("credential cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn submit_requires_a_credential() {
        let app = test::init_service(test_app(fixture_state(Arc::new(
            crate::domain::NoopDispatcher,
        ))))
        .await;
        let req = test::TestRequest::post()
            .uri("/rsvp")
            .set_json(json!({ "attending": true }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_credential_is_unauthorised() {
        let app = test::init_service(test_app(fixture_state(Arc::new(
            crate::domain::NoopDispatcher,
        ))))
        .await;
        let req = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(Cookie::new(CREDENTIAL_COOKIE, "forged"))
            .set_json(json!({ "attending": true }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("invalid_credential")
        );
    }

    #[actix_web::test]
    async fn solo_day_guest_submits_successfully() {
        let app = test::init_service(test_app(fixture_state(Arc::new(
            crate::domain::NoopDispatcher,
        ))))
        .await;
        let cookie = credential_for(&app, "SOLO11").await;
        let req = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(cookie.clone())
            .set_json(json!({
                "attending": true,
                "guests": [{ "name": "Alex", "attending": true, "starter": "Soup", "main": "Beef" }],
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("status"), Some(&json!("recorded")));
        assert_eq!(body.get("notification"), Some(&json!("skipped")));

        // The answer now comes back on retrieval.
        let req = test::TestRequest::get()
            .uri("/rsvp")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("attending"), Some(&json!(true)));
        assert_eq!(body.get("names"), Some(&json!(["Alex"])));
    }

    #[actix_web::test]
    async fn validation_failures_name_the_rule() {
        let app = test::init_service(test_app(fixture_state(Arc::new(
            crate::domain::NoopDispatcher,
        ))))
        .await;
        let cookie = credential_for(&app, "EVE456").await;
        let req = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(cookie)
            .set_json(json!({
                "attending": true,
                "guests": [{ "name": "Robin", "attending": true }],
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("menu_not_allowed_for_guest_type")
        );
    }

    #[actix_web::test]
    async fn resubmission_conflicts_and_preserves_the_record() {
        let state = fixture_state(Arc::new(crate::domain::NoopDispatcher));
        let store = state.store.clone();
        let app = test::init_service(test_app(state)).await;
        let cookie = credential_for(&app, "EVE456").await;

        let first = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(cookie.clone())
            .set_json(json!({ "attending": false, "message": "first answer" }))
            .to_request();
        let res = test::call_service(&app, first).await;
        assert_eq!(res.status(), StatusCode::OK);

        let second = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(cookie)
            .set_json(json!({ "attending": false, "message": "second answer" }))
            .to_request();
        let res = test::call_service(&app, second).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("already_recorded")
        );

        let record = store.get("EVE456").await.expect("record still present");
        assert_eq!(record.submission.message.as_deref(), Some("first answer"));
    }

    #[actix_web::test]
    async fn delivery_failure_reports_warning_but_keeps_record() {
        let state = fixture_state(Arc::new(FailingDispatcher));
        let store = state.store.clone();
        let app = test::init_service(test_app(state)).await;
        let cookie = credential_for(&app, "EVE456").await;

        let req = test::TestRequest::post()
            .uri("/rsvp")
            .cookie(cookie)
            .set_json(json!({ "attending": true, "email": "robin@example.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("status"), Some(&json!("recorded")));
        assert_eq!(body.get("notification"), Some(&json!("failed")));
        assert!(store.get("EVE456").await.is_some());
    }
}
