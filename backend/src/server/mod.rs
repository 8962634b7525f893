//! Server assembly: build the service graph from configuration and run
//! the HTTP server.

pub mod config;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, HttpServer, web};
use tracing::{info, warn};

use crate::domain::{
    CredentialIssuer, GuestDirectory, NoopDispatcher, NotificationDispatcher,
};
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::{HttpState, auth, rsvp};
use crate::middleware::{RateLimit, Trace};
use crate::outbound::notify::HttpNotificationDispatcher;
use crate::outbound::persistence::JsonFileRsvpStore;

pub use self::config::{AppConfig, ConfigError};

/// Construct the shared handler state from loaded configuration.
///
/// Any failure here is fatal: the service must not start with a malformed
/// guest list, an unreadable RSVP table, or a broken mail client.
///
/// # Errors
///
/// Returns an [`io::Error`] describing the first dependency that could not
/// be built.
pub fn build_state(config: &AppConfig) -> io::Result<HttpState> {
    let directory = Arc::new(
        GuestDirectory::new(config.guests.clone(), config.menu_choices.clone())
            .map_err(io::Error::other)?,
    );
    let issuer = Arc::new(CredentialIssuer::new(directory.clone(), config.salt.clone()));
    let store = Arc::new(JsonFileRsvpStore::load(&config.data_file).map_err(io::Error::other)?);

    let dispatcher: Arc<dyn NotificationDispatcher> = match &config.mail {
        Some(settings) => Arc::new(
            HttpNotificationDispatcher::new(settings.clone()).map_err(io::Error::other)?,
        ),
        None => {
            warn!("no mail settings configured; confirmations will not be sent");
            Arc::new(NoopDispatcher)
        }
    };

    Ok(HttpState::new(
        directory,
        issuer,
        store,
        dispatcher,
        config.cookie_secure,
    ))
}

/// Assemble the application with all routes and middleware.
///
/// Shared between the real server and integration tests so both exercise
/// the same routing table.
pub fn build_app(
    state: HttpState,
    health_state: web::Data<HealthState>,
    rate_limit: RateLimit,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(health_state)
        .wrap(Trace)
        .service(
            web::resource("/auth")
                .wrap(rate_limit)
                .route(web::post().to(auth::issue))
                .route(web::delete().to(auth::revoke)),
        )
        .service(
            web::resource("/rsvp")
                .route(web::get().to(rsvp::retrieve))
                .route(web::post().to(rsvp::submit)),
        )
        .route("/health/live", web::get().to(health::live))
        .route("/health/ready", web::get().to(health::ready))
}

/// Build the service graph and run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns an [`io::Error`] when startup dependencies fail or the listener
/// cannot bind.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let state = build_state(&config)?;
    let rate_limit = RateLimit::new(
        config.auth_burst,
        Duration::from_secs(config.auth_replenish_secs),
    );

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            server_health_state.clone(),
            rate_limit.clone(),
        )
    })
    .bind(("0.0.0.0", config.server_port))?;

    info!(port = config.server_port, guests = config.guests.len(), "RSVP service listening");
    health_state.mark_ready();
    server.run().await
}
