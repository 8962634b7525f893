//! Per-client rate limiting for the authentication endpoint.
//!
//! Invite codes are short secrets, so `/auth` is the one surface worth
//! brute-forcing. A small token bucket per client address absorbs honest
//! retries and throttles guessing. State is in-memory and per-process,
//! which is all a single-instance service needs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::warn;

/// Stop tracking a client after this much inactivity.
const IDLE_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Prune the bucket map when it grows past this many clients.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refreshed: Instant,
}

#[derive(Debug)]
struct Limiter {
    burst: f64,
    replenish_interval: Duration,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl Limiter {
    /// Take one token for `key`, refilling first. Returns whether the
    /// request may proceed.
    fn try_acquire(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if buckets.len() > PRUNE_THRESHOLD {
            buckets.retain(|_, bucket| now.duration_since(bucket.refreshed) < IDLE_EXPIRY);
        }

        let bucket = buckets.entry(key.to_owned()).or_insert(Bucket {
            tokens: self.burst,
            refreshed: now,
        });

        let elapsed = now.duration_since(bucket.refreshed);
        let refill = elapsed.as_secs_f64() / self.replenish_interval.as_secs_f64();
        bucket.tokens = (bucket.tokens + refill).min(self.burst);
        bucket.refreshed = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token-bucket rate limiting middleware.
///
/// Allows `burst` immediate requests per client, then one more per
/// `replenish_interval`. Clients are identified by the forwarded address
/// when a proxy supplies one, else the peer address.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<Limiter>,
}

impl RateLimit {
    /// Create a limiter shared by all server workers.
    #[must_use]
    pub fn new(burst: u32, replenish_interval: Duration) -> Self {
        Self {
            limiter: Arc::new(Limiter {
                burst: f64::from(burst),
                replenish_interval,
                buckets: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<Limiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned();

        if self.limiter.try_acquire(&key, Instant::now()) {
            let fut = self.service.call(req);
            Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
        } else {
            warn!(client = %key, "rate limit exceeded");
            let response = HttpResponse::TooManyRequests()
                .json(json!({
                    "code": "rate_limited",
                    "message": "too many attempts, slow down",
                }))
                .map_into_right_body();
            let (req, _payload) = req.into_parts();
            Box::pin(ready(Ok(ServiceResponse::new(req, response))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use std::net::SocketAddr;

    fn limited_app(
        burst: u32,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse,
                Error = Error,
                InitError = (),
            >,
    > {
        App::new().service(
            web::resource("/auth")
                .wrap(RateLimit::new(burst, Duration::from_secs(60)))
                .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
        )
    }

    fn peer(addr: &str) -> SocketAddr {
        addr.parse().expect("valid socket address")
    }

    #[actix_web::test]
    async fn burst_is_allowed_then_throttled() {
        let app = test::init_service(limited_app(2)).await;
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/auth")
                .peer_addr(peer("10.0.0.1:9999"))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
        }
        let req = test::TestRequest::post()
            .uri("/auth")
            .peer_addr(peer("10.0.0.1:9999"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn clients_are_limited_independently() {
        let app = test::init_service(limited_app(1)).await;
        let first = test::TestRequest::post()
            .uri("/auth")
            .peer_addr(peer("10.0.0.1:9999"))
            .to_request();
        assert_eq!(
            test::call_service(&app, first).await.status(),
            StatusCode::OK
        );
        let throttled = test::TestRequest::post()
            .uri("/auth")
            .peer_addr(peer("10.0.0.1:9999"))
            .to_request();
        assert_eq!(
            test::call_service(&app, throttled).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        let other_client = test::TestRequest::post()
            .uri("/auth")
            .peer_addr(peer("10.0.0.2:9999"))
            .to_request();
        assert_eq!(
            test::call_service(&app, other_client).await.status(),
            StatusCode::OK
        );
    }

    #[::core::prelude::v1::test]
    fn tokens_replenish_over_time() {
        let limiter = Limiter {
            burst: 1.0,
            replenish_interval: Duration::from_secs(5),
            buckets: Mutex::new(HashMap::new()),
        };
        let start = Instant::now();
        assert!(limiter.try_acquire("client", start));
        assert!(!limiter.try_acquire("client", start));
        assert!(limiter.try_acquire("client", start + Duration::from_secs(5)));
    }
}
