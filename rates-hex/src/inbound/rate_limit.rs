//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.
//! Clients are told apart by the first `X-Forwarded-For` entry when the
//! server sits behind a trusted proxy that sets it, otherwise by the peer
//! address. A client talking to the server directly can put anything in
//! `X-Forwarded-For`, so disable trust for deployments without such a proxy.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

const ANONYMOUS: &str = "anonymous";

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    /// Quota for new clients
    quota: Quota,
    period: Duration,
    /// Whether `X-Forwarded-For` identifies the client
    trust_forwarded_for: bool,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let replenish = (period / burst.get()).max(Duration::from_millis(1));
        let quota = Quota::with_period(replenish)
            .map(|q| q.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_minute(burst));

        Self {
            limiters: DashMap::new(),
            quota,
            period,
            trust_forwarded_for: true,
        }
    }

    /// Sets whether the `X-Forwarded-For` header is trusted to identify clients.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)));

        limiter.check().is_ok()
    }
}

fn forwarded_for(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(addr) = forwarded_for(request) {
            return addr;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request, limiter.trust_forwarded_for);
    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "code": StatusCode::TOO_MANY_REQUESTS.as_u16(),
                "retry_after_seconds": limiter.period.as_secs()
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_burst_then_limits() {
        let state = RateLimiterState::new(2, Duration::from_secs(60));
        assert!(state.check("10.0.0.1"));
        assert!(state.check("10.0.0.1"));
        assert!(!state.check("10.0.0.1"));
    }

    #[test]
    fn test_clients_have_separate_quotas() {
        let state = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(state.check("10.0.0.1"));
        assert!(state.check("10.0.0.2"));
        assert!(!state.check("10.0.0.1"));
    }

    #[test]
    fn test_zero_requests_still_allows_one() {
        let state = RateLimiterState::new(0, Duration::from_secs(60));
        assert!(state.check(ANONYMOUS));
        assert!(!state.check(ANONYMOUS));
    }

    #[test]
    fn test_client_key_uses_first_forwarded_address() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request, true), "203.0.113.7");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request, true), ANONYMOUS);
    }

    #[test]
    fn test_client_key_falls_back_to_peer_address() {
        let peer: SocketAddr = "198.51.100.4:51000".parse().unwrap();
        let mut request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(client_key(&request, true), "203.0.113.7");
        assert_eq!(client_key(&request, false), "198.51.100.4");

        request.headers_mut().remove("X-Forwarded-For");
        assert_eq!(client_key(&request, true), "198.51.100.4");
    }
}
