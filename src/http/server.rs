//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the matcher subsystems from configuration
//! - Create the Axum router with the public and protected routes
//! - Wire up middleware (request id, tracing, request timeout, bearer auth)
//! - Serve until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{BreakerOpenPolicy, MatcherConfig};
use crate::http::handlers;
use crate::http::middleware::require_bearer;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::matcher::MatcherService;
use crate::resilience::{BreakerPolicy, CircuitBreaker};
use crate::security::JwtGate;
use crate::upstream::{ClientInitError, DriverClient};

pub const HEALTH_PATH: &str = "/health";
pub const SEARCH_ROUTE: &str = "/matcher/api/v1/search";

/// Name of the breaker guarding the driver service.
pub const DRIVER_BREAKER: &str = "driver-service";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub matcher: MatcherService,
    pub gate: Arc<JwtGate>,
    pub breaker_policy: BreakerOpenPolicy,
}

/// HTTP server for the matcher gateway.
pub struct HttpServer {
    router: Router,
    config: MatcherConfig,
}

impl HttpServer {
    /// Create a server wired to the configured upstream.
    ///
    /// The breaker is created here, once per process, and owned by the
    /// driver client.
    pub fn new(config: MatcherConfig) -> Result<Self, ClientInitError> {
        let breaker = Arc::new(CircuitBreaker::new(
            DRIVER_BREAKER,
            BreakerPolicy::from(&config.breaker),
        ));
        let client = DriverClient::new(&config.upstream, breaker)?;
        let matcher = MatcherService::new(Arc::new(client));

        Ok(Self::with_matcher(config, matcher))
    }

    /// Create a server around an existing matcher.
    pub fn with_matcher(config: MatcherConfig, matcher: MatcherService) -> Self {
        let state = AppState {
            matcher,
            gate: Arc::new(JwtGate::new(&config.auth.jwt_secret)),
            breaker_policy: config.http.breaker_open_status,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &MatcherConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route(SEARCH_ROUTE, get(handlers::search_driver))
            .route_layer(from_fn_with_state(state.clone(), require_bearer));

        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )));

        Router::new()
            .route(HEALTH_PATH, get(handlers::health))
            .merge(protected)
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, e.g. for driving it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<S>(self, listener: TcpListener, shutdown: S) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}
