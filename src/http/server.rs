//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the call-server and health handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Bind server to listener
//! - Serve until the shutdown signal, then drain

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::call_server::{self, CALL_SERVER_PATH};
use crate::http::health::health;
use crate::http::request::{request_id_header, RequestIdExt, UuidRequestId};
use crate::lifecycle::ShutdownSignal;
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server for the call-server proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails when the upstream client cannot be built from the config.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        let state = AppState {
            upstream: Arc::new(upstream),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let request_id = request_id_header();

        Router::new()
            .route(
                CALL_SERVER_PATH,
                get(call_server::handle_get)
                    .post(call_server::handle_post)
                    .put(call_server::handle_put)
                    .delete(call_server::handle_delete),
            )
            .route("/health", get(health))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request.headers().request_id(),
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::new(request_id)),
            )
    }

    /// The fully layered router, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
