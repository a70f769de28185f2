//! # HTTP Server
//!
//! Mounts every endpoint pipeline on an axum router. Route params, query
//! string, JSON body and bearer token are collected into an [`ApiRequest`];
//! the pipeline's envelope becomes the response.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use crate::api::{ApiRequest, Envelope};
use crate::auth::JwtManager;
use crate::core::Pipeline;
use crate::handlers::Pipelines;
use crate::store::Store;

type RouteParams = Option<Path<HashMap<String, String>>>;
type RouteQuery = Query<HashMap<String, String>>;
type EndpointFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// HTTP server for the campushub API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store
    pub fn new(config: ServerConfig, store: Arc<dyn Store>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the router with every endpoint
    pub fn build_router(config: &ServerConfig, store: Arc<dyn Store>) -> Router {
        let jwt = Arc::new(JwtManager::new(config.jwt.clone()));
        let pipelines = Pipelines::new(store, jwt);

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v2/list", get(endpoint(pipelines.timeline)))
            .route("/post", post(endpoint(pipelines.create_post)))
            .route("/post/:postId/share", post(endpoint(pipelines.share_post)))
            .route(
                "/community-post",
                post(endpoint(pipelines.create_community_post)),
            )
            .route("/user/:userId", get(endpoint(pipelines.user_profile)));

        for (path, pipeline) in pipelines.engagements {
            router = router.route(&path, post(endpoint(pipeline)));
        }

        router
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "campushub listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("campushub stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(err = %e, "failed to listen for shutdown signal");
    }
}

/// Bearer token from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Axum handler running one pipeline
fn endpoint(
    pipeline: Pipeline,
) -> impl Fn(HeaderMap, RouteParams, RouteQuery, Bytes) -> EndpointFuture + Clone + Send + Sync + 'static
{
    let pipeline = Arc::new(pipeline);
    move |headers: HeaderMap, params: RouteParams, query: RouteQuery, body: Bytes| {
        let pipeline = pipeline.clone();
        Box::pin(async move { dispatch(&pipeline, headers, params, query, body).await })
            as EndpointFuture
    }
}

async fn dispatch(
    pipeline: &Pipeline,
    headers: HeaderMap,
    params: RouteParams,
    Query(query): RouteQuery,
    body: Bytes,
) -> Response {
    let body = match ApiRequest::parse_body(&body) {
        Ok(body) => body,
        Err(error) => {
            tracing::info!(operation = pipeline.operation(), msg = %error.msg, "rejected body");
            return Envelope::validation_error(vec![error]).into_response();
        }
    };

    let mut request = ApiRequest::new().with_body(body);
    request.bearer = bearer_token(&headers);
    if let Some(Path(params)) = params {
        for (key, value) in params {
            request = request.with_param(&key, value);
        }
    }
    for (key, value) in query {
        request = request.with_query(&key, value);
    }

    pipeline.handle(request).await.into_response()
}

async fn health_handler() -> Envelope {
    Envelope::success(StatusCode::OK).with("version", env!("CARGO_PKG_VERSION"))
}

async fn not_found_handler() -> Envelope {
    Envelope::not_found("Not Found: Route")
}
