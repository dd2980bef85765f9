//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve plain or TLS with graceful shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{MatchedPath, Request};
use axum::http;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::gateway::Gateway;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;

/// Grace period for in-flight requests on TLS shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP server for the gate API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &GateConfig, gateway: Arc<Gateway>) -> Self {
        let state = AppState { gateway };
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router }
    }

    /// The fully layered router, for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run<S>(self, listener: TcpListener, shutdown: S) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS.
    pub async fn run_tls<S>(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: S,
    ) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown.await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1/transaction/push", post(handlers::push_transaction))
        .route("/api/v1/estimate/tx-commission", get(handlers::estimate_tx_commission))
        .route("/api/v1/estimate/coin-buy", get(handlers::estimate_coin_buy))
        .route("/api/v1/estimate/coin-sell", get(handlers::estimate_coin_sell))
        .route("/api/v1/nonce/{address}", get(handlers::get_nonce))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &http::Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(propagate_request_id_layer()),
        )
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::MockNodeApi;
    use crate::confirmation::NotificationBus;
    use crate::http::request::X_REQUEST_ID;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(api: MockNodeApi) -> Router {
        let mut config = GateConfig::default();
        config.node.link = "127.0.0.1".to_string();
        config.node.single_node = true;
        let gateway = Gateway::from_config(
            &config,
            Arc::new(api),
            None,
            Arc::new(NotificationBus::new()),
        )
        .unwrap();
        HttpServer::new(&config, Arc::new(gateway)).router()
    }

    async fn call(router: Router, request: http::Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> http::Request<Body> {
        http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn push_request(body: &str) -> http::Request<Body> {
        http::Request::builder()
            .method("POST")
            .uri("/api/v1/transaction/push")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index() {
        let (status, body) = call(router(MockNodeApi::new()), get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "Minter Explorer Gate API", "version": "1.0"}));
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let response = router(MockNodeApi::new()).oneshot(get_request("/")).await.unwrap();
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let request = http::Request::builder()
            .uri("/")
            .header("x-request-id", "client-id")
            .body(Body::empty())
            .unwrap();
        let response = router(MockNodeApi::new()).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "client-id");
    }

    #[tokio::test]
    async fn test_push_success() {
        let api = MockNodeApi::new().reply(8841, r#"{"result":{"code":0,"log":"","hash":"ABCDEF"}}"#);
        let (status, body) = call(router(api), push_request(r#"{"transaction":"f8a0"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"hash": "Mtabcdef"}}));
    }

    #[tokio::test]
    async fn test_push_without_content_type() {
        let api = MockNodeApi::new().reply(8841, r#"{"result":{"code":0,"log":"","hash":"ABCDEF"}}"#);
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/v1/transaction/push")
            .body(Body::from(r#"{"transaction":"f8a0"}"#))
            .unwrap();
        let (status, body) = call(router(api), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"hash": "Mtabcdef"}}));
    }

    #[tokio::test]
    async fn test_push_invalid_body() {
        let (status, body) = call(router(MockNodeApi::new()), push_request("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) =
            call(router(MockNodeApi::new()), push_request(r#"{"transaction":" "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "transaction is required"}));
    }

    #[tokio::test]
    async fn test_push_node_unreachable() {
        let (status, body) =
            call(router(MockNodeApi::new()), push_request(r#"{"transaction":"f8a0"}"#)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], -1);
    }

    #[tokio::test]
    async fn test_commission() {
        let api = MockNodeApi::new().reply(8841, r#"{"result":{"commission":"10000"}}"#);
        let (status, body) =
            call(router(api), get_request("/api/v1/estimate/tx-commission?transaction=f8a0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"commission": "10000"}}));
    }

    #[tokio::test]
    async fn test_coin_buy_and_sell() {
        let api = MockNodeApi::new()
            .reply(8841, r#"{"result":{"commission":"1","will_pay":"250","will_get":"120"}}"#);
        let router = router(api);

        let (status, body) = call(
            router.clone(),
            get_request("/api/v1/estimate/coin-buy?coinToSell=BIP&coinToBuy=MNT&value=100"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"commission": "1", "will_pay": "250"}}));

        let (status, body) = call(
            router,
            get_request("/api/v1/estimate/coin-sell?coinToSell=BIP&coinToBuy=MNT&value=100"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"commission": "1", "will_get": "120"}}));
    }

    #[tokio::test]
    async fn test_coin_query_validation() {
        let (status, _) = call(
            router(MockNodeApi::new()),
            get_request("/api/v1/estimate/coin-buy?coinToSell=BIP"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            router(MockNodeApi::new()),
            get_request("/api/v1/estimate/coin-sell?coinToSell=BIP&coinToBuy=&value=1"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "coinToBuy is required"}));
    }

    #[tokio::test]
    async fn test_nonce_and_node_error() {
        let api = MockNodeApi::new().reply(8841, r#"{"result":{"transaction_count":"12"}}"#);
        let (status, body) = call(router(api), get_request("/api/v1/nonce/Mx00")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"nonce": "12"}}));

        let api = MockNodeApi::new()
            .reply(8841, r#"{"error":{"code":404,"message":"Address not found"}}"#);
        let (status, body) = call(router(api), get_request("/api/v1/nonce/Mx00")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": {"code": 404, "log": "Address not found"}}));
    }
}
