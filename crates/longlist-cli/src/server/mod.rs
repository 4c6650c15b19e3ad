//! HTTP API over a process-wide [`StateStore`].
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/items` | [`routes::list_items`] |
//! | `GET /api/state`, `POST /api/state` | [`routes::read_state`], [`routes::merge_state`] |
//! | `POST /api/selection` | [`routes::set_selection`] |
//! | `POST /api/order/move` | [`routes::move_item`] |
//! | `POST /api/notes` | [`routes::save_note`] |
//! | `GET /api/health` | [`routes::health`] |
//!
//! Projections and reorders run on the blocking pool; they can walk the
//! whole universe. The request body limit is sized so a full custom order
//! fits (see [`ServerConfig::body_limit`]).

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use longlist_core::config::ServerConfig;
use longlist_core::{Projector, StateStore, Universe};
use tokio::net::TcpListener;
use tracing::{info, warn};

use routes::PageLimits;

/// Shared handler state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub projector: Projector,
    pub limits: PageLimits,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let universe = Universe::new(config.universe_size);
        Self {
            store: Arc::new(StateStore::new(universe)),
            projector: Projector::new(universe),
            limits: PageLimits {
                default_limit: config.default_limit,
                max_limit: config.max_limit.max(1),
            },
            body_limit: config.body_limit(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/api/items", get(routes::list_items))
        .route(
            "/api/state",
            get(routes::read_state).post(routes::merge_state),
        )
        .route("/api/selection", post(routes::set_selection))
        .route("/api/order/move", post(routes::move_item))
        .route("/api/notes", post(routes::save_note))
        .route("/api/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// A bound listener that has not started serving yet.
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Bind `config.listen`.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound.
    pub async fn bind(config: &ServerConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&config.listen)
            .await
            .with_context(|| format!("failed to bind {}", config.listen))?;
        Ok(Self {
            listener,
            state: AppState::new(config),
        })
    }

    /// The address actually bound, which differs from the config for port 0.
    ///
    /// # Errors
    ///
    /// Fails if the socket has no local address.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Fails if the accept loop hits an I/O error.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, universe = self.state.store.universe().size(), "serving");
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server stopped with an error")
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(size: u32) -> (Router, Arc<StateStore>) {
        let config = ServerConfig {
            universe_size: size,
            ..ServerConfig::default()
        };
        let state = AppState::new(&config);
        let store = state.store.clone();
        (router(state), store)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn ids(body: &Value) -> Vec<u64> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn items_default_to_first_twenty() {
        let (app, _) = app(1_000);
        let (status, body) = call(&app, get("/api/items")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1_000);
        assert_eq!(ids(&body), (1..=20).collect::<Vec<u64>>());
        assert_eq!(
            body["items"][0],
            json!({"id": 1, "value": "Item 1", "selected": false})
        );
    }

    #[tokio::test]
    async fn items_search_is_case_insensitive() {
        let (app, _) = app(1_000);
        let (_, body) = call(&app, get("/api/items?search=ITEM%2099&limit=5")).await;
        assert_eq!(ids(&body), vec![99, 990, 991, 992, 993]);
        assert_eq!(body["total"], 11);
    }

    #[tokio::test]
    async fn offset_past_the_end_keeps_total() {
        let (app, _) = app(50);
        let (status, body) = call(&app, get("/api/items?offset=500")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"items": [], "total": 50}));
    }

    #[tokio::test]
    async fn malformed_window_is_rejected() {
        let (app, _) = app(50);
        for uri in ["/api/items?offset=abc", "/api/items?limit=-1", "/api/items?limit=1.5"] {
            let (status, body) = call(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "E2001");
        }
    }

    #[tokio::test]
    async fn huge_limit_is_clamped() {
        let (app, _) = app(10_000);
        let (_, body) = call(&app, get("/api/items?limit=100000")).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 500);
    }

    #[tokio::test]
    async fn state_starts_empty() {
        let (app, _) = app(10);
        let (_, body) = call(&app, get("/api/state")).await;
        assert_eq!(
            body,
            json!({"selectedItems": [], "customOrder": null, "version": 0})
        );
    }

    #[tokio::test]
    async fn merge_replaces_only_named_fields() {
        let (app, _) = app(10);
        call(&app, post("/api/state", &json!({"customOrder": [3, 1, 2]}))).await;
        let (status, ack) = call(&app, post("/api/state", &json!({"selectedItems": [5]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({"success": true, "version": 2}));

        let (_, state) = call(&app, get("/api/state")).await;
        assert_eq!(state["selectedItems"], json!([5]));
        assert_eq!(state["customOrder"], json!([3, 1, 2]));

        let (_, page) = call(&app, get("/api/items?limit=3")).await;
        assert_eq!(ids(&page), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn null_order_clears_custom_order() {
        let (app, store) = app(10);
        call(&app, post("/api/state", &json!({"customOrder": [2, 1]}))).await;
        call(&app, post("/api/state", &json!({"customOrder": null}))).await;
        assert!(store.read().state.custom_order.is_none());
    }

    #[tokio::test]
    async fn stale_expected_version_conflicts() {
        let (app, store) = app(10);
        call(&app, post("/api/selection", &json!({"id": 1, "selected": true}))).await;

        let stale = json!({"selectedItems": [], "expectedVersion": 0});
        let (status, body) = call(&app, post("/api/state", &stale)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "E3001");
        assert!(store.read().state.is_selected(longlist_core::ItemId(1)));

        let fresh = json!({"selectedItems": [], "expectedVersion": 1});
        let (status, _) = call(&app, post("/api/state", &fresh)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_patch_is_rejected() {
        let (app, _) = app(10);
        let (status, body) =
            call(&app, post("/api/state", &json!({"selectedItems": "all"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "E2002");
    }

    #[tokio::test]
    async fn full_order_over_default_universe_is_accepted() {
        let (app, store) = app(ServerConfig::default().universe_size);
        let order: Vec<u32> = [3, 1, 2].into_iter().chain(4..=1_000_000).collect();
        let body = json!({ "customOrder": order });
        assert!(body.to_string().len() > 2 * 1024 * 1024);

        let (status, ack) = call(&app, post("/api/state", &body)).await;
        assert_eq!(status, StatusCode::OK, "{ack}");
        assert_eq!(store.read().state.custom_order.map(|o| o.len()), Some(1_000_000));

        let (_, page) = call(&app, get("/api/items?limit=4")).await;
        assert_eq!(ids(&page), vec![3, 1, 2, 4]);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let config = ServerConfig {
            universe_size: 10,
            max_body_bytes: Some(64),
            ..ServerConfig::default()
        };
        let app = router(AppState::new(&config));
        let body = json!({ "selectedItems": vec![1; 100] });

        let (status, reply) = call(&app, post("/api/state", &body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(reply["code"], "E2004");
    }

    #[tokio::test]
    async fn merged_ids_outside_universe_are_dropped() {
        let (app, store) = app(10);
        let patch = json!({
            "selectedItems": [0, 3, 11, 99],
            "itemEdits": {"2": {"note": "kept"}, "40": {"note": "dropped"}},
        });
        let (status, _) = call(&app, post("/api/state", &patch)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, state) = call(&app, get("/api/state")).await;
        assert_eq!(state["selectedItems"], json!([3]));
        assert_eq!(state["itemEdits"], json!({"2": {"note": "kept"}}));
        assert_eq!(store.read().state.selected_items.len(), 1);
    }

    #[tokio::test]
    async fn selection_shows_up_in_items() {
        let (app, _) = app(10);
        let (_, ack) = call(&app, post("/api/selection", &json!({"id": 2, "selected": true}))).await;
        assert_eq!(ack["version"], 1);
        let (_, page) = call(&app, get("/api/items?limit=2")).await;
        assert_eq!(page["items"][1]["selected"], true);
        assert_eq!(page["items"][0]["selected"], false);
    }

    #[tokio::test]
    async fn selecting_outside_universe_is_rejected() {
        let (app, _) = app(10);
        let (status, body) =
            call(&app, post("/api/selection", &json!({"id": 11, "selected": true}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "E2003");
    }

    #[tokio::test]
    async fn move_reorders_and_reports() {
        let (app, _) = app(8);
        let (_, ack) = call(
            &app,
            post("/api/order/move", &json!({"sourceId": 7, "targetId": 2})),
        )
        .await;
        assert_eq!(ack, json!({"success": true, "moved": true, "version": 1}));

        let (_, page) = call(&app, get("/api/items")).await;
        assert_eq!(ids(&page), vec![1, 7, 2, 3, 4, 5, 6, 8]);
    }

    #[tokio::test]
    async fn invalid_drop_is_a_quiet_noop() {
        let (app, store) = app(5);
        let (status, ack) = call(
            &app,
            post("/api/order/move", &json!({"sourceId": 7, "targetId": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["moved"], false);
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn notes_round_trip_through_items() {
        let (app, _) = app(10);
        call(&app, post("/api/notes", &json!({"id": 4, "note": "check"}))).await;
        let (_, page) = call(&app, get("/api/items?search=4")).await;
        assert_eq!(page["items"][0]["note"], "check");
        let (_, state) = call(&app, get("/api/state")).await;
        assert_eq!(state["itemEdits"]["4"]["note"], "check");
    }

    #[tokio::test]
    async fn health_reports_universe_and_version() {
        let (app, _) = app(123);
        let (_, body) = call(&app, get("/api/health")).await;
        assert_eq!(body, json!({"status": "ok", "universe": 123, "version": 0}));
    }
}
