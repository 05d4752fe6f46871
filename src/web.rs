//! Web server for the set counter UI
//!
//! Serves a single HTML page and a JSON endpoint that runs a decklist.
//! Each browser session gets its own run coordinator, so resubmitting while a
//! run is still resolving cancels the older run instead of letting it finish
//! later and overwrite the newer results. A session's coordinator is dropped
//! again once its latest run has finished.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::{Engine, RunReport};
use crate::error::{Error, Result};
use crate::session::{RunCoordinator, RunTicket};

/// Shared application state
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
    sessions: Arc<Mutex<HashMap<String, Arc<RunCoordinator>>>>,
}

impl AppState {
    fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<RunCoordinator>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a ticket that supersedes every earlier run of the session
    fn begin_run(&self, session: &str) -> (Arc<RunCoordinator>, RunTicket) {
        let mut sessions = self.sessions();
        let coordinator = Arc::clone(sessions.entry(session.to_string()).or_default());
        let ticket = coordinator.begin();
        (coordinator, ticket)
    }

    /// Forget the session if no run started after `generation`
    fn finish_run(&self, session: &str, coordinator: &Arc<RunCoordinator>, generation: u64) {
        let mut sessions = self.sessions();
        let is_latest = sessions
            .get(session)
            .is_some_and(|c| Arc::ptr_eq(c, coordinator) && c.current() == generation);
        if is_latest {
            sessions.remove(session);
            log::debug!("Session {} idle, released", session);
        }
    }
}

/// Body of POST /api/count
#[derive(Deserialize)]
struct CountRequest {
    decklist: String,
    #[serde(default = "default_session")]
    session: String,
}

fn default_session() -> String {
    "default".to_string()
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// GET / - Serve the web UI (single HTML page)
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// POST /api/count
async fn count_handler(
    State(state): State<AppState>,
    Json(request): Json<CountRequest>,
) -> (StatusCode, Json<ApiResponse<RunReport>>) {
    let (coordinator, ticket) = state.begin_run(&request.session);
    let generation = ticket.generation();

    let result = state.engine.run_with_ticket(&request.decklist, ticket).await;
    state.finish_run(&request.session, &coordinator, generation);

    match result {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::ok(report))),
        Err(e @ Error::Superseded { .. }) => {
            log::info!("Session {}: {}", request.session, e);
            (StatusCode::CONFLICT, Json(ApiResponse::err(e.to_string())))
        }
        Err(e) => {
            log::error!("Run error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(e.to_string())),
            )
        }
    }
}

/// Build the web server router
pub fn create_router(engine: Arc<Engine>) -> Router {
    routes(AppState::new(engine))
}

fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/count", post(count_handler))
        .with_state(state)
}

/// Start the web server (async)
pub async fn serve(engine: Arc<Engine>, port: u16) -> Result<()> {
    let app = create_router(engine);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Web UI listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{PrintRecord, ResolvedCard};
    use crate::resolver::{InMemoryResolver, LookupError, PrintResolver};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_engine() -> Arc<Engine> {
        let resolver = InMemoryResolver::new()
            .with_card(
                "Brainstorm",
                vec![
                    PrintRecord::new("ice", "Ice Age"),
                    PrintRecord::new("ema", "Eternal Masters"),
                ],
            )
            .with_card("Ponder", vec![PrintRecord::new("csp", "Coldsnap Theme Decks")]);
        Arc::new(Engine::new(Arc::new(resolver), EngineConfig::default()))
    }

    fn count_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/count")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let response = create_router(test_engine())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_count_returns_report() {
        let response = create_router(test_engine())
            .oneshot(count_request(serde_json::json!({
                "decklist": "1 Brainstorm\n1 Forest\n1 Ponder\n1 Unknown Card"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["sets"].as_array().unwrap().len(), 3);
        assert_eq!(data["exclusives"][0]["set_code"], "csp");
        assert_eq!(data["exclusives"][0]["cards"][0]["name"], "Ponder");
        assert_eq!(data["coverage"]["resolved"], 2);
        assert_eq!(data["coverage"]["not_found"], 1);
        assert_eq!(data["lines"][2]["outcome"]["status"], "not_found");
    }

    #[tokio::test]
    async fn test_count_rejects_missing_decklist() {
        let response = create_router(test_engine())
            .oneshot(count_request(serde_json::json!({ "session": "abc" })))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    struct SlowResolver;

    #[async_trait]
    impl PrintResolver for SlowResolver {
        async fn resolve(
            &self,
            card_name: &str,
        ) -> std::result::Result<ResolvedCard, LookupError> {
            let delay = if card_name == "Slow Card" { 300 } else { 0 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(ResolvedCard::new(
                card_name,
                vec![PrintRecord::new("tst", "Test Set")],
            ))
        }
    }

    #[tokio::test]
    async fn test_resubmission_cancels_previous_run_in_same_session() {
        let engine = Arc::new(Engine::new(Arc::new(SlowResolver), EngineConfig::default()));
        let router = create_router(engine);

        let first = tokio::spawn(router.clone().oneshot(count_request(serde_json::json!({
            "decklist": "Slow Card",
            "session": "player-1"
        }))));
        tokio::time::sleep(Duration::from_millis(30)).await;

        let second = router
            .clone()
            .oneshot(count_request(serde_json::json!({
                "decklist": "Fast Card",
                "session": "player-1"
            })))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status(), StatusCode::CONFLICT);
        let json = response_json(first).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("superseded"));
    }

    #[tokio::test]
    async fn test_sessions_do_not_cancel_each_other() {
        let engine = Arc::new(Engine::new(Arc::new(SlowResolver), EngineConfig::default()));
        let router = create_router(engine);

        let first = tokio::spawn(router.clone().oneshot(count_request(serde_json::json!({
            "decklist": "Slow Card",
            "session": "player-1"
        }))));
        tokio::time::sleep(Duration::from_millis(30)).await;

        let second = router
            .clone()
            .oneshot(count_request(serde_json::json!({
                "decklist": "Fast Card",
                "session": "player-2"
            })))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(first.await.unwrap().unwrap().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_finished_sessions_are_released() {
        let state = AppState::new(test_engine());
        let router = routes(state.clone());

        let requests = (0..200).map(|i| {
            router.clone().oneshot(count_request(serde_json::json!({
                "decklist": "1 Brainstorm",
                "session": format!("player-{i}")
            })))
        });
        for response in futures::future::join_all(requests).await {
            assert_eq!(response.unwrap().status(), StatusCode::OK);
        }

        assert!(state.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_session_kept_while_newest_run_is_in_flight() {
        let state = AppState::new(Arc::new(Engine::new(
            Arc::new(SlowResolver),
            EngineConfig::default(),
        )));
        let router = routes(state.clone());

        let first = tokio::spawn(router.clone().oneshot(count_request(serde_json::json!({
            "decklist": "Fast Card",
            "session": "player-1"
        }))));
        let slow = tokio::spawn(router.clone().oneshot(count_request(serde_json::json!({
            "decklist": "Slow Card",
            "session": "player-2"
        }))));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(first.await.unwrap().unwrap().status(), StatusCode::OK);

        // player-2 is still resolving, so its coordinator must survive
        assert_eq!(state.sessions().len(), 1);
        assert!(state.sessions().contains_key("player-2"));

        // A superseded run finishing must not release the newer run's session
        let newer = tokio::spawn(router.clone().oneshot(count_request(serde_json::json!({
            "decklist": "Slow Card",
            "session": "player-2"
        }))));
        assert_eq!(slow.await.unwrap().unwrap().status(), StatusCode::CONFLICT);
        assert!(state.sessions().contains_key("player-2"));

        assert_eq!(newer.await.unwrap().unwrap().status(), StatusCode::OK);
        assert!(state.sessions().is_empty());
    }

    #[test]
    fn test_api_response_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::err("Test error".to_string());

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"Test error\""));
        // data should be omitted when None
        assert!(!json.contains("\"data\""));
    }
}
