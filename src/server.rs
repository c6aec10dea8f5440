use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::backend::{Backend, HttpBackend};
use crate::config::AppConfig;
use crate::controller::UiController;
use crate::render::{render_app_update, render_live, render_page};
use crate::state::DirectoryKind;
use crate::storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

/// Build the controller from configuration.
pub fn build_controller(config: &AppConfig) -> anyhow::Result<UiController> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config.backend.base_url)?);
    let storage: Arc<dyn SessionStorage> = if config.storage.ephemeral {
        Arc::new(MemorySessionStorage::new())
    } else {
        Arc::new(FileSessionStorage::new(&config.storage.dir))
    };
    Ok(UiController::with_timing(
        backend,
        storage,
        config.notification_timing(),
    ))
}

/// Start the UI server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        "Backend configuration loaded"
    );

    let controller = build_controller(&config)?;
    // The directory fetch runs in the background; serving starts right away.
    let _directory = controller.startup().await;

    let state = AppState {
        controller,
        page: Arc::new(config.page_options()),
    };

    let app = build_router(state).nest_service("/static", ServeDir::new(&config.ui.static_dir));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Routes wiring browser interactions to controller operations.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(|| async { "ok" }))
        .route("/ui/live", get(live_handler))
        .route("/ui/login", post(login_handler))
        .route("/ui/logout", post(logout_handler))
        .route("/ui/chat", post(chat_handler))
        .route("/ui/draft", post(draft_handler))
        .route("/ui/directory/{kind}/{index}", post(directory_handler))
        .route("/ui/examples/open", post(open_examples_handler))
        .route("/ui/examples/close", post(close_examples_handler))
        .route("/ui/examples/{index}", post(choose_example_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    id_number: String,
}

#[derive(Debug, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct LiveQuery {
    /// State version the page is already showing.
    since: Option<u64>,
}

/// Re-render `#app` after an action.
async fn app_fragment(state: &AppState) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render_app_update(&snapshot, &state.page))
}

/// GET / - Full page for the current state.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render_page(&snapshot, &state.page))
}

/// GET /ui/live - Directory, chat log and status as out-of-band swaps.
///
/// Answers 204 when the page already shows the current version, so an idle
/// page keeps its DOM (and the chat log its scroll position).
async fn live_handler(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Response {
    let snapshot = state.controller.snapshot().await;
    if query.since == Some(snapshot.version()) {
        return StatusCode::NO_CONTENT.into_response();
    }
    Html(render_live(&snapshot, &state.page)).into_response()
}

/// POST /ui/login
async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Html<String> {
    state.controller.submit_login(&form.id_number).await;
    app_fragment(&state).await
}

/// POST /ui/logout
async fn logout_handler(State(state): State<AppState>) -> Html<String> {
    state.controller.logout().await;
    app_fragment(&state).await
}

/// POST /ui/chat
async fn chat_handler(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Html<String> {
    state.controller.send_message(&form.message).await;
    app_fragment(&state).await
}

/// POST /ui/draft - Keep the message box in sync while typing.
async fn draft_handler(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> impl IntoResponse {
    state.controller.set_draft(form.message).await;
    StatusCode::NO_CONTENT
}

/// POST /ui/directory/:kind/:index
async fn directory_handler(
    State(state): State<AppState>,
    Path((kind, index)): Path<(DirectoryKind, usize)>,
) -> Html<String> {
    state.controller.select_directory_entry(kind, index).await;
    app_fragment(&state).await
}

async fn open_examples_handler(State(state): State<AppState>) -> Html<String> {
    state.controller.open_examples().await;
    app_fragment(&state).await
}

async fn close_examples_handler(State(state): State<AppState>) -> Html<String> {
    state.controller.close_examples().await;
    app_fragment(&state).await
}

async fn choose_example_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Html<String> {
    state.controller.choose_example(index).await;
    app_fragment(&state).await
}
