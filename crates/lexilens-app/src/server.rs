use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lexilens_config::Config;
use lexilens_core::fetch_definition;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::{self, AppState};

#[derive(Deserialize)]
pub struct LookupParams {
    word: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// GET /lookup?word=<term>
///
/// Stateless: quota and history belong to the client.
async fn lookup(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("Rejected query string: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, "Missing word");
        }
    };

    let Some(word) = params.word.filter(|w| !w.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing word");
    };

    match fetch_definition(state.backend.as_ref(), &word).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!("Definition backend error for {word:?}: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch definition")
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lookup", get(lookup))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    {
        let config = state.config.read().await;
        state::warn_if_no_api_key(&config, state.backend.as_ref());
    }
    let addr = {
        let config = state.config.read().await;
        config.server.bind_addr()
    };

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("LexiLens listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
        })
        .await?;

    Ok(())
}
