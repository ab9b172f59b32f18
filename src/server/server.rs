use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use crate::catalog::TrackRecord;
use tower_http::services::ServeDir;

use axum::{
    body::Bytes,
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::{http_cache, log_requests, metrics, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub tracks_count: usize,
}

#[derive(Serialize)]
struct SongsResponse<'a> {
    songs: Vec<&'a str>,
}

#[derive(Serialize)]
struct RecommendationsResponse<'a> {
    recommendations: Vec<&'a TrackRecord>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Reads a string field from a JSON request body.
///
/// Bodies are accepted whatever their content type. A missing, null or non
/// string field, as well as a body that is not JSON at all, reads as "".
fn body_string_field(body: &[u8], field: &str) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get(field).and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_default()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        tracks_count: state.recommender.catalog().len(),
    };
    Json(stats)
}

async fn get_songs(State(recommender): State<GuardedRecommender>) -> Response {
    let songs = recommender.catalog().names().collect();
    Json(SongsResponse { songs }).into_response()
}

async fn post_recommend(State(recommender): State<GuardedRecommender>, body: Bytes) -> Response {
    let song = body_string_field(&body, "song");
    let recommendations = recommender.rank_by_similarity(&song);
    metrics::record_recommendation("similar", recommendations.len());
    Json(RecommendationsResponse { recommendations }).into_response()
}

async fn post_recommend_by_mood(
    State(recommender): State<GuardedRecommender>,
    body: Bytes,
) -> Response {
    let mood = body_string_field(&body, "mood");
    let recommendations = recommender.recommend_by_mood(mood.trim());
    metrics::record_recommendation("mood", recommendations.len());
    Json(RecommendationsResponse { recommendations }).into_response()
}

pub fn make_app(config: ServerConfig, recommender: GuardedRecommender) -> Router {
    let state = ServerState::new(config.clone(), recommender);

    let songs_routes: Router = Router::new()
        .route("/songs", get(get_songs))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let recommend_routes: Router = Router::new()
        .route("/recommend", post(post_recommend))
        .route("/recommend_by_mood", post(post_recommend_by_mood))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .merge(songs_routes)
        .merge(recommend_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

async fn run_metrics_server(port: u16) -> Result<()> {
    let app = Router::new().route("/metrics", get(metrics::metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", port))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_server(config: ServerConfig, recommender: GuardedRecommender) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, recommender);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    tokio::spawn(async move {
        if let Err(err) = run_metrics_server(metrics_port).await {
            error!("Metrics server stopped: {:#}", err);
        }
    });

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
