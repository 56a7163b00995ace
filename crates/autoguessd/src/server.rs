//! HTTP server for autoguessd

use anyhow::{Context, Result};
use autoguess_common::config::ServerConfig;
use autoguess_common::Config;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::RoundEngine;
use crate::judge::OllamaJudge;
use crate::routes;
use crate::store::RoundStore;
use crate::suggest::BilibiliSuggestions;

/// Application state shared across handlers
pub struct AppState {
    pub engine: RoundEngine,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: RoundEngine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }

    /// Wire the real suggestion source and judge from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let suggestions = BilibiliSuggestions::new(&config.suggest.endpoint, config.suggest_timeout())
            .context("Failed to build suggestion client")?;
        let judge = OllamaJudge::new(
            &config.judge.endpoint,
            &config.judge.model,
            config.judge_timeout(),
        )
        .context("Failed to build judge client")?;
        let store = Arc::new(RoundStore::with_ttl(config.round_ttl()));

        info!("  Suggestion source: {}", suggestions.endpoint());
        info!("  Judge model: {} at {}", judge.model(), config.judge.endpoint);

        let engine = RoundEngine::new(
            store,
            Arc::new(suggestions),
            Arc::new(judge),
            config.rounds.default_maximum_strikes,
        )
        .with_judge_timeout(config.judge_timeout());

        Ok(Self::new(engine))
    }
}

/// Build the full router with tracing, timeout and CORS layers.
///
/// Guesses skip the request timeout: one queued behind a slow judge call on
/// the same round must still get its verdict, and every judge call is capped
/// inside the engine.
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let timed = Router::new()
        .merge(routes::start_routes())
        .merge(routes::health_routes())
        .layer(TimeoutLayer::new(config.request_timeout()));

    let app = Router::new()
        .merge(timed)
        .merge(routes::guess_routes())
        .with_state(state);

    let app = if config.cors_allow_any_origin {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(state: AppState, config: &Config) -> Result<()> {
    let state = Arc::new(state);

    let _sweeper = Arc::clone(state.engine.store()).spawn_sweeper(config.sweep_interval());

    let app = router(state, &config.server);

    let addr = &config.server.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down gracefully");
        })
        .await?;
    Ok(())
}
