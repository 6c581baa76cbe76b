//! HTTPS-endpoint style transport: the voice platform POSTs request envelopes
//! and reads the response envelope from the body.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::Result;
use crate::skill::MedTrackSkill;

#[must_use]
pub fn router(skill: MedTrackSkill) -> Router {
    Router::new()
        .route("/", post(handle_request))
        .route("/health", get(health))
        .with_state(skill)
}

async fn handle_request(
    State(skill): State<MedTrackSkill>,
    Json(envelope): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    let request_id = Uuid::now_v7();
    let span = info_span!("skill_request", %request_id, kind = %envelope.request.kind);

    Json(skill.handle(&envelope).instrument(span).await)
}

async fn health() -> &'static str {
    "ok"
}

/// Serve the skill until Ctrl+C.
pub async fn serve(skill: MedTrackSkill, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Skill endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, router(skill))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Skill endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
