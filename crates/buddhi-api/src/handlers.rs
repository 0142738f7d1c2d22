//! Route handler implementations.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use buddhi_dispatch::Resolution;
use buddhi_store::AnswerStore;

use crate::error::ApiError;
use crate::extract::QuestionSubmission;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to Buddhimatta - Assignment Answer API";

pub const FEEDBACK_MESSAGE: &str =
    "Thank you for your feedback! This will help improve the system.";

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub known_answers: usize,
}

/// Request body for POST /feedback.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub correct_answer: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - welcome payload.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        known_answers: state.store.len(),
    })
}

/// POST / and POST /api/ - answer a question, with an optional upload.
///
/// A rule failure is reported either as HTTP 400 or as the answer text,
/// depending on `dispatch.errors_as_answers`.
pub async fn ask(
    State(state): State<AppState>,
    submission: QuestionSubmission,
) -> Result<Json<AnswerResponse>, ApiError> {
    let QuestionSubmission { question, upload } = submission;

    let resolution = state.dispatcher.resolve(&question, upload.as_ref()).await;
    tracing::debug!(rule = ?resolution.rule(), "Question resolved");

    if let Resolution::Failed { message, .. } = &resolution {
        if !state.config.dispatch.errors_as_answers {
            return Err(ApiError::BadRequest(message.clone()));
        }
    }

    if state.config.dispatch.learn {
        if let Some(answer) = resolution.learnable_answer() {
            learn_in_background(Arc::clone(&state.store), question, answer.to_string());
        }
    }

    Ok(Json(AnswerResponse {
        answer: resolution.text().to_string(),
    }))
}

/// POST /feedback and POST /api/feedback - record a corrected answer.
pub async fn feedback(
    State(state): State<AppState>,
    Json(body): Json<FeedbackRequest>,
) -> Json<MessageResponse> {
    tracing::info!("Feedback received");
    state.store.upsert(body.question, body.correct_answer).await;
    Json(MessageResponse {
        message: FEEDBACK_MESSAGE.to_string(),
    })
}

/// Write a freshly computed answer back into the store without holding up
/// the response. Persistence failures are logged by the store.
fn learn_in_background(store: Arc<AnswerStore>, question: String, answer: String) {
    tokio::spawn(async move {
        store.upsert(question, answer).await;
        tracing::debug!("Learned answer stored");
    });
}
