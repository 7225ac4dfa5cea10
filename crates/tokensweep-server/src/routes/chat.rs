use axum::extract::State;
use axum::Json;
use gemini_agent::ChatContext;
use serde::{Deserialize, Serialize};
use tokensweep_core::types::RowData;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    /// Newest first.
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub rows: Vec<RowData>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /api/chat: ask the assistant about the current run.
pub async fn chat(
    State(app): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, AppError> {
    let question = body.message.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }
    let context = ChatContext::new(body.logs, body.rows);
    let reply = app.assistant.ask_or_explain(question, &context).await;
    Ok(Json(ChatReply { reply }))
}
