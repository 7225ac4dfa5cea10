use tokensweep_core::config::ChatConfig;

use crate::context::ChatContext;
use crate::error::ChatError;
use crate::types::{
    ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::Result;

pub const UNAVAILABLE_PREFIX: &str = "AI Chat functionality is currently unavailable. ";
pub const CONTACT_ERROR_PREFIX: &str = "An error occurred while contacting the AI. ";

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// Thin `generateContent` client for one Vertex AI model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    project: String,
    location: String,
    model: String,
    access_token: Option<String>,
    generation: GenerationConfig,
}

impl GeminiClient {
    /// Fails with [`ChatError::NotConfigured`] when project or location is
    /// missing.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let (Some(project), Some(location)) = (config.project.clone(), config.location.clone())
        else {
            return Err(ChatError::NotConfigured);
        };
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{location}-aiplatform.googleapis.com"));
        let http = reqwest::Client::builder()
            .build()
            .map_err(ChatError::Client)?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project,
            location,
            model: config.model.clone(),
            access_token: config.access_token.clone(),
            generation: GenerationConfig::default(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.endpoint, self.project, self.location, self.model
        )
    }

    /// Ask `question` against `context` and return the reply text. Vertex AI
    /// rejects requests without a bearer token, so an unset `access_token`
    /// surfaces as a 401 [`ChatError::Api`].
    pub async fn ask(&self, question: &str, context: &ChatContext) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![context.to_content(question)],
            generation_config: self.generation,
        };

        tracing::info!(model = %self.model, "sending chat request");
        let mut request = self.http.post(self.url()).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(ChatError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let envelope: ApiErrorEnvelope = response.json().await.unwrap_or_default();
            let message = envelope.error.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            let details = envelope
                .error
                .details
                .filter(|d| !d.is_null())
                .map(|d| d.to_string());
            tracing::warn!(status = status.as_u16(), %message, "chat request rejected");
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(ChatError::Decode)?;
        if parsed.candidates.is_empty() {
            tracing::error!("model response had no candidates");
        }
        Ok(parsed.reply_text())
    }
}

// ─── Assistant ────────────────────────────────────────────────────────────

/// The chat feature as the operator sees it: either a ready client or the
/// reason it is unavailable. Replies never fail.
#[derive(Debug, Clone)]
pub enum Assistant {
    Ready(GeminiClient),
    Unavailable(String),
}

impl Assistant {
    pub fn from_config(config: &ChatConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => Assistant::Ready(client),
            Err(ChatError::NotConfigured) => {
                tracing::warn!("chat disabled: project or location not configured");
                Assistant::Unavailable(format!(
                    "{UNAVAILABLE_PREFIX}Google Cloud Project ID or Location is not configured."
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, "chat client initialisation failed");
                Assistant::Unavailable(format!(
                    "{UNAVAILABLE_PREFIX}Failed to initialize the AI model client."
                ))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Assistant::Ready(_))
    }

    /// Ask, folding every failure into an explanatory reply.
    pub async fn ask_or_explain(&self, question: &str, context: &ChatContext) -> String {
        let client = match self {
            Assistant::Ready(client) => client,
            Assistant::Unavailable(reason) => return reason.clone(),
        };
        match client.ask(question, context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "error calling the model");
                let mut reply = format!("{CONTACT_ERROR_PREFIX}{e}");
                if let Some(details) = e.details() {
                    reply.push_str(&format!(" Details: {details}"));
                }
                reply
            }
        }
    }
}
