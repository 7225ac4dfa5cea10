//! `gemini-agent`: chat assistant for tokensweep runs.
//!
//! Sends the run's log trail and a sample of the operator's rows to a Vertex
//! AI Gemini model and returns its answer to a free-text question.
//!
//! ```text
//! ChatConfig ──► Assistant::from_config
//!                    │
//!                    ├─ Ready(GeminiClient) ── ask(question, &ChatContext)
//!                    │                             POST …/models/{model}:generateContent
//!                    └─ Unavailable(reason)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gemini_agent::{Assistant, ChatContext};
//!
//! let assistant = Assistant::from_config(&config.chat);
//! let ctx = ChatContext::new(output.log, rows);
//! println!("{}", assistant.ask_or_explain("Which emails failed?", &ctx).await);
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod types;


pub use client::{Assistant, GeminiClient};
pub use context::ChatContext;
pub use error::ChatError;
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ChatError>;
