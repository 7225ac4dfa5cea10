use gemini_agent::Assistant;
use std::sync::Arc;
use tokensweep_core::config::Config;
use tokensweep_core::{Gateway, HttpGateway};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn Gateway>,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// State backed by the real membership and collection services.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let gateway = HttpGateway::new(&config.gateway)?;
        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let assistant = Assistant::from_config(&config.chat);
        Self {
            config: Arc::new(config),
            gateway,
            assistant: Arc::new(assistant),
        }
    }
}
