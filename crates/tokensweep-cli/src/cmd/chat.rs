use crate::cmd::process::LOG_ENTRY_SEPARATOR;
use crate::output::print_json;
use anyhow::Context;
use gemini_agent::{Assistant, ChatContext};
use std::path::Path;
use tokensweep_core::config::Config;
use tokensweep_core::ingest;

pub fn run(
    root: &Path,
    log_path: &Path,
    file: Option<&Path>,
    question: &str,
    json: bool,
) -> anyhow::Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("question must not be empty");
    }
    let config = Config::load_with_env(root).context("failed to load config")?;

    let log_text = std::fs::read_to_string(log_path)
        .with_context(|| format!("failed to read log {}", log_path.display()))?;
    // The log file is chronological; the assistant expects newest first.
    let logs: Vec<String> = log_text
        .split(LOG_ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(str::to_string)
        .collect();

    let rows = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ingest::parse_csv(&text, &config.columns, &config.default_brand)?.rows
        }
        None => Vec::new(),
    };

    let assistant = Assistant::from_config(&config.chat);
    if let Assistant::Ready(client) = &assistant {
        tracing::info!(model = client.model(), "asking assistant");
    }
    let context = ChatContext::new(logs, rows);
    let rt = tokio::runtime::Runtime::new()?;
    let reply = rt.block_on(assistant.ask_or_explain(question, &context));

    if json {
        print_json(&serde_json::json!({ "reply": reply }))?;
    } else {
        println!("{reply}");
    }
    Ok(())
}
