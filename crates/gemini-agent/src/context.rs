use tokensweep_core::types::RowData;

use crate::types::Content;

pub const MAX_LOG_CHARS: usize = 7000;
pub const MAX_ROWS: usize = 50;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant integrated into a membership administration tool.
Your task is to answer user questions based *only* on the provided Processing Logs and CSV Data.
- Processing Logs show the status of attempts to disable payment instrument tokens for members based on their email and prime status.
- If no payment instrument token found to be disabled, it means the payment instrument must have been possibly already disabled before.
- CSV Data contains the original information uploaded by the user, including member details like email, Prime status, etc.
- Be concise and accurate.
- If the information isn't in the logs or CSV data, state that clearly.
- Do not guess or make up information.
- Do not offer to perform actions.
- If asked about specific data for an email, find the relevant row(s) in the CSV data and summarize the requested fields.
- The email address column in the CSV data is named \"VIP Comms: \\nCustomer's email\". Pay close attention to this exact column name when looking up emails in the CSV Data.";

/// What the assistant is allowed to know about: the run's log trail
/// (newest first) and the operator's uploaded rows.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    logs: Vec<String>,
    rows: Vec<RowData>,
}

impl ChatContext {
    pub fn new(logs: Vec<String>, rows: Vec<RowData>) -> Self {
        Self { logs, rows }
    }

    /// Log section, cut to [`MAX_LOG_CHARS`] characters.
    pub fn log_section(&self) -> String {
        let joined = self.logs.join("\n");
        let truncated: String = joined.chars().take(MAX_LOG_CHARS).collect();
        format!("\n--- Processing Logs (newest first) ---\n{truncated}")
    }

    /// First [`MAX_ROWS`] rows as pretty JSON.
    pub fn data_section(&self) -> String {
        let sample = &self.rows[..self.rows.len().min(MAX_ROWS)];
        let json = serde_json::to_string_pretty(sample).unwrap_or_else(|_| "[]".to_string());
        format!("\n--- Uploaded CSV Data (Sample of first 50 rows) ---\n{json}")
    }

    /// The single user turn sent to the model.
    pub fn to_content(&self, question: &str) -> Content {
        Content::user([
            SYSTEM_INSTRUCTION.to_string(),
            self.log_section(),
            self.data_section(),
            format!("\n--- User Question ---\nUser: {question}"),
        ])
    }
}
