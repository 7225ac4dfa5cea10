use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::gateway::{Disable, Fetch, Gateway};
use crate::types::{ProcessRequest, ProcessedItem, TaskStatus};

pub const COMPLETION_MARKER: &str = "--- Processing Complete ---";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred during processing.";
pub const ALREADY_DISABLED_MESSAGE: &str =
    "Memberships found, but no payment Instrument token to disable. Possibly already Disabled";
pub const REVIEW_LOGS_MESSAGE: &str = "Processing complete, review logs for details.";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Everything one run produces: the human-readable trail and one result per
/// request, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub log: Vec<String>,
    pub results: Vec<ProcessedItem>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Counters accumulated while processing one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Relationships that carried a token value. Relationships without one
    /// are skipped and not counted, so a collection whose relationships all
    /// lack a token classifies as already disabled rather than review logs.
    pub tokens: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: TaskStatus,
    pub message: String,
}

impl Outcome {
    fn new(status: TaskStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Classify a request whose membership search returned at least one record.
/// Rules are checked in order; the first match wins.
pub fn classify(tally: &Tally) -> Outcome {
    let Tally {
        tokens,
        succeeded,
        failed,
        ..
    } = *tally;

    if tokens == 0 {
        Outcome::new(TaskStatus::AlreadyDisabled, ALREADY_DISABLED_MESSAGE)
    } else if failed > 0 && succeeded > 0 {
        Outcome::new(
            TaskStatus::PartialSuccess,
            format!("{succeeded} token(s) disabled, {failed} failed."),
        )
    } else if succeeded > 0 {
        Outcome::new(
            TaskStatus::Disabled,
            format!("{succeeded} Payment instrument token(s) disabled."),
        )
    } else if failed > 0 {
        Outcome::new(
            TaskStatus::ErrorDisabling,
            format!("All {failed} payment instrument token(s) failed to disable."),
        )
    } else {
        Outcome::new(TaskStatus::ReviewLogs, REVIEW_LOGS_MESSAGE)
    }
}

pub fn no_membership_message(request: &ProcessRequest) -> String {
    format!(
        "No memberships found email: for {}, Prime Status {}, Brand: \"{}\".",
        request.email, request.prime_status, request.brand
    )
}

// ---------------------------------------------------------------------------
// ItemLog
// ---------------------------------------------------------------------------

/// Log block for a single request; flushed to the run log trimmed.
#[derive(Debug, Default)]
struct ItemLog(String);

impl ItemLog {
    fn line(&mut self, text: impl AsRef<str>) {
        self.0.push_str(text.as_ref());
        self.0.push('\n');
    }

    /// Start a line that the next `line` call finishes.
    fn begin(&mut self, text: impl AsRef<str>) {
        self.0.push_str(text.as_ref());
    }

    fn finish(self) -> String {
        self.0.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Drives a [`Gateway`] over a batch of requests, strictly one call at a time.
pub struct Pipeline<'g> {
    gateway: &'g dyn Gateway,
}

impl<'g> Pipeline<'g> {
    pub fn new(gateway: &'g dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Process every request in order. Never fails: a gateway error aborts
    /// only the request it happened in and is reported as
    /// [`TaskStatus::ProcessingError`].
    pub async fn process(&self, requests: &[ProcessRequest]) -> ProcessOutput {
        let mut output = ProcessOutput {
            log: Vec::with_capacity(requests.len() + 2),
            results: Vec::with_capacity(requests.len()),
        };
        output
            .log
            .push(format!("Starting processing for {} item(s)...", requests.len()));

        for request in requests {
            let mut item_log = ItemLog::default();
            item_log.line(format!(
                "--- Processing Email: {}, Prime Status: {}, Brand: {} ---",
                request.email, request.prime_status, request.brand
            ));

            let outcome = match self.process_one(request, &mut item_log).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(
                        email = %request.email,
                        prime_status = %request.prime_status,
                        brand = %request.brand,
                        error = %err,
                        "error processing request"
                    );
                    let text = error_text(&err);
                    item_log.line(format!("EXCEPTION: {text}"));
                    Outcome::new(TaskStatus::ProcessingError, text)
                }
            };

            output.log.push(item_log.finish());
            output.results.push(ProcessedItem {
                request: request.clone(),
                task_status: outcome.status,
                processed_message: outcome.message,
            });
        }

        output.log.push(COMPLETION_MARKER.to_string());
        output
    }

    async fn process_one(
        &self,
        request: &ProcessRequest,
        log: &mut ItemLog,
    ) -> Result<Outcome, GatewayError> {
        let memberships = self
            .gateway
            .find_memberships(&request.email, &request.prime_status, &request.brand)
            .await?;

        if memberships.is_empty() {
            log.line(format!(
                "No memberships found for {} with Prime Status \"{}\", Brand: \"{}\"..",
                request.email, request.prime_status, request.brand
            ));
            return Ok(Outcome::new(
                TaskStatus::NoMembershipFound,
                no_membership_message(request),
            ));
        }

        log.line(format!("Found {} membership(s).", memberships.len()));
        let mut tally = Tally::default();

        for membership in &memberships {
            let Some(collection_id) = membership.collection_id() else {
                log.line(format!(
                    "Membership ID {} is missing recurringCollectionId. Skipping.",
                    membership.id
                ));
                continue;
            };

            log.line(format!("Processing recurringCollectionId: {collection_id}."));
            let collection = match self.gateway.get_recurring_collection(collection_id).await? {
                Fetch::Found(collection) => collection,
                Fetch::NotFound { .. } => {
                    log.line(format!(
                        "Could not find or fetch recurringCollection {collection_id}. Skipping."
                    ));
                    continue;
                }
            };

            let relationships = &collection.payment_instrument_relationships;
            if relationships.is_empty() {
                log.line(format!(
                    "No payment instrument tokens found in recurringCollection {collection_id}."
                ));
                continue;
            }
            log.line(format!(
                "Found {} token relationship(s).",
                relationships.len()
            ));

            for relationship in relationships {
                let Some(token) = relationship.token() else {
                    log.line("Skipping relationship due to missing paymentInstrumentToken.");
                    continue;
                };
                tally.tokens += 1;

                log.begin(format!("Attempting to disable token: {token}... "));
                match self.gateway.disable_token(collection_id, token).await? {
                    Disable::Disabled => {
                        log.line("Successfully disabled.");
                        tally.succeeded += 1;
                    }
                    Disable::Refused { .. } => {
                        log.line("Failed to disable.");
                        tally.failed += 1;
                    }
                }
            }
        }

        Ok(classify(&tally))
    }
}

fn error_text(err: &GatewayError) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        text
    }
}
