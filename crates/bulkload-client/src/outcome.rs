//! Import attempt outcomes

use reqwest::Response;
use tracing::debug;

use bulkload_core::types::ImportResult;
use bulkload_core::DEFAULT_FAILURE_MESSAGE;

use crate::progress::Milestone;

/// Why an attempt failed and how far it got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// Message shown to the user; the service's response text when it sent one
    pub message: String,
    /// HTTP status, when the service answered
    pub status: Option<u16>,
    /// Last milestone reached before the failure
    pub reached: Milestone,
}

impl ImportFailure {
    pub fn new(message: impl Into<String>, reached: Milestone) -> Self {
        Self {
            message: message.into(),
            status: None,
            reached,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Terminal state of an import attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Every row was accepted
    Success(ImportResult),
    /// The batch was accepted but some rows were rejected
    PartialSuccess(ImportResult),
    /// The attempt produced no result
    Failed(ImportFailure),
}

impl ImportOutcome {
    /// Classify a result the service accepted
    pub fn from_result(result: ImportResult) -> Self {
        if result.has_row_errors() {
            ImportOutcome::PartialSuccess(result)
        } else {
            ImportOutcome::Success(result)
        }
    }

    /// Interpret an import response whose headers have arrived
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                DEFAULT_FAILURE_MESSAGE.to_string()
            } else {
                text
            };
            return ImportOutcome::Failed(
                ImportFailure::new(message, Milestone::Interpreting).with_status(status.as_u16()),
            );
        }

        match response.json::<ImportResult>().await {
            Ok(result) => {
                debug!(
                    products_created = result.products_created,
                    row_errors = result.row_errors().len(),
                    "Import response decoded"
                );
                ImportOutcome::from_result(result)
            }
            Err(e) => ImportOutcome::Failed(
                ImportFailure::new(
                    format!("Invalid response from import service: {}", e),
                    Milestone::Interpreting,
                )
                .with_status(status.as_u16()),
            ),
        }
    }

    pub fn result(&self) -> Option<&ImportResult> {
        match self {
            ImportOutcome::Success(result) | ImportOutcome::PartialSuccess(result) => Some(result),
            ImportOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ImportFailure> {
        match self {
            ImportOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ImportOutcome::Failed(_))
    }

    /// Milestone shown while the settled state is visible
    pub fn final_milestone(&self) -> Milestone {
        match self {
            ImportOutcome::Failed(failure) => failure.reached,
            _ => Milestone::Complete,
        }
    }

    /// One-line description for logs and progress bars
    pub fn headline(&self) -> String {
        match self {
            ImportOutcome::Success(_) => "Import complete".to_string(),
            ImportOutcome::PartialSuccess(result) => format!(
                "Import complete with {} rejected row group(s)",
                result.row_errors().len()
            ),
            ImportOutcome::Failed(failure) => failure.message.clone(),
        }
    }
}
