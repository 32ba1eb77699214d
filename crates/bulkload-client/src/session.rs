//! Import session
//!
//! An [`ImportSession`] holds everything one import screen shows: the
//! selected file, its preview, and a single [`ImportState`]. Progress, the
//! loading flag, the result and the failure message are all read off that
//! state, so combinations like "loading with a settled result" cannot occur.
//!
//! ```text
//! Idle -> InFlight(Submitting) -> Uploading (10) -> AwaitingResponse (30)
//!      -> Interpreting (70) -> Settled (100, or the failed milestone)
//!      -> [cooldown] -> Idle (0)
//! ```
//!
//! `start_import` takes `&mut self`, so a session can only run one attempt
//! at a time. Every attempt is tagged with an [`AttemptId`]; transitions for
//! an attempt that is no longer current are dropped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use bulkload_core::types::{AttemptId, ImportResult, PreviewTable, RowError, SourceFile};
use bulkload_core::ClientConfig;
use bulkload_preview::{ParserRegistry, PreviewResult};

use crate::error::{ClientResult, ImportError};
use crate::outcome::{ImportFailure, ImportOutcome};
use crate::progress::{Milestone, ProgressSink};
use crate::summary::Summary;
use crate::transport::ImportClient;

/// Step of an in-flight attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Submitting,
    Uploading,
    AwaitingResponse,
    Interpreting,
}

impl Phase {
    pub fn milestone(self) -> Milestone {
        match self {
            Phase::Submitting => Milestone::Idle,
            Phase::Uploading => Milestone::Uploading,
            Phase::AwaitingResponse => Milestone::AwaitingResponse,
            Phase::Interpreting => Milestone::Interpreting,
        }
    }
}

/// Finished attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub attempt: AttemptId,
    pub outcome: ImportOutcome,
}

/// The session's single source of truth for import status
#[derive(Debug, Clone, PartialEq)]
pub enum ImportState {
    /// No indicator showing; `last` is the most recent finished attempt
    Idle { last: Option<Settled> },
    /// An attempt is running
    InFlight { attempt: AttemptId, phase: Phase },
    /// An attempt just finished and its final progress is still showing
    Settled(Settled),
}

impl Default for ImportState {
    fn default() -> Self {
        ImportState::Idle { last: None }
    }
}

impl ImportState {
    pub fn progress(&self) -> u8 {
        match self {
            ImportState::Idle { .. } => Milestone::Idle.percent(),
            ImportState::InFlight { phase, .. } => phase.milestone().percent(),
            ImportState::Settled(settled) => settled.outcome.final_milestone().percent(),
        }
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        match self {
            ImportState::Idle { last } => last.as_ref().map(|s| &s.outcome),
            ImportState::InFlight { .. } => None,
            ImportState::Settled(settled) => Some(&settled.outcome),
        }
    }

    /// Attempt currently running or showing, if any
    pub fn current_attempt(&self) -> Option<AttemptId> {
        match self {
            ImportState::Idle { .. } => None,
            ImportState::InFlight { attempt, .. } => Some(*attempt),
            ImportState::Settled(settled) => Some(settled.attempt),
        }
    }
}

/// One import screen's worth of state
pub struct ImportSession {
    client: ImportClient,
    registry: ParserRegistry,
    cooldown: Duration,
    file: Option<SourceFile>,
    preview: Option<PreviewTable>,
    state: ImportState,
    last_attempt: AttemptId,
}

impl ImportSession {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = ImportClient::new(config)?;
        Ok(Self::with_client(client, config.cooldown()))
    }

    pub fn with_client(client: ImportClient, cooldown: Duration) -> Self {
        Self {
            client,
            registry: ParserRegistry::default(),
            cooldown,
            file: None,
            preview: None,
            state: ImportState::default(),
            last_attempt: AttemptId(0),
        }
    }

    /// Replace the preview parsers
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn client(&self) -> &ImportClient {
        &self.client
    }

    /// Select a new file and build its preview.
    ///
    /// The file replaces the previous selection even when it cannot be
    /// previewed; an unsupported format only costs the preview. A running
    /// or settled import is left alone.
    pub async fn select_file(&mut self, file: SourceFile) -> PreviewResult<&PreviewTable> {
        debug!(file = %file.name(), "Selected file");
        self.file = Some(file.clone());
        self.preview = None;

        let table = self.registry.preview(&file).await?;
        let table = self.preview.insert(table);
        Ok(&*table)
    }

    pub fn file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewTable> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn progress(&self) -> u8 {
        self.state.progress()
    }

    /// An attempt is running; the import trigger should be disabled
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ImportState::InFlight { .. })
    }

    /// The progress indicator is showing (running, or settled and cooling down)
    pub fn is_indicator_visible(&self) -> bool {
        !matches!(self.state, ImportState::Idle { .. })
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.state.outcome()
    }

    pub fn result(&self) -> Option<&ImportResult> {
        self.outcome().and_then(ImportOutcome::result)
    }

    pub fn failure(&self) -> Option<&ImportFailure> {
        self.outcome().and_then(ImportOutcome::failure)
    }

    pub fn row_errors(&self) -> &[RowError] {
        self.result().map(ImportResult::row_errors).unwrap_or(&[])
    }

    pub fn summary(&self) -> Option<Summary> {
        self.result().map(Summary::from_result)
    }

    /// A result artifact can be downloaded for the current result
    pub fn can_download(&self) -> bool {
        self.result().and_then(ImportResult::download_id).is_some()
    }

    /// Submit the selected file and drive the attempt to settlement.
    ///
    /// Returns once the cooldown has elapsed and the indicator has reset.
    /// A rejected import is a [`ImportOutcome::Failed`], not an error; the
    /// only error is having no file selected, which leaves the state as is.
    pub async fn start_import(&mut self, sink: &dyn ProgressSink) -> ClientResult<ImportOutcome> {
        let file = self.file.clone().ok_or(ImportError::NoFileSelected)?;

        let attempt = self.begin_attempt();
        info!(attempt = %attempt, file = %file.name(), "Starting import");

        self.advance(attempt, Phase::Uploading, sink);
        let form = match self.client.build_form(&file).await {
            Ok(form) => form,
            Err(e) => {
                let failure = ImportFailure::new(e.to_string(), Milestone::Uploading);
                return Ok(self.finish(attempt, ImportOutcome::Failed(failure), sink).await);
            }
        };

        self.advance(attempt, Phase::AwaitingResponse, sink);
        let response = match self.client.post_import(form).await {
            Ok(response) => response,
            Err(e) => {
                let failure = ImportFailure::new(e.to_string(), Milestone::AwaitingResponse);
                return Ok(self.finish(attempt, ImportOutcome::Failed(failure), sink).await);
            }
        };

        self.advance(attempt, Phase::Interpreting, sink);
        let outcome = ImportOutcome::from_response(response).await;

        Ok(self.finish(attempt, outcome, sink).await)
    }

    /// Download the current result's artifact into `dir`
    pub async fn download_artifact(&self, dir: &Path) -> ClientResult<PathBuf> {
        let download_id = self
            .result()
            .and_then(ImportResult::download_id)
            .ok_or(ImportError::NoArtifact)?;

        self.client.save_artifact(download_id, dir).await
    }

    fn begin_attempt(&mut self) -> AttemptId {
        self.last_attempt = self.last_attempt.next();
        let attempt = self.last_attempt;

        if let ImportState::InFlight { attempt: stale, .. } = self.state {
            warn!(stale = %stale, attempt = %attempt, "Superseding unfinished import attempt");
        }

        self.state = ImportState::InFlight {
            attempt,
            phase: Phase::Submitting,
        };
        attempt
    }

    fn is_current(&self, attempt: AttemptId) -> bool {
        self.state.current_attempt() == Some(attempt)
    }

    fn advance(&mut self, attempt: AttemptId, phase: Phase, sink: &dyn ProgressSink) {
        if let ImportState::InFlight {
            attempt: current,
            phase: current_phase,
        } = &mut self.state
        {
            if *current == attempt && phase > *current_phase {
                *current_phase = phase;
                let percent = phase.milestone().percent();
                debug!(attempt = %attempt, ?phase, progress = percent, "Import advanced");
                sink.on_progress(percent);
                return;
            }
        }
        debug!(attempt = %attempt, ?phase, "Ignoring transition for inactive attempt");
    }

    /// Record the outcome of `attempt`. Returns `false` when the attempt is
    /// no longer the current one and the outcome was discarded.
    fn settle(&mut self, attempt: AttemptId, outcome: ImportOutcome, sink: &dyn ProgressSink) -> bool {
        if !matches!(self.state, ImportState::InFlight { attempt: current, .. } if current == attempt)
        {
            warn!(attempt = %attempt, "Discarding outcome of superseded import attempt");
            return false;
        }

        match &outcome {
            ImportOutcome::Failed(failure) => {
                warn!(attempt = %attempt, status = ?failure.status, message = %failure.message, "Import failed")
            }
            ImportOutcome::PartialSuccess(result) => info!(
                attempt = %attempt,
                products_created = result.products_created,
                row_errors = result.row_errors().len(),
                "Import settled with rejected rows"
            ),
            ImportOutcome::Success(result) => info!(
                attempt = %attempt,
                products_created = result.products_created,
                products_updated = result.products_updated,
                "Import settled"
            ),
        }

        let milestone = outcome.final_milestone();
        let headline = outcome.headline();
        self.state = ImportState::Settled(Settled { attempt, outcome });

        if milestone == Milestone::Complete {
            sink.on_progress(milestone.percent());
        }
        sink.on_settled(&headline);
        true
    }

    fn cool_down(&mut self, attempt: AttemptId, sink: &dyn ProgressSink) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            ImportState::Settled(settled) if settled.attempt == attempt => {
                sink.on_progress(Milestone::Idle.percent());
                ImportState::Idle {
                    last: Some(settled),
                }
            }
            other => other,
        };
    }

    async fn finish(
        &mut self,
        attempt: AttemptId,
        outcome: ImportOutcome,
        sink: &dyn ProgressSink,
    ) -> ImportOutcome {
        let returned = outcome.clone();
        if self.settle(attempt, outcome, sink) {
            if !self.cooldown.is_zero() {
                tokio::time::sleep(self.cooldown).await;
            }
            self.cool_down(attempt, sink);
        }
        returned
    }
}
