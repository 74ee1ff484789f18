use crate::error::{AnalysisError, OrchestratorError};
use crate::model_client::{GenerationRequest, ModelClient};
use crate::prompt::build_analysis_prompt;
use codeflow_core::{AnalysisRequest, AnalysisResult, RequestId};
use codeflow_events::{Event, EventBus};
use codeflow_storage::CredentialProvider;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(65);

/// Outcome of the most recent completed cycle.
pub type AnalysisOutcome = Result<Arc<AnalysisResult>, AnalysisError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    AwaitingCredential,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only code.
    Ignored,
    /// No credential is stored; the request waits for `provide_credential`.
    AwaitingCredential(RequestId),
    Started(RequestId),
    /// Another analysis is in flight.
    Rejected,
}

/// Shared flag telling a worker its result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Completion {
    request_id: RequestId,
    outcome: Result<AnalysisResult, AnalysisError>,
}

struct Flight {
    request: AnalysisRequest,
    started: Instant,
    deadline: Instant,
    cancel: CancelToken,
    rx: Receiver<Completion>,
}

impl Flight {
    fn accept(&self, completion: Completion) -> Option<Result<AnalysisResult, AnalysisError>> {
        if completion.request_id == self.request.id {
            Some(completion.outcome)
        } else {
            tracing::debug!(request_id = %completion.request_id, "dropping stale completion");
            None
        }
    }

    fn worker_lost() -> Result<AnalysisResult, AnalysisError> {
        Err(AnalysisError::Worker(
            "analysis worker exited without reporting".to_string(),
        ))
    }
}

enum Phase {
    Idle,
    AwaitingCredential(AnalysisRequest),
    InFlight(Flight),
    Succeeded,
    Failed,
}

/// Drives one analysis at a time: credential gating, the worker call, timeout and
/// cancellation. Owned by the UI thread; the model call runs on a worker thread.
pub struct Orchestrator {
    client: Arc<dyn ModelClient>,
    credentials: Arc<dyn CredentialProvider>,
    events: EventBus,
    deadline: Duration,
    phase: Phase,
    last_outcome: Option<AnalysisOutcome>,
    analyzed_code: Option<String>,
    results_visible: bool,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn ModelClient>,
        credentials: Arc<dyn CredentialProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            client,
            credentials,
            events,
            deadline: DEFAULT_DEADLINE,
            phase: Phase::Idle,
            last_outcome: None,
            analyzed_code: None,
            results_visible: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn state(&self) -> AnalysisState {
        match self.phase {
            Phase::Idle => AnalysisState::Idle,
            Phase::AwaitingCredential(_) => AnalysisState::AwaitingCredential,
            Phase::InFlight(_) => AnalysisState::InFlight,
            Phase::Succeeded => AnalysisState::Succeeded,
            Phase::Failed => AnalysisState::Failed,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::InFlight(_))
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn last_outcome(&self) -> Option<&AnalysisOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn result(&self) -> Option<Arc<AnalysisResult>> {
        match &self.last_outcome {
            Some(Ok(result)) => Some(Arc::clone(result)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.last_outcome {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    /// Code of the most recently started analysis.
    pub fn analyzed_code(&self) -> Option<&str> {
        self.analyzed_code.as_deref()
    }

    pub fn pending_request(&self) -> Option<&AnalysisRequest> {
        match &self.phase {
            Phase::AwaitingCredential(request) => Some(request),
            _ => None,
        }
    }

    /// Time since the current analysis started.
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.phase {
            Phase::InFlight(flight) => Some(flight.started.elapsed()),
            _ => None,
        }
    }

    pub fn has_credential(&self) -> bool {
        matches!(self.credentials.credential(), Ok(Some(_)))
    }

    pub fn submit(&mut self, code: &str) -> SubmitOutcome {
        let Some(request) = AnalysisRequest::new(code) else {
            tracing::debug!("ignoring empty submission");
            return SubmitOutcome::Ignored;
        };

        if let Phase::InFlight(flight) = &self.phase {
            tracing::warn!(
                request_id = %flight.request.id,
                "submission rejected while an analysis is in flight"
            );
            self.events.publish(Event::SubmissionRejected);
            return SubmitOutcome::Rejected;
        }

        match self.credentials.credential() {
            Ok(Some(credential)) => SubmitOutcome::Started(self.start(request, credential)),
            Ok(None) => self.await_credential(request),
            Err(e) => {
                tracing::error!("Failed to read stored credential: {}", e);
                self.await_credential(request)
            }
        }
    }

    /// Stores `value` and, when a submission is waiting on it, starts that
    /// submission with exactly this value.
    pub fn provide_credential(
        &mut self,
        value: &str,
    ) -> Result<Option<RequestId>, OrchestratorError> {
        if self.is_busy() {
            return Err(OrchestratorError::Busy);
        }
        let stored = self.credentials.store_credential(value)?;
        self.events.publish(Event::CredentialSaved);

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingCredential(request) => {
                tracing::info!(request_id = %request.id, "credential supplied, resubmitting");
                Ok(Some(self.start(request, stored)))
            }
            other => {
                self.phase = other;
                Ok(None)
            }
        }
    }

    pub fn forget_credential(&mut self) -> Result<(), OrchestratorError> {
        self.credentials.clear_credential()?;
        self.events.publish(Event::ShowInfo {
            message: "API key removed".to_string(),
        });
        Ok(())
    }

    pub fn dismiss_credential_prompt(&mut self) {
        let Phase::AwaitingCredential(request) = &self.phase else {
            return;
        };
        tracing::info!(request_id = %request.id, "credential prompt dismissed");
        self.phase = Phase::Idle;
        self.events.publish(Event::CredentialPromptDismissed);
    }

    /// Abandons the in-flight analysis. Its result is discarded if it arrives later.
    pub fn cancel(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        self.finish(Err(AnalysisError::Cancelled));
        true
    }

    /// Non-blocking check for completion or deadline expiry. Returns true when the
    /// in-flight analysis reached a terminal state.
    pub fn poll(&mut self) -> bool {
        let step = match &self.phase {
            Phase::InFlight(flight) => match flight.rx.try_recv() {
                Ok(completion) => flight.accept(completion),
                Err(TryRecvError::Empty) if Instant::now() >= flight.deadline => {
                    Some(Err(AnalysisError::TimedOut))
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Flight::worker_lost()),
            },
            _ => None,
        };
        match step {
            Some(outcome) => {
                self.finish(outcome);
                true
            }
            None => false,
        }
    }

    /// Blocks for at most `max` waiting for the in-flight analysis.
    pub fn wait(&mut self, max: Duration) -> bool {
        let step = match &self.phase {
            Phase::InFlight(flight) => {
                let until = Instant::now()
                    .checked_add(max)
                    .map_or(flight.deadline, |limit| limit.min(flight.deadline));
                match flight.rx.recv_deadline(until) {
                    Ok(completion) => flight.accept(completion),
                    Err(RecvTimeoutError::Timeout) if Instant::now() >= flight.deadline => {
                        Some(Err(AnalysisError::TimedOut))
                    }
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => Some(Flight::worker_lost()),
                }
            }
            _ => None,
        };
        match step {
            Some(outcome) => {
                self.finish(outcome);
                true
            }
            None => false,
        }
    }

    /// Hides the results view. The last outcome is kept.
    pub fn back_to_editor(&mut self) {
        if self.results_visible {
            self.results_visible = false;
            self.events.publish(Event::ResultsHidden);
        }
    }

    fn await_credential(&mut self, request: AnalysisRequest) -> SubmitOutcome {
        let request_id = request.id;
        tracing::info!(request_id = %request_id, "no credential stored, awaiting entry");
        self.phase = Phase::AwaitingCredential(request);
        self.events.publish(Event::CredentialRequired { request_id });
        SubmitOutcome::AwaitingCredential(request_id)
    }

    fn start(&mut self, request: AnalysisRequest, credential: String) -> RequestId {
        let request_id = request.id;
        let line_count = request.line_count();
        let generation = GenerationRequest {
            prompt: build_analysis_prompt(&request.code),
            credential,
        };

        let (tx, rx) = bounded(1);
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let client = Arc::clone(&self.client);

        let spawned = std::thread::Builder::new()
            .name("codeflow-analysis".to_string())
            .spawn(move || {
                let outcome = client
                    .generate(&generation)
                    .map_err(AnalysisError::from)
                    .and_then(|body| AnalysisResult::from_json(&body).map_err(AnalysisError::from));
                if worker_cancel.is_cancelled() {
                    tracing::debug!(request_id = %request_id, "discarding late completion");
                    return;
                }
                let _ = tx.send(Completion {
                    request_id,
                    outcome,
                });
            });

        let started = Instant::now();
        let deadline = started.checked_add(self.deadline).unwrap_or(started);
        self.analyzed_code = Some(request.code.clone());
        self.phase = Phase::InFlight(Flight {
            request,
            started,
            deadline,
            cancel,
            rx,
        });
        tracing::info!(request_id = %request_id, line_count, "analysis started");
        self.events.publish(Event::AnalysisStarted {
            request_id,
            line_count,
        });

        if let Err(e) = spawned {
            self.finish(Err(AnalysisError::Worker(e.to_string())));
        }
        request_id
    }

    fn finish(&mut self, outcome: Result<AnalysisResult, AnalysisError>) {
        let Phase::InFlight(flight) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        let request_id = flight.request.id;
        let total_latency_ms = u64::try_from(flight.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(result) => {
                let node_count = result.flowchart.nodes.len();
                let edge_count = result.flowchart.edges.len();
                tracing::info!(
                    request_id = %request_id,
                    total_latency_ms,
                    explanation_count = result.explanations.len(),
                    node_count,
                    edge_count,
                    "analysis completed"
                );
                self.events.publish(Event::AnalysisSucceeded {
                    request_id,
                    explanation_count: result.explanations.len(),
                    node_count,
                    edge_count,
                    duration_ms: total_latency_ms,
                });
                self.last_outcome = Some(Ok(Arc::new(result)));
                self.phase = Phase::Succeeded;
                self.show_results();
            }
            Err(error) => {
                flight.cancel.cancel();
                let kind = error.kind();
                tracing::warn!(
                    request_id = %request_id,
                    total_latency_ms,
                    kind = ?kind,
                    error = %error,
                    "analysis failed"
                );
                self.events.publish(Event::AnalysisFailed {
                    request_id,
                    kind,
                    message: error.to_string(),
                });
                let cancelled = error == AnalysisError::Cancelled;
                if !cancelled {
                    self.events.publish(Event::ShowError {
                        message: error.user_message(),
                    });
                }
                self.last_outcome = Some(Err(error));
                self.phase = Phase::Failed;
                if !cancelled {
                    self.show_results();
                }
            }
        }
    }

    fn show_results(&mut self) {
        if !self.results_visible {
            self.results_visible = true;
            self.events.publish(Event::ResultsShown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
