use codeflow_core::RequestId;
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};

/// Why an analysis cycle ended in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Transport,
    MalformedResponse,
    TimedOut,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Analysis lifecycle
    /// A submission is waiting for the user to enter a credential.
    CredentialRequired {
        request_id: RequestId,
    },
    CredentialSaved,
    /// The credential prompt was closed without entering a value.
    CredentialPromptDismissed,
    AnalysisStarted {
        request_id: RequestId,
        line_count: usize,
    },
    AnalysisSucceeded {
        request_id: RequestId,
        explanation_count: usize,
        node_count: usize,
        edge_count: usize,
        duration_ms: u64,
    },
    AnalysisFailed {
        request_id: RequestId,
        kind: FailureKind,
        message: String,
    },
    /// A submission arrived while another analysis was in flight.
    SubmissionRejected,
    ResultsShown,
    ResultsHidden,

    // Notifications
    ShowInfo {
        message: String,
    },
    ShowError {
        message: String,
    },

    // Flowchart controls
    OpenFullscreen,
    CloseFullscreen,
    /// Zoom to fit the entire graph
    ZoomToFit,
    ZoomIn,
    ZoomOut,
    /// Set visibility of the fullscreen minimap
    SetShowMinimap(bool),
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!(?event, "publish");
        let _ = self.tx.send(event);
    }

    /// Drains every pending event into `listener`. Call once per UI frame.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Drains every pending event without dispatching.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Event>,
    }

    impl EventListener for Recorder {
        fn handle_event(&mut self, event: &Event) {
            self.seen.push(event.clone());
        }
    }

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let receiver = bus.receiver();

        let request_id = RequestId::new();
        sender
            .send(Event::CredentialRequired { request_id })
            .unwrap();

        match receiver.recv().unwrap() {
            Event::CredentialRequired { request_id: got } => assert_eq!(got, request_id),
            other => panic!("Expected CredentialRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let bus = EventBus::new();
        let request_id = RequestId::new();
        bus.publish(Event::AnalysisStarted {
            request_id,
            line_count: 4,
        });
        bus.publish(Event::AnalysisFailed {
            request_id,
            kind: FailureKind::TimedOut,
            message: "timed out".to_string(),
        });
        bus.publish(Event::ResultsShown);

        let mut recorder = Recorder::default();
        bus.dispatch_to(&mut recorder);
        assert_eq!(recorder.seen.len(), 3);
        assert!(matches!(recorder.seen[0], Event::AnalysisStarted { line_count: 4, .. }));
        assert!(matches!(
            recorder.seen[1],
            Event::AnalysisFailed {
                kind: FailureKind::TimedOut,
                ..
            }
        ));
        assert_eq!(recorder.seen[2], Event::ResultsShown);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_cloned_bus_shares_channel() {
        let bus = EventBus::new();
        let clone = bus.clone();
        clone.publish(Event::ZoomIn);
        assert_eq!(bus.drain(), vec![Event::ZoomIn]);
    }
}
