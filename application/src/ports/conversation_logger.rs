//! Port for structured conversation logging.
//!
//! Separate from `tracing` diagnostics: this port records what the panel
//! actually said, round by round, in a machine-readable log (JSONL).

use chrono::{DateTime, Utc};
use deliberate_domain::{DeliberationOutcome, RoundRecord};
use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (`round_completed`, `session_completed`)
    pub event_type: &'static str,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

impl ConversationEvent {
    /// Create an event stamped with the current UTC time.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// One committed round, candidates and meta-critic output included.
    pub fn round_completed(query: &str, record: &RoundRecord) -> Self {
        Self::new(
            "round_completed",
            serde_json::json!({
                "query": query,
                "record": record,
            }),
        )
    }

    /// End of one query's deliberation. The trace is logged round by round,
    /// so only the headline fields are repeated here.
    pub fn session_completed(outcome: &DeliberationOutcome) -> Self {
        Self::new(
            "session_completed",
            serde_json::json!({
                "query": outcome.query,
                "status": outcome.status,
                "rounds": outcome.rounds,
                "winner": outcome.winner,
                "routing_label": outcome.routing_label,
                "mode": outcome.mode,
                "goal": outcome.goal,
                "summary": outcome.summary,
            }),
        )
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; adapters swallow write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op logger for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
