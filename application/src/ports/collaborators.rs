//! Collaborator ports
//!
//! The model-backed participants of a round: experts, judge, summarizer,
//! meta-critic and router. Each call may fail; the stage that makes the call
//! decides how to degrade (see the use cases).

use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;
use deliberate_domain::{
    DomainError, ExpertAnswer, ExpertContext, ExpertDescriptor, GateDecision, Message,
    MetaEvaluation, RawJudgeOutput, RoundMode, RoutingLabel,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single collaborator call
#[derive(Error, Debug, Clone)]
pub enum CollaboratorError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Provider quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Malformed output: {0}")]
    Malformed(#[from] DomainError),

    #[error("Cancelled")]
    Cancelled,
}

impl CollaboratorError {
    /// Errors that end the session instead of degrading the stage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CollaboratorError::QuotaExhausted(_) | CollaboratorError::Cancelled
        )
    }
}

impl From<GatewayError> for CollaboratorError {
    fn from(e: GatewayError) -> Self {
        if e.is_quota_exhausted() {
            CollaboratorError::QuotaExhausted(e.to_string())
        } else {
            CollaboratorError::Unavailable(e.to_string())
        }
    }
}

/// The expert panel.
///
/// One capability serves every registered expert; the descriptor says who
/// is speaking.
#[async_trait]
pub trait ExpertPort: Send + Sync {
    /// Decide whether `expert` should answer this round
    async fn gate(
        &self,
        expert: &ExpertDescriptor,
        ctx: &ExpertContext,
    ) -> Result<GateDecision, CollaboratorError>;

    /// Produce `expert`'s answer text
    async fn answer(
        &self,
        expert: &ExpertDescriptor,
        ctx: &ExpertContext,
    ) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait JudgePort: Send + Sync {
    /// Primary structured ranking call.
    ///
    /// `payload` is the labeled candidate block built for this call.
    async fn rank(
        &self,
        question: &str,
        candidates: &[ExpertAnswer],
        payload: &str,
    ) -> Result<RawJudgeOutput, CollaboratorError>;

    /// Simpler comparison over at most three candidates
    async fn compare(
        &self,
        question: &str,
        candidates: &[ExpertAnswer],
    ) -> Result<RawJudgeOutput, CollaboratorError>;
}

#[async_trait]
pub trait SummarizerPort: Send + Sync {
    /// Rolling summary of `history` plus the latest winning answer
    async fn summarize(
        &self,
        history: &[Message],
        latest_answer: &str,
    ) -> Result<String, CollaboratorError>;
}

/// What the meta-critic is shown about a finished round
#[derive(Debug, Clone)]
pub struct MetaRequest {
    pub query: String,
    pub goal: String,
    pub mode: RoundMode,
    pub routing_label: RoutingLabel,
    pub answer: String,
    pub rationale: String,
    pub summary: String,
    /// Role keys hints may be given for
    pub roles: Vec<String>,
}

#[async_trait]
pub trait MetaCriticPort: Send + Sync {
    async fn evaluate(&self, request: &MetaRequest) -> Result<MetaEvaluation, CollaboratorError>;
}

/// What the router is shown to classify a query
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub query: String,
    pub history: Vec<Message>,
    pub goal: String,
    pub mode: RoundMode,
    pub guidance: String,
}

#[async_trait]
pub trait RouterPort: Send + Sync {
    async fn route(&self, request: &RouteRequest) -> Result<RoutingLabel, CollaboratorError>;
}

/// Every collaborator a deliberation needs
#[derive(Clone)]
pub struct Collaborators {
    pub experts: Arc<dyn ExpertPort>,
    pub judge: Arc<dyn JudgePort>,
    pub summarizer: Arc<dyn SummarizerPort>,
    pub meta_critic: Arc<dyn MetaCriticPort>,
    pub router: Arc<dyn RouterPort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_mapping() {
        let quota: CollaboratorError = GatewayError::RequestFailed("429".into()).into();
        assert!(matches!(quota, CollaboratorError::QuotaExhausted(_)));
        assert!(quota.is_fatal());

        let other: CollaboratorError = GatewayError::ConnectionError("refused".into()).into();
        assert!(matches!(other, CollaboratorError::Unavailable(_)));
        assert!(!other.is_fatal());
    }

    #[test]
    fn test_malformed_is_not_fatal() {
        let err: CollaboratorError = DomainError::malformed("confidence", "nan").into();
        assert!(!err.is_fatal());
        assert!(CollaboratorError::Cancelled.is_fatal());
    }
}
