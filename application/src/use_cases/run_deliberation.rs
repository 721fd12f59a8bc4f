//! Run Deliberation use case
//!
//! Drives the round state machine for one query: route, gate, select,
//! execute, judge, summarize, meta-evaluate, then commit. Rounds repeat
//! until the meta-critic stops the session or the round budget runs out.

use crate::config::{DeliberationParams, ParamsError};
use crate::ports::collaborators::{Collaborators, MetaRequest, RouteRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier, Stage};
use crate::use_cases::execute_experts::{ExecutionJob, execute_experts};
use crate::use_cases::gate_experts::gate_experts;
use crate::use_cases::judge_candidates::judge_candidates;
use crate::use_cases::route_query::route_query;
use crate::use_cases::shared::{StageEnv, call_collaborator, check_cancelled, fatal_error};
use deliberate_domain::{
    DeliberationOutcome, DiversitySelector, ExpertContext, ExpertDescriptor, ExpertRegistry,
    MetaEvaluation, OrchestratorState, Query, RoundMode, RoundRecord, SessionStatus, Trace,
    gated_candidates,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that end a deliberation
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("No experts registered")]
    NoExperts,

    #[error("All selected experts failed to answer")]
    AllExpertsFailed,

    #[error("Judge failed: {0}")]
    JudgeFailed(String),

    #[error("Provider quota exhausted or rate limited: {0}")]
    QuotaExhausted(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),
}

impl RunDeliberationError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, RunDeliberationError::QuotaExhausted(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDeliberationError::Cancelled)
    }

    /// Failures that lose the current round but leave earlier rounds usable.
    pub fn abandons_round_only(&self) -> bool {
        matches!(
            self,
            RunDeliberationError::AllExpertsFailed | RunDeliberationError::JudgeFailed(_)
        )
    }
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    pub query: Query,
    /// Replaces the session goal before the first round
    pub goal: Option<String>,
    /// Replaces the session mode before the first round
    pub mode: Option<RoundMode>,
    /// Overrides the configured round budget for this query
    pub max_rounds: Option<u32>,
}

impl RunDeliberationInput {
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            goal: None,
            mode: None,
            max_rounds: None,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_mode(mut self, mode: RoundMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// Use case for deliberating one query against a session state
pub struct RunDeliberationUseCase {
    collaborators: Collaborators,
    registry: Arc<ExpertRegistry>,
    params: DeliberationParams,
    cancellation_token: Option<CancellationToken>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunDeliberationUseCase {
    pub fn new(
        collaborators: Collaborators,
        registry: Arc<ExpertRegistry>,
        params: DeliberationParams,
    ) -> Self {
        Self {
            collaborators,
            registry,
            params,
            cancellation_token: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &DeliberationParams {
        &self.params
    }

    pub fn registry(&self) -> &ExpertRegistry {
        &self.registry
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        state: &mut OrchestratorState,
        input: RunDeliberationInput,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        self.execute_with_progress(state, input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Each round runs on a copy of `state` that replaces it only once the
    /// round has fully completed. An error leaves `state` as it was after the
    /// last committed round. A judge or expert failure after at least one
    /// completed round ends the query with [`SessionStatus::StoppedRoundFailed`]
    /// instead of an error.
    pub async fn execute_with_progress(
        &self,
        state: &mut OrchestratorState,
        input: RunDeliberationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        if self.registry.is_empty() {
            return Err(RunDeliberationError::NoExperts);
        }
        let max_rounds = input.max_rounds.unwrap_or(self.params.max_rounds);
        self.params.clone().with_max_rounds(max_rounds).validate()?;

        if let Some(goal) = &input.goal {
            state.set_goal(goal.as_str());
        }
        if let Some(mode) = input.mode {
            state.set_mode(mode);
        }

        let query = input.query.content();
        info!(
            "Deliberating with {} experts, up to {} rounds (mode {}, goal: {})",
            self.registry.len(),
            max_rounds,
            state.mode(),
            state.goal()
        );

        let mut trace = Trace::new();
        let mut status = SessionStatus::Running;

        for _ in 0..max_rounds {
            check_cancelled(&self.cancellation_token)?;

            let mut working = state.clone();
            let record = match self.run_round(&mut working, query, max_rounds, progress).await {
                Ok(record) => record,
                Err(e) if !trace.is_empty() && e.abandons_round_only() => {
                    warn!(
                        "Round {} abandoned after {} completed round(s): {}",
                        working.round_index(),
                        trace.len(),
                        e
                    );
                    status = SessionStatus::StoppedRoundFailed;
                    break;
                }
                Err(e) => return Err(e),
            };
            *state = working;

            info!(
                "Round {} complete: winner {}, meta says {}",
                record.round, record.winner, record.meta.stop_label
            );
            self.conversation_logger
                .log(ConversationEvent::round_completed(query, &record));
            progress.on_round_complete(&record);

            status = SessionStatus::from_stop_label(record.meta.stop_label);
            trace.push(record);
            if status.is_terminal() {
                break;
            }
        }

        if !status.is_terminal() {
            status = SessionStatus::StoppedMaxRounds;
        }

        let mut outcome = DeliberationOutcome::from_trace(query, trace, status)
            .ok_or(RunDeliberationError::AllExpertsFailed)?;
        outcome.rounds = state.round_index();

        self.conversation_logger
            .log(ConversationEvent::session_completed(&outcome));
        Ok(outcome)
    }

    /// One full round against the working copy.
    async fn run_round(
        &self,
        working: &mut OrchestratorState,
        query: &str,
        max_rounds: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundRecord, RunDeliberationError> {
        let round = working.advance_round();
        progress.on_round_start(round, max_rounds);
        info!("Round {} (mode {})", round, working.mode());

        let env = StageEnv {
            timeout: self.params.call_timeout,
            token: &self.cancellation_token,
            progress,
        };

        // Route
        let route_request = RouteRequest {
            query: query.to_string(),
            history: working.history().to_vec(),
            goal: working.goal().to_string(),
            mode: working.mode(),
            guidance: working.router_guidance().to_string(),
        };
        let routing_label =
            route_query(&env, self.collaborators.router.as_ref(), &route_request).await?;

        // Gate
        let ordered: Vec<ExpertDescriptor> = self
            .registry
            .ordered_for(routing_label)
            .into_iter()
            .cloned()
            .collect();
        let ctx = ExpertContext::from_state(query, working, routing_label, "");
        let gate_results = gate_experts(&env, &self.collaborators.experts, &ordered, &ctx, |e| {
            working.hint_for(&e.role_key()).to_string()
        })
        .await?;

        // Select
        let candidates = gated_candidates(
            &self.registry,
            &gate_results,
            working.mode(),
            self.params.gate_min_conf,
            working.expert_hints(),
        );
        let selection = DiversitySelector::new(self.params.top_k, self.params.gate_lambda)
            .select(candidates);
        info!("Selected experts: {}", selection.expert_names().join(", "));

        // Execute
        let jobs: Vec<ExecutionJob> = selection
            .into_candidates()
            .into_iter()
            .filter_map(|c| {
                self.registry.get(&c.expert).map(|expert| ExecutionJob {
                    expert: expert.clone(),
                    hint: c.hint,
                })
            })
            .collect();
        let answers = execute_experts(&env, &self.collaborators.experts, jobs, &ctx).await?;

        // Judge
        let verdict = judge_candidates(
            &env,
            self.collaborators.judge.as_ref(),
            query,
            &answers,
            self.params.keep_judge_payload,
        )
        .await?;
        let labels: Vec<String> = answers.iter().map(|a| a.expert_name.clone()).collect();
        let winner = &answers[verdict.winner_index(&labels)];
        let winner_name = winner.expert_name.clone();
        let winner_text = winner.text.clone();

        // Summarize
        progress.on_stage_start(Stage::Summarize, 1);
        match call_collaborator(
            env.timeout,
            env.token,
            self.collaborators
                .summarizer
                .summarize(working.history(), &winner_text),
        )
        .await
        {
            Ok(summary) => {
                progress.on_task_complete(Stage::Summarize, "summarizer", true);
                working.replace_summary(summary);
            }
            Err(e) => {
                if let Some(fatal) = fatal_error(&e) {
                    return Err(fatal);
                }
                warn!("Summarizer failed, keeping previous summary: {}", e);
                progress.on_task_complete(Stage::Summarize, "summarizer", false);
            }
        }
        progress.on_stage_complete(Stage::Summarize);

        // Meta-evaluate
        progress.on_stage_start(Stage::MetaEvaluate, 1);
        let meta_request = MetaRequest {
            query: query.to_string(),
            goal: working.goal().to_string(),
            mode: working.mode(),
            routing_label,
            answer: winner_text.clone(),
            rationale: verdict.rationale.clone(),
            summary: working.summary().to_string(),
            roles: self.registry.role_keys(),
        };
        let meta = match call_collaborator(
            env.timeout,
            env.token,
            self.collaborators.meta_critic.evaluate(&meta_request),
        )
        .await
        {
            Ok(meta) => {
                progress.on_task_complete(Stage::MetaEvaluate, "meta-critic", true);
                meta
            }
            Err(e) => {
                if let Some(fatal) = fatal_error(&e) {
                    return Err(fatal);
                }
                warn!("Meta-critic failed, continuing without hints: {}", e);
                progress.on_task_complete(Stage::MetaEvaluate, "meta-critic", false);
                MetaEvaluation::conservative()
            }
        };
        progress.on_stage_complete(Stage::MetaEvaluate);

        working.apply_hints(&meta);
        working.record_exchange(query, &winner_text);

        Ok(RoundRecord {
            round,
            mode: working.mode(),
            goal: working.goal().to_string(),
            routing_label,
            candidates: answers,
            winner: winner_name,
            ranking: verdict.ranking,
            judge_rationale: verdict.rationale,
            judge_payload: verdict.payload,
            verdict_source: verdict.source,
            meta,
            summary: working.summary().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::collaborators::{
        CollaboratorError, ExpertPort, JudgePort, MetaCriticPort, RouterPort, SummarizerPort,
    };
    use async_trait::async_trait;
    use deliberate_domain::{
        ExpertAnswer, GateDecision, Message, MetaScores, RawJudgeOutput, RoutingLabel, StopLabel,
        VerdictSource,
    };
    use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
    use std::sync::Mutex;

    // ==================== Mock Collaborators ====================

    struct ScriptedExperts {
        gates: HashMap<String, GateDecision>,
        default_gate: GateDecision,
        failing_answers: HashSet<String>,
        quota_on_answer: bool,
        answered: Mutex<Vec<String>>,
    }

    impl ScriptedExperts {
        fn all_decline() -> Self {
            Self {
                gates: HashMap::new(),
                default_gate: GateDecision::decline(),
                failing_answers: HashSet::new(),
                quota_on_answer: false,
                answered: Mutex::new(Vec::new()),
            }
        }

        fn responding(names: &[&str]) -> Self {
            let mut experts = Self::all_decline();
            for (i, name) in names.iter().enumerate() {
                let tags: BTreeSet<String> = [format!("tag-{}", i)].into_iter().collect();
                experts.gates.insert(
                    name.to_string(),
                    GateDecision::new(true, 0.9 - i as f64 * 0.1, tags).unwrap(),
                );
            }
            experts
        }
    }

    #[async_trait]
    impl ExpertPort for ScriptedExperts {
        async fn gate(
            &self,
            expert: &ExpertDescriptor,
            _ctx: &ExpertContext,
        ) -> Result<GateDecision, CollaboratorError> {
            Ok(self
                .gates
                .get(expert.name())
                .cloned()
                .unwrap_or_else(|| self.default_gate.clone()))
        }

        async fn answer(
            &self,
            expert: &ExpertDescriptor,
            _ctx: &ExpertContext,
        ) -> Result<String, CollaboratorError> {
            if self.quota_on_answer {
                return Err(CollaboratorError::QuotaExhausted("insufficient_quota".into()));
            }
            if self.failing_answers.contains(expert.name()) {
                return Err(CollaboratorError::Unavailable("down".into()));
            }
            self.answered.lock().unwrap().push(expert.name().to_string());
            Ok(format!("{} says hello", expert.name()))
        }
    }

    #[derive(Default)]
    struct ScriptedJudge {
        ranks: Mutex<VecDeque<Result<RawJudgeOutput, CollaboratorError>>>,
        compares: Mutex<VecDeque<Result<RawJudgeOutput, CollaboratorError>>>,
    }

    impl ScriptedJudge {
        fn failing() -> Self {
            let judge = Self::default();
            for _ in 0..8 {
                judge
                    .ranks
                    .lock()
                    .unwrap()
                    .push_back(Err(CollaboratorError::Unavailable("judge down".into())));
                judge
                    .compares
                    .lock()
                    .unwrap()
                    .push_back(Err(CollaboratorError::Unavailable("judge down".into())));
            }
            judge
        }
    }

    #[async_trait]
    impl JudgePort for ScriptedJudge {
        async fn rank(
            &self,
            _question: &str,
            _candidates: &[ExpertAnswer],
            _payload: &str,
        ) -> Result<RawJudgeOutput, CollaboratorError> {
            self.ranks
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawJudgeOutput::default()))
        }

        async fn compare(
            &self,
            _question: &str,
            _candidates: &[ExpertAnswer],
        ) -> Result<RawJudgeOutput, CollaboratorError> {
            self.compares
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawJudgeOutput::default()))
        }
    }

    #[derive(Default)]
    struct EchoSummarizer {
        fail: bool,
        /// Cancels the token on the given call (1-based)
        cancel_on: Option<(usize, CancellationToken)>,
        calls: Mutex<usize>,
    }

    impl EchoSummarizer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn cancelling_on(call: usize, token: CancellationToken) -> Self {
            Self {
                cancel_on: Some((call, token)),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SummarizerPort for EchoSummarizer {
        async fn summarize(
            &self,
            history: &[Message],
            latest_answer: &str,
        ) -> Result<String, CollaboratorError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if let Some((at, token)) = &self.cancel_on
                && *at == call
            {
                token.cancel();
            }
            if self.fail {
                return Err(CollaboratorError::Unavailable("summarizer down".into()));
            }
            Ok(format!("{} messages; latest: {}", history.len(), latest_answer))
        }
    }

    #[derive(Default)]
    struct ScriptedMeta {
        responses: Mutex<VecDeque<Result<MetaEvaluation, CollaboratorError>>>,
    }

    impl ScriptedMeta {
        fn with(responses: Vec<Result<MetaEvaluation, CollaboratorError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl MetaCriticPort for ScriptedMeta {
        async fn evaluate(
            &self,
            _request: &MetaRequest,
        ) -> Result<MetaEvaluation, CollaboratorError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(MetaEvaluation::conservative()))
        }
    }

    struct FixedRouter(Result<RoutingLabel, CollaboratorError>);

    #[async_trait]
    impl RouterPort for FixedRouter {
        async fn route(&self, _request: &RouteRequest) -> Result<RoutingLabel, CollaboratorError> {
            self.0.clone()
        }
    }

    struct Fixture {
        experts: ScriptedExperts,
        judge: ScriptedJudge,
        summarizer: EchoSummarizer,
        meta: ScriptedMeta,
        router: FixedRouter,
    }

    impl Fixture {
        fn new(experts: ScriptedExperts) -> Self {
            Self {
                experts,
                judge: ScriptedJudge::default(),
                summarizer: EchoSummarizer::default(),
                meta: ScriptedMeta::default(),
                router: FixedRouter(Ok(RoutingLabel::Analytic)),
            }
        }

        fn use_case(self, params: DeliberationParams) -> (RunDeliberationUseCase, Arc<ScriptedExperts>) {
            let experts = Arc::new(self.experts);
            let collaborators = Collaborators {
                experts: experts.clone(),
                judge: Arc::new(self.judge),
                summarizer: Arc::new(self.summarizer),
                meta_critic: Arc::new(self.meta),
                router: Arc::new(self.router),
            };
            let use_case = RunDeliberationUseCase::new(
                collaborators,
                Arc::new(ExpertRegistry::default_panel()),
                params,
            );
            (use_case, experts)
        }
    }

    fn fresh_state() -> OrchestratorState {
        OrchestratorState::for_registry(&ExpertRegistry::default_panel())
    }

    fn input() -> RunDeliberationInput {
        RunDeliberationInput::new(Query::try_new("Is the claim true?").unwrap())
    }

    fn meta(stop: StopLabel) -> MetaEvaluation {
        MetaEvaluation::new(stop, MetaScores::default())
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_all_gates_decline_falls_back_to_first_expert() {
        let (use_case, experts) = Fixture::new(ScriptedExperts::all_decline())
            .use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();

        let record = &outcome.trace.records()[0];
        assert_eq!(record.candidates.len(), 1);
        assert_eq!(record.candidates[0].expert_name, "Analyst");
        assert_eq!(outcome.winner, "Analyst");
        assert_eq!(outcome.answer, "Analyst says hello");
        assert_eq!(*experts.answered.lock().unwrap(), vec!["Analyst".to_string()]);
    }

    #[tokio::test]
    async fn test_stops_when_meta_critic_reports_truth() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        fixture.meta = ScriptedMeta::with(vec![
            Ok(meta(StopLabel::Continue)),
            Ok(meta(StopLabel::IrreducibleTruth)),
        ]);
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(4));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();

        assert_eq!(outcome.trace.len(), 2);
        assert_eq!(outcome.status, SessionStatus::StoppedTruth);
        assert_eq!(outcome.rounds, 2);
        assert_eq!(state.round_index(), 2);
        assert_eq!(state.history().len(), 4);
    }

    #[tokio::test]
    async fn test_contradiction_stops_session() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Critic"]));
        fixture.meta = ScriptedMeta::with(vec![Ok(meta(StopLabel::Contradiction))]);
        let (use_case, _) = fixture.use_case(DeliberationParams::default());
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        assert_eq!(outcome.status, SessionStatus::StoppedContradiction);
        assert_eq!(outcome.trace.len(), 1);
    }

    #[tokio::test]
    async fn test_runs_to_max_rounds() {
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Analyst"]))
            .use_case(DeliberationParams::default().with_max_rounds(3));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();

        assert_eq!(outcome.status, SessionStatus::StoppedMaxRounds);
        assert_eq!(state.round_index(), 3);
        let rounds: Vec<u32> = outcome.trace.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_round_index_keeps_growing_across_queries() {
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Analyst"]))
            .use_case(DeliberationParams::default().with_max_rounds(2));
        let mut state = fresh_state();

        use_case.execute(&mut state, input()).await.unwrap();
        let outcome = use_case.execute(&mut state, input()).await.unwrap();

        assert_eq!(state.round_index(), 4);
        assert_eq!(outcome.rounds, 4);
        assert_eq!(outcome.trace.records()[0].round, 3);
    }

    #[tokio::test]
    async fn test_ranking_picks_winner_when_best_label_empty() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        fixture.judge.ranks.lock().unwrap().push_back(Ok(RawJudgeOutput {
            best_label: String::new(),
            rankings: "Critic > Analyst".to_string(),
            rationale: "sharper".to_string(),
            raw_text: None,
        }));
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        assert_eq!(outcome.winner, "Critic");
        assert_eq!(outcome.answer, "Critic says hello");
        assert_eq!(outcome.rationale, "sharper");
    }

    #[tokio::test]
    async fn test_hints_accumulate_without_overwriting() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst"]));
        fixture.meta = ScriptedMeta::with(vec![
            Ok(meta(StopLabel::Continue)
                .with_router_hint("favor evidence")
                .with_role_hint("analyst", "define terms")),
            Ok(meta(StopLabel::Continue).with_role_hint("synth", "merge options")),
            Ok(meta(StopLabel::Continue)
                .with_router_hint("try a plan")
                .with_role_hint("analyst", "cite numbers")),
        ]);
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(3));
        let mut state = fresh_state();

        let mut previous = state.hint_snapshot();
        for _ in 0..3 {
            use_case
                .execute(&mut state, input().with_max_rounds(1))
                .await
                .unwrap();
            let current = state.hint_snapshot();
            assert!(current.router_guidance.starts_with(&previous.router_guidance));
            for (role, hint) in &previous.expert_hints {
                assert!(current.expert_hints[role].starts_with(hint.as_str()));
            }
            previous = current;
        }

        assert_eq!(state.router_guidance(), "favor evidence\ntry a plan");
        assert_eq!(state.hint_for("analyst"), "define terms\ncite numbers");
        assert_eq!(state.hint_for("synthesizer"), "merge options");
    }

    #[tokio::test]
    async fn test_total_judge_failure_leaves_state_untouched() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        fixture.judge = ScriptedJudge::failing();
        let (use_case, _) = fixture.use_case(DeliberationParams::default());
        let mut state = fresh_state();
        let before = state.clone();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();

        assert!(matches!(err, RunDeliberationError::JudgeFailed(_)));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_later_judge_failure_keeps_completed_rounds() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        {
            let mut ranks = fixture.judge.ranks.lock().unwrap();
            ranks.push_back(Ok(RawJudgeOutput {
                best_label: "Critic".to_string(),
                ..RawJudgeOutput::default()
            }));
            ranks.push_back(Err(CollaboratorError::Unavailable("judge down".into())));
        }
        fixture
            .judge
            .compares
            .lock()
            .unwrap()
            .push_back(Err(CollaboratorError::Unavailable("judge down".into())));
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(3));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();

        assert_eq!(outcome.status, SessionStatus::StoppedRoundFailed);
        assert_eq!(outcome.trace.len(), 1);
        assert_eq!(outcome.winner, "Critic");
        assert_eq!(outcome.answer, "Critic says hello");
        assert_eq!(outcome.rounds, 1);
        assert_eq!(state.round_index(), 1);
        assert_eq!(state.history().len(), 2);
    }

    #[tokio::test]
    async fn test_later_quota_error_still_ends_with_error() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst"]));
        {
            let mut ranks = fixture.judge.ranks.lock().unwrap();
            ranks.push_back(Ok(RawJudgeOutput::default()));
            ranks.push_back(Err(CollaboratorError::QuotaExhausted("429".into())));
        }
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(3));
        let mut state = fresh_state();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();
        assert!(err.is_quota_exhausted());
        assert_eq!(state.round_index(), 1);
    }

    #[tokio::test]
    async fn test_alternate_judge_used_when_primary_fails() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        fixture
            .judge
            .ranks
            .lock()
            .unwrap()
            .push_back(Err(CollaboratorError::Timeout(std::time::Duration::from_secs(1))));
        fixture.judge.compares.lock().unwrap().push_back(Ok(RawJudgeOutput {
            best_label: "critic".to_string(),
            ..RawJudgeOutput::default()
        }));
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        let record = &outcome.trace.records()[0];
        assert_eq!(record.verdict_source, VerdictSource::Alternate);
        assert_eq!(record.winner, "Critic");
    }

    #[tokio::test]
    async fn test_quota_error_ends_session() {
        let mut experts = ScriptedExperts::responding(&["Analyst"]);
        experts.quota_on_answer = true;
        let (use_case, _) = Fixture::new(experts).use_case(DeliberationParams::default());
        let mut state = fresh_state();
        let before = state.clone();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();
        assert!(err.is_quota_exhausted());
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_failed_answers_are_dropped() {
        let mut experts = ScriptedExperts::responding(&["Analyst", "Critic"]);
        experts.failing_answers.insert("Analyst".to_string());
        let (use_case, _) =
            Fixture::new(experts).use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        let names: Vec<&str> = outcome.trace.records()[0]
            .candidates
            .iter()
            .map(|c| c.expert_name.as_str())
            .collect();
        assert_eq!(names, vec!["Critic"]);
        assert_eq!(outcome.winner, "Critic");
    }

    #[tokio::test]
    async fn test_all_answers_failing_fails_round() {
        let mut experts = ScriptedExperts::responding(&["Analyst"]);
        experts.failing_answers.insert("Analyst".to_string());
        let (use_case, _) = Fixture::new(experts).use_case(DeliberationParams::default());
        let mut state = fresh_state();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();
        assert!(matches!(err, RunDeliberationError::AllExpertsFailed));
        assert_eq!(state.round_index(), 0);
    }

    #[tokio::test]
    async fn test_router_failure_uses_mode_default() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Critic"]));
        fixture.router = FixedRouter(Err(CollaboratorError::Unavailable("router down".into())));
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case
            .execute(&mut state, input().with_mode(RoundMode::Attack))
            .await
            .unwrap();
        assert_eq!(outcome.routing_label, RoutingLabel::Critical);
    }

    #[tokio::test]
    async fn test_summarizer_failure_keeps_summary() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst"]));
        fixture.summarizer = EchoSummarizer::failing();
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        assert_eq!(outcome.summary, "");
        assert_eq!(state.summary(), "");
    }

    #[tokio::test]
    async fn test_meta_failure_continues_conservatively() {
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst"]));
        fixture.meta = ScriptedMeta::with(vec![Err(CollaboratorError::Malformed(
            deliberate_domain::DomainError::malformed("stop_label", "missing"),
        ))]);
        let (use_case, _) = fixture.use_case(DeliberationParams::default().with_max_rounds(2));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        assert_eq!(outcome.trace.len(), 2);
        assert_eq!(outcome.trace.records()[0].meta, MetaEvaluation::conservative());
    }

    #[tokio::test]
    async fn test_overrides_persist_into_state() {
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Planner"]))
            .use_case(DeliberationParams::default().with_max_rounds(1));
        let mut state = fresh_state();

        let outcome = use_case
            .execute(
                &mut state,
                input().with_goal("Ship a plan").with_mode(RoundMode::Plan),
            )
            .await
            .unwrap();
        assert_eq!(state.goal(), "Ship a plan");
        assert_eq!(state.mode(), RoundMode::Plan);
        assert_eq!(outcome.goal, "Ship a plan");
        assert_eq!(outcome.mode, RoundMode::Plan);
    }

    #[tokio::test]
    async fn test_judge_payload_kept_when_requested() {
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Analyst"]))
            .use_case(DeliberationParams::default().with_max_rounds(1).with_judge_payload(true));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        let payload = outcome.trace.records()[0].judge_payload.clone().unwrap();
        assert!(payload.contains("[Analyst]"));
    }

    #[tokio::test]
    async fn test_invalid_params_rejected() {
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Analyst"]))
            .use_case(DeliberationParams::default().with_top_k(0));
        let mut state = fresh_state();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();
        assert!(matches!(err, RunDeliberationError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_round() {
        let token = CancellationToken::new();
        token.cancel();
        let (use_case, _) = Fixture::new(ScriptedExperts::responding(&["Analyst"]))
            .use_case(DeliberationParams::default());
        let use_case = use_case.with_cancellation(token);
        let mut state = fresh_state();

        let err = use_case.execute(&mut state, input()).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(state.round_index(), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_round_keeps_previous_round() {
        let token = CancellationToken::new();
        let mut fixture = Fixture::new(ScriptedExperts::responding(&["Analyst", "Critic"]));
        fixture.summarizer = EchoSummarizer::cancelling_on(2, token.clone());
        fixture.meta = ScriptedMeta::with(vec![Ok(meta(StopLabel::Continue)
            .with_router_hint("weigh sources")
            .with_role_hint("critic", "attack step 2"))]);
        let (use_case, _) = fixture.use_case(DeliberationParams::default());
        let use_case = use_case.with_cancellation(token);
        let mut state = fresh_state();

        use_case
            .execute(&mut state, input().with_max_rounds(1))
            .await
            .unwrap();
        let after_first = state.clone();
        assert_eq!(after_first.round_index(), 1);
        assert_eq!(after_first.hint_for("critic"), "attack step 2");

        let err = use_case.execute(&mut state, input()).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(state, after_first);
        assert_eq!(state.round_index(), 1);
        assert_eq!(state.history(), after_first.history());
        assert_eq!(state.hint_snapshot(), after_first.hint_snapshot());
    }

    #[tokio::test]
    async fn test_selection_respects_top_k() {
        let (use_case, experts) = Fixture::new(ScriptedExperts::responding(&[
            "Analyst",
            "Critic",
            "Planner",
            "Historian",
        ]))
        .use_case(DeliberationParams::default().with_max_rounds(1).with_top_k(2));
        let mut state = fresh_state();

        let outcome = use_case.execute(&mut state, input()).await.unwrap();
        assert_eq!(outcome.trace.records()[0].candidates.len(), 2);
        assert_eq!(experts.answered.lock().unwrap().len(), 2);
    }
}
