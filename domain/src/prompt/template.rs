//! Prompt templates for each collaborator call.
//!
//! Every template asks for `KEY: value` lines so the responses can be read
//! back by [`crate::prompt::parsing`].

use crate::core::string::truncate;
use crate::deliberation::state::{Message, Role};
use crate::expert::context::ExpertContext;
use crate::judge::verdict::ExpertAnswer;

/// History is clipped to this many most recent messages in prompts.
const HISTORY_WINDOW: usize = 8;
const HISTORY_ENTRY_MAX: usize = 600;

/// Templates for generating collaborator prompts
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Expert ====================

    pub fn expert_system(name: &str, persona: &str) -> String {
        format!(
            "You are {}, one expert on a deliberation panel. {}\n\
             Work toward the session goal and stay within your specialty.",
            name, persona
        )
    }

    /// Gate prompt: should this expert answer at all?
    pub fn gate_prompt(ctx: &ExpertContext) -> String {
        let mut prompt = Self::context_block(ctx);
        prompt.push_str(
            r#"
Decide whether you should answer this question this round.
Reply with exactly these lines:
RESPOND: yes or no
CONFIDENCE: a number between 0 and 1
COVERAGE: comma separated topic tags your answer would cover"#,
        );
        prompt
    }

    pub fn answer_prompt(ctx: &ExpertContext) -> String {
        let mut prompt = Self::context_block(ctx);
        prompt.push_str(
            r#"
Answer the question from your perspective. Be concrete and concise.
Reply with:
ANSWER: your answer"#,
        );
        prompt
    }

    // ==================== Judge ====================

    pub fn judge_system() -> &'static str {
        r#"You are an impartial judge comparing candidate answers from a panel of experts.
Prefer answers that are correct, specific, and serve the stated goal."#
    }

    /// Labeled candidate block, also kept as the judge payload.
    pub fn candidate_block(candidates: &[ExpertAnswer]) -> String {
        candidates
            .iter()
            .map(|c| format!("[{}]\n{}", c.expert_name, c.text.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn judge_prompt(question: &str, payload: &str) -> String {
        format!(
            r#"Question: {}

Candidates:
{}

Rank the candidates by label, best first.
Reply with exactly these lines:
BEST: the best label
RANKING: labels separated by >, for example A > B > C
RATIONALE: one short paragraph"#,
            question, payload
        )
    }

    /// Simpler comparison prompt used when the ranking call fails.
    pub fn compare_prompt(question: &str, candidates: &[ExpertAnswer]) -> String {
        let labels = candidates
            .iter()
            .map(|c| c.expert_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"Question: {}

{}

Which answer is best: {}?
Reply with:
BEST: the label
RATIONALE: one sentence"#,
            question,
            Self::candidate_block(candidates),
            labels
        )
    }

    // ==================== Summarizer ====================

    pub fn summarize_prompt(history: &[Message], latest_answer: &str) -> String {
        format!(
            r#"Conversation so far:
{}

Latest answer:
{}

Write a running summary of the discussion in at most 120 words.
Reply with:
SUMMARY: the summary"#,
            Self::history_block(history),
            latest_answer.trim()
        )
    }

    // ==================== Meta-critic ====================

    pub fn meta_system() -> &'static str {
        r#"You are a meta-critic supervising a multi-round deliberation.
Decide whether the discussion has reached an irreducible truth, hit a contradiction, or should continue.
Give short, actionable hints to the router and to individual experts."#
    }

    #[allow(clippy::too_many_arguments)]
    pub fn meta_prompt(
        query: &str,
        goal: &str,
        mode: &str,
        routing_label: &str,
        answer: &str,
        rationale: &str,
        summary: &str,
        roles: &[String],
    ) -> String {
        let mut prompt = format!(
            r#"Question: {}
Goal: {}
Mode: {}
Routing label: {}

Winning answer:
{}

Judge rationale: {}
Running summary: {}

Reply with exactly these lines:
STOP: continue, irreducible_truth, or contradiction
ROUTE_SCORE: 0 to 1
QUALITY_SCORE: 0 to 1
ALIGNMENT_SCORE: 0 to 1
ROUTER_HINT: hint for routing the next round, or blank
"#,
            query,
            goal,
            mode,
            routing_label,
            answer.trim(),
            rationale.trim(),
            summary.trim()
        );
        for role in roles {
            prompt.push_str(&format!(
                "HINT_{}: hint for the {} expert, or blank\n",
                role.to_uppercase(),
                role
            ));
        }
        prompt
    }

    // ==================== Router ====================

    pub fn route_prompt(query: &str, history: &[Message], goal: &str, mode: &str, guidance: &str) -> String {
        let mut prompt = format!(
            "Question: {}\nGoal: {}\nMode: {}\n",
            query, goal, mode
        );
        if !history.is_empty() {
            prompt.push_str(&format!("\nConversation so far:\n{}\n", Self::history_block(history)));
        }
        if !guidance.trim().is_empty() {
            prompt.push_str(&format!("\nRouting guidance:\n{}\n", guidance.trim()));
        }
        prompt.push_str(
            r#"
Classify what kind of thinking this question needs.
Reply with:
LABEL: analytic, creative, critical, or plan"#,
        );
        prompt
    }

    // ==================== Helpers ====================

    fn context_block(ctx: &ExpertContext) -> String {
        let mut block = format!(
            "Question: {}\nGoal: {}\nMode: {}\nRouting label: {}\n",
            ctx.query, ctx.goal, ctx.mode, ctx.routing_label
        );
        if !ctx.summary.trim().is_empty() {
            block.push_str(&format!("Summary so far: {}\n", ctx.summary.trim()));
        }
        if !ctx.history.is_empty() {
            block.push_str(&format!("\nConversation so far:\n{}\n", Self::history_block(&ctx.history)));
        }
        if !ctx.hint.trim().is_empty() {
            block.push_str(&format!("\nNotes from earlier rounds:\n{}\n", ctx.hint.trim()));
        }
        block
    }

    fn history_block(history: &[Message]) -> String {
        if history.is_empty() {
            return "(none)".to_string();
        }
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        history[start..]
            .iter()
            .map(|m| {
                let who = match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                format!("{}: {}", who, truncate(m.content.trim(), HISTORY_ENTRY_MAX))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
