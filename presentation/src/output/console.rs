//! Console output formatter for deliberation results

use colored::Colorize;
use deliberate_application::RunDeliberationError;
use deliberate_domain::{DeliberationOutcome, OutputFormat, RoundRecord, truncate};

/// Longest judge payload printed in a round report
pub const PAYLOAD_DISPLAY_LIMIT: usize = 4000;

/// Provider switches printed after a quota failure
const PROVIDER_SWITCHES: &[&str] = &[
    "DELIBERATE_LM=anthropic/claude-3-haiku-20240307 ANTHROPIC_API_KEY=sk-ant-...",
    "DELIBERATE_LM=gemini/gemini-2.5-pro-preview-03-25 GEMINI_API_KEY=...",
    "DELIBERATE_LM=ollama_chat/llama3.2 DELIBERATE_API_BASE=http://localhost:11434/v1 (no key)",
];

/// Formats deliberation outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (or back to terminal detection)
    pub fn set_color_enabled(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// Render an outcome in the requested format
    pub fn render(format: OutputFormat, outcome: &DeliberationOutcome) -> String {
        match format {
            OutputFormat::Full => Self::format(outcome),
            OutputFormat::Answer => Self::format_answer_only(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete outcome: every round, then the final answer
    pub fn format(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Deliberation Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            outcome.query
        ));
        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), outcome.goal));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Mode:".cyan().bold(),
            outcome.mode,
            "Rounds:".cyan().bold(),
            outcome.rounds
        ));

        for record in outcome.trace.iter() {
            output.push('\n');
            output.push_str(&Self::format_round(record));
        }

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Winner: {}", outcome.winner).yellow().bold(),
            outcome.answer.trim()
        ));
        if !outcome.rationale.trim().is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Why:".dimmed(),
                outcome.rationale.trim()
            ));
        }
        output.push_str(&format!(
            "\n{} {}\n",
            "Status:".cyan().bold(),
            Self::status_text(outcome)
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Report for one completed round
    pub fn format_round(record: &RoundRecord) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            format!(
                "── Round {} · {} · {} ──",
                record.round, record.mode, record.routing_label
            )
            .cyan()
            .bold()
        ));
        output.push_str(&format!("{} {}\n", "Goal:".dimmed(), record.goal));

        output.push_str(&format!("{}\n", "Candidates:".bold()));
        for candidate in &record.candidates {
            let label = if candidate.expert_name == record.winner {
                format!("[{}] *", candidate.expert_name).green().bold()
            } else {
                format!("[{}]", candidate.expert_name).yellow().bold()
            };
            output.push_str(&format!(
                "  {}\n{}\n",
                label,
                Self::indent(candidate.text.trim(), "    ")
            ));
        }

        output.push_str(&format!(
            "{} {} ({})\n",
            "Judge:".bold(),
            record.winner,
            Self::source_text(record)
        ));
        if !record.judge_rationale.trim().is_empty() {
            output.push_str(&format!("  {}\n", record.judge_rationale.trim()));
        }

        if let Some(payload) = &record.judge_payload {
            output.push_str(&format!("{}\n", "Judge payload:".dimmed()));
            output.push_str(&Self::indent(
                &truncate(payload, PAYLOAD_DISPLAY_LIMIT),
                "  | ",
            ));
            output.push('\n');
        }

        let meta = &record.meta;
        output.push_str(&format!(
            "{} {} | route {:.2} | quality {:.2} | align {:.2}\n",
            "Meta:".bold(),
            meta.stop_label.as_str(),
            meta.scores.route,
            meta.scores.quality,
            meta.scores.alignment
        ));

        if !meta.router_hint.trim().is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "router hint:".dimmed(),
                meta.router_hint.trim()
            ));
        }
        for (role, hint) in meta.role_hints.iter().filter(|(_, h)| !h.trim().is_empty()) {
            output.push_str(&format!("  {} {}\n", format!("{} hint:", role).dimmed(), hint.trim()));
        }

        if !record.summary.trim().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Summary:".bold(),
                record.summary.trim()
            ));
        }

        output
    }

    /// Format as JSON, trace included
    pub fn format_json(outcome: &DeliberationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Only the final answer
    pub fn format_answer_only(outcome: &DeliberationOutcome) -> String {
        outcome.answer.trim().to_string()
    }

    /// Diagnostic line for a failed deliberation
    pub fn format_error(error: &RunDeliberationError) -> String {
        if error.is_quota_exhausted() {
            let mut text = format!(
                "{} {}\n{}",
                "Quota exhausted:".red().bold(),
                error,
                "The provider refused for quota or rate reasons. Switch provider with:".dimmed()
            );
            for switch in PROVIDER_SWITCHES {
                text.push_str(&format!("\n  {}", switch));
            }
            text
        } else if error.is_cancelled() {
            "Cancelled.".yellow().to_string()
        } else {
            format!("{} {}", "Error:".red().bold(), error)
        }
    }

    fn status_text(outcome: &DeliberationOutcome) -> String {
        let text = outcome.status.to_string();
        if outcome.status.is_terminal() {
            text.green().to_string()
        } else {
            text
        }
    }

    fn source_text(record: &RoundRecord) -> &'static str {
        match record.verdict_source {
            deliberate_domain::VerdictSource::Primary => "ranked",
            deliberate_domain::VerdictSource::ParsedRanking => "ranking recovered",
            deliberate_domain::VerdictSource::BestLabelOnly => "best label only",
            deliberate_domain::VerdictSource::Alternate => "fallback comparison",
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_domain::{
        ExpertAnswer, MetaEvaluation, MetaScores, RoundMode, RoutingLabel, SessionStatus,
        StopLabel, Trace, VerdictSource,
    };

    fn record(payload: Option<String>) -> RoundRecord {
        RoundRecord {
            round: 2,
            mode: RoundMode::Verify,
            goal: "Find the flaw".to_string(),
            routing_label: RoutingLabel::Critical,
            candidates: vec![
                ExpertAnswer::new("Analyst", "The lemma is fine."),
                ExpertAnswer::new("Critic", "Step 3 divides by zero."),
            ],
            winner: "Critic".to_string(),
            ranking: vec!["Critic".to_string(), "Analyst".to_string()],
            judge_rationale: "Concrete counterexample.".to_string(),
            judge_payload: payload,
            verdict_source: VerdictSource::Primary,
            meta: MetaEvaluation::new(
                StopLabel::Contradiction,
                MetaScores::new(0.5, 0.75, 1.0).unwrap(),
            )
            .with_role_hint("analyst", "check step 3"),
            summary: "Critic found a division by zero.".to_string(),
        }
    }

    fn outcome() -> DeliberationOutcome {
        let mut trace = Trace::new();
        trace.push(record(None));
        DeliberationOutcome::from_trace("Is the proof sound?", trace, SessionStatus::StoppedContradiction)
            .unwrap()
    }

    #[test]
    fn test_round_report_lines() {
        let report = ConsoleFormatter::format_round(&record(None));
        assert!(report.contains("Round 2 · verify · critical"));
        assert!(report.contains("Step 3 divides by zero."));
        assert!(report.contains("contradiction | route 0.50 | quality 0.75 | align 1.00"));
        assert!(report.contains("check step 3"));
        assert!(report.contains("Critic found a division by zero."));
        assert!(!report.contains("Judge payload"));
    }

    #[test]
    fn test_payload_truncated() {
        let payload = "x".repeat(PAYLOAD_DISPLAY_LIMIT * 2);
        let report = ConsoleFormatter::format_round(&record(Some(payload)));
        let longest = report.lines().map(|l| l.len()).max().unwrap();
        assert!(longest <= PAYLOAD_DISPLAY_LIMIT + 4);
        assert!(report.contains("..."));
    }

    #[test]
    fn test_answer_only() {
        assert_eq!(
            ConsoleFormatter::render(OutputFormat::Answer, &outcome()),
            "Step 3 divides by zero."
        );
    }

    #[test]
    fn test_json_carries_trace() {
        let json = ConsoleFormatter::render(OutputFormat::Json, &outcome());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["winner"], "Critic");
        assert_eq!(value["status"], "stopped_contradiction");
        assert_eq!(value["trace"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_full_report_contains_rounds_and_answer() {
        let report = ConsoleFormatter::render(OutputFormat::Full, &outcome());
        assert!(report.contains("Is the proof sound?"));
        assert!(report.contains("Round 2"));
        assert!(report.contains("Winner: Critic"));
    }

    #[test]
    fn test_quota_error_diagnostic() {
        let text = ConsoleFormatter::format_error(&RunDeliberationError::QuotaExhausted(
            "429".to_string(),
        ));
        assert!(text.contains("quota"));
        assert!(text.contains("DELIBERATE_LM=anthropic/"));
        assert!(text.contains("ANTHROPIC_API_KEY"));
        assert!(text.contains("DELIBERATE_LM=ollama_chat/llama3.2"));
        assert!(text.contains("no key"));
    }
}
