//! Judge output normalization: the single boundary adapter between
//! whatever a judge collaborator returns and [`JudgeVerdict`].
//!
//! | Step | Condition | Result |
//! |------|-----------|--------|
//! | 1 | `rankings` field parses against the candidate labels | [`VerdictSource::Primary`] |
//! | 2 | otherwise, a `>`-separated label list is found in the judge text | [`VerdictSource::ParsedRanking`] |
//! | 3 | otherwise, `best_label` names a candidate | [`VerdictSource::BestLabelOnly`] |
//!
//! Rankings that reference labels outside the candidate set are malformed
//! and rejected as a whole; they never leak into a verdict.

use crate::core::error::DomainError;
use crate::judge::verdict::{JudgeVerdict, RawJudgeOutput, VerdictSource};
use std::collections::HashSet;

const RANK_SEPARATOR: char = '>';

/// Resolve a label against the candidate set (case-insensitive, brackets
/// and quotes stripped). Returns the canonical candidate label.
pub fn canonical_label(raw: &str, labels: &[String]) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '[' | ']' | '"' | '\'' | '`' | '*' | '.'))
        .trim();
    if cleaned.is_empty() {
        return None;
    }
    labels
        .iter()
        .find(|l| l.eq_ignore_ascii_case(cleaned))
        .cloned()
}

/// Parse a `a > b > c` ranking line against the candidate labels.
///
/// - Empty input yields an empty ranking.
/// - Any token that is not a candidate label is [`DomainError::UnknownLabel`].
/// - A label listed twice is [`DomainError::MalformedOutput`].
pub fn parse_ranking(line: &str, labels: &[String]) -> Result<Vec<String>, DomainError> {
    let mut ranking = Vec::new();
    let mut seen = HashSet::new();

    for token in line.split(RANK_SEPARATOR) {
        if token.trim().is_empty() {
            continue;
        }
        let label = canonical_label(token, labels)
            .ok_or_else(|| DomainError::UnknownLabel(token.trim().to_string()))?;
        if !seen.insert(label.clone()) {
            return Err(DomainError::malformed(
                "rankings",
                format!("label '{}' appears more than once", label),
            ));
        }
        ranking.push(label);
    }

    Ok(ranking)
}

/// Scan free text for the first line holding a valid `>`-separated ranking.
///
/// A leading `RANKINGS:`-style prefix on the line is ignored.
pub fn find_ranking_in(text: &str, labels: &[String]) -> Option<Vec<String>> {
    text.lines()
        .filter(|line| line.contains(RANK_SEPARATOR))
        .map(|line| match line.split_once(':') {
            Some((prefix, rest)) if !prefix.contains(RANK_SEPARATOR) => rest,
            _ => line,
        })
        .find_map(|line| parse_ranking(line, labels).ok().filter(|r| !r.is_empty()))
}

/// Normalize a raw judge response into a verdict (ladder steps 1–3).
///
/// `source_if_structured` is the source reported when the structured
/// `rankings` field is usable; the alternate judge call passes
/// [`VerdictSource::Alternate`].
pub fn normalize_verdict(
    raw: RawJudgeOutput,
    labels: &[String],
    source_if_structured: VerdictSource,
) -> JudgeVerdict {
    let mut issues = Vec::new();

    let best_label = if raw.best_label.trim().is_empty() {
        String::new()
    } else {
        match canonical_label(&raw.best_label, labels) {
            Some(label) => label,
            None => {
                issues.push(format!(
                    "best label '{}' is not a candidate",
                    raw.best_label.trim()
                ));
                String::new()
            }
        }
    };

    let structured = match parse_ranking(&raw.rankings, labels) {
        Ok(ranking) => ranking,
        Err(e) => {
            issues.push(format!("rankings rejected: {}", e));
            Vec::new()
        }
    };

    let (ranking, source) = if !structured.is_empty() {
        (structured, source_if_structured)
    } else if let Some(parsed) = find_ranking_in(&raw.rationale, labels).or_else(|| {
        raw.raw_text
            .as_deref()
            .and_then(|text| find_ranking_in(text, labels))
    }) {
        (parsed, VerdictSource::ParsedRanking)
    } else if !best_label.is_empty() {
        (vec![best_label.clone()], VerdictSource::BestLabelOnly)
    } else {
        (Vec::new(), VerdictSource::BestLabelOnly)
    };

    JudgeVerdict {
        best_label,
        ranking,
        rationale: raw.rationale.trim().to_string(),
        payload: None,
        source,
        issues,
    }
}
