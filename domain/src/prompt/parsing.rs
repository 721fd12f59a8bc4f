//! Response parsing for collaborator calls.
//!
//! Collaborators are asked for `KEY: value` lines (see
//! [`crate::prompt::PromptTemplate`]). Models sometimes answer with a JSON
//! object instead, or decorate keys with markdown; both are accepted.
//!
//! | Function | Call | Required fields |
//! |----------|------|-----------------|
//! | [`parse_gate_response`] | expert gate | RESPOND, CONFIDENCE |
//! | [`parse_answer_response`] | expert answer | ANSWER (or whole text) |
//! | [`parse_judge_response`] | judge / compare | none; normalized later |
//! | [`parse_summary_response`] | summarizer | SUMMARY (or whole text) |
//! | [`parse_meta_response`] | meta-critic | STOP |
//! | [`parse_route_response`] | router | LABEL (or any label word) |

use crate::core::error::DomainError;
use crate::core::mode::RoutingLabel;
use crate::deliberation::meta::{MetaEvaluation, MetaScores, StopLabel};
use crate::expert::gate::{GateDecision, parse_coverage_tags};
use crate::judge::verdict::RawJudgeOutput;
use std::collections::BTreeMap;

/// Extract `KEY: value` fields from a response.
///
/// Keys are upper-cased with spaces and dashes turned into underscores.
/// Lines that do not start a new key continue the previous value. A
/// response that is nothing but a JSON object (bare or in one fenced code
/// block) is read key by key instead; braces inside a value never switch
/// the parser to JSON.
pub fn parse_fields(response: &str) -> BTreeMap<String, String> {
    if let Some(fields) = parse_json_fields(response) {
        return fields;
    }

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in response.lines() {
        if let Some((key, value)) = split_field_line(line) {
            fields.insert(key.clone(), value.to_string());
            current = Some(key);
        } else if let Some(key) = &current
            && let Some(value) = fields.get_mut(key)
        {
            value.push('\n');
            value.push_str(line);
        }
    }

    for value in fields.values_mut() {
        *value = value.trim().to_string();
    }
    fields
}

/// The reply body when the whole reply is a JSON object.
fn json_object_body(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    let body = match trimmed.strip_prefix("```") {
        Some(fenced) => {
            let inner = fenced.strip_suffix("```")?;
            // Skip the info string (`json`) on the opening fence line.
            let (_, rest) = inner.split_once('\n')?;
            rest.trim()
        }
        None => trimmed,
    };
    (body.starts_with('{') && body.ends_with('}')).then_some(body)
}

fn parse_json_fields(response: &str) -> Option<BTreeMap<String, String>> {
    let body = json_object_body(response)?;
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s.trim().to_string(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => other.to_string(),
                };
                (normalize_key(k), text)
            })
            .collect(),
    )
}

fn split_field_line(line: &str) -> Option<(String, &str)> {
    let trimmed = line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '-' | '#'));
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim().trim_matches('*');
    if key.is_empty()
        || key.len() > 40
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '-'))
    {
        return None;
    }
    Some((normalize_key(key), value.trim().trim_start_matches('*').trim()))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase().replace([' ', '-'], "_")
}

fn required<'a>(fields: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str, DomainError> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::malformed(key.to_lowercase(), "missing"))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, DomainError> {
    let word = raw
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|w| !w.is_empty())
        .unwrap_or("")
        .to_lowercase();
    match word.as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        _ => Err(DomainError::malformed(field, format!("'{}' is not yes/no", raw))),
    }
}

/// Parse a number, accepting a trailing `%` as a percentage.
fn parse_unit(field: &str, raw: &str) -> Result<f64, DomainError> {
    let token = raw.split_whitespace().next().unwrap_or("");
    let (number, scale) = match token.strip_suffix('%') {
        Some(n) => (n, 100.0),
        None => (token.trim_end_matches(|c: char| !c.is_ascii_digit()), 1.0),
    };
    number
        .parse::<f64>()
        .map(|v| v / scale)
        .map_err(|_| DomainError::malformed(field, format!("'{}' is not a number", raw)))
}

/// Parse a gate response into a validated [`GateDecision`].
pub fn parse_gate_response(response: &str) -> Result<GateDecision, DomainError> {
    let fields = parse_fields(response);
    let respond = parse_bool("respond", required(&fields, "RESPOND")?)?;
    let confidence = parse_unit("confidence", required(&fields, "CONFIDENCE")?)?;
    let tags = fields
        .get("COVERAGE")
        .or_else(|| fields.get("COVERAGE_TAGS"))
        .map(|raw| parse_coverage_tags(raw))
        .unwrap_or_default();
    GateDecision::new(respond, confidence, tags)
}

/// Parse an answer; falls back to the whole response when no ANSWER field.
pub fn parse_answer_response(response: &str) -> Result<String, DomainError> {
    let fields = parse_fields(response);
    let answer = fields
        .get("ANSWER")
        .cloned()
        .unwrap_or_else(|| response.trim().to_string());
    if answer.is_empty() {
        return Err(DomainError::malformed("answer", "empty"));
    }
    Ok(answer)
}

/// Parse a judge or comparison response without validating labels.
pub fn parse_judge_response(response: &str) -> RawJudgeOutput {
    let fields = parse_fields(response);
    let get = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| fields.get(*k).cloned())
            .unwrap_or_default()
    };
    RawJudgeOutput {
        best_label: get(&["BEST", "BEST_LABEL"]),
        rankings: get(&["RANKING", "RANKINGS"]),
        rationale: get(&["RATIONALE", "REASON"]),
        raw_text: Some(response.to_string()),
    }
}

pub fn parse_summary_response(response: &str) -> Result<String, DomainError> {
    let fields = parse_fields(response);
    let summary = fields
        .get("SUMMARY")
        .cloned()
        .unwrap_or_else(|| response.trim().to_string());
    if summary.is_empty() {
        return Err(DomainError::malformed("summary", "empty"));
    }
    Ok(summary)
}

/// Parse a meta-critic response.
///
/// Role hints come from `HINT_<ROLE>` fields; missing scores count as zero.
pub fn parse_meta_response(response: &str) -> Result<MetaEvaluation, DomainError> {
    let fields = parse_fields(response);
    let stop_label: StopLabel = fields
        .get("STOP")
        .or_else(|| fields.get("STOP_LABEL"))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::malformed("stop_label", "missing"))?
        .parse()?;

    let score = |key: &str| -> Result<f64, DomainError> {
        match fields.get(key).filter(|v| !v.is_empty()) {
            Some(raw) => parse_unit(&key.to_lowercase(), raw),
            None => Ok(0.0),
        }
    };
    let scores = MetaScores::new(
        score("ROUTE_SCORE")?,
        score("QUALITY_SCORE")?,
        score("ALIGNMENT_SCORE")?,
    )?;

    let mut meta = MetaEvaluation::new(stop_label, scores)
        .with_router_hint(fields.get("ROUTER_HINT").cloned().unwrap_or_default());
    for (key, value) in &fields {
        if let Some(role) = key.strip_prefix("HINT_") {
            meta = meta.with_role_hint(role, value.clone());
        }
    }
    Ok(meta)
}

/// Parse a router response into a routing label.
pub fn parse_route_response(response: &str) -> Result<RoutingLabel, DomainError> {
    let fields = parse_fields(response);
    if let Some(raw) = fields.get("LABEL")
        && let Some(label) = RoutingLabel::find_in(raw)
    {
        return Ok(label);
    }
    RoutingLabel::find_in(response).ok_or_else(|| DomainError::malformed("label", "no routing label found"))
}
