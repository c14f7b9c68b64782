//! Recovers a JSON payload from free-form model output.
//!
//! Each stage is a pure `&str -> Result<JsonValue>` function tried in order;
//! the first success wins. None of them is a real parser: a recovered value is
//! "probably what the model meant", nothing stronger.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

type Stage = fn(&str) -> Result<JsonValue>;

const STAGES: &[(&str, Stage)] = &[
    ("direct", parse_direct),
    ("cleaned", parse_cleaned),
    ("repaired", parse_repaired),
    ("questions_fragment", parse_questions_fragment),
    ("object_array", parse_object_array),
];

/// Runs the stage cascade on the first fenced block, then on the whole reply.
/// A fence may be prose or sit inside a JSON string, so the interior alone is
/// never the only candidate.
pub fn extract_json(raw: &str) -> Result<JsonValue> {
    let candidates = fenced_block(raw)
        .into_iter()
        .map(|inner| ("fenced", inner))
        .chain(std::iter::once(("raw", raw)));

    for (source_name, source) in candidates {
        for (name, stage) in STAGES {
            match stage(source) {
                Ok(value) => {
                    tracing::debug!(
                        source = source_name,
                        stage = name,
                        "recovered JSON from model response"
                    );
                    return Ok(value);
                }
                Err(e) => tracing::debug!(
                    source = source_name,
                    stage = name,
                    error = %e,
                    "extraction stage failed"
                ),
            }
        }
    }

    tracing::warn!(
        response_len = raw.len(),
        "no extraction stage could recover JSON"
    );
    Err(Error::Extraction(
        "could not recover JSON from model response".to_string(),
    ))
}

/// Pulls the question records out of a recovered payload.
pub fn questions_array(value: JsonValue) -> Result<Vec<JsonValue>> {
    match value {
        JsonValue::Object(mut map) => match map.remove("questions") {
            Some(JsonValue::Array(items)) => Ok(items),
            Some(_) => Err(Error::Schema("\"questions\" is not an array".to_string())),
            None => Err(Error::Schema(
                "response JSON has no \"questions\" array".to_string(),
            )),
        },
        JsonValue::Array(items) => Ok(items),
        _ => Err(Error::Schema("response JSON is not an object".to_string())),
    }
}

/// Interior of the first fenced code block; an unterminated fence runs to the end.
fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body_start = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let body = &after[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    let inner = body[..end].trim();
    (!inner.is_empty()).then_some(inner)
}

fn parse_json(text: &str) -> Result<JsonValue> {
    let value: JsonValue = serde_json::from_str(text.trim())
        .map_err(|e| Error::Extraction(format!("invalid JSON: {}", e)))?;
    if value.is_object() || value.is_array() {
        Ok(value)
    } else {
        Err(Error::Extraction("JSON is not an object or array".to_string()))
    }
}

fn parse_with_repairs(text: &str) -> Result<JsonValue> {
    parse_json(text).or_else(|_| parse_json(&repair(text)))
}

fn parse_direct(source: &str) -> Result<JsonValue> {
    parse_json(source)
}

fn parse_cleaned(source: &str) -> Result<JsonValue> {
    parse_json(&trim_to_braces(&normalize_text(source)))
}

fn parse_repaired(source: &str) -> Result<JsonValue> {
    parse_json(&repair(&trim_to_braces(&normalize_text(source))))
}

fn parse_questions_fragment(source: &str) -> Result<JsonValue> {
    static QUESTIONS_KEY: OnceLock<Regex> = OnceLock::new();
    let re = QUESTIONS_KEY
        .get_or_init(|| Regex::new(r#""questions"\s*:\s*\["#).expect("valid questions regex"));

    let text = normalize_text(source);
    let found = re
        .find(&text)
        .ok_or_else(|| Error::Extraction("no \"questions\" array found".to_string()))?;
    let open = found.end() - 1;
    let fragment = array_fragment(&text, open)
        .ok_or_else(|| Error::Extraction("unterminated \"questions\" array".to_string()))?;
    parse_with_repairs(&format!("{{\"questions\": {}}}", fragment))
}

fn parse_object_array(source: &str) -> Result<JsonValue> {
    static OBJECT_ARRAY: OnceLock<Regex> = OnceLock::new();
    let re = OBJECT_ARRAY.get_or_init(|| Regex::new(r"\[\s*\{").expect("valid array regex"));

    let text = normalize_text(source);
    let found = re
        .find(&text)
        .ok_or_else(|| Error::Extraction("no array of objects found".to_string()))?;
    let fragment = array_fragment(&text, found.start())
        .ok_or_else(|| Error::Extraction("unterminated array of objects".to_string()))?;
    parse_with_repairs(&format!("{{\"questions\": {}}}", fragment))
}

/// The array opening at byte `open`, or, when the response was cut off, every
/// complete object before the cut closed with `]`.
fn array_fragment(text: &str, open: usize) -> Option<String> {
    if let Some(close) = matching_bracket(text, open) {
        return Some(text[open..=close].to_string());
    }
    let last_object = text[open..].rfind('}')? + open;
    Some(format!("{}]", &text[open..=last_object]))
}

fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[open..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ']').then_some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drops `**` emphasis, turns line breaks inside strings into spaces and
/// collapses whitespace runs between tokens.
fn normalize_text(text: &str) -> String {
    let text = text.replace("**", "");
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_space = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' | '\r' => out.push(' '),
                _ => out.push(c),
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    out
}

fn trim_to_braces(text: &str) -> String {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => text[start..=end].to_string(),
        _ => text.to_string(),
    }
}

fn repair(text: &str) -> String {
    let text = escape_stray_backslashes(text);
    let text = escape_inner_quotes(&text);
    let text = strip_trailing_commas(&text);
    let text = strip_control_chars(&text);
    collapse_string_newlines(&text)
}

fn escape_stray_backslashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }
        let valid = match chars.get(i + 1) {
            Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => true,
            Some('u') => chars
                .get(i + 2..i + 6)
                .map(|hex| hex.iter().all(|h| h.is_ascii_hexdigit()))
                .unwrap_or(false),
            _ => false,
        };
        if valid {
            out.push(c);
            out.push(chars[i + 1]);
            i += 2;
        } else {
            out.push_str("\\\\");
            i += 1;
        }
    }
    out
}

/// A quote inside a string only closes it when the next token is `,` `:` `}` `]`
/// or the end of input; any other quote is escaped.
fn escape_inner_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            i += 1;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.get(i + 1) {
                    out.push(*next);
                }
                i += 2;
                continue;
            }
            '"' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if matches!(next, None | Some(',' | ':' | '}' | ']')) {
                    in_string = false;
                    out.push('"');
                } else {
                    out.push_str("\\\"");
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// Drops a comma whose next token closes an object or array. Commas inside
/// string values are left alone.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

fn collapse_string_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                '\n' | '\r' | '\t' => {
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    out
}
