//! Best-effort recovery of a JSON object from model text.
//!
//! Models wrap JSON in code fences, prose, or leave trailing commas. Recovery
//! tries, in order: the whole text, fenced blocks, each balanced `{...}` span,
//! and finally the outermost `{` .. `}` slice, repairing trailing commas along
//! the way.

use serde_json::Value;

/// Recover the first JSON object in `text`. A document that is entirely a
/// JSON array is returned as-is.
pub fn recover_object(text: &str) -> Option<Value> {
    let text = text.trim().trim_start_matches('\u{feff}');
    if text.is_empty() {
        return None;
    }

    if let Some(v) = parse_document(text) {
        return Some(v);
    }

    for block in fenced_blocks(text) {
        if let Some(v) = parse_document(block) {
            return Some(v);
        }
        if let Some(v) = first_balanced_object(block) {
            return Some(v);
        }
    }

    if let Some(v) = first_balanced_object(text) {
        return Some(v);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&text[start..=end])
}

fn parse_document(text: &str) -> Option<Value> {
    let text = text.trim();
    match parse_lenient(text)? {
        v @ (Value::Object(_) | Value::Array(_)) => Some(v),
        _ => None,
    }
}

fn parse_object(text: &str) -> Option<Value> {
    parse_lenient(text).filter(Value::is_object)
}

fn parse_lenient(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .ok()
        .or_else(|| serde_json::from_str(&strip_trailing_commas(text)).ok())
}

/// Contents of each ``` fenced block, language tag removed.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        // Skip the info string (`json`, `JSON`, ...) up to the line break.
        let body_start = after_open.find('\n').map_or(0, |i| i + 1);
        let body = &after_open[body_start..];
        match body.find("```") {
            Some(close) => {
                blocks.push(&body[..close]);
                rest = &body[close + 3..];
            }
            None => {
                blocks.push(body);
                break;
            }
        }
    }
    blocks
}

/// Return the first balanced `{...}` span (by opening position) that parses
/// as an object.
fn first_balanced_object(text: &str) -> Option<Value> {
    let mut spans = balanced_spans(text);
    spans.sort_unstable();
    spans
        .into_iter()
        .find_map(|(start, end)| parse_object(&text[start..=end]))
}

/// Every balanced `{...}` span in one string-aware pass from the first `{`.
/// Unmatched braces are skipped rather than rescanned.
fn balanced_spans(text: &str) -> Vec<(usize, usize)> {
    let Some(first) = text.find('{') else {
        return Vec::new();
    };
    let mut spans = Vec::new();
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in text.as_bytes().iter().enumerate().skip(first) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i));
                }
            }
            _ => {}
        }
    }
    spans
}

/// Drop commas that directly precede `}` or `]`, outside strings.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}
