// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexical helpers (spec.md §2 component A): whitespace/comment skipping,
//! bracket matching, and `key:value` splitting. Everything here is a pure
//! function over `&str` — no state, no diagnostics beyond `Option`/`bool`.

use wf_core::ScalarValue;

/// `true` for an empty line or a line that is only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// `true` for a `//` comment line that is *not* a `//desc:` annotation.
/// Plain comments are skipped entirely by the statement parser.
pub fn is_plain_comment(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("//") && parse_desc_comment(t).is_none()
}

/// Extracts `TEXT` from a `//desc:TEXT` line, trimmed.
pub fn parse_desc_comment(line: &str) -> Option<&str> {
    let t = line.trim();
    t.strip_prefix("//desc:").map(str::trim)
}

/// Net bracket delta for one line: `+1` per `open`, `-1` per `close`,
/// ignoring brackets that appear inside a double-quoted run so that a
/// literal like `"a {b} c"` doesn't perturb block matching.
pub fn net_bracket_delta(line: &str, open: char, close: char) -> i64 {
    let mut delta = 0i64;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                chars.next();
            }
            c if !in_quotes && c == open => delta += 1,
            c if !in_quotes && c == close => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Finds the index (byte offset) of the bracket matching the one at
/// `open_idx` (which must hold `open`), scanning forward and tracking
/// nesting depth. Ignores brackets inside double-quoted runs.
pub fn find_matching(s: &str, open_idx: usize, open: char, close: char) -> Option<usize> {
    let bytes: Vec<char> = s.chars().collect();
    let start = s[..open_idx].chars().count();
    debug_assert_eq!(bytes.get(start), Some(&open));
    let mut depth = 0i64;
    let mut in_quotes = false;
    let mut i = start;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => i += 1,
            c if !in_quotes && c == open => depth += 1,
            c if !in_quotes && c == close => {
                depth -= 1;
                if depth == 0 {
                    let char_len: usize = bytes[..=i].iter().map(|c| c.len_utf8()).sum();
                    return Some(char_len - bytes[i].len_utf8());
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits `s` on top-level `sep` occurrences only: commas (or whatever
/// separator) nested inside `()`, `[]`, `{}`, or a quoted string are not
/// split points. Empty trailing segments are dropped, matching the
/// grammar's optional trailing comma (`Param ("," Param)*`).
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\\' if in_quotes => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '(' | '[' | '{' if !in_quotes => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' if !in_quotes => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 && !in_quotes => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Splits `s` at the first top-level `:` (outside quotes/brackets),
/// returning `(key, value)` trimmed. Used for `key: value` pairs in
/// param lists, input-map entries, and metadata trailers.
pub fn split_first_colon(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | '[' | '{' if !in_quotes => depth += 1,
            ')' | ']' | '}' if !in_quotes => depth -= 1,
            ':' if depth == 0 && !in_quotes => {
                return Some((s[..i].trim(), s[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}

/// `true` if `s` (trimmed) is wrapped in a matching pair of double quotes.
pub fn is_quoted(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 2 && t.starts_with('"') && t.ends_with('"')
}

/// Strips one layer of surrounding double quotes, if present.
pub fn strip_quotes(s: &str) -> &str {
    let t = s.trim();
    if is_quoted(t) {
        &t[1..t.len() - 1]
    } else {
        t
    }
}

/// Classifies a literal token per spec §4.1's input-map / argument rules:
/// quoted -> string, `true`/`false` -> bool, integer-parsable -> int64,
/// float-parsable -> float64, else -> the literal text as a string
/// fallback.
pub fn classify_literal(token: &str) -> ScalarValue {
    let t = token.trim();
    if is_quoted(t) {
        return ScalarValue::String(strip_quotes(t).to_string());
    }
    match t {
        "true" => return ScalarValue::Bool(true),
        "false" => return ScalarValue::Bool(false),
        "nil" | "null" => return ScalarValue::Null,
        _ => {}
    }
    if let Ok(i) = t.parse::<i64>() {
        return ScalarValue::Int(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return ScalarValue::Float(f);
    }
    ScalarValue::String(t.to_string())
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
