// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `var input = map[string]interface{}{ ... }` parsing (spec.md §4.1
//! "Input-map parsing"). The `map[string]interface{}` type annotation is
//! accepted but not required — a bare `var input = { ... }` parses the
//! same way ("relaxed" form per the grammar comment).

use crate::lexer::{classify_literal, is_blank, is_plain_comment, split_first_colon, split_top_level};
use indexmap::IndexMap;
use wf_core::ScalarValue;

/// Parses the body of an input declaration (the text between the
/// outermost `{` and `}`, across however many lines it spanned) into an
/// ordered key→scalar map.
pub fn parse_input_body(body: &str) -> IndexMap<String, ScalarValue> {
    let mut map = IndexMap::new();
    for entry in split_top_level(body, ',') {
        let entry = entry.trim();
        if entry.is_empty() || is_blank(entry) || is_plain_comment(entry) {
            continue;
        }
        if let Some((key, value)) = split_first_colon(entry) {
            let key = key.trim().trim_matches('"').to_string();
            map.insert(key, classify_literal(value));
        }
    }
    map
}

#[cfg(test)]
#[path = "input_decl_tests.rs"]
mod tests;
