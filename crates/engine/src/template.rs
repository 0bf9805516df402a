// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{{name}}` template expansion (spec.md §4.2 "Template expansion").
//!
//! Substitution is a single left-to-right scan; nested braces and
//! escapes aren't supported, matching the spec. An unresolved name
//! leaves the literal `{{name}}` in the output untouched.

use wf_core::VariableTable;

/// Expands every `{{name}}` occurrence in `content` against `variables`.
pub fn expand(content: &str, variables: &VariableTable) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let name = &after_open[..close];
                match variables.value(name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[close + 2..];
            }
            None => {
                // Unterminated `{{` — emit it verbatim and stop scanning.
                out.push_str("{{");
                rest = after_open;
                out.push_str(rest);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
