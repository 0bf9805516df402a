// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call-site argument/return/metadata parsing and the variable renaming
//! discipline (spec.md §4.1 "Argument classification", "Metadata tail",
//! "Variable renaming rule (CRITICAL)").

use crate::lexer::{is_quoted, split_first_colon, split_top_level, strip_quotes};
use wf_core::{ArgExpr, Metadata, ParamDecl, ReturnSlot, ScalarValue};

/// Classifies the comma-separated call-site arguments between a call's
/// parens (spec §3 `ArgExpr`, §4.1 "Argument classification"). Per spec,
/// classification checks only `input[...]`, the number rule, and the
/// quoted-string rule, in that order; everything else is assumed to be a
/// variable reference.
pub fn parse_args(s: &str) -> Vec<ArgExpr> {
    split_top_level(s, ',')
        .into_iter()
        .map(|token| classify_arg(&token))
        .collect()
}

fn classify_arg(token: &str) -> ArgExpr {
    let t = token.trim();
    if let Some(key) = parse_input_ref(t) {
        return ArgExpr::InputRef { key };
    }
    if is_quoted(t) {
        return ArgExpr::StringLiteral {
            value: strip_quotes(t).to_string(),
        };
    }
    if let Ok(i) = t.parse::<i64>() {
        return ArgExpr::NumericLiteral {
            value: ScalarValue::Int(i),
        };
    }
    if let Ok(f) = t.parse::<f64>() {
        return ArgExpr::NumericLiteral {
            value: ScalarValue::Float(f),
        };
    }
    ArgExpr::VariableRef {
        name: t.to_string(),
    }
}

/// Recognizes `input["KEY"]` (or `input['KEY']`), returning the
/// unquoted key.
fn parse_input_ref(t: &str) -> Option<String> {
    let inner = t.strip_prefix("input[")?.strip_suffix(']')?;
    let inner = inner.trim();
    if (inner.starts_with('"') && inner.ends_with('"') && inner.len() >= 2)
        || (inner.starts_with('\'') && inner.ends_with('\'') && inner.len() >= 2)
    {
        Some(inner[1..inner.len() - 1].to_string())
    } else {
        Some(inner.to_string())
    }
}

/// Parses a `{k: v, k: v, ...}` metadata trailer (spec §3.3). Unknown
/// keys are preserved and forwarded verbatim; values are classified the
/// same way as literals elsewhere (bool, int, quoted string, bare string).
pub fn parse_metadata(s: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for part in split_top_level(s, ',') {
        if let Some((k, v)) = split_first_colon(&part) {
            metadata.insert(k.to_string(), classify_literal(v));
        }
    }
    metadata
}

/// One call-site return binding, paired with the bare name written at
/// the call site before the §4.1 renaming rule was applied (needed so
/// the caller can register the `err` alias in `Program.variables`).
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnBinding {
    pub slot: ReturnSlot,
    pub original_name: String,
}

/// Applies the variable renaming rule (spec §4.1, CRITICAL): a bare
/// `err` is unconditionally renamed to `<stepName>Err`; every other name
/// is used verbatim. `declared_type`/`desc` are copied positionally from
/// the step's `output_params`, falling back to an empty type when the
/// call supplies more returns than the step declares outputs (arity
/// mismatches are an execution-time concern, spec §9 Open Question).
pub fn parse_returns(
    step_name: &str,
    lhs: &str,
    output_params: &[ParamDecl],
    line_number: usize,
) -> Vec<ReturnBinding> {
    if lhs.trim().is_empty() {
        return Vec::new();
    }
    split_top_level(lhs, ',')
        .into_iter()
        .enumerate()
        .map(|(i, bare)| {
            let bare = bare.trim().to_string();
            let declared_type = output_params
                .get(i)
                .map(|p| p.r#type.clone())
                .unwrap_or_default();
            let final_name = if bare == "err" {
                format!("{step_name}Err")
            } else {
                bare.clone()
            };
            ReturnBinding {
                slot: ReturnSlot {
                    name: final_name,
                    declared_type,
                    source_step: step_name.to_string(),
                    line_number,
                },
                original_name: bare,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "call_site_tests.rs"]
mod tests;
