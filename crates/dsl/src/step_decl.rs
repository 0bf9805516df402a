// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step declaration parsing (spec.md §4.1 "Step declaration parsing").

use crate::error::ParseError;
use crate::lexer::{find_matching, split_first_colon, split_top_level, strip_quotes};
use wf_core::{ParamDecl, Step, StepKind};

/// Parses one step declaration's source (the `name = ... -> (...)` text,
/// already assembled from however many physical lines it spanned, with
/// the trailing `;` stripped).
pub fn parse_step_decl(line: usize, src: &str) -> Result<Step, ParseError> {
    let src = src.trim();

    let eq_idx = top_level_index_of(src, '=').ok_or_else(|| ParseError::MalformedStepDecl {
        line,
        reason: "expected `name = ...`".to_string(),
        src: src.to_string(),
    })?;
    let name = src[..eq_idx].trim().to_string();
    let rhs = src[eq_idx + 1..].trim();

    let arrow_idx = rhs.find("->").ok_or_else(|| ParseError::MalformedStepDecl {
        line,
        reason: "missing `->` between input and output param lists".to_string(),
        src: src.to_string(),
    })?;
    let input_part = rhs[..arrow_idx].trim();
    let output_part = rhs[arrow_idx + 2..].trim();

    let (qualified_function, kind, input_params) = parse_input_part(line, src, input_part)?;
    let output_params = parse_output_part(line, src, output_part)?;

    Ok(Step {
        name,
        qualified_function,
        kind,
        input_params,
        output_params,
        logs: Vec::new(),
    })
}

fn top_level_index_of(s: &str, needle: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | '[' | '{' if !in_quotes => depth += 1,
            ')' | ']' | '}' if !in_quotes => depth -= 1,
            c if !in_quotes && depth == 0 && c == needle => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_input_part(
    line: usize,
    full_src: &str,
    input_part: &str,
) -> Result<(String, StepKind, Vec<ParamDecl>), ParseError> {
    if let Some(bracket_idx) = input_part.find('[') {
        // STATIC: `qualified.path[CaseID]`
        let close = find_matching(input_part, bracket_idx, '[', ']').ok_or_else(|| {
            ParseError::MalformedStepDecl {
                line,
                reason: "unmatched `[` in static step declaration".to_string(),
                src: full_src.to_string(),
            }
        })?;
        let qualified_function = input_part[..bracket_idx].trim().to_string();
        let case_id = strip_quotes(input_part[bracket_idx + 1..close].trim()).to_string();
        Ok((qualified_function, StepKind::Static { case_id }, Vec::new()))
    } else if let Some(paren_idx) = input_part.find('(') {
        // DYNAMIC: `qualified.path(params...)`
        let close = find_matching(input_part, paren_idx, '(', ')').ok_or_else(|| {
            ParseError::MalformedStepDecl {
                line,
                reason: "unmatched `(` in dynamic step declaration".to_string(),
                src: full_src.to_string(),
            }
        })?;
        let qualified_function = input_part[..paren_idx].trim().to_string();
        let params = parse_param_list(&input_part[paren_idx + 1..close]);
        Ok((qualified_function, StepKind::Dynamic, params))
    } else {
        Err(ParseError::MalformedStepDecl {
            line,
            reason: "input part has neither `[case_id]` nor `(params)`".to_string(),
            src: full_src.to_string(),
        })
    }
}

fn parse_output_part(
    line: usize,
    full_src: &str,
    output_part: &str,
) -> Result<Vec<ParamDecl>, ParseError> {
    let trimmed = output_part.trim_end_matches(';').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let open = trimmed.find('(').ok_or_else(|| ParseError::MalformedStepDecl {
        line,
        reason: "output param list must be wrapped in `(...)`".to_string(),
        src: full_src.to_string(),
    })?;
    let close = find_matching(trimmed, open, '(', ')').ok_or_else(|| {
        ParseError::MalformedStepDecl {
            line,
            reason: "unmatched `(` in output param list".to_string(),
            src: full_src.to_string(),
        }
    })?;
    Ok(parse_param_list(&trimmed[open + 1..close]))
}

/// Parses a comma-separated param list, tolerating both the new
/// `name: type "desc"` form and the legacy `type name` form (spec §4.1).
fn parse_param_list(s: &str) -> Vec<ParamDecl> {
    split_top_level(s, ',')
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(|token| parse_param(&token))
        .collect()
}

fn parse_param(token: &str) -> ParamDecl {
    let token = token.trim();
    if let Some((name, rest)) = split_first_colon(token) {
        // New form: `name: type "desc"`
        let rest = rest.trim();
        let (r#type, desc) = match rest.find(char::is_whitespace) {
            Some(ws) => {
                let r#type = rest[..ws].trim();
                let desc = strip_quotes(rest[ws..].trim());
                (r#type, desc)
            }
            None => (rest, ""),
        };
        ParamDecl::new(name, r#type, desc)
    } else {
        // Legacy form: `type name`
        let mut words = token.split_whitespace();
        let r#type = words.next().unwrap_or_default();
        let name = words.collect::<Vec<_>>().join(" ");
        ParamDecl::new(name, r#type, "")
    }
}

#[cfg(test)]
#[path = "step_decl_tests.rs"]
mod tests;
