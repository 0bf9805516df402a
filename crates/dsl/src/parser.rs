// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level parse orchestration (spec.md §4.1 "Grammar", "Main-body
//! parsing"): input declaration, step table, then `func main() { ... }`.

use crate::body::{find_block_end, parse_statements, NumberedLine};
use crate::error::ParseError;
use crate::input_decl::parse_input_body;
use crate::lexer::{is_blank, is_plain_comment, net_bracket_delta};
use crate::step_decl::parse_step_decl;
use wf_core::{Program, VariableTable};

/// Parses a UTF-8 workflow source string into a [`Program`] (spec §4.1).
///
/// An empty (or whitespace-only) source parses successfully into an
/// empty program. Otherwise a `func main() { ... }` block is required.
pub fn parse(src: &str) -> Result<Program, ParseError> {
    if src.trim().is_empty() {
        return Ok(Program::new());
    }

    let lines: Vec<NumberedLine<'_>> = src.lines().enumerate().map(|(i, l)| (i + 1, l)).collect();

    let main_idx = find_main_line(&lines).ok_or(ParseError::MissingMain)?;

    let input_vars = parse_input_decl(&lines[..main_idx])?;
    let steps = parse_step_decls(&lines[..main_idx])?;

    let body_open = main_idx;
    let body_close = find_block_end(&lines, body_open, lines.len()).ok_or(
        ParseError::UnmatchedBraces {
            location: "main body".to_string(),
        },
    )?;

    let mut variables = VariableTable::new();
    let main = parse_statements(&lines, body_open + 1, body_close, &steps, &mut variables)?;

    let mut program = Program::new();
    program.input_vars = input_vars;
    program.steps = steps;
    program.main = main;
    program.variables = variables;
    tracing::debug!(
        steps = program.steps.len(),
        statements = program.main.len(),
        input_vars = program.input_vars.len(),
        "parsed workflow program"
    );
    Ok(program)
}

fn find_main_line(lines: &[NumberedLine<'_>]) -> Option<usize> {
    lines
        .iter()
        .position(|(_, raw)| raw.trim_start().starts_with("func main("))
}

/// Parses the `var input = map[string]interface{}{ ... }` declaration
/// (spec §4.1 "Input-map parsing"), if present, scanning only the
/// step-declaration region of the source (before `func main`).
fn parse_input_decl(
    lines: &[NumberedLine<'_>],
) -> Result<indexmap::IndexMap<String, wf_core::ScalarValue>, ParseError> {
    let Some(start) = lines
        .iter()
        .position(|(_, raw)| raw.trim_start().starts_with("var input"))
    else {
        return Ok(indexmap::IndexMap::new());
    };
    let (line_no, first_raw) = lines[start];
    // `map[string]interface{}{` embeds a balanced `{}` in the type
    // annotation itself, so the body's opening brace is the *last* `{`
    // on the declaration line, not the first.
    let open = first_raw.rfind('{').ok_or(ParseError::MalformedInputDecl {
        line: line_no,
        reason: "expected `{` to open the input map".to_string(),
    })?;
    let mut depth = net_bracket_delta(&first_raw[open..], '{', '}');
    let mut body = first_raw[open + 1..].to_string();
    let mut i = start;
    while depth > 0 {
        i += 1;
        if i >= lines.len() {
            return Err(ParseError::MalformedInputDecl {
                line: line_no,
                reason: "unterminated input map".to_string(),
            });
        }
        let (_, raw) = lines[i];
        depth += net_bracket_delta(raw, '{', '}');
        body.push('\n');
        body.push_str(raw);
    }
    // Strip the trailing `}` that closed the map.
    if let Some(last_close) = body.rfind('}') {
        body.truncate(last_close);
    }
    Ok(parse_input_body(&body))
}

/// Parses every step declaration between (an optional) input decl and
/// `func main`, buffering multi-line declarations until parens balance
/// and a terminating `;` is found (spec §4.1 "Multi-line step
/// declarations").
fn parse_step_decls(lines: &[NumberedLine<'_>]) -> Result<Vec<wf_core::Step>, ParseError> {
    let mut steps = Vec::new();
    let mut first_seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    let mut i = 0;
    while i < lines.len() {
        let (line_no, raw) = lines[i];
        let trimmed = raw.trim();
        if is_blank(trimmed) || is_plain_comment(trimmed) || trimmed.starts_with("var input") {
            i += 1;
            continue;
        }
        if !looks_like_step_decl(trimmed) {
            i += 1;
            continue;
        }

        let mut buf = trimmed.to_string();
        let mut paren_depth = net_bracket_delta(trimmed, '(', ')');
        while paren_depth != 0 || !buf.trim_end().ends_with(';') {
            i += 1;
            if i >= lines.len() {
                return Err(ParseError::UnterminatedBlock { line: line_no });
            }
            let (_, next_raw) = lines[i];
            paren_depth += net_bracket_delta(next_raw, '(', ')');
            buf.push(' ');
            buf.push_str(next_raw.trim());
            if paren_depth == 0 && buf.trim_end().ends_with(';') {
                break;
            }
        }

        let decl_src = buf.trim().trim_end_matches(';');
        let step = parse_step_decl(line_no, decl_src)?;
        if let Some(&prev_line) = first_seen.get(&step.name) {
            return Err(ParseError::DuplicateStep {
                name: step.name,
                first_line: prev_line,
                line: line_no,
            });
        }
        tracing::debug!(step = %step.name, kind = ?step.kind, "parsed step declaration");
        first_seen.insert(step.name.clone(), line_no);
        steps.push(step);
        i += 1;
    }

    Ok(steps)
}

/// Heuristic for "this line starts a step declaration": an identifier,
/// `=`, then a qualified path leading into `[` or `(` before any `{`
/// (which would indicate we've wandered into something else, e.g. a
/// stray input-decl continuation line).
fn looks_like_step_decl(trimmed: &str) -> bool {
    let Some(eq) = trimmed.find('=') else {
        return false;
    };
    if trimmed[..eq].trim().is_empty() {
        return false;
    }
    let rhs = &trimmed[eq + 1..];
    rhs.contains("->") || rhs.contains('[') || rhs.contains('(')
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
