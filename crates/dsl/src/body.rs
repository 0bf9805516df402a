// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Main-body statement parsing (spec.md §4.1 "Main-body parsing",
//! "Description extraction") and the if/else REDESIGN of spec §9.

use crate::call_site::{parse_args, parse_metadata, parse_returns};
use crate::error::ParseError;
use crate::lexer::{find_matching, is_blank, is_plain_comment, net_bracket_delta, parse_desc_comment, strip_quotes};
use wf_core::{
    ArgExpr, BindingSource, ScalarValue, Statement, StatementMeta, Step, VariableBinding,
    VariableTable,
};

/// One source line, paired with its 1-indexed line number.
pub type NumberedLine<'a> = (usize, &'a str);

/// Parses every statement in `lines[start..end]` (the exclusive bounds
/// of one `{ ... }` block, not counting the brace lines themselves).
pub fn parse_statements(
    lines: &[NumberedLine<'_>],
    start: usize,
    end: usize,
    steps: &[Step],
    variables: &mut VariableTable,
) -> Result<Vec<Statement>, ParseError> {
    let mut out = Vec::new();
    let mut i = start;
    let mut pending_desc: Option<String> = None;

    while i < end {
        let (line_no, raw) = lines[i];
        let trimmed = raw.trim();

        if is_blank(trimmed) {
            pending_desc = None;
            i += 1;
            continue;
        }
        if let Some(desc) = parse_desc_comment(trimmed) {
            pending_desc = Some(desc.to_string());
            i += 1;
            continue;
        }
        if is_plain_comment(trimmed) {
            i += 1;
            continue;
        }

        let desc = pending_desc.take().unwrap_or_default();

        if trimmed.starts_with("if ") || trimmed.starts_with("else if ") {
            let (stmt, next_i) = parse_if_chain(lines, i, end, steps, variables, desc)?;
            out.push(stmt);
            i = next_i;
            continue;
        }

        if let Some((scope, content)) = parse_print(trimmed) {
            let meta = StatementMeta::new(line_no).with_desc(desc);
            out.push(Statement::Print {
                content,
                step_scope: scope,
                meta,
            });
            i += 1;
            continue;
        }

        if trimmed == "return" || trimmed == "return;" || trimmed.starts_with("return ") {
            out.push(Statement::Return {
                meta: StatementMeta::new(line_no).with_desc(desc),
            });
            i += 1;
            continue;
        }

        if trimmed.contains('(') {
            let stmt = parse_call(line_no, trimmed, steps, variables, desc)?;
            out.push(stmt);
            i += 1;
            continue;
        }

        if trimmed.contains(":=") {
            let stmt = parse_var(line_no, trimmed, variables, desc);
            out.push(stmt);
            i += 1;
            continue;
        }

        out.push(Statement::Other {
            text: trimmed.to_string(),
            meta: StatementMeta::new(line_no).with_desc(desc),
        });
        i += 1;
    }

    Ok(out)
}

/// Finds the index of the line that closes the brace opened on
/// `open_idx`'s line (spec §9 balanced-brace scanning, reused for `if`
/// blocks, `func main() { ... }`, and multi-line step declarations).
pub fn find_block_end(lines: &[NumberedLine<'_>], open_idx: usize, end: usize) -> Option<usize> {
    let mut depth = 0i64;
    for (i, (_, raw)) in lines.iter().enumerate().take(end).skip(open_idx) {
        depth += net_bracket_delta(raw, '{', '}');
        if depth == 0 && i >= open_idx {
            return Some(i);
        }
    }
    None
}

/// Parses an `if`/`else if` statement starting at `lines[i]`, including
/// any `else`/`else if` chain that immediately follows its closing
/// brace. Returns the statement and the index of the line after the
/// whole chain.
///
/// Spec §9 REDESIGN: `else`/`else if` are folded into an explicit
/// `else_children` field rather than left as fragile sibling statements.
fn parse_if_chain(
    lines: &[NumberedLine<'_>],
    i: usize,
    end: usize,
    steps: &[Step],
    variables: &mut VariableTable,
    desc: String,
) -> Result<(Statement, usize), ParseError> {
    let (line_no, raw) = lines[i];
    let trimmed = raw.trim();
    let after_keyword = trimmed
        .strip_prefix("else if ")
        .or_else(|| trimmed.strip_prefix("if "))
        .unwrap_or(trimmed);
    let condition = after_keyword
        .trim_end()
        .trim_end_matches('{')
        .trim()
        .to_string();

    let close_idx = find_block_end(lines, i, end)
        .ok_or(ParseError::UnterminatedBlock { line: line_no })?;
    let children = parse_statements(lines, i + 1, close_idx, steps, variables)?;
    let mut next_i = close_idx + 1;

    let mut else_children = Vec::new();
    if let Some((peek_no, peek_raw)) = peek_non_blank(lines, next_i, end) {
        let peek_trimmed = peek_raw.trim();
        if peek_trimmed == "else {" {
            let else_close = find_block_end(lines, index_of(lines, peek_no, next_i), end)
                .ok_or(ParseError::UnterminatedBlock { line: peek_no })?;
            let else_start = index_of(lines, peek_no, next_i);
            else_children = parse_statements(lines, else_start + 1, else_close, steps, variables)?;
            next_i = else_close + 1;
        } else if peek_trimmed.starts_with("else if ") {
            let else_if_idx = index_of(lines, peek_no, next_i);
            let (nested, after) =
                parse_if_chain(lines, else_if_idx, end, steps, variables, String::new())?;
            else_children = vec![nested];
            next_i = after;
        }
    }

    Ok((
        Statement::If {
            condition,
            children,
            else_children,
            meta: StatementMeta::new(line_no).with_desc(desc),
        },
        next_i,
    ))
}

fn peek_non_blank<'a>(
    lines: &[NumberedLine<'a>],
    from: usize,
    end: usize,
) -> Option<(usize, &'a str)> {
    lines[from..end]
        .iter()
        .find(|(_, raw)| !is_blank(raw.trim()) && !is_plain_comment(raw.trim()))
        .copied()
}

fn index_of(lines: &[NumberedLine<'_>], line_no: usize, from: usize) -> usize {
    lines[from..]
        .iter()
        .position(|(n, _)| *n == line_no)
        .map(|p| p + from)
        .unwrap_or(from)
}

/// Recognizes `sys.Print(...)`, `fmt.Print(...)`, and `<ident>.Printf(...)`
/// / `<ident>.Println(...)` (spec §4.1 "Main-body parsing").
fn parse_print(line: &str) -> Option<(Option<String>, String)> {
    let dot_idx = line.find('.')?;
    let prefix = &line[..dot_idx];
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let rest = &line[dot_idx + 1..];
    for method in ["Printf", "Println", "Print"] {
        if let Some(after_method) = rest.strip_prefix(method) {
            if let Some(paren_rest) = after_method.trim_start().strip_prefix('(') {
                let open = line.len() - paren_rest.len() - 1;
                let close = find_matching(line, open, '(', ')')?;
                let inner = line[open + 1..close].trim();
                let content = strip_quotes(inner).to_string();
                let scope = if prefix == "sys" || prefix == "fmt" {
                    None
                } else {
                    Some(prefix.to_string())
                };
                return Some((scope, content));
            }
        }
    }
    None
}

fn parse_var(
    line_no: usize,
    trimmed: &str,
    variables: &mut VariableTable,
    desc: String,
) -> Statement {
    let (name, rhs) = trimmed
        .split_once(":=")
        .map(|(n, r)| (n.trim().to_string(), r.trim().trim_end_matches(';').trim().to_string()))
        .unwrap_or_else(|| (trimmed.to_string(), String::new()));

    variables.set(
        name.clone(),
        VariableBinding {
            name: name.clone(),
            r#type: "string".to_string(),
            value: ScalarValue::String(strip_quotes(&rhs).to_string()),
            source: BindingSource::Assignment,
            line_num: line_no,
            is_input: false,
        },
    );

    Statement::Var {
        name,
        rhs,
        meta: StatementMeta::new(line_no).with_desc(desc),
    }
}

fn parse_call(
    line_no: usize,
    trimmed: &str,
    steps: &[Step],
    variables: &mut VariableTable,
    desc: String,
) -> Result<Statement, ParseError> {
    let (call_part, metadata_src) = match trimmed.find("){") {
        Some(idx) => {
            let close = find_matching(trimmed, idx + 1, '{', '}')
                .ok_or(ParseError::UnterminatedBlock { line: line_no })?;
            (
                &trimmed[..=idx],
                trimmed[idx + 2..close].trim(),
            )
        }
        None => (trimmed.trim_end_matches(';').trim(), ""),
    };

    let open_paren = call_part.find('(').ok_or(ParseError::MalformedStepDecl {
        line: line_no,
        reason: "call statement missing `(`".to_string(),
        src: trimmed.to_string(),
    })?;

    let (lhs, rhs_call) = match find_assign_before(call_part, open_paren) {
        Some((op_start, op_len)) => (
            call_part[..op_start].trim(),
            call_part[op_start + op_len..].trim(),
        ),
        None => ("", call_part.trim()),
    };

    let call_open = rhs_call.find('(').ok_or(ParseError::MalformedStepDecl {
        line: line_no,
        reason: "call expression missing `(`".to_string(),
        src: trimmed.to_string(),
    })?;
    let step_name = rhs_call[..call_open].trim().to_string();
    let call_close = find_matching(rhs_call, call_open, '(', ')')
        .ok_or(ParseError::UnterminatedBlock { line: line_no })?;
    let args_src = &rhs_call[call_open + 1..call_close];
    let args: Vec<ArgExpr> = parse_args(args_src);

    let output_params = steps
        .iter()
        .find(|s| s.name == step_name)
        .map(|s| s.output_params.clone())
        .unwrap_or_default();

    let return_bindings = parse_returns(&step_name, lhs, &output_params, line_no);
    let mut returns = Vec::with_capacity(return_bindings.len());
    for binding in return_bindings {
        variables.set(
            binding.slot.name.clone(),
            VariableBinding {
                name: binding.slot.name.clone(),
                r#type: binding.slot.declared_type.clone(),
                value: ScalarValue::Null,
                source: BindingSource::Step {
                    name: step_name.clone(),
                },
                line_num: line_no,
                is_input: false,
            },
        );
        if binding.original_name == "err" {
            variables.alias("err", &binding.slot.name);
        }
        returns.push(binding.slot);
    }

    let metadata = parse_metadata(metadata_src);

    Ok(Statement::Call {
        step_name,
        args,
        returns,
        metadata,
        meta: StatementMeta::new(line_no).with_desc(desc),
    })
}

/// Finds `":="` or a standalone `"="` (not `==`, `!=`, `<=`, `>=`) before
/// `before`, outside quotes. Returns `(byte_index, operator_len)`.
fn find_assign_before(s: &str, before: usize) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut in_quotes = false;
    let mut i = 0;
    while i < before {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b':' if !in_quotes && i + 1 < before && bytes[i + 1] == b'=' => {
                return Some((i, 2));
            }
            b'=' if !in_quotes => {
                let prev_not_op = i == 0 || !matches!(bytes[i - 1], b'!' | b'=' | b'<' | b'>' | b':');
                let next_not_eq = i + 1 >= s.len() || bytes[i + 1] != b'=';
                if prev_not_op && next_not_eq {
                    return Some((i, 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
