// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn desc_comment_recognized() {
    assert_eq!(parse_desc_comment("//desc:creates the user"), Some("creates the user"));
    assert_eq!(parse_desc_comment("  //desc: trimmed  "), Some("trimmed"));
}

#[test]
fn plain_comment_is_not_desc() {
    assert!(is_plain_comment("// just a comment"));
    assert!(!is_plain_comment("//desc:attached"));
    assert!(!is_plain_comment("step1()"));
}

#[test]
fn bracket_delta_ignores_quoted_braces() {
    assert_eq!(net_bracket_delta("if err != nil {", '{', '}'), 1);
    assert_eq!(net_bracket_delta("}", '{', '}'), -1);
    assert_eq!(
        net_bracket_delta(r#"x := "hi {{name}} bye""#, '{', '}'),
        0
    );
}

#[test]
fn find_matching_handles_nesting() {
    let s = "func(a, (b), c)";
    let open = s.find('(').unwrap();
    let close = find_matching(s, open, '(', ')').unwrap();
    assert_eq!(&s[open..=close], "(a, (b), c)");
}

#[test]
fn split_top_level_respects_brackets_and_quotes() {
    let parts = split_top_level(r#"input["a,b"], variable, "lit,eral""#, ',');
    assert_eq!(parts, vec![r#"input["a,b"]"#, "variable", r#""lit,eral""#]);
}

#[test]
fn split_top_level_drops_trailing_comma() {
    let parts = split_top_level("a, b,", ',');
    assert_eq!(parts, vec!["a", "b"]);
}

#[test]
fn split_first_colon_ignores_nested_colons() {
    let (k, v) = split_first_colon(r#"timeout: 5000"#).unwrap();
    assert_eq!(k, "timeout");
    assert_eq!(v, "5000");
}

#[test]
fn classify_literal_variants() {
    assert_eq!(classify_literal("\"hi\""), ScalarValue::String("hi".into()));
    assert_eq!(classify_literal("true"), ScalarValue::Bool(true));
    assert_eq!(classify_literal("false"), ScalarValue::Bool(false));
    assert_eq!(classify_literal("42"), ScalarValue::Int(42));
    assert_eq!(classify_literal("3.5"), ScalarValue::Float(3.5));
    assert_eq!(classify_literal("bareword"), ScalarValue::String("bareword".into()));
}
