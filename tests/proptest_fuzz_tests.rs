//! Property-based fuzzing tests for the treelox scanner, parser and interpreter
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The scanner and parser never panic on arbitrary input
//! 2. Arithmetic agrees with an independent evaluator
//! 3. Execution is deterministic

use proptest::prelude::*;
use treelox::parser::MAX_NESTING_DEPTH;
use treelox::{parse, scan, Interpreter, InterpreterConfig, TokenKind, Value};

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the scanner
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,500}").unwrap()
}

/// Generate sequences of Lox-looking tokens in random order
fn lox_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(lox_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

fn lox_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // Punctuation
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(";".to_string()),
        Just(",".to_string()),
        Just(".".to_string()),
        // Keywords
        Just("var".to_string()),
        Just("print".to_string()),
        Just("if".to_string()),
        Just("else".to_string()),
        Just("while".to_string()),
        Just("for".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("nil".to_string()),
        Just("class".to_string()),
        Just("return".to_string()),
        // Operators
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
        // Literals
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0f64).prop_map(|f| format!("{:.2}", f)),
        r#""[a-zA-Z0-9 ]{0,20}""#.prop_map(|s| s),
        // Identifiers
        "[a-z][a-z0-9_]{0,10}".prop_map(|s| s),
        // Comments
        "//[^\n]{0,20}\n".prop_map(|s| s),
    ]
}

/// Arithmetic expression tree, rendered to source and evaluated independently
#[derive(Debug, Clone)]
enum Arith {
    Num(u32),
    Neg(Box<Arith>),
    Add(Box<Arith>, Box<Arith>),
    Sub(Box<Arith>, Box<Arith>),
    Mul(Box<Arith>, Box<Arith>),
    Div(Box<Arith>, Box<Arith>),
}

impl Arith {
    fn source(&self) -> String {
        match self {
            Arith::Num(n) => n.to_string(),
            Arith::Neg(e) => format!("-({})", e.source()),
            Arith::Add(a, b) => format!("({} + {})", a.source(), b.source()),
            Arith::Sub(a, b) => format!("({} - {})", a.source(), b.source()),
            Arith::Mul(a, b) => format!("({} * {})", a.source(), b.source()),
            Arith::Div(a, b) => format!("({} / {})", a.source(), b.source()),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Arith::Num(n) => f64::from(*n),
            Arith::Neg(e) => -e.value(),
            Arith::Add(a, b) => a.value() + b.value(),
            Arith::Sub(a, b) => a.value() - b.value(),
            Arith::Mul(a, b) => a.value() * b.value(),
            Arith::Div(a, b) => a.value() / b.value(),
        }
    }
}

fn arith_expr() -> impl Strategy<Value = Arith> {
    let leaf = (0u32..100).prop_map(Arith::Num);
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Arith::Neg(Box::new(e))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Arith::Add(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Arith::Sub(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Arith::Mul(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| Arith::Div(Box::new(a), Box::new(b))),
        ]
    })
}

/// Runs `source` with a loop ceiling, since random programs may never halt
fn run_capturing(source: &str) -> (String, Vec<String>) {
    let config = InterpreterConfig::default().with_max_loop_iterations(1_000);
    let mut interpreter = Interpreter::with_output(Vec::new()).with_config(config);
    let errors = treelox::run(source, &mut interpreter);
    let output = String::from_utf8(interpreter.into_output()).unwrap();
    (output, errors.iter().map(|e| e.to_string()).collect())
}

// =============================================================================
// SCANNER AND PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner never panics and always ends with a single Eof
    #[test]
    fn scanner_never_panics(source in arbitrary_source_string()) {
        let (tokens, _) = scan(&source);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    /// Arbitrary unicode input is scanned without panicking
    #[test]
    fn scanner_handles_unicode(source in "\\PC{0,200}") {
        let _ = scan(&source);
    }

    /// The parser never panics on token soup
    #[test]
    fn parser_never_panics(source in lox_like_string()) {
        let (tokens, _) = scan(&source);
        let _ = parse(tokens);
    }

    /// Errors from scanning and parsing all use the diagnostic format
    #[test]
    fn diagnostics_are_formatted(source in lox_like_string()) {
        let (tokens, mut errors) = scan(&source);
        let (_, parse_errors) = parse(tokens);
        errors.extend(parse_errors);
        for error in errors {
            let rendered = error.to_string();
            let expected_prefix = format!("[line {}] Error", error.line());
            prop_assert!(rendered.starts_with(&expected_prefix), "{}", rendered);
        }
    }

    /// Parser handles deeply nested groupings
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..100) {
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
        let (output, errors) = run_capturing(&source);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(output, "1\n");
    }

    /// Nesting past the limit is one diagnostic instead of a stack overflow
    #[test]
    fn parser_rejects_excessive_nesting(depth in MAX_NESTING_DEPTH..10_000) {
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
        let (output, errors) = run_capturing(&source);
        prop_assert!(output.is_empty());
        prop_assert_eq!(errors, vec!["[line 1] Error at '(': Too much nesting.".to_string()]);
    }

    /// Unbalanced parentheses produce diagnostics, never a panic
    #[test]
    fn parser_handles_unbalanced_parens(opens in 0usize..50, closes in 0usize..50) {
        let source = format!("{}1{};", "(".repeat(opens), ")".repeat(closes));
        let (tokens, _) = scan(&source);
        let (_, errors) = parse(tokens);
        prop_assert_eq!(errors.is_empty(), opens == closes);
    }
}

// =============================================================================
// INTERPRETER PROPERTY TESTS
// =============================================================================

proptest! {
    /// Interpreted arithmetic agrees with a direct evaluation of the same tree
    #[test]
    fn arithmetic_matches_reference(expr in arith_expr()) {
        let (tokens, _) = scan(&format!("{};", expr.source()));
        let (statements, errors) = parse(tokens);
        prop_assert!(errors.is_empty());

        let mut interpreter = Interpreter::with_output(Vec::new());
        let value = interpreter.execute(&statements[0]).unwrap();
        let expected = expr.value();
        match value {
            // 0 / 0 yields NaN on both sides, which never compares equal
            Some(Value::Number(n)) if expected.is_nan() => prop_assert!(n.is_nan()),
            other => prop_assert_eq!(other, Some(Value::Number(expected))),
        }
    }

    /// Running the same program on fresh interpreters gives the same result
    #[test]
    fn execution_is_deterministic(source in lox_like_string()) {
        prop_assert_eq!(run_capturing(&source), run_capturing(&source));
    }

    /// A `for` loop prints the same as its hand-written `while` form
    #[test]
    fn for_matches_while(start in 0i32..20, count in 0i32..20, step in 1i32..4) {
        let end = start + count;
        let for_source = format!(
            "for (var i = {start}; i < {end}; i = i + {step}) print i;"
        );
        let while_source = format!(
            "{{ var i = {start}; while (i < {end}) {{ print i; i = i + {step}; }} }}"
        );
        prop_assert_eq!(run_capturing(&for_source), run_capturing(&while_source));
    }

    /// Truthiness: only nil and false are falsy
    #[test]
    fn numbers_and_strings_are_truthy(n in any::<i32>(), s in "[a-z]{0,8}") {
        let source = format!("print !{n}; print !\"{s}\"; print !nil; print !false;");
        let (output, errors) = run_capturing(&source);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(output, "false\nfalse\ntrue\ntrue\n");
    }
}
