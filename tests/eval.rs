// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use calc_engine::{Calculator, ErrorCode, Reporter};
use float_cmp::approx_eq;
use proptest::prelude::*;

#[derive(Default)]
struct Recorder {
    results: Vec<f64>,
    errors: Vec<String>,
}

impl Reporter for Recorder {
    fn report_result(&mut self, value: f64) {
        self.results.push(value);
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn eval_ok(input: &str) -> f64 {
    Calculator::new().eval(input).unwrap().unwrap()
}

fn eval_code(input: &str) -> ErrorCode {
    Calculator::new().eval(input).unwrap_err().code
}

#[test]
fn precedence() {
    assert_eq!(14.0, eval_ok("2+3*4"));
    assert_eq!(20.0, eval_ok("(2+3)*4"));
}

#[test]
fn left_associativity() {
    assert_eq!(5.0, eval_ok("10-3-2"));
    assert_eq!(2.0, eval_ok("20/2/5"));
}

#[test]
fn unary_minus_covers_the_whole_addend() {
    assert_eq!(-6.0, eval_ok("-2*3"));
    assert_eq!(-5.0, eval_ok("-(2+3)"));
}

#[test]
fn mixed_precedence_reference_value() {
    let expected = 3.0 * 4.0 - 4.0 * (55.0 - 6.0 * 6.0 + (-2.0 * 4.0)) / 3.0 / 3.0 % 2.0 - 3.23;
    assert_eq!(expected, eval_ok("3*4-4*(55-6*6+(-2*4))/3/3%2-3.23"));
}

#[test]
fn float_drift_stays_within_ulps() {
    assert!(approx_eq!(f64, eval_ok("0.1+0.2"), 0.3, ulps = 2));
    assert!(approx_eq!(f64, eval_ok("1/3*3"), 1.0, ulps = 2));
}

#[test]
fn division_and_modulo_by_zero() {
    assert_eq!(ErrorCode::DivideByZero, eval_code("5/0"));
    assert_eq!(ErrorCode::DivideByZero, eval_code("5%0"));
}

#[test]
fn malformed_literals() {
    assert_eq!(ErrorCode::MalformedNumber, eval_code("3..4+1"));
    assert_eq!(ErrorCode::MalformedNumber, eval_code("3.+1"));
}

#[test]
fn syntax_errors() {
    assert_eq!(ErrorCode::UnexpectedToken, eval_code("3++"));
    assert_eq!(ErrorCode::UnexpectedToken, eval_code("(3+4"));
}

#[test]
fn result_reported_exactly_once() {
    let mut rec = Recorder::default();
    Calculator::new().evaluate("2+3*4", &mut rec);
    assert_eq!(vec![14.0], rec.results);
    assert!(rec.errors.is_empty());
}

#[test]
fn error_reported_exactly_once() {
    for input in ["3..4", "3++", "5/0"] {
        let mut rec = Recorder::default();
        Calculator::new().evaluate(input, &mut rec);
        assert!(rec.results.is_empty(), "{input}");
        assert_eq!(1, rec.errors.len(), "{input}");
    }
}

#[test]
fn error_messages_name_the_failure() {
    let mut rec = Recorder::default();
    Calculator::new().evaluate("5/0", &mut rec);
    assert_eq!(vec!["0:0:divide_by_zero".to_string()], rec.errors);

    let mut rec = Recorder::default();
    Calculator::new().evaluate("(3+4", &mut rec);
    assert_eq!(
        vec!["4:4:unexpected_token -- expected \")\", found \"$\"".to_string()],
        rec.errors
    );
}

#[test]
fn empty_input_reports_nothing() {
    let calc = Calculator::new();
    assert_eq!(None, calc.eval("").unwrap());

    let mut rec = Recorder::default();
    calc.evaluate("", &mut rec);
    assert!(rec.results.is_empty());
    assert!(rec.errors.is_empty());
}

#[test]
fn failures_leave_no_residue() {
    let calc = Calculator::new();
    let first = calc.eval("5/0");
    let second = calc.eval("5/0");
    assert_eq!(first, second);

    // a failed call must not disturb the next one
    assert_eq!(Some(4.0), calc.eval("2+2").unwrap());
}

/// Expressions that are valid wherever an operand fits: leaves, or signed
/// and binary combinations kept inside parentheses.
fn arb_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..1000, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop_oneof![Just('+'), Just('-'), Just('*')],
                inner.clone()
            )
                .prop_map(|(a, op, b)| format!("({a}{op}{b})")),
            inner.prop_map(|e| format!("(-{e})")),
        ]
    })
}

proptest! {
    #[test]
    fn well_formed_expressions_evaluate_deterministically(expr in arb_expr()) {
        let calc = Calculator::new();
        let first = calc.eval(&expr);
        prop_assert!(matches!(first, Ok(Some(_))), "{expr}: {first:?}");
        prop_assert_eq!(first, calc.eval(&expr));
    }

    #[test]
    fn allowed_alphabet_never_panics(input in "[0-9+*/%().-]{0,24}") {
        let calc = Calculator::new();
        let outcome = calc.eval(&input);

        // at most one callback fires, consistent with the pure outcome
        let mut rec = Recorder::default();
        calc.evaluate(&input, &mut rec);
        match outcome {
            Ok(Some(_)) => prop_assert_eq!((1, 0), (rec.results.len(), rec.errors.len())),
            Ok(None) => prop_assert_eq!((0, 0), (rec.results.len(), rec.errors.len())),
            Err(_) => prop_assert_eq!((0, 1), (rec.results.len(), rec.errors.len())),
        }
    }
}
