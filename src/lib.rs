// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
mod grammar;
mod interpreter;
mod parser;
mod token;

pub use self::common::{Error, ErrorCode, Result};
pub use self::grammar::{Grammar, GrammarRule, Symbol, is_allowed_char, is_operator_char};
pub use self::interpreter::eval;
pub use self::parser::{NodeId, ParseNode, ParseTree, parse};
pub use self::token::{Lexer, Spanned, Token, tokenize};

/// Receives the outcome of an evaluation; implemented by the presentation
/// layer.  For every submitted expression at most one of the two methods is
/// invoked: `report_result` on success, `report_error` on the first
/// lexer/parser/evaluator failure, and neither when the input is empty.
pub trait Reporter {
    fn report_result(&mut self, value: f64);
    fn report_error(&mut self, message: &str);
}

/// An expression evaluator.  All calculators share the process-wide grammar
/// and parse table; each call owns its tokens, parse tree, and value stack,
/// so no state leaks between evaluations.
pub struct Calculator {
    grammar: &'static Grammar,
}

impl Calculator {
    pub fn new() -> Calculator {
        Calculator {
            grammar: Grammar::global(),
        }
    }

    /// Run the full pipeline on one expression.  `Ok(None)` means the input
    /// was empty: there is no value, but nothing went wrong either.
    pub fn eval(&self, input: &str) -> Result<Option<f64>> {
        let tokens = token::tokenize(input)?;
        let tree = parser::parse(&tokens, self.grammar)?;
        interpreter::eval(&tree)
    }

    /// Evaluate and report through the callback boundary.
    pub fn evaluate(&self, input: &str, out: &mut dyn Reporter) {
        match self.eval(input) {
            Ok(Some(value)) => out.report_result(value),
            Ok(None) => {}
            Err(err) => out.report_error(&err.to_string()),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}
