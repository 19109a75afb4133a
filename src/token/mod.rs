// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::str::CharIndices;

use crate::common::Result;
use crate::grammar::{self, Symbol};
use crate::lex_err;


/// A lexed token: a terminal symbol, plus the parsed value for numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub symbol: Symbol,
    pub value: Option<f64>,
}

impl Token {
    pub(crate) fn op(symbol: Symbol) -> Token {
        Token {
            symbol,
            value: None,
        }
    }

    pub(crate) fn num(value: f64) -> Token {
        Token {
            symbol: Symbol::Num,
            value: Some(value),
        }
    }
}

pub type Spanned<T> = (usize, T, usize);

pub struct Lexer<'input> {
    text: &'input str,
    chars: CharIndices<'input>,
    lookahead: Option<(usize, char)>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        let mut t = Lexer {
            text: input,
            chars: input.char_indices(),
            lookahead: None,
        };
        t.bump();
        t
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.lookahead = self.chars.next();
        self.lookahead
    }

    /// Scan a numeric literal: a digit run with at most one decimal point,
    /// which must be followed by another digit.
    fn number(&mut self, idx0: usize) -> Result<Spanned<Token>> {
        let mut seen_decimal = false;
        let mut end = self.text.len();
        while let Some((idx1, c)) = self.lookahead {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' {
                if seen_decimal {
                    return lex_err!(MalformedNumber, idx0, idx1 + 1);
                }
                seen_decimal = true;
                self.bump();
            } else {
                end = idx1;
                break;
            }
        }

        let text = &self.text[idx0..end];
        if text.ends_with('.') {
            return lex_err!(MalformedNumber, idx0, end);
        }
        match text.parse::<f64>() {
            Ok(n) => Ok((idx0, Token::num(n), end)),
            Err(_) => lex_err!(MalformedNumber, idx0, end),
        }
    }

    fn consume(&mut self, i: usize, tok: Token, len: usize) -> Option<Result<Spanned<Token>>> {
        self.bump();
        Some(Ok((i, tok, i + len)))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned<Token>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.lookahead {
                Some((i, c)) if c.is_ascii_digit() => Some(self.number(i)),
                Some((i, c)) => match grammar::operator_symbol(c) {
                    Some(symbol) => self.consume(i, Token::op(symbol), 1),
                    None => {
                        // callers pre-filter input to the allowed character
                        // set (grammar::is_allowed_char); anything else is
                        // skipped rather than defended against
                        self.bump();
                        continue;
                    }
                },
                None => None,
            };
        }
    }
}

/// Tokenize a whole expression eagerly, appending the end-of-input marker.
/// Stops at the first malformed literal.
pub fn tokenize(input: &str) -> Result<Vec<Spanned<Token>>> {
    let mut tokens = Vec::new();
    for result in Lexer::new(input) {
        tokens.push(result?);
    }
    let end = input.len();
    tokens.push((end, Token::op(Symbol::End), end));
    Ok(tokens)
}
