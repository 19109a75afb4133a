// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The fixed expression grammar and its predictive parse table.
//!
//! The grammar is data: a static array of rules over an enumerated symbol
//! type.  The table maps (nonterminal, lookahead terminal) to the rule to
//! apply and is generated once, at first use, by propagating the leading
//! symbol of every alternative until a terminal is reached.

use std::fmt;

use lazy_static::lazy_static;
use log::trace;

use self::Symbol::*;

/// A grammar symbol: either a terminal the lexer can produce (including the
/// end-of-input marker) or a nonterminal expanded by one of the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    // terminals
    Num,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    LParen,
    RParen,
    End,
    // nonterminals
    Start,
    Expr,
    Addend,
    AddSuffix,
    Term,
    MulSuffix,
    Factor,
}

pub(crate) const TERMINAL_COUNT: usize = 9;
pub(crate) const NONTERMINAL_COUNT: usize = 7;

const TERMINALS: [Symbol; TERMINAL_COUNT] = [Num, Plus, Minus, Mul, Div, Mod, LParen, RParen, End];

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        self.terminal_index().is_some()
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, Plus | Minus)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Mul | Div | Mod)
    }

    /// Column of this terminal in the parse table.
    fn terminal_index(&self) -> Option<usize> {
        match self {
            Num => Some(0),
            Plus => Some(1),
            Minus => Some(2),
            Mul => Some(3),
            Div => Some(4),
            Mod => Some(5),
            LParen => Some(6),
            RParen => Some(7),
            End => Some(8),
            _ => None,
        }
    }

    /// Row of this nonterminal in the parse table; by construction also the
    /// index of its rule in `RULES`.
    fn nonterminal_index(&self) -> Option<usize> {
        match self {
            Factor => Some(0),
            Term => Some(1),
            MulSuffix => Some(2),
            Addend => Some(3),
            AddSuffix => Some(4),
            Expr => Some(5),
            Start => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Num => "number",
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            LParen => "(",
            RParen => ")",
            End => "$",
            Start => "Start",
            Expr => "Expr",
            Addend => "Addend",
            AddSuffix => "AddSuffix",
            Term => "Term",
            MulSuffix => "MulSuffix",
            Factor => "Factor",
        };

        write!(f, "{name}")
    }
}

/// A production rule: the ordered alternatives for one nonterminal.  An
/// empty alternative is epsilon and marks the nonterminal nullable.
#[derive(Debug)]
pub struct GrammarRule {
    pub left: Symbol,
    pub alternatives: &'static [&'static [Symbol]],
}

static RULES: [GrammarRule; NONTERMINAL_COUNT] = [
    GrammarRule {
        left: Factor,
        alternatives: &[&[Num], &[LParen, Expr, RParen]],
    },
    GrammarRule {
        left: Term,
        alternatives: &[&[Factor, MulSuffix]],
    },
    GrammarRule {
        left: MulSuffix,
        alternatives: &[&[Mul, Term], &[Div, Term], &[Mod, Term], &[]],
    },
    GrammarRule {
        left: Addend,
        alternatives: &[&[Term, AddSuffix]],
    },
    GrammarRule {
        left: AddSuffix,
        alternatives: &[&[Plus, Addend], &[Minus, Addend], &[]],
    },
    GrammarRule {
        left: Expr,
        alternatives: &[&[Addend], &[Minus, Addend], &[Plus, Addend]],
    },
    GrammarRule {
        left: Start,
        alternatives: &[&[Expr], &[]],
    },
];

pub fn is_operator_char(ch: char) -> bool {
    matches!(ch, '*' | '/' | '+' | '-' | '%' | '(' | ')')
}

/// The character set expressions are built from.  Callers are expected to
/// restrict input to this set before submitting it (see the lexer docs).
pub fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.' || is_operator_char(ch)
}

pub(crate) fn operator_symbol(ch: char) -> Option<Symbol> {
    match ch {
        '*' => Some(Mul),
        '/' => Some(Div),
        '+' => Some(Plus),
        '-' => Some(Minus),
        '%' => Some(Mod),
        '(' => Some(LParen),
        ')' => Some(RParen),
        _ => None,
    }
}

fn rule_index(nonterminal: Symbol) -> usize {
    match nonterminal.nonterminal_index() {
        Some(i) => i,
        None => unreachable!("rule lookup for terminal \"{nonterminal}\""),
    }
}

pub struct Grammar {
    parse_table: [[Option<u8>; TERMINAL_COUNT]; NONTERMINAL_COUNT],
}

lazy_static! {
    static ref GRAMMAR: Grammar = Grammar::new();
}

impl Grammar {
    /// The process-wide grammar, built on first use and shared (read-only)
    /// by every evaluation after that.
    pub fn global() -> &'static Grammar {
        &GRAMMAR
    }

    fn new() -> Grammar {
        // the parser resolves a transitively-reached table entry by
        // expanding the rule's nonterminal-leading alternative; with more
        // than one of them that choice would be ambiguous
        for rule in RULES.iter() {
            let nonterminal_leading = rule
                .alternatives
                .iter()
                .filter(|alt| alt.first().is_some_and(|s| !s.is_terminal()))
                .count();
            assert!(
                nonterminal_leading <= 1,
                "rule for {} has {} nonterminal-leading alternatives",
                rule.left,
                nonterminal_leading
            );
        }

        let mut parse_table = [[None; TERMINAL_COUNT]; NONTERMINAL_COUNT];
        for (i, rule) in RULES.iter().enumerate() {
            Self::generate_row(&mut parse_table, rule_index(rule.left), i, i);
        }

        let grammar = Grammar { parse_table };
        trace!("parse table:\n{grammar}");
        grammar
    }

    /// Record `rule` against `row` for every terminal that can begin a
    /// derivation of the row's nonterminal, chasing leading nonterminals
    /// through their own rules.  Epsilon alternatives contribute nothing
    /// (they make the nonterminal nullable instead).  On a conflicting
    /// grammar the last write would win; the fixed grammar has none.
    fn generate_row(
        parse_table: &mut [[Option<u8>; TERMINAL_COUNT]; NONTERMINAL_COUNT],
        row: usize,
        rule: usize,
        via: usize,
    ) {
        for alt in RULES[via].alternatives.iter() {
            match alt.first() {
                None => {}
                Some(leading) => match leading.terminal_index() {
                    Some(t) => parse_table[row][t] = Some(rule as u8),
                    None => Self::generate_row(parse_table, row, rule, rule_index(*leading)),
                },
            }
        }
    }

    /// Table lookup: the rule to apply for `nonterminal` when the next
    /// token is `lookahead`, or `None` (epsilon or syntax error).
    pub fn applicable_rule(&self, nonterminal: Symbol, lookahead: Symbol) -> Option<usize> {
        let nt = nonterminal.nonterminal_index()?;
        let t = lookahead.terminal_index()?;
        self.parse_table[nt][t].map(|i| i as usize)
    }

    pub fn rule(&self, index: usize) -> &'static GrammarRule {
        &RULES[index]
    }

    pub fn rule_for(&self, nonterminal: Symbol) -> &'static GrammarRule {
        &RULES[rule_index(nonterminal)]
    }

    /// True iff one of the nonterminal's alternatives is epsilon.
    pub fn is_nullable(&self, nonterminal: Symbol) -> bool {
        RULES[rule_index(nonterminal)]
            .alternatives
            .iter()
            .any(|alt| alt.is_empty())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>9}", "")?;
        for terminal in TERMINALS.iter() {
            write!(f, " {:>6}", terminal.to_string())?;
        }
        writeln!(f)?;
        for (row, rule) in RULES.iter().enumerate() {
            write!(f, "{:>9}", rule.left.to_string())?;
            for t in 0..TERMINAL_COUNT {
                match self.parse_table[row][t] {
                    Some(i) => write!(f, " {i:>6}")?,
                    None => write!(f, " {:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
