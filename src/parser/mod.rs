// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Table-driven predictive parser.
//!
//! Runs an explicit stack of pending tree nodes against the grammar's parse
//! table, no recursion: terminals on top of the stack must match the next
//! token, nonterminals are expanded through the table (or popped silently
//! when nullable and no rule applies).  Nodes live in an arena owned by the
//! resulting [`ParseTree`]; children are ids, the tree is immutable once
//! parsing finishes.

use log::trace;

use crate::common::Result;
use crate::grammar::{Grammar, Symbol};
use crate::parse_err;
use crate::token::{Spanned, Token};


/// Opaque parse tree node identifier; an index into the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct ParseNode {
    pub symbol: Symbol,
    pub value: Option<f64>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: NodeId,
}

impl ParseTree {
    /// The `Start` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    fn alloc(&mut self, symbol: Symbol) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ParseNode {
            symbol,
            value: None,
            children: Vec::new(),
        });
        id
    }
}

struct Parser<'a> {
    grammar: &'a Grammar,
    tokens: &'a [Spanned<Token>],
    pos: usize,
    tree: ParseTree,
    stack: Vec<NodeId>,
}

/// Parse a token sequence (as produced by [`crate::token::tokenize`],
/// end-marker included) into a parse tree rooted at `Start`.
pub fn parse(tokens: &[Spanned<Token>], grammar: &Grammar) -> Result<ParseTree> {
    Parser::new(tokens, grammar).run()
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned<Token>], grammar: &'a Grammar) -> Self {
        let mut tree = ParseTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        // the end-marker sentinel sits beneath the root so the parser only
        // finishes once the whole token sequence is consumed
        let end = tree.alloc(Symbol::End);
        let root = tree.alloc(Symbol::Start);
        tree.root = root;

        Parser {
            grammar,
            tokens,
            pos: 0,
            tree,
            stack: vec![end, root],
        }
    }

    fn eof_position(&self) -> usize {
        match self.tokens.last() {
            Some(&(_, _, end)) => end,
            None => 0,
        }
    }

    fn run(mut self) -> Result<ParseTree> {
        while let Some(&top_id) = self.stack.last() {
            let top = self.tree.node(top_id).symbol;
            let (start, look, end) = match self.tokens.get(self.pos) {
                Some(&spanned) => spanned,
                None => {
                    // unreachable on tokenize() output, which always ends
                    // with the end marker
                    let pos = self.eof_position();
                    return parse_err!(
                        UnexpectedToken,
                        pos,
                        pos,
                        format!("expected \"{top}\", found end of input")
                    );
                }
            };
            trace!("stack top \"{top}\", lookahead \"{}\"", look.symbol);

            if top.is_terminal() {
                if top == look.symbol {
                    self.tree.nodes[top_id.0].value = look.value;
                    self.stack.pop();
                    self.pos += 1;
                } else {
                    return parse_err!(
                        UnexpectedToken,
                        start,
                        end,
                        format!("expected \"{top}\", found \"{}\"", look.symbol)
                    );
                }
            } else {
                match self.grammar.applicable_rule(top, look.symbol) {
                    Some(rule) => {
                        self.stack.pop();
                        self.expand(top_id, rule, look.symbol);
                    }
                    None if self.grammar.is_nullable(top) => {
                        // epsilon derivation: the nonterminal vanishes and
                        // the token is left for whatever is beneath it
                        self.stack.pop();
                    }
                    None => {
                        return parse_err!(
                            UnexpectedToken,
                            start,
                            end,
                            format!("expected \"{top}\", found \"{}\"", look.symbol)
                        );
                    }
                }
            }
        }

        Ok(self.tree)
    }

    /// Expand `parent` by the chosen alternative of `rule`: children are
    /// attached in order and pushed onto the stack in reverse, so the
    /// leftmost is handled next.  An alternative whose leading terminal is
    /// the lookahead wins (the end marker never selects by direct match);
    /// otherwise the table entry was reached through a nested nonterminal
    /// and the rule's single nonterminal-leading alternative is the one to
    /// expand.
    fn expand(&mut self, parent: NodeId, rule: usize, look: Symbol) {
        let rule = self.grammar.rule(rule);
        let chosen = rule
            .alternatives
            .iter()
            .find(|alt| look != Symbol::End && alt.first() == Some(&look))
            .or_else(|| {
                rule.alternatives
                    .iter()
                    .find(|alt| alt.first().is_some_and(|s| !s.is_terminal()))
            });
        let alt = match chosen {
            Some(alt) => alt,
            // the table only holds entries whose derivation begins with the
            // lookahead, so one of the two searches hits
            None => unreachable!("no alternative of {} derives \"{look}\"", rule.left),
        };

        let children: Vec<NodeId> = alt.iter().map(|&symbol| self.tree.alloc(symbol)).collect();
        self.stack.extend(children.iter().rev());
        self.tree.nodes[parent.0].children = children;
    }
}
