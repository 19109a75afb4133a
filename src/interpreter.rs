// Copyright 2026 The Calc Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use smallvec::SmallVec;

use crate::common::Result;
use crate::eval_err;
use crate::grammar::Symbol;
use crate::parser::{NodeId, ParseTree};

/// Operators waiting to be applied once both their operands are on the
/// stack.  Passed by value down the recursion: a continuation-style fold
/// over the tree, not shared mutable state.
#[derive(Clone, Copy, Default)]
struct Pending {
    add: Option<Symbol>,
    mul: Option<Symbol>,
}

struct Evaluator<'a> {
    tree: &'a ParseTree,
    stack: SmallVec<[f64; 8]>,
}

/// Walk a parse tree and compute its value.  `Ok(None)` means the tree
/// derived the empty expression, which has no value.
pub fn eval(tree: &ParseTree) -> Result<Option<f64>> {
    let mut e = Evaluator {
        tree,
        stack: SmallVec::new(),
    };
    e.eval_node(tree.root(), Pending::default())?;

    let result = e.stack.pop();
    debug_assert!(e.stack.is_empty(), "evaluation left operands behind");
    Ok(result)
}

impl Evaluator<'_> {
    fn eval_node(&mut self, id: NodeId, mut pending: Pending) -> Result<()> {
        let tree = self.tree;
        let children = tree.children(id);

        match tree.node(id).symbol {
            Symbol::Num => match tree.node(id).value {
                Some(n) => self.stack.push(n),
                // the parser fills in every number leaf it matches
                None => unreachable!("number leaf without a value"),
            },
            Symbol::Expr => {
                // a sub-expression starts fresh; a leading sign applies to
                // the whole addend beneath it
                if children.len() == 2 {
                    self.eval_node(children[1], Pending::default())?;
                    if tree.node(children[0]).symbol == Symbol::Minus {
                        if let Some(v) = self.stack.last_mut() {
                            *v = -*v;
                        }
                    }
                } else if let Some(&child) = children.first() {
                    self.eval_node(child, Pending::default())?;
                }
            }
            Symbol::AddSuffix => {
                if let Some(op) = pending.add.take() {
                    self.apply_additive(op);
                }
                if children.len() == 2 {
                    pending.add = Some(tree.node(children[0]).symbol);
                    self.eval_node(children[1], pending)?;
                }
            }
            Symbol::MulSuffix => {
                if let Some(op) = pending.mul.take() {
                    self.apply_multiplicative(op)?;
                }
                if children.len() == 2 {
                    pending.mul = Some(tree.node(children[0]).symbol);
                    self.eval_node(children[1], pending)?;
                }
            }
            _ => {
                // Start, Addend, Term, Factor and the parenthesis terminals:
                // the pending operators ride along unchanged, which is how
                // the multiplicative layer resolves before the additive one
                for &child in children.iter() {
                    self.eval_node(child, pending)?;
                }
            }
        }

        Ok(())
    }

    /// Pop the two topmost operands; the right one was pushed last.
    fn pop_operands(&mut self) -> (f64, f64) {
        let right = self.stack.pop();
        let left = self.stack.pop();
        match (left, right) {
            (Some(left), Some(right)) => (left, right),
            // parse trees always stack an operand per side of a suffix
            _ => unreachable!("pending operator with missing operands"),
        }
    }

    fn apply_additive(&mut self, op: Symbol) {
        debug_assert!(op.is_additive());
        let (left, right) = self.pop_operands();
        let value = match op {
            Symbol::Plus => left + right,
            Symbol::Minus => left - right,
            _ => unreachable!("\"{op}\" is not additive"),
        };
        self.stack.push(value);
    }

    fn apply_multiplicative(&mut self, op: Symbol) -> Result<()> {
        debug_assert!(op.is_multiplicative());
        let (left, right) = self.pop_operands();
        let value = match op {
            Symbol::Mul => left * right,
            Symbol::Div => {
                if right == 0.0 {
                    return eval_err!(DivideByZero);
                }
                left / right
            }
            Symbol::Mod => {
                if right == 0.0 {
                    return eval_err!(DivideByZero);
                }
                left % right
            }
            _ => unreachable!("\"{op}\" is not multiplicative"),
        };
        self.stack.push(value);
        Ok(())
    }
}
