//! Expression tree produced by the parser.
//!
//! The tree is plainly owned: the grammar has no way to express sharing or
//! recursion, and every indented block is attached to its header exactly
//! once.

use thiserror::Error;

use crate::token::Position;

/// Raised inside operator callables; the evaluator attaches the position of
/// the call that invoked them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OperatorError {
    #[error("division by zero")]
    ZeroDivision,
}

/// An operator implementation: evaluated integer arguments in, integer out.
pub type OperatorFn = fn(&[i32]) -> Result<i32, OperatorError>;

/// Combines the current value of an assignment target with the evaluated
/// right-hand side.
pub type CombineFn = fn(i32, i32) -> Result<i32, OperatorError>;

/// A block was handed to a node whose shape cannot take another one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{node} can not take another indented block")]
pub struct BlockRejected {
    pub node: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal.
    Int(i32),
    /// Reads a variable; evaluation fails if the name is not in scope.
    Var { name: String, at: Position },
    /// Introduces a variable with value 0; fails if it already exists.
    Declare { name: String, at: Position },
    /// Applies an operator to strictly left-to-right evaluated arguments.
    Call {
        apply: OperatorFn,
        args: Vec<Expr>,
        at: Position,
    },
    /// Combines the target's current value with the right-hand side and
    /// writes the result back.
    Assign {
        target: String,
        rhs: Box<Expr>,
        combine: CombineFn,
        at: Position,
    },
    If {
        condition: Box<Expr>,
        then_block: Option<Box<Expr>>,
        else_block: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Option<Box<Expr>>,
    },
    /// Block body; evaluates to its last child, 0 when empty.
    Sequence(Vec<Expr>),
}

impl Expr {
    /// The variable name this node stands for, when it may appear on the
    /// left of an assignment.
    pub fn lvalue_name(&self) -> Option<&str> {
        match self {
            Expr::Var { name, .. } | Expr::Declare { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Hands a finished deeper-indentation block to this node.
    ///
    /// `If` takes a then-block and then an else-block, `While` a single
    /// body, `Sequence` any number of children; everything else refuses.
    pub fn attach_block(&mut self, block: Expr) -> Result<(), BlockRejected> {
        match self {
            Expr::If {
                then_block,
                else_block,
                ..
            } => {
                if then_block.is_none() {
                    *then_block = Some(Box::new(block));
                } else if else_block.is_none() {
                    *else_block = Some(Box::new(block));
                } else {
                    return Err(BlockRejected { node: "if" });
                }
                Ok(())
            }
            Expr::While { body, .. } => {
                if body.is_some() {
                    return Err(BlockRejected { node: "while" });
                }
                *body = Some(Box::new(block));
                Ok(())
            }
            Expr::Sequence(children) => {
                children.push(block);
                Ok(())
            }
            Expr::Int(_) => Err(BlockRejected { node: "literal" }),
            Expr::Var { .. } => Err(BlockRejected { node: "variable" }),
            Expr::Declare { .. } => Err(BlockRejected { node: "declaration" }),
            Expr::Call { .. } => Err(BlockRejected { node: "call" }),
            Expr::Assign { .. } => Err(BlockRejected { node: "assignment" }),
        }
    }
}
