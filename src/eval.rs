//! Tree evaluator over a flat scope of named 32-bit integers.
//!
//! Evaluation is strictly sequential: no short-circuiting, no suspension
//! points. The result of a program is a pure function of the tree and the
//! initial scope.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{Expr, OperatorError};
use crate::token::Position;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("UnknownVariableError: variable '{name}' is not visible at {line}:{column}")]
    UnknownVariable {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("VariableRedeclarationError: variable '{name}' is declared already at {line}:{column}")]
    VariableRedeclaration {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("ZeroDivisionError: can't divide by zero at {line}:{column}")]
    ZeroDivision { line: usize, column: usize },
    #[error("InterruptionError: interpretation unexpectedly finished")]
    Interruption,
}

/// Flat mapping from variable name to value; a single scope exists per
/// program execution.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scope {
    values: HashMap<String, i32>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn declare(&mut self, name: &str) -> i32 {
        self.values.insert(name.to_string(), 0);
        0
    }

    pub fn set(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_string(), value);
    }
}

impl Expr {
    pub fn eval(&self, scope: &mut Scope) -> Result<i32, EvalError> {
        match self {
            Expr::Int(value) => Ok(*value),
            Expr::Var { name, at } => scope.get(name).ok_or_else(|| unknown(name, *at)),
            Expr::Declare { name, at } => {
                if scope.contains(name) {
                    return Err(EvalError::VariableRedeclaration {
                        name: name.clone(),
                        line: at.line,
                        column: at.column,
                    });
                }
                Ok(scope.declare(name))
            }
            Expr::Call { apply, args, at } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval(scope)?);
                }
                apply(&values).map_err(|error| positioned(error, *at))
            }
            Expr::Assign {
                target,
                rhs,
                combine,
                at,
            } => {
                let rhs_value = rhs.eval(scope)?;
                let current = scope.get(target).ok_or_else(|| unknown(target, *at))?;
                let next = combine(current, rhs_value).map_err(|error| positioned(error, *at))?;
                scope.set(target, next);
                Ok(next)
            }
            Expr::If {
                condition,
                then_block,
                else_block,
            } => {
                if condition.eval(scope)? != 0 {
                    match then_block {
                        Some(block) => block.eval(scope),
                        None => Ok(0),
                    }
                } else {
                    match else_block {
                        Some(block) => block.eval(scope),
                        None => Ok(0),
                    }
                }
            }
            Expr::While { condition, body } => {
                let mut result = 0;
                while condition.eval(scope)? != 0 {
                    if let Some(body) = body {
                        result = body.eval(scope)?;
                    }
                }
                Ok(result)
            }
            Expr::Sequence(children) => {
                let mut result = 0;
                for child in children {
                    result = child.eval(scope)?;
                }
                Ok(result)
            }
        }
    }
}

fn unknown(name: &str, at: Position) -> EvalError {
    EvalError::UnknownVariable {
        name: name.to_string(),
        line: at.line,
        column: at.column,
    }
}

fn positioned(error: OperatorError, at: Position) -> EvalError {
    match error {
        OperatorError::ZeroDivision => EvalError::ZeroDivision {
            line: at.line,
            column: at.column,
        },
    }
}
