//! Shunting-Yard expression builder.
//!
//! Reduces the tokens of one logical line to a single AST node with two
//! stacks: finished subexpressions and pending operators. `(` enters the
//! operator stack as a priority-0 sentinel; assignments sit below every
//! arithmetic and logical operator, so the right-hand side reduces first.

use std::collections::HashMap;

use crate::ast::{CombineFn, Expr, OperatorFn};
use crate::config::LanguageConfig;
use crate::parser::ParseError;
use crate::token::{Position, Token, TokenCategory};

/// Operator lookup derived from a [`LanguageConfig`]: priorities (earlier
/// configured operator = higher priority), implementations, and combine
/// functions for assignments.
pub(crate) struct OperatorTable {
    priority: HashMap<String, usize>,
    operator_fn: HashMap<String, OperatorFn>,
    combine_fn: HashMap<String, CombineFn>,
}

impl OperatorTable {
    pub(crate) fn new(config: &LanguageConfig) -> Self {
        let mut priority = HashMap::new();
        let mut operator_fn = HashMap::new();
        let mut combine_fn = HashMap::new();
        let count = config.operators.len();
        for (index, op) in config.operators.iter().enumerate() {
            priority.insert(op.lexeme.clone(), count + 1 - index);
            operator_fn.insert(op.lexeme.clone(), op.apply);
        }
        for assignment in &config.assignments {
            priority.insert(assignment.lexeme.clone(), 0);
            combine_fn.insert(assignment.lexeme.clone(), assignment.combine);
        }
        Self {
            priority,
            operator_fn,
            combine_fn,
        }
    }

    fn priority(&self, op: &PendingOperator) -> Result<usize, ParseError> {
        if op.category == TokenCategory::OpenParen {
            return Ok(0);
        }
        self.priority
            .get(&op.lexeme)
            .copied()
            .ok_or_else(|| undefined_operator(op))
    }
}

struct PendingOperator {
    lexeme: String,
    category: TokenCategory,
    at: Position,
}

impl PendingOperator {
    fn from_token(token: &Token) -> Self {
        Self {
            lexeme: token.lexeme.clone(),
            category: token.category,
            at: token.position(),
        }
    }
}

/// Builds one AST node from the tokens of a logical line (no Endline
/// inside). Whitespace tokens are skipped; an empty line is the literal 0.
pub(crate) fn build_expression(
    tokens: &[Token],
    table: &OperatorTable,
) -> Result<Expr, ParseError> {
    if !tokens
        .iter()
        .any(|token| !token.category.is_whitespace())
    {
        return Ok(Expr::Int(0));
    }
    let mut output: Vec<Expr> = Vec::new();
    let mut operators: Vec<PendingOperator> = Vec::new();
    let start = tokens.first().map(Token::position).unwrap_or_default();

    for token in tokens {
        if token.category.is_whitespace() {
            continue;
        }
        match token.category {
            TokenCategory::IntLiteral => {
                let value: i32 = token.lexeme.parse().map_err(|_| ParseError::Syntax {
                    line: token.line,
                    column: token.column,
                })?;
                output.push(Expr::Int(value));
            }
            TokenCategory::Name => output.push(Expr::Var {
                name: token.lexeme.clone(),
                at: token.position(),
            }),
            TokenCategory::UnaryOperator
            | TokenCategory::BinaryOperator
            | TokenCategory::Assignment => {
                let incoming = PendingOperator::from_token(token);
                let incoming_priority = table.priority(&incoming)?;
                while let Some(top) = operators.last() {
                    if table.priority(top)? > incoming_priority {
                        reduce_top(&mut output, &mut operators, table)?;
                    } else {
                        break;
                    }
                }
                operators.push(incoming);
            }
            TokenCategory::OpenParen => operators.push(PendingOperator::from_token(token)),
            TokenCategory::CloseParen => loop {
                match operators.last() {
                    None => {
                        return Err(ParseError::BracketDisbalance {
                            line: token.line,
                            column: token.column,
                        });
                    }
                    Some(top) if top.category == TokenCategory::OpenParen => {
                        operators.pop();
                        break;
                    }
                    Some(_) => reduce_top(&mut output, &mut operators, table)?,
                }
            },
            _ => {
                return Err(ParseError::UnexpectedToken {
                    line: token.line,
                    column: token.column,
                });
            }
        }
        // Two finished operands with nothing to join them can never reduce.
        if operators.is_empty() && output.len() > 1 {
            return Err(ParseError::Syntax {
                line: token.line,
                column: token.column,
            });
        }
    }

    while !operators.is_empty() {
        reduce_top(&mut output, &mut operators, table)?;
    }
    if output.len() != 1 {
        return Err(ParseError::Syntax {
            line: start.line,
            column: start.column,
        });
    }
    Ok(output.remove(0))
}

fn reduce_top(
    output: &mut Vec<Expr>,
    operators: &mut Vec<PendingOperator>,
    table: &OperatorTable,
) -> Result<(), ParseError> {
    let Some(top) = operators.pop() else {
        return Err(ParseError::InvariantViolation {
            message: "reduced an empty operator stack",
        });
    };
    match top.category {
        TokenCategory::UnaryOperator => reduce_call(output, &top, 1, table),
        TokenCategory::BinaryOperator => reduce_call(output, &top, 2, table),
        TokenCategory::Assignment => reduce_assignment(output, &top, table),
        TokenCategory::OpenParen => Err(ParseError::BracketDisbalance {
            line: top.at.line,
            column: top.at.column,
        }),
        _ => Err(undefined_operator(&top)),
    }
}

fn reduce_call(
    output: &mut Vec<Expr>,
    op: &PendingOperator,
    arity: usize,
    table: &OperatorTable,
) -> Result<(), ParseError> {
    if output.len() < arity {
        return Err(ParseError::Syntax {
            line: op.at.line,
            column: op.at.column,
        });
    }
    let apply = table
        .operator_fn
        .get(&op.lexeme)
        .copied()
        .ok_or_else(|| undefined_operator(op))?;
    let args = output.split_off(output.len() - arity);
    output.push(Expr::Call {
        apply,
        args,
        at: op.at,
    });
    Ok(())
}

fn reduce_assignment(
    output: &mut Vec<Expr>,
    op: &PendingOperator,
    table: &OperatorTable,
) -> Result<(), ParseError> {
    let (Some(rhs), Some(lhs)) = (output.pop(), output.pop()) else {
        return Err(ParseError::Syntax {
            line: op.at.line,
            column: op.at.column,
        });
    };
    let Some(target) = lhs.lvalue_name() else {
        return Err(ParseError::InvalidAssignation {
            line: op.at.line,
            column: op.at.column,
        });
    };
    let combine = table
        .combine_fn
        .get(&op.lexeme)
        .copied()
        .ok_or_else(|| undefined_operator(op))?;
    output.push(Expr::Assign {
        target: target.to_string(),
        rhs: Box::new(rhs),
        combine,
        at: op.at,
    });
    Ok(())
}

fn undefined_operator(op: &PendingOperator) -> ParseError {
    ParseError::UndefinedOperator {
        lexeme: op.lexeme.clone(),
        line: op.at.line,
        column: op.at.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Scope;

    fn build(source: &str) -> Result<Expr, ParseError> {
        let config = LanguageConfig::standard();
        let tokens = config.scanner().tokenize(source).expect("tokenize");
        build_expression(&tokens, &OperatorTable::new(&config))
    }

    fn eval(source: &str, scope: &mut Scope) -> i32 {
        build(source)
            .expect("build")
            .eval(scope)
            .expect("eval")
    }

    #[test]
    fn empty_line_builds_the_zero_literal() {
        assert_eq!(build("").expect("build"), Expr::Int(0));
        assert_eq!(build("   ").expect("build"), Expr::Int(0));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let mut scope = Scope::new();
        assert_eq!(eval("3 + 4 * 2", &mut scope), 11);
        assert_eq!(eval("4 * 2 + 3", &mut scope), 11);
    }

    #[test]
    fn parentheses_override_priority() {
        let mut scope = Scope::new();
        assert_eq!(eval("(3 + 4) * 2", &mut scope), 14);
        assert_eq!(eval("((1))", &mut scope), 1);
    }

    #[test]
    fn unary_not_binds_tightest() {
        let mut scope = Scope::new();
        assert_eq!(eval("!0 + 1", &mut scope), 2);
        assert_eq!(eval("!(2 > 3) * 3", &mut scope), 3);
        assert_eq!(eval("!!7", &mut scope), 1);
    }

    #[test]
    fn comparisons_bind_below_arithmetic() {
        let mut scope = Scope::new();
        assert_eq!(eval("1 + 1 == 2", &mut scope), 1);
        assert_eq!(eval("2 * 3 > 5", &mut scope), 1);
        assert_eq!(eval("1 > 2 | 3 > 2", &mut scope), 1);
    }

    #[test]
    fn assignment_reduces_after_its_right_hand_side() {
        let mut scope = Scope::new();
        scope.set("a", 0);
        assert_eq!(eval("a = 3 + 4 * 2", &mut scope), 11);
        assert_eq!(scope.get("a"), Some(11));
    }

    #[test]
    fn chained_assignment_groups_to_the_right() {
        let mut scope = Scope::new();
        scope.set("a", 0);
        scope.set("b", 0);
        assert_eq!(eval("a = b = 5", &mut scope), 5);
        assert_eq!(scope.get("a"), Some(5));
        assert_eq!(scope.get("b"), Some(5));
    }

    #[test]
    fn literal_on_the_left_of_assignment_is_rejected() {
        assert_eq!(
            build("1 = 2"),
            Err(ParseError::InvalidAssignation { line: 0, column: 2 })
        );
        assert_eq!(
            build("(a + 1) = 2"),
            Err(ParseError::InvalidAssignation { line: 0, column: 8 })
        );
    }

    #[test]
    fn adjacent_operands_are_a_syntax_error() {
        assert!(matches!(build("1 2"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn dangling_operator_is_a_syntax_error() {
        assert!(matches!(build("1 +"), Err(ParseError::Syntax { .. })));
        assert!(matches!(build("+ 1"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn empty_parentheses_are_a_syntax_error() {
        assert!(matches!(build("()"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn unbalanced_brackets_are_rejected() {
        assert!(matches!(
            build("(1 + 2"),
            Err(ParseError::BracketDisbalance { .. })
        ));
        assert!(matches!(
            build("1 + 2)"),
            Err(ParseError::BracketDisbalance { .. })
        ));
    }

    #[test]
    fn float_literal_is_not_an_expression_token() {
        assert_eq!(
            build("1.5 + 2"),
            Err(ParseError::UnexpectedToken { line: 0, column: 0 })
        );
    }

    #[test]
    fn out_of_range_literal_is_a_syntax_error() {
        assert!(matches!(
            build("2147483648"),
            Err(ParseError::Syntax { .. })
        ));
        let mut scope = Scope::new();
        assert_eq!(eval("-2147483648", &mut scope), i32::MIN);
    }
}
