//! Language configuration: indentation unit, operator tables, keywords.
//!
//! The interpreter is built around a [`LanguageConfig`] value; the scanner,
//! the expression builder and the evaluator all take their behavior from
//! it. [`LanguageConfig::standard`] is the stock language the CLI speaks.

use crate::ast::{CombineFn, OperatorError, OperatorFn};
use crate::fsm::finders;
use crate::scanner::Scanner;
use crate::token::TokenCategory;

/// One operator: its lexeme, whether it is unary or binary, and its
/// implementation. The index in [`LanguageConfig::operators`] sets the
/// precedence: earlier binds tighter.
#[derive(Debug, Clone)]
pub struct OperatorSpec {
    pub lexeme: String,
    pub category: TokenCategory,
    pub apply: OperatorFn,
}

/// One assignment operator; all assignments bind below every entry of
/// [`LanguageConfig::operators`].
#[derive(Debug, Clone)]
pub struct AssignSpec {
    pub lexeme: String,
    pub combine: CombineFn,
}

#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Token pattern that makes up exactly one indentation block.
    pub indent_unit: Vec<TokenCategory>,
    /// Unary and binary operators in descending precedence order.
    pub operators: Vec<OperatorSpec>,
    /// Assignment operators.
    pub assignments: Vec<AssignSpec>,
    /// Lexemes reclassified after scanning.
    pub keywords: Vec<(String, TokenCategory)>,
}

impl LanguageConfig {
    /// The stock language: four-space indentation; `!`; `**`, `*`, `/`,
    /// `%`, `+`, `-`; comparisons; strict `|` and `&`; plain and compound
    /// assignments; `if`/`else`/`while`/`let`.
    pub fn standard() -> Self {
        use TokenCategory::{BinaryOperator, UnaryOperator};

        fn op(lexeme: &str, category: TokenCategory, apply: OperatorFn) -> OperatorSpec {
            OperatorSpec {
                lexeme: lexeme.to_string(),
                category,
                apply,
            }
        }
        fn assign(lexeme: &str, combine: CombineFn) -> AssignSpec {
            AssignSpec {
                lexeme: lexeme.to_string(),
                combine,
            }
        }

        Self {
            indent_unit: vec![TokenCategory::Space; 4],
            operators: vec![
                op("!", UnaryOperator, |args| Ok(i32::from(args[0] == 0))),
                op("**", BinaryOperator, |args| {
                    Ok(integer_power(args[0], args[1]))
                }),
                op("*", BinaryOperator, |args| {
                    Ok(args[0].wrapping_mul(args[1]))
                }),
                op("/", BinaryOperator, |args| {
                    checked_divisor(args[1])?;
                    Ok(args[0].wrapping_div(args[1]))
                }),
                op("%", BinaryOperator, |args| {
                    checked_divisor(args[1])?;
                    Ok(args[0].wrapping_rem(args[1]))
                }),
                op("+", BinaryOperator, |args| {
                    Ok(args[0].wrapping_add(args[1]))
                }),
                op("-", BinaryOperator, |args| {
                    Ok(args[0].wrapping_sub(args[1]))
                }),
                op("==", BinaryOperator, |args| {
                    Ok(i32::from(args[0] == args[1]))
                }),
                op("!=", BinaryOperator, |args| {
                    Ok(i32::from(args[0] != args[1]))
                }),
                op(">", BinaryOperator, |args| Ok(i32::from(args[0] > args[1]))),
                op(">=", BinaryOperator, |args| {
                    Ok(i32::from(args[0] >= args[1]))
                }),
                op("<", BinaryOperator, |args| Ok(i32::from(args[0] < args[1]))),
                op("<=", BinaryOperator, |args| {
                    Ok(i32::from(args[0] <= args[1]))
                }),
                op("|", BinaryOperator, |args| {
                    Ok(i32::from(args[0] != 0 || args[1] != 0))
                }),
                op("&", BinaryOperator, |args| {
                    Ok(i32::from(args[0] != 0 && args[1] != 0))
                }),
            ],
            assignments: vec![
                assign("=", |_, rhs| Ok(rhs)),
                assign("+=", |current, rhs| Ok(current.wrapping_add(rhs))),
                assign("-=", |current, rhs| Ok(current.wrapping_sub(rhs))),
                assign("*=", |current, rhs| Ok(current.wrapping_mul(rhs))),
                assign("/=", |current, rhs| {
                    checked_divisor(rhs)?;
                    Ok(current.wrapping_div(rhs))
                }),
                assign("%=", |current, rhs| {
                    checked_divisor(rhs)?;
                    Ok(current.wrapping_rem(rhs))
                }),
                assign("&=", |current, rhs| {
                    Ok(i32::from(current != 0 && rhs != 0))
                }),
                assign("|=", |current, rhs| {
                    Ok(i32::from(current != 0 || rhs != 0))
                }),
            ],
            keywords: vec![
                ("if".to_string(), TokenCategory::If),
                ("else".to_string(), TokenCategory::Else),
                ("while".to_string(), TokenCategory::While),
                ("let".to_string(), TokenCategory::LetDeclaration),
            ],
        }
    }

    /// Builds the scanner stack for this configuration: names, floats,
    /// integers, operators, then single-character separators.
    pub fn scanner(&self) -> Scanner {
        let mut patterns: Vec<(String, TokenCategory)> = self
            .operators
            .iter()
            .map(|op| (op.lexeme.clone(), op.category))
            .collect();
        patterns.extend(
            self.assignments
                .iter()
                .map(|assignment| (assignment.lexeme.clone(), TokenCategory::Assignment)),
        );
        let finders = vec![
            finders::name_finder(),
            finders::float_finder(),
            finders::integer_finder(),
            finders::operator_finder(&patterns),
            finders::single_char_finder(&[
                ('\n', TokenCategory::Endline),
                (' ', TokenCategory::Space),
                ('\t', TokenCategory::Tab),
                ('(', TokenCategory::OpenParen),
                (')', TokenCategory::CloseParen),
            ]),
        ];
        Scanner::new(finders, self.keywords.clone())
    }
}

fn checked_divisor(divisor: i32) -> Result<(), OperatorError> {
    if divisor == 0 {
        return Err(OperatorError::ZeroDivision);
    }
    Ok(())
}

/// Integer exponentiation with wrapping multiplication; negative exponents
/// truncate toward zero, so only bases of magnitude 1 survive them.
fn integer_power(base: i32, exponent: i32) -> i32 {
    if exponent < 0 {
        return match base {
            1 => 1,
            -1 => {
                if exponent % 2 == 0 {
                    1
                } else {
                    -1
                }
            }
            _ => 0,
        };
    }
    base.wrapping_pow(exponent as u32)
}
