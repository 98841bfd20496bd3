//! Leading-indentation measurement.

use crate::parser::ParseError;
use crate::token::{Token, TokenCategory};

/// Counts whole unit-indent blocks at the start of `line`, returning the
/// count and the index of the first token past the indentation.
///
/// A line holding nothing but unit-pattern tokens is blank and reports
/// `(0, line.len())`. Indentation that stops partway through a unit is an
/// error: each line's depth must be decidable without looking at its
/// neighbours.
pub fn leading_blocks(
    line: &[Token],
    unit: &[TokenCategory],
) -> Result<(usize, usize), ParseError> {
    let mut blocks = 0;
    let mut index = 0;
    loop {
        for (unit_pos, expected) in unit.iter().enumerate() {
            let Some(token) = line.get(index + unit_pos) else {
                return Ok((0, line.len()));
            };
            if token.category != *expected {
                if unit_pos == 0 {
                    return Ok((blocks, index + unit_pos));
                }
                return Err(ParseError::Indentation {
                    line: token.line,
                    column: token.column,
                });
            }
        }
        blocks += 1;
        index += unit.len();
    }
}
