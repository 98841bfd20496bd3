//! Stock finder machines used by the scanner.

use crate::fsm::{NodeId, StateMachine};
use crate::fsm::transition::Transition;
use crate::token::TokenCategory;

/// Recognizes identifiers: a leading letter or underscore, then letters,
/// digits and underscores. The body node loops on itself; any other
/// character accepts the token.
pub fn name_finder() -> StateMachine {
    let mut machine = StateMachine::new();
    let body = machine.link_new(
        machine.root(),
        Transition::name_start(),
        TokenCategory::Undefined,
    );
    machine.link(body, Transition::name_body(), body);
    machine.link_new(
        body,
        Transition::name_body().negated(),
        TokenCategory::Name,
    );
    machine
}

/// Recognizes integer literals with an optional leading minus.
pub fn integer_finder() -> StateMachine {
    let mut machine = StateMachine::new();
    let digits = signed_digit_run(&mut machine);
    machine.link_new(
        digits,
        Transition::digit().negated(),
        TokenCategory::IntLiteral,
    );
    machine
}

/// Recognizes floating literals (`12.5`, `-0.25`, `3.`). The language keeps
/// them out of expressions, but the scanner must still split them off as a
/// single token.
pub fn float_finder() -> StateMachine {
    let mut machine = StateMachine::new();
    let digits = signed_digit_run(&mut machine);
    let fraction = machine.link_new(digits, Transition::Single('.'), TokenCategory::Undefined);
    machine.link(fraction, Transition::digit(), fraction);
    machine.link_new(
        fraction,
        Transition::digit().negated(),
        TokenCategory::FloatLiteral,
    );
    machine
}

/// Shared number prefix `-?[0-9]+`: the returned node loops on digits.
fn signed_digit_run(machine: &mut StateMachine) -> NodeId {
    let root = machine.root();
    let minus = machine.link_new(root, Transition::Single('-'), TokenCategory::Undefined);
    let digits = machine.link_new(minus, Transition::digit(), TokenCategory::Undefined);
    machine.link(root, Transition::digit(), digits);
    machine.link(digits, Transition::digit(), digits);
    digits
}

/// Operator trie: patterns share prefix paths and each complete pattern gets
/// an always-true lookahead edge into its accepting node.
///
/// Patterns are inserted longest-first: a node's lookahead edge must come
/// after the edges extending it, or `**` would be cut short at `*`.
pub fn operator_finder(patterns: &[(String, TokenCategory)]) -> StateMachine {
    let mut machine = StateMachine::new();
    let mut ordered: Vec<&(String, TokenCategory)> = patterns.iter().collect();
    ordered.sort_by(|left, right| right.0.len().cmp(&left.0.len()));
    for (pattern, category) in ordered {
        add_operator_pattern(&mut machine, pattern, *category);
    }
    machine
}

fn add_operator_pattern(machine: &mut StateMachine, pattern: &str, category: TokenCategory) {
    let mut node = machine.root();
    for c in pattern.chars() {
        node = match machine.next_node(node, c) {
            Some(existing) => existing,
            None => machine.link_new(node, Transition::Single(c), TokenCategory::Undefined),
        };
    }
    machine.link_new(node, Transition::Any, category);
}

/// One accepting path per configured character, entered through the
/// character itself and left through an always-true lookahead.
pub fn single_char_finder(chars: &[(char, TokenCategory)]) -> StateMachine {
    let mut machine = StateMachine::new();
    for (c, category) in chars {
        let node = machine.link_new(
            machine.root(),
            Transition::Single(*c),
            TokenCategory::Undefined,
        );
        machine.link_new(node, Transition::Any, *category);
    }
    machine
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(machine: &mut StateMachine, input: &str) -> (bool, TokenCategory) {
        let mut last = (false, TokenCategory::Undefined);
        for c in input.chars() {
            last = machine.feed(c);
            assert!(last.0, "machine rejected {c:?} in {input:?}");
        }
        last
    }

    #[test]
    fn name_finder_accepts_on_delimiter() {
        let mut machine = name_finder();
        assert_eq!(
            feed_all(&mut machine, "ab_1 "),
            (true, TokenCategory::Name)
        );
    }

    #[test]
    fn name_finder_rejects_leading_digit() {
        let mut machine = name_finder();
        assert_eq!(machine.feed('1'), (false, TokenCategory::Undefined));
    }

    #[test]
    fn integer_finder_accepts_signed_literal() {
        let mut machine = integer_finder();
        assert_eq!(
            feed_all(&mut machine, "-42 "),
            (true, TokenCategory::IntLiteral)
        );
    }

    #[test]
    fn integer_finder_needs_digit_after_minus() {
        let mut machine = integer_finder();
        assert_eq!(machine.feed('-'), (true, TokenCategory::Undefined));
        assert_eq!(machine.feed(' '), (false, TokenCategory::Undefined));
    }

    #[test]
    fn float_finder_accepts_fractional_literal() {
        let mut machine = float_finder();
        assert_eq!(
            feed_all(&mut machine, "3.25 "),
            (true, TokenCategory::FloatLiteral)
        );
    }

    #[test]
    fn operator_finder_prefers_longest_pattern() {
        let patterns = vec![
            ("*".to_string(), TokenCategory::BinaryOperator),
            ("**".to_string(), TokenCategory::BinaryOperator),
            ("*=".to_string(), TokenCategory::Assignment),
        ];
        let mut machine = operator_finder(&patterns);

        assert_eq!(feed_all(&mut machine, "** "), (true, TokenCategory::BinaryOperator));
        assert_eq!(feed_all(&mut machine, "*= "), (true, TokenCategory::Assignment));
        // A lone `*` resolves through the lookahead edge.
        assert_eq!(feed_all(&mut machine, "*x"), (true, TokenCategory::BinaryOperator));
    }

    #[test]
    fn single_char_finder_accepts_each_configured_char() {
        let mut machine = single_char_finder(&[
            ('(', TokenCategory::OpenParen),
            ('\n', TokenCategory::Endline),
        ]);
        assert_eq!(feed_all(&mut machine, "(x"), (true, TokenCategory::OpenParen));
        assert_eq!(feed_all(&mut machine, "\nx"), (true, TokenCategory::Endline));
    }
}
