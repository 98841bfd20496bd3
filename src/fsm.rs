//! Finite-automaton graphs walked by the scanner.
//!
//! A machine is a set of arena-allocated nodes and a cursor. Nodes carry an
//! accepting token category (`Undefined` while non-accepting) and an ordered
//! transition list; the first predicate that matches wins, and self-loops
//! express repetition. Accepting nodes sit one lookahead character past the
//! lexeme they recognize: stepping into one reports the category and snaps
//! the cursor back to the root, and the triggering character is not part of
//! the recognized lexeme.

pub mod finders;
pub mod transition;

use crate::fsm::transition::Transition;
use crate::token::TokenCategory;

/// Index of a node within its machine.
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    category: TokenCategory,
    transitions: Vec<(Transition, NodeId)>,
}

/// One finder: a transition graph plus a cursor. Built once, read-only
/// afterwards except for the cursor.
#[derive(Debug, Clone)]
pub struct StateMachine {
    nodes: Vec<Node>,
    current: NodeId,
}

const ROOT: NodeId = 0;

impl StateMachine {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                category: TokenCategory::Undefined,
                transitions: Vec::new(),
            }],
            current: ROOT,
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn add_node(&mut self, category: TokenCategory) -> NodeId {
        self.nodes.push(Node {
            category,
            transitions: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn link(&mut self, from: NodeId, transition: Transition, to: NodeId) {
        self.nodes[from].transitions.push((transition, to));
    }

    /// Adds a fresh node reachable from `from` through `transition` and
    /// returns it.
    pub fn link_new(
        &mut self,
        from: NodeId,
        transition: Transition,
        category: TokenCategory,
    ) -> NodeId {
        let to = self.add_node(category);
        self.link(from, transition, to);
        to
    }

    /// First transition target out of `from` that accepts `c`.
    pub(crate) fn next_node(&self, from: NodeId, c: char) -> Option<NodeId> {
        self.nodes[from]
            .transitions
            .iter()
            .find(|(transition, _)| transition.matches(c))
            .map(|(_, to)| *to)
    }

    /// Advances the cursor by one character.
    ///
    /// Returns `(accepted, category)`: `accepted` is false when no transition
    /// matches and the cursor stays put; `category` is non-`Undefined`
    /// exactly when the step reached an accepting node, in which case the
    /// cursor has already been reset to the root.
    pub fn feed(&mut self, c: char) -> (bool, TokenCategory) {
        match self.next_node(self.current, c) {
            None => (false, TokenCategory::Undefined),
            Some(next) => {
                let category = self.nodes[next].category;
                if category == TokenCategory::Undefined {
                    self.current = next;
                } else {
                    self.current = ROOT;
                }
                (true, category)
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = ROOT;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root --'a'--> body (loops on 'a') --anything else--> accept
    fn aplus_machine() -> StateMachine {
        let mut machine = StateMachine::new();
        let body = machine.link_new(
            machine.root(),
            Transition::Single('a'),
            TokenCategory::Undefined,
        );
        machine.link(body, Transition::Single('a'), body);
        machine.link_new(
            body,
            Transition::Single('a').negated(),
            TokenCategory::Name,
        );
        machine
    }

    #[test]
    fn walks_self_loop_and_accepts_on_lookahead() {
        let mut machine = aplus_machine();
        assert_eq!(machine.feed('a'), (true, TokenCategory::Undefined));
        assert_eq!(machine.feed('a'), (true, TokenCategory::Undefined));
        assert_eq!(machine.feed('x'), (true, TokenCategory::Name));
        // Accepting resets the cursor: the machine is ready for a new walk.
        assert_eq!(machine.feed('a'), (true, TokenCategory::Undefined));
    }

    #[test]
    fn rejects_without_moving() {
        let mut machine = aplus_machine();
        assert_eq!(machine.feed('x'), (false, TokenCategory::Undefined));
        assert_eq!(machine.feed('a'), (true, TokenCategory::Undefined));
    }

    #[test]
    fn reset_returns_to_root() {
        let mut machine = aplus_machine();
        machine.feed('a');
        machine.reset();
        // Back at the root, a non-'a' character cannot move the cursor.
        assert_eq!(machine.feed('z'), (false, TokenCategory::Undefined));
    }

    #[test]
    fn transition_order_decides_ties() {
        let mut machine = StateMachine::new();
        let root = machine.root();
        let first = machine.add_node(TokenCategory::Undefined);
        machine.link(root, Transition::Single('x'), first);
        machine.link(root, Transition::Any, machine.root());
        assert_eq!(machine.feed('x'), (true, TokenCategory::Undefined));
        assert_eq!(machine.current, first);
    }
}
