//! Multi-machine token scanner.
//!
//! An ordered collection of finder automata shares one walk over the input.
//! The active finder consumes characters greedily into a lexeme buffer; when
//! it gets stuck, the buffer plus the pending character is replayed through
//! the remaining finders in priority order. Stepping into an accepting state
//! emits the buffered lexeme (without the lookahead character that triggered
//! the accept) and restarts the search from the highest-priority finder.
//!
//! Whitespace and newline tokens are emitted like any other, so the
//! concatenation of all lexemes reconstitutes the input exactly.

use thiserror::Error;

use crate::fsm::StateMachine;
use crate::token::{Token, TokenCategory};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("UndefinedTokenError: can not recognize token '{lexeme}' at {line}:{column}")]
    UndefinedToken {
        lexeme: String,
        line: usize,
        column: usize,
    },
}

pub type LexResult<T> = Result<T, LexError>;

/// Sentinel fed after the input; it can satisfy lookahead transitions but
/// never becomes part of a lexeme.
const END_OF_TEXT: char = '\0';

pub struct Scanner {
    finders: Vec<StateMachine>,
    keywords: Vec<(String, TokenCategory)>,
    active: usize,
    buffer: String,
    /// Last category reported by a successful step of the active walk.
    last_category: TokenCategory,
    line: usize,
    column: usize,
    text_offset: usize,
}

impl Scanner {
    /// Finders are tried in the order given; earlier machines win ties.
    /// `keywords` rewrites the category of every token whose lexeme matches.
    pub fn new(finders: Vec<StateMachine>, keywords: Vec<(String, TokenCategory)>) -> Self {
        Self {
            finders,
            keywords,
            active: 0,
            buffer: String::new(),
            last_category: TokenCategory::Undefined,
            line: 0,
            column: 0,
            text_offset: 0,
        }
    }

    /// Tokenizes `text`. Lexemes no finder can classify come back with
    /// `TokenCategory::Undefined`; position counters carry over from any
    /// previous call until [`Scanner::reset`].
    pub fn scan(&mut self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for c in text.chars() {
            self.push_char(c, &mut tokens);
        }
        self.push_char(END_OF_TEXT, &mut tokens);

        for token in &mut tokens {
            for (keyword, category) in &self.keywords {
                if token.lexeme == *keyword {
                    token.category = *category;
                }
            }
        }
        tokens
    }

    /// Tokenizes `text` and rejects the first unclassifiable lexeme.
    pub fn tokenize(&mut self, text: &str) -> LexResult<Vec<Token>> {
        let tokens = self.scan(text);
        if let Some(bad) = tokens
            .iter()
            .find(|token| token.category == TokenCategory::Undefined)
        {
            return Err(LexError::UndefinedToken {
                lexeme: bad.lexeme.clone(),
                line: bad.line,
                column: bad.column,
            });
        }
        Ok(tokens)
    }

    /// Clears the active finder, the lexeme buffer and the position
    /// counters.
    pub fn reset(&mut self) {
        for finder in &mut self.finders {
            finder.reset();
        }
        self.active = 0;
        self.buffer.clear();
        self.last_category = TokenCategory::Undefined;
        self.line = 0;
        self.column = 0;
        self.text_offset = 0;
    }

    fn push_char(&mut self, c: char, tokens: &mut Vec<Token>) {
        let (accepted, category) = self.feed_with_fallback(c);
        if !accepted {
            // No finder can extend the buffered prefix with `c`.
            if self.buffer.is_empty() {
                if c != END_OF_TEXT {
                    // A character nothing recognizes becomes its own
                    // undefined token.
                    self.buffer.push(c);
                    self.emit(TokenCategory::Undefined, tokens);
                }
                return;
            }
            let best = self.last_category;
            self.emit(best, tokens);
            self.push_char(c, tokens);
            return;
        }
        if category != TokenCategory::Undefined {
            // The lookahead `c` drove the active finder into an accepting
            // state: the buffer is a complete token and `c` starts the next.
            self.emit(category, tokens);
            self.push_char(c, tokens);
            return;
        }
        self.buffer.push(c);
        self.last_category = category;
    }

    /// Feeds `c` to the active finder; on failure, replays the buffered
    /// lexeme plus `c` through each lower-priority finder until one accepts
    /// the whole prefix.
    fn feed_with_fallback(&mut self, c: char) -> (bool, TokenCategory) {
        let (accepted, category) = self.finders[self.active].feed(c);
        if accepted {
            return (true, category);
        }
        'candidates: for candidate in self.active + 1..self.finders.len() {
            self.finders[candidate].reset();
            let mut category = TokenCategory::Undefined;
            for replayed in self.buffer.chars().chain(std::iter::once(c)) {
                let (ok, step_category) = self.finders[candidate].feed(replayed);
                if !ok {
                    continue 'candidates;
                }
                category = step_category;
            }
            self.active = candidate;
            return (true, category);
        }
        (false, TokenCategory::Undefined)
    }

    /// Turns the buffered lexeme into a token, advances the position
    /// counters and rewinds the finder collection.
    fn emit(&mut self, category: TokenCategory, tokens: &mut Vec<Token>) {
        let lexeme = std::mem::take(&mut self.buffer);
        for finder in &mut self.finders {
            finder.reset();
        }
        self.active = 0;
        self.last_category = TokenCategory::Undefined;

        if lexeme.is_empty() || lexeme.starts_with(END_OF_TEXT) {
            return;
        }
        let column = self.column;
        let text_offset = self.text_offset;
        let length = lexeme.chars().count();
        self.column += length;
        self.text_offset += length;
        if lexeme.starts_with('\n') {
            self.column = 0;
            self.line += 1;
        }
        tokens.push(Token::new(category, lexeme, self.line, column, text_offset));
    }
}
