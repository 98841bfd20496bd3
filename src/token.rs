/// Zero-based source coordinates of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Category assigned to a scanned token.
///
/// `Undefined` marks a lexeme no finder could classify; it survives scanning
/// so the token stream still reconstitutes the input, and later stages
/// reject it with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Undefined,
    Name,
    IntLiteral,
    FloatLiteral,
    BinaryOperator,
    UnaryOperator,
    Assignment,
    If,
    Else,
    While,
    LetDeclaration,
    OpenParen,
    CloseParen,
    Endline,
    Space,
    Tab,
}

impl TokenCategory {
    /// Whitespace tokens are emitted by the scanner so the stream stays a
    /// partition of the input; the expression builder skips them.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenCategory::Space | TokenCategory::Tab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: TokenCategory,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub text_offset: usize,
}

impl Token {
    pub fn new(
        category: TokenCategory,
        lexeme: impl Into<String>,
        line: usize,
        column: usize,
        text_offset: usize,
    ) -> Self {
        Self {
            category,
            lexeme: lexeme.into(),
            line,
            column,
            text_offset,
        }
    }

    pub fn is_endline(&self) -> bool {
        self.lexeme == "\n"
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }
}
