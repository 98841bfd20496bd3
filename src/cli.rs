//! Entry modes: whole-script execution and the interactive loop.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::config::LanguageConfig;
use crate::eval::{EvalError, Scope};
use crate::parser::{ParseError, Parser};
use crate::scanner::{LexError, Scanner};

/// Any diagnostic the pipeline can produce, plus terminal I/O failures in
/// the interactive loop.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A configured interpreter with its persistent variable scope.
pub struct Session {
    scanner: Scanner,
    parser: Parser,
    scope: Scope,
}

impl Session {
    pub fn new(config: &LanguageConfig) -> Self {
        Self {
            scanner: config.scanner(),
            parser: Parser::new(config),
            scope: Scope::new(),
        }
    }

    /// Runs a whole program text and returns its value. Open blocks at end
    /// of input are closed, the same as a dedent to column zero.
    pub fn run_script(&mut self, source: &str) -> Result<i32, CliError> {
        self.scanner.reset();
        self.parser.reset();
        let tokens = self.scanner.tokenize(source)?;
        self.parser.interpret_lines(&tokens)?;
        let program = self.parser.finish()?;
        Ok(program.eval(&mut self.scope)?)
    }

    /// Interactive loop: `>>> ` at the top level, `... ` inside a block.
    ///
    /// A line that returns the parser to depth 1 — or a blank line, which
    /// closes any open blocks — finalizes the accumulated program,
    /// evaluates it against the persistent scope and prints the result.
    /// Diagnostics are printed and the parser state reset; the scope
    /// survives. End of input inside an open block is an interruption.
    pub fn repl(&mut self, input: &mut dyn BufRead, output: &mut dyn Write) -> io::Result<()> {
        loop {
            if self.parser.depth() == 1 {
                write!(output, ">>> ")?;
            } else {
                write!(output, "... ")?;
            }
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                if self.parser.depth() > 1 {
                    writeln!(output, "{}", EvalError::Interruption)?;
                    self.parser.reset();
                }
                return Ok(());
            }
            let line = line.trim_end_matches(['\n', '\r']);

            if self.parser.depth() == 1 {
                // Each completed statement starts a fresh program; only the
                // scope carries over.
                self.parser.reset();
            }
            self.scanner.reset();

            match self.eval_line(line) {
                Ok(Some(value)) => writeln!(output, "{value}")?,
                Ok(None) => {}
                Err(error) => {
                    writeln!(output, "{error}")?;
                    self.parser.reset();
                }
            }
        }
    }

    fn eval_line(&mut self, line: &str) -> Result<Option<i32>, CliError> {
        let tokens = self.scanner.tokenize(line)?;
        self.parser.interpret_line(&tokens)?;
        if self.parser.depth() == 1 || tokens.is_empty() {
            let program = self.parser.finish()?;
            return Ok(Some(program.eval(&mut self.scope)?));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use indoc::indoc;

    use super::*;

    fn session() -> Session {
        Session::new(&LanguageConfig::standard())
    }

    fn repl_output(input: &str) -> String {
        let mut session = session();
        let mut output = Vec::new();
        session
            .repl(&mut Cursor::new(input.as_bytes()), &mut output)
            .expect("repl");
        String::from_utf8(output).expect("utf8 output")
    }

    #[test]
    fn runs_declaration_and_expression_script() {
        assert_eq!(
            session().run_script("let a = 3 + 4 * 2\na\n").ok(),
            Some(11)
        );
    }

    #[test]
    fn runs_while_script() {
        let source = indoc! {"
            let x = 0
            while x < 3
                x += 1
            x
        "};
        assert_eq!(session().run_script(source).ok(), Some(3));
    }

    #[test]
    fn empty_script_evaluates_to_zero() {
        assert_eq!(session().run_script("").ok(), Some(0));
    }

    #[test]
    fn script_error_carries_the_diagnostic_label() {
        let error = session()
            .run_script("let a = 10\na / 0\n")
            .expect_err("expected zero division");
        assert!(error.to_string().starts_with("ZeroDivisionError"));

        let error = session()
            .run_script("let a = 1\nlet a = 2\n")
            .expect_err("expected redeclaration");
        assert!(error.to_string().starts_with("VariableRedeclarationError"));

        let error = session()
            .run_script("  a = 1\n")
            .expect_err("expected indentation error");
        assert!(error.to_string().starts_with("IndentationError"));
    }

    #[test]
    fn repl_prompts_and_prints_results() {
        let output = repl_output("let a = 2\na + 3\n");
        assert_eq!(output, ">>> 2\n>>> 5\n>>> ");
    }

    #[test]
    fn repl_keeps_prompting_inside_blocks() {
        let input = indoc! {"
            let x = 0
            while x < 3
                x += 1
            x
        "};
        let output = repl_output(input);
        // The while header and its body line stay pending (`... `); the
        // dedented `x` completes the block and prints the program result.
        assert_eq!(output, ">>> 0\n>>> ... ... 3\n>>> ");
    }

    #[test]
    fn repl_blank_line_closes_open_blocks() {
        let output = repl_output("if 1\n    let y = 7\n\ny\n");
        assert_eq!(output, ">>> ... ... 7\n>>> 7\n>>> ");
    }

    #[test]
    fn repl_preserves_scope_across_errors() {
        let output = repl_output("let a = 4\na / 0\na\n");
        assert_eq!(
            output,
            ">>> 4\n>>> ZeroDivisionError: can't divide by zero at 0:2\n>>> 4\n>>> "
        );
    }

    #[test]
    fn repl_reports_interruption_at_eof_inside_block() {
        let output = repl_output("while 1\n");
        assert!(output.ends_with(&format!("{}\n", EvalError::Interruption)));
    }
}
