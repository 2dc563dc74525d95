use crate::environment::Environment;
use crate::evaluator::{self, EvalError};
use crate::lexer::{LexError, Lexer, REPL_SOURCE};
use crate::parser::{Parser, ParserError};
use crate::token::{Token, TokenKind};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Stdout, Write};
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    Lex(LexError),
    Parse(ParserError),
    Eval(EvalError),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(err) => write!(f, "{}", err),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Eval(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Eval(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<ParserError> for Error {
    fn from(err: ParserError) -> Self {
        Error::Parse(err)
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        Error::Eval(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// Compiler drives lexing, parsing and evaluation. Printed values go to `out`.
pub struct Compiler<W: Write> {
    environment: Environment,
    out: W,
}

impl Compiler<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Compiler<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Compiler<W> {
    pub fn with_output(out: W) -> Self {
        Compiler {
            environment: Environment::new(),
            out,
        }
    }

    /// Compiles a whole file with a fresh environment.
    pub fn compile_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        self.compile_source(&path.display().to_string(), &text)
    }

    /// Compiles in-memory source with a fresh environment. `source` names it in diagnostics.
    pub fn compile_source(&mut self, source: &str, text: &str) -> Result<(), Error> {
        self.environment.clear();
        self.run(source, text)
    }

    /// Compiles one line of interactive input against the environment left by earlier lines.
    /// A `;` is added after the last token unless it already is `;` or `}`, so trailing
    /// comments do not swallow it.
    pub fn compile_line(&mut self, input: &str) -> Result<(), Error> {
        let mut tokens = Lexer::new(REPL_SOURCE, input).tokenize()?;

        if let Some(eof) = tokens.pop() {
            let terminated = matches!(
                tokens.last().map(|t| t.kind),
                Some(TokenKind::SemiColon | TokenKind::CloseBrace)
            );
            if !terminated {
                let semi = Token::synthetic(TokenKind::SemiColon, tokens.last().unwrap_or(&eof));
                tokens.push(semi);
            }
            tokens.push(eof);
        }

        self.execute(tokens)
    }

    fn run(&mut self, source: &str, text: &str) -> Result<(), Error> {
        let tokens = Lexer::new(source, text).tokenize()?;
        self.execute(tokens)
    }

    fn execute(&mut self, tokens: Vec<Token>) -> Result<(), Error> {
        let program = Parser::new(tokens, &mut self.environment).parse_program()?;

        evaluator::interpret(&program, &mut self.environment, &mut self.out)?;
        self.out.flush()?;

        Ok(())
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
