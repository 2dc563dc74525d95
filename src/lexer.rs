use std::error::Error;
use std::fmt;
use std::rc::Rc;

use logos::Logos;

use crate::token::{LexerExtras, Token, TokenKind};

/// Source name given to tokens read from interactive input.
pub const REPL_SOURCE: &str = "<repl>";

type Result<T> = std::result::Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnrecognizedLexeme {
        lexeme: String,
        source: String,
        line: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnrecognizedLexeme {
                lexeme,
                source,
                line,
            } => write!(
                f,
                "| File {}, line:{}\n| Lexical Error: unrecognized lexeme '{}'",
                source, line, lexeme
            ),
        }
    }
}

impl Error for LexError {}

/// Lexer turns source lines into a flat token sequence terminated by `Eof`.
pub struct Lexer<'a> {
    source: Rc<str>,
    lines: Vec<&'a str>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &str, input: &'a str) -> Lexer<'a> {
        Lexer {
            source: Rc::from(source),
            lines: input.lines().collect(),
        }
    }

    pub fn tokenize(&self) -> Result<Vec<Token>> {
        let mut tokens = vec![];
        let mut in_block_comment = false;

        for (index, line) in self.lines.iter().enumerate() {
            let line_no = index + 1;
            let mut rest = *line;

            if in_block_comment {
                match rest.find("*/") {
                    Some(end) => rest = &rest[end + 2..],
                    None => continue,
                }
            }

            let mut lexer = TokenKind::lexer_with_extras(rest, LexerExtras::default());

            while let Some(kind) = lexer.next() {
                match kind {
                    Ok(kind) => {
                        let content = kind.has_content().then(|| lexer.slice().to_owned());
                        tokens.push(Token::new(kind, content, Rc::clone(&self.source), line_no));
                    }
                    Err(()) => {
                        return Err(LexError::UnrecognizedLexeme {
                            lexeme: lexer.slice().to_owned(),
                            source: self.source.to_string(),
                            line: line_no,
                        })
                    }
                }
            }

            in_block_comment = lexer.extras.in_block_comment;
        }

        tokens.push(Token::new(
            TokenKind::Eof,
            None,
            Rc::clone(&self.source),
            self.lines.len() + 1,
        ));

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{LexError, Lexer};
    use crate::token::TokenKind;

    fn test_lexing(input: &str, expected_tokens: Vec<(TokenKind, Option<&str>)>) {
        let tokens = Lexer::new("test.kro", input)
            .tokenize()
            .unwrap_or_else(|err| panic!("lexing `{}` failed: {}", input, err));

        let actual: Vec<(TokenKind, Option<&str>)> = tokens
            .iter()
            .map(|t| (t.kind, t.content.as_deref()))
            .collect();

        assert_eq!(expected_tokens, actual);
    }

    #[test]
    fn test_next_token() {
        test_lexing(
            "=+(){},;",
            vec![
                (TokenKind::Assign, None),
                (TokenKind::Plus, None),
                (TokenKind::OpenParen, None),
                (TokenKind::CloseParen, None),
                (TokenKind::OpenBrace, None),
                (TokenKind::CloseBrace, None),
                (TokenKind::Comma, None),
                (TokenKind::SemiColon, None),
                (TokenKind::Eof, None),
            ],
        );
    }

    #[test]
    fn test_next_token_on_kro() {
        test_lexing(
            r#"Let five: Num = 5.25;
Let name: Str = 'it\'s';
Print -> !True && False || five <= 10 >= 2 != 3 == 4 < 1 > 0;
x = -five * 2 / 1;
"#,
            vec![
                (TokenKind::Let, None),
                (TokenKind::Identifier, Some("five")),
                (TokenKind::Colon, None),
                (TokenKind::Num, None),
                (TokenKind::Assign, None),
                (TokenKind::NumLit, Some("5.25")),
                (TokenKind::SemiColon, None),
                (TokenKind::Let, None),
                (TokenKind::Identifier, Some("name")),
                (TokenKind::Colon, None),
                (TokenKind::Str, None),
                (TokenKind::Assign, None),
                (TokenKind::StrLit, Some(r"'it\'s'")),
                (TokenKind::SemiColon, None),
                (TokenKind::Print, None),
                (TokenKind::RightArrow, None),
                (TokenKind::Bang, None),
                (TokenKind::True, None),
                (TokenKind::And, None),
                (TokenKind::False, None),
                (TokenKind::Or, None),
                (TokenKind::Identifier, Some("five")),
                (TokenKind::LtEq, None),
                (TokenKind::NumLit, Some("10")),
                (TokenKind::GtEq, None),
                (TokenKind::NumLit, Some("2")),
                (TokenKind::NotEq, None),
                (TokenKind::NumLit, Some("3")),
                (TokenKind::Eq, None),
                (TokenKind::NumLit, Some("4")),
                (TokenKind::Lt, None),
                (TokenKind::NumLit, Some("1")),
                (TokenKind::Gt, None),
                (TokenKind::NumLit, Some("0")),
                (TokenKind::SemiColon, None),
                (TokenKind::Identifier, Some("x")),
                (TokenKind::Assign, None),
                (TokenKind::Minus, None),
                (TokenKind::Identifier, Some("five")),
                (TokenKind::Asterisk, None),
                (TokenKind::NumLit, Some("2")),
                (TokenKind::Slash, None),
                (TokenKind::NumLit, Some("1")),
                (TokenKind::SemiColon, None),
                (TokenKind::Eof, None),
            ],
        );
    }

    #[test]
    fn keywords_win_over_identifiers() {
        test_lexing(
            "Let Letter Nil Nile Bool",
            vec![
                (TokenKind::Let, None),
                (TokenKind::Identifier, Some("Letter")),
                (TokenKind::Nil, None),
                (TokenKind::Identifier, Some("Nile")),
                (TokenKind::Bool, None),
                (TokenKind::Eof, None),
            ],
        );
    }

    #[test]
    fn skips_comments() {
        test_lexing(
            "// a whole line
  // indented
Print -> 1; // trailing
/* one line */ Print -> 2;
/* opened
   still inside ;;; @@@
closed */ Print -> 3;
/* opened again
*/",
            vec![
                (TokenKind::Print, None),
                (TokenKind::RightArrow, None),
                (TokenKind::NumLit, Some("1")),
                (TokenKind::SemiColon, None),
                (TokenKind::Print, None),
                (TokenKind::RightArrow, None),
                (TokenKind::NumLit, Some("2")),
                (TokenKind::SemiColon, None),
                (TokenKind::Print, None),
                (TokenKind::RightArrow, None),
                (TokenKind::NumLit, Some("3")),
                (TokenKind::SemiColon, None),
                (TokenKind::Eof, None),
            ],
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let input = "Let a: Num = 1;\n\n// note\nPrint -> a;\n";
        let tokens = Lexer::new("lines.kro", input).tokenize().unwrap();

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(
            vec![1, 1, 1, 1, 1, 1, 1, 4, 4, 4, 4, 5],
            lines,
            "tokens: {:?}",
            tokens
        );
        assert!(tokens.iter().all(|t| &*t.source == "lines.kro"));
    }

    #[test]
    fn unrecognized_lexeme() {
        let err = Lexer::new("bad.kro", "Let a: Num = 1;\nPrint -> a @ 2;")
            .tokenize()
            .unwrap_err();

        assert_eq!(
            LexError::UnrecognizedLexeme {
                lexeme: "@".to_owned(),
                source: "bad.kro".to_owned(),
                line: 2,
            },
            err
        );
        assert_eq!(
            "| File bad.kro, line:2\n| Lexical Error: unrecognized lexeme '@'",
            err.to_string()
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::new("bad.kro", "Print -> 'open;").tokenize().is_err());
    }
}
