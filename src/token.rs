use logos::{Logos, Skip};
use std::fmt;
use std::rc::Rc;

/// Enum representing every lexeme kind of the language.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    Eof,

    /// `<num_lit>`, such as `42` or `3.14`
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    NumLit,
    /// `<str_lit>`, single quoted with `\'` and `\\` escapes
    #[regex(r"'([^'\\]|\\'|\\\\)*'", allow_greedy = true)]
    StrLit,
    /// `<id>`
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*")]
    Identifier,

    /// ";"
    #[token(";")]
    SemiColon,
    /// ","
    #[token(",")]
    Comma,
    /// "("
    #[token("(")]
    OpenParen,
    /// ")"
    #[token(")")]
    CloseParen,
    /// "["
    #[token("[")]
    OpenBracket,
    /// "]"
    #[token("]")]
    CloseBracket,
    /// "{"
    #[token("{")]
    OpenBrace,
    /// "}"
    #[token("}")]
    CloseBrace,
    /// "_"
    #[token("_")]
    UnderScore,
    /// "+"
    #[token("+")]
    Plus,
    /// "-"
    #[token("-")]
    Minus,
    /// "*"
    #[token("*")]
    Asterisk,
    /// "/"
    #[token("/")]
    Slash,
    /// "=="
    #[token("==")]
    Eq,
    /// "!="
    #[token("!=")]
    NotEq,
    /// "!"
    #[token("!")]
    Bang,
    /// "<"
    #[token("<")]
    Lt,
    /// "<="
    #[token("<=")]
    LtEq,
    /// ">"
    #[token(">")]
    Gt,
    /// ">="
    #[token(">=")]
    GtEq,
    /// "="
    #[token("=")]
    Assign,
    /// "<-"
    #[token("<-")]
    LeftArrow,
    /// "->"
    #[token("->")]
    RightArrow,
    /// ":"
    #[token(":")]
    Colon,
    /// "&&"
    #[token("&&")]
    And,
    /// "||"
    #[token("||")]
    Or,

    // Keywords
    /// "Let"
    #[token("Let")]
    Let,
    /// "Print"
    #[token("Print")]
    Print,
    /// "Ret"
    #[token("Ret")]
    Return,
    /// "Fun"
    #[token("Fun")]
    Function,
    /// "If"
    #[token("If")]
    If,
    /// "Else"
    #[token("Else")]
    Else,
    /// "ElIf"
    #[token("ElIf")]
    ElseIf,
    /// "For"
    #[token("For")]
    For,
    /// "Class"
    #[token("Class")]
    Class,
    /// "Self"
    #[token("Self")]
    SelfKw,
    /// "Super"
    #[token("Super")]
    Super,
    /// "Nil"
    #[token("Nil")]
    Nil,
    /// "True"
    #[token("True")]
    True,
    /// "False"
    #[token("False")]
    False,

    // Types
    /// "Num"
    #[token("Num")]
    Num,
    /// "Str"
    #[token("Str")]
    Str,
    /// "Bool"
    #[token("Bool")]
    Bool,

    /// `// ...` up to the end of the line.
    #[token("//", line_comment)]
    LineComment,
    /// `/* ... */`, possibly left open at the end of the line.
    #[token("/*", block_comment)]
    BlockComment,
}

impl TokenKind {
    /// The textual symbol used when reporting diagnostics.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Eof => "<eof>",
            TokenKind::NumLit => "<num_lit>",
            TokenKind::StrLit => "<str_lit>",
            TokenKind::Identifier => "<id>",
            TokenKind::SemiColon => ";",
            TokenKind::Comma => ",",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::UnderScore => "_",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Assign => "=",
            TokenKind::LeftArrow => "<-",
            TokenKind::RightArrow => "->",
            TokenKind::Colon => ":",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Let => "Let",
            TokenKind::Print => "Print",
            TokenKind::Return => "Ret",
            TokenKind::Function => "Fun",
            TokenKind::If => "If",
            TokenKind::Else => "Else",
            TokenKind::ElseIf => "ElIf",
            TokenKind::For => "For",
            TokenKind::Class => "Class",
            TokenKind::SelfKw => "Self",
            TokenKind::Super => "Super",
            TokenKind::Nil => "Nil",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::Num => "Num",
            TokenKind::Str => "Str",
            TokenKind::Bool => "Bool",
            TokenKind::LineComment => "//",
            TokenKind::BlockComment => "/*",
        }
    }

    /// Literal and identifier tokens carry the lexeme they were read from.
    pub fn has_content(&self) -> bool {
        matches!(
            self,
            TokenKind::NumLit | TokenKind::StrLit | TokenKind::Identifier
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// State carried by the lexer across the lexemes of one line.
#[derive(Default, Debug, Clone, Copy)]
pub struct LexerExtras {
    /// Set when a `/*` is still open at the end of the line.
    pub in_block_comment: bool,
}

fn line_comment(lex: &mut logos::Lexer<TokenKind>) -> Skip {
    let rest = lex.remainder().len();
    lex.bump(rest);
    Skip
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> Skip {
    match lex.remainder().find("*/") {
        Some(end) => lex.bump(end + 2),
        None => {
            let rest = lex.remainder().len();
            lex.bump(rest);
            lex.extras.in_block_comment = true;
        }
    }
    Skip
}

/// A classified, positioned lexical unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact lexeme, present only for literals and identifiers.
    pub content: Option<String>,
    /// The file path the token was read from, or `<repl>`.
    pub source: Rc<str>,
    /// 1-based line number.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, content: Option<String>, source: Rc<str>, line: usize) -> Self {
        Token {
            kind,
            content,
            source,
            line,
        }
    }

    /// Builds a token of `kind` positioned where `at` was read.
    pub fn synthetic(kind: TokenKind, at: &Token) -> Self {
        Token::new(kind, None, Rc::clone(&at.source), at.line)
    }

    pub fn lexeme(&self) -> &str {
        self.content.as_deref().unwrap_or_else(|| self.kind.symbol())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}
