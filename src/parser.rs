// program        -> declaration* EOF
// declaration    -> "Let" varDecl | statement
// varDecl        -> IDENTIFIER ":" ( "Num" | "Str" | "Bool" ) ( "=" expression )? ";"
// statement      -> "Print" "->" expression ";" | "{" declaration* "}" | expression ";"
// expression     -> assignment
// assignment     -> logic_or ( "=" assignment )?
// logic_or       -> logic_and ( "||" logic_and )*
// logic_and      -> equality ( "&&" equality )*
// equality       -> comparison ( ( "==" | "!=" ) comparison )*
// comparison     -> term ( ( "<" | "<=" | ">" | ">=" ) term )*
// term           -> factor ( ( "+" | "-" ) factor )*
// factor         -> unary ( ( "*" | "/" ) unary )*
// unary          -> ( "!" | "-" ) unary | primary
// primary        -> NUM_LIT | STR_LIT | "True" | "False" | "Nil" | IDENTIFIER
//                 | "(" expression? ")"

use crate::ast::{Expression, Program, Statement};
use crate::environment::Environment;
use crate::token::{Token, TokenKind};
use std::error::Error;
use std::fmt;
use std::rc::Rc;

type Result<T> = std::result::Result<T, ParserError>;

/// Each variant carries the token found where something else was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    ExpectedIdentifier(Token),
    ExpectedColon(Token),
    ExpectedType(Token),
    ExpectedSemiColon(Token),
    ExpectedRightArrow(Token),
    ExpectedCloseParen(Token),
    ExpectedCloseBrace(Token),
    ExpectedExpression(Token),
    /// The left side of `=` was not a single identifier; carries the `=`.
    InvalidAssignmentTarget(Token),
}

impl ParserError {
    pub fn token(&self) -> &Token {
        match self {
            ParserError::ExpectedIdentifier(t)
            | ParserError::ExpectedColon(t)
            | ParserError::ExpectedType(t)
            | ParserError::ExpectedSemiColon(t)
            | ParserError::ExpectedRightArrow(t)
            | ParserError::ExpectedCloseParen(t)
            | ParserError::ExpectedCloseBrace(t)
            | ParserError::ExpectedExpression(t)
            | ParserError::InvalidAssignmentTarget(t) => t,
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            ParserError::ExpectedIdentifier(_) | ParserError::InvalidAssignmentTarget(_) => {
                TokenKind::Identifier.symbol()
            }
            ParserError::ExpectedColon(_) => TokenKind::Colon.symbol(),
            ParserError::ExpectedType(_) => "<type>",
            ParserError::ExpectedSemiColon(_) => TokenKind::SemiColon.symbol(),
            ParserError::ExpectedRightArrow(_) => TokenKind::RightArrow.symbol(),
            ParserError::ExpectedCloseParen(_) => TokenKind::CloseParen.symbol(),
            ParserError::ExpectedCloseBrace(_) => TokenKind::CloseBrace.symbol(),
            ParserError::ExpectedExpression(_) => "<expr>",
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self.token();
        write!(
            f,
            "| File {}, line:{}\n| Syntax Error: near '{}', expected '{}'",
            token.source,
            token.line,
            token.lexeme(),
            self.expected()
        )
    }
}

impl Error for ParserError {}

/// Parser builds a `Program` from tokens. Every declaration and assignment it accepts is also
/// registered with the environment.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    environment: &'a mut Environment,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token>, environment: &'a mut Environment) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (source, line) = match tokens.last() {
                Some(last) => (Rc::clone(&last.source), last.line),
                None => (Rc::from(""), 1),
            };
            tokens.push(Token::new(TokenKind::Eof, None, source, line));
        }

        Parser {
            tokens,
            current: 0,
            environment,
        }
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements = vec![];

        while !self.is_at_end() {
            statements.push(self.parse_declaration()?);
        }

        Ok(Program { statements })
    }

    fn parse_declaration(&mut self) -> Result<Statement> {
        if self.match_kinds(&[TokenKind::Let]) {
            self.parse_variable_declaration()
        } else {
            self.parse_statement()
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement> {
        let identifier = self.expect(TokenKind::Identifier, ParserError::ExpectedIdentifier)?;
        self.expect(TokenKind::Colon, ParserError::ExpectedColon)?;

        if !self.match_kinds(&[TokenKind::Num, TokenKind::Str, TokenKind::Bool]) {
            return Err(ParserError::ExpectedType(self.peek().clone()));
        }
        let declared_type = self.previous().clone();

        let (defining, initializer) = if self.match_kinds(&[TokenKind::Assign]) {
            let expression = self.parse_expression()?;
            let initializer = Expression::Variable {
                identifier: identifier.clone(),
                declared_type,
                expression: Box::new(expression.clone()),
            };
            (expression, initializer)
        } else {
            let nil = Expression::Literal(Token::synthetic(TokenKind::Nil, &identifier));
            (nil.clone(), nil)
        };

        self.expect(TokenKind::SemiColon, ParserError::ExpectedSemiColon)?;

        self.environment
            .define_expression(identifier.lexeme(), defining);

        Ok(Statement::VariableDeclaration {
            identifier,
            initializer,
        })
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        if self.match_kinds(&[TokenKind::Print]) {
            self.expect(TokenKind::RightArrow, ParserError::ExpectedRightArrow)?;
            let expression = self.parse_expression()?;
            self.expect(TokenKind::SemiColon, ParserError::ExpectedSemiColon)?;
            return Ok(Statement::Print(expression));
        }

        if self.match_kinds(&[TokenKind::OpenBrace]) {
            return self.parse_block();
        }

        let expression = self.parse_expression()?;
        self.expect(TokenKind::SemiColon, ParserError::ExpectedSemiColon)?;
        Ok(Statement::Expression(expression))
    }

    fn parse_block(&mut self) -> Result<Statement> {
        let mut statements = vec![];

        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            statements.push(self.parse_declaration()?);
        }

        self.expect(TokenKind::CloseBrace, ParserError::ExpectedCloseBrace)?;
        Ok(Statement::Block(statements))
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_assignment()
    }

    /// The target is read off the fully parsed left side, which has to be a lone identifier.
    fn parse_assignment(&mut self) -> Result<Expression> {
        let expression = self.parse_logic_or()?;

        if !self.match_kinds(&[TokenKind::Assign]) {
            return Ok(expression);
        }
        let equals = self.previous().clone();
        let value = self.parse_assignment()?;

        match expression {
            Expression::Literal(identifier) if identifier.kind == TokenKind::Identifier => {
                self.environment
                    .define_expression(identifier.lexeme(), value.clone());
                Ok(Expression::Assignment {
                    identifier,
                    value: Box::new(value),
                })
            }
            _ => Err(ParserError::InvalidAssignmentTarget(equals)),
        }
    }

    fn parse_logic_or(&mut self) -> Result<Expression> {
        self.parse_binary(&[TokenKind::Or], Self::parse_logic_and)
    }

    fn parse_logic_and(&mut self) -> Result<Expression> {
        self.parse_binary(&[TokenKind::And], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expression> {
        self.parse_binary(&[TokenKind::Eq, TokenKind::NotEq], Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        self.parse_binary(
            &[TokenKind::Lt, TokenKind::LtEq, TokenKind::Gt, TokenKind::GtEq],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expression> {
        self.parse_binary(&[TokenKind::Plus, TokenKind::Minus], Self::parse_factor)
    }

    fn parse_factor(&mut self) -> Result<Expression> {
        self.parse_binary(&[TokenKind::Asterisk, TokenKind::Slash], Self::parse_unary)
    }

    /// Left-associative chain of `operand (operator operand)*`.
    fn parse_binary(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expression>,
    ) -> Result<Expression> {
        let mut expression = operand(self)?;

        while self.match_kinds(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            expression = Expression::Binary {
                left: Box::new(expression),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expression)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.match_kinds(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            return Ok(Expression::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        if self.match_kinds(&[
            TokenKind::NumLit,
            TokenKind::StrLit,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nil,
            TokenKind::Identifier,
        ]) {
            return Ok(Expression::Literal(self.previous().clone()));
        }

        if self.match_kinds(&[TokenKind::OpenParen]) {
            if self.match_kinds(&[TokenKind::CloseParen]) {
                return Ok(Expression::Grouping(None));
            }
            let expression = self.parse_expression()?;
            self.expect(TokenKind::CloseParen, ParserError::ExpectedCloseParen)?;
            return Ok(Expression::Grouping(Some(Box::new(expression))));
        }

        Err(ParserError::ExpectedExpression(self.peek().clone()))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn next_token(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn match_kinds(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.next_token();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, expected: fn(Token) -> ParserError) -> Result<Token> {
        if !self.check(kind) {
            return Err(expected(self.peek().clone()));
        }

        Ok(self.next_token().clone())
    }
}
