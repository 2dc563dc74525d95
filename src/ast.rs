use crate::token::Token;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    /// A number, string, boolean or nil literal, or an identifier read.
    Literal(Token),
    Unary {
        operator: Token,
        right: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    /// `( expression )`, or `()` which evaluates to nil.
    Grouping(Option<Box<Expression>>),
    /// The initializer of a declaration together with its declared type.
    Variable {
        identifier: Token,
        declared_type: Token,
        expression: Box<Expression>,
    },
    Assignment {
        identifier: Token,
        value: Box<Expression>,
    },
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Literal(token) => write!(f, "{}", token),
            Expression::Unary { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Grouping(Some(expression)) => write!(f, "({})", expression),
            Expression::Grouping(None) => write!(f, "()"),
            Expression::Variable {
                identifier,
                declared_type,
                expression,
            } => write!(f, "{}: {} = {}", identifier, declared_type, expression),
            Expression::Assignment { identifier, value } => {
                write!(f, "{} = {}", identifier, value)
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Print(Expression),
    VariableDeclaration {
        identifier: Token,
        initializer: Expression,
    },
    /// `{ ... }`; shares the enclosing environment.
    Block(Vec<Statement>),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Expression(expression) => write!(f, "{};", expression),
            Statement::Print(expression) => write!(f, "Print -> {};", expression),
            Statement::VariableDeclaration {
                initializer: initializer @ Expression::Variable { .. },
                ..
            } => write!(f, "Let {};", initializer),
            Statement::VariableDeclaration { identifier, .. } => write!(f, "Let {};", identifier),
            Statement::Block(statements) => {
                write!(f, "{{")?;
                for statement in statements {
                    write!(f, " {}", statement)?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[derive(Debug, Default, Eq, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}
