use crate::ast::{Expression, Program, Statement};
use crate::environment::Environment;
use crate::object::Object;
use crate::token::{Token, TokenKind};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::mem;

pub type EvalResult = std::result::Result<Object, EvalError>;

#[derive(Debug)]
pub enum EvalError {
    NilOperand {
        operator: Token,
        left: Object,
        right: Object,
    },
    /// Binary operands of different types.
    TypeMismatch {
        operator: Token,
        left: Object,
        right: Object,
    },
    /// Binary operands of the same type which the operator does not support.
    UnsupportedOperands {
        operator: Token,
        left: Object,
        right: Object,
    },
    UnsupportedUnaryOperand {
        operator: Token,
        operand: Object,
    },
    DeclaredTypeMismatch {
        identifier: Token,
        declared: Token,
        value: Object,
    },
    UndefinedVariable(Token),
    /// The name is declared further on but its declaration has not run yet.
    UsedBeforeDeclaration(Token),
    InvalidLiteral(Token),
    InvalidOperator(Token),
    Output(io::Error),
}

impl EvalError {
    fn token(&self) -> Option<&Token> {
        match self {
            EvalError::NilOperand { operator, .. }
            | EvalError::TypeMismatch { operator, .. }
            | EvalError::UnsupportedOperands { operator, .. }
            | EvalError::UnsupportedUnaryOperand { operator, .. } => Some(operator),
            EvalError::DeclaredTypeMismatch { identifier, .. } => Some(identifier),
            EvalError::UndefinedVariable(t)
            | EvalError::UsedBeforeDeclaration(t)
            | EvalError::InvalidLiteral(t)
            | EvalError::InvalidOperator(t) => Some(t),
            EvalError::Output(_) => None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(token) = self.token() {
            write!(f, "| File {}, line:{}\n| Evaluation Error: ", token.source, token.line)?;
        }

        match self {
            EvalError::NilOperand {
                operator,
                left,
                right,
            } => write!(
                f,
                "operation '{}' on Nil can not be done: {} {} {}",
                operator,
                left.inspect(),
                operator,
                right.inspect()
            ),
            EvalError::TypeMismatch {
                operator,
                left,
                right,
            } => write!(
                f,
                "operation '{}' can not be done on different types: {} {} {}",
                operator,
                left.inspect(),
                operator,
                right.inspect()
            ),
            EvalError::UnsupportedOperands {
                operator,
                left,
                right,
            } => write!(
                f,
                "operation '{}' can not be done on {} and {}",
                operator,
                left.inspect(),
                right.inspect()
            ),
            EvalError::UnsupportedUnaryOperand { operator, operand } => write!(
                f,
                "operation '{}' can not be done on {}",
                operator,
                operand.inspect()
            ),
            EvalError::DeclaredTypeMismatch {
                identifier,
                declared,
                value,
            } => write!(
                f,
                "'{}' is declared as {} but was given {} {}",
                identifier,
                declared,
                value.type_name(),
                value.inspect()
            ),
            EvalError::UndefinedVariable(identifier) => {
                write!(f, "name '{}' is not defined", identifier)
            }
            EvalError::UsedBeforeDeclaration(identifier) => {
                write!(f, "name '{}' is used before its declaration", identifier)
            }
            EvalError::InvalidLiteral(token) => write!(f, "invalid literal '{}'", token),
            EvalError::InvalidOperator(token) => write!(f, "invalid operator '{}'", token),
            EvalError::Output(err) => write!(f, "failed to write output: {}", err),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Output(err) => Some(err),
            _ => None,
        }
    }
}

/// Executes each statement in order, writing printed values to `out`. Stops at the first error.
pub fn interpret<W: Write>(
    program: &Program,
    env: &mut Environment,
    out: &mut W,
) -> Result<(), EvalError> {
    for statement in &program.statements {
        eval_statement(statement, env, out)?;
    }

    Ok(())
}

fn eval_statement<W: Write>(
    statement: &Statement,
    env: &mut Environment,
    out: &mut W,
) -> Result<(), EvalError> {
    match statement {
        Statement::Expression(expression) => {
            eval_expression(expression, env)?;
        }
        Statement::Print(expression) => {
            let value = eval_expression(expression, env)?;
            writeln!(out, "{}", value).map_err(EvalError::Output)?;
        }
        Statement::VariableDeclaration {
            identifier,
            initializer,
        } => {
            let value = eval_expression(initializer, env)?;
            env.set(identifier.lexeme(), value);
        }
        Statement::Block(statements) => {
            for statement in statements {
                eval_statement(statement, env, out)?;
            }
        }
    }

    Ok(())
}

pub fn eval_expression(expression: &Expression, env: &mut Environment) -> EvalResult {
    match expression {
        Expression::Literal(token) => eval_literal(token, env),
        Expression::Unary { operator, right } => {
            let right = eval_expression(right, env)?;
            eval_prefix_expression(operator, right)
        }
        Expression::Binary {
            left,
            operator,
            right,
        } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix_expression(operator, left, right)
        }
        Expression::Grouping(Some(expression)) => eval_expression(expression, env),
        Expression::Grouping(None) => Ok(Object::Nil),
        Expression::Variable {
            identifier,
            declared_type,
            expression,
        } => {
            let value = eval_expression(expression, env)?;
            if !value.fits(declared_type.kind) {
                return Err(EvalError::DeclaredTypeMismatch {
                    identifier: identifier.clone(),
                    declared: declared_type.clone(),
                    value,
                });
            }
            Ok(value)
        }
        Expression::Assignment { identifier, value } => {
            let value = eval_expression(value, env)?;
            env.set(identifier.lexeme(), value.clone());
            Ok(value)
        }
    }
}

fn eval_literal(token: &Token, env: &Environment) -> EvalResult {
    let invalid = || EvalError::InvalidLiteral(token.clone());

    match token.kind {
        TokenKind::NumLit => token
            .content
            .as_deref()
            .and_then(|lexeme| lexeme.parse().ok())
            .map(Object::Number)
            .ok_or_else(invalid),
        TokenKind::StrLit => token
            .content
            .as_deref()
            .map(|lexeme| Object::String(unquote(lexeme)))
            .ok_or_else(invalid),
        TokenKind::True => Ok(Object::Boolean(true)),
        TokenKind::False => Ok(Object::Boolean(false)),
        TokenKind::Nil => Ok(Object::Nil),
        TokenKind::Identifier => eval_identifier(token, env),
        _ => Err(invalid()),
    }
}

fn eval_identifier(identifier: &Token, env: &Environment) -> EvalResult {
    let name = identifier.lexeme();

    match env.get(name) {
        Some(value) => Ok(value),
        None if env.is_declared(name) => Err(EvalError::UsedBeforeDeclaration(identifier.clone())),
        None => Err(EvalError::UndefinedVariable(identifier.clone())),
    }
}

/// Strips the surrounding quotes and the backslash of each escape.
fn unquote(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(lexeme);

    let mut res = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => res.extend(chars.next()),
            c => res.push(c),
        }
    }

    res
}

fn eval_prefix_expression(operator: &Token, right: Object) -> EvalResult {
    match (operator.kind, right) {
        (TokenKind::Bang, Object::Nil) => Ok(Object::Boolean(true)),
        (TokenKind::Bang, Object::Boolean(b)) => Ok(Object::Boolean(!b)),
        (TokenKind::Minus, Object::Nil) => Ok(Object::Nil),
        (TokenKind::Minus, Object::Number(n)) => Ok(Object::Number(-n)),
        (TokenKind::Bang | TokenKind::Minus, operand) => Err(EvalError::UnsupportedUnaryOperand {
            operator: operator.clone(),
            operand,
        }),
        _ => Err(EvalError::InvalidOperator(operator.clone())),
    }
}

/// Both operands are already evaluated, so `&&` and `||` never short-circuit.
fn eval_infix_expression(operator: &Token, left: Object, right: Object) -> EvalResult {
    if !is_infix_operator(operator.kind) {
        return Err(EvalError::InvalidOperator(operator.clone()));
    }

    if left.is_nil() || right.is_nil() {
        return Err(EvalError::NilOperand {
            operator: operator.clone(),
            left,
            right,
        });
    }

    let result = match (operator.kind, &left, &right) {
        (TokenKind::Plus, Object::Number(l), Object::Number(r)) => Object::Number(l + r),
        (TokenKind::Plus, Object::String(l), Object::String(r)) => {
            Object::String(format!("{}{}", l, r))
        }
        (TokenKind::Minus, Object::Number(l), Object::Number(r)) => Object::Number(l - r),
        (TokenKind::Asterisk, Object::Number(l), Object::Number(r)) => Object::Number(l * r),
        (TokenKind::Slash, Object::Number(l), Object::Number(r)) => {
            if *r == 0.0 {
                Object::Number(f64::NAN)
            } else {
                Object::Number(l / r)
            }
        }
        (kind, Object::Number(l), Object::Number(r)) if is_comparison(kind) => {
            Object::Boolean(compare(kind, number_order(*l, *r)))
        }
        (kind, Object::String(l), Object::String(r)) if is_comparison(kind) => {
            Object::Boolean(compare(kind, l.cmp(r)))
        }
        (TokenKind::Eq, l, r) => Object::Boolean(values_equal(l, r)),
        (TokenKind::NotEq, l, r) => Object::Boolean(!values_equal(l, r)),
        (TokenKind::And, Object::Boolean(l), Object::Boolean(r)) => Object::Boolean(*l && *r),
        (TokenKind::Or, Object::Boolean(l), Object::Boolean(r)) => Object::Boolean(*l || *r),
        (_, l, r) if mem::discriminant(l) != mem::discriminant(r) => {
            return Err(EvalError::TypeMismatch {
                operator: operator.clone(),
                left: left.clone(),
                right: right.clone(),
            })
        }
        _ => {
            return Err(EvalError::UnsupportedOperands {
                operator: operator.clone(),
                left: left.clone(),
                right: right.clone(),
            })
        }
    };

    Ok(result)
}

fn is_infix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::And
            | TokenKind::Or
    ) || is_comparison(kind)
}

fn is_comparison(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
    )
}

/// Total order over numbers in which every NaN is equal to every other and greater than any
/// other value, and `-0` sorts below `0`.
fn number_order(l: f64, r: f64) -> Ordering {
    let canonical = |n: f64| if n.is_nan() { f64::NAN } else { n };
    canonical(l).total_cmp(&canonical(r))
}

fn values_equal(l: &Object, r: &Object) -> bool {
    match (l, r) {
        (Object::Number(l), Object::Number(r)) => number_order(*l, *r) == Ordering::Equal,
        (l, r) => l == r,
    }
}

fn compare(kind: TokenKind, ordering: Ordering) -> bool {
    match kind {
        TokenKind::Lt => ordering == Ordering::Less,
        TokenKind::LtEq => ordering != Ordering::Greater,
        TokenKind::Gt => ordering == Ordering::Greater,
        TokenKind::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}
