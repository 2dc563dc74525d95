use crate::token::TokenKind;
use std::fmt;

/// The result of evaluating an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Nil,
    Number(f64),
    String(String),
    Boolean(bool),
}

/// Printing form: nil and booleans as their keywords, strings unquoted and numbers in the
/// narrowest exact representation.
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Nil => write!(f, "{}", TokenKind::Nil.symbol()),
            Object::Number(n) => write_number(f, *n),
            Object::String(s) => write!(f, "{}", s),
            Object::Boolean(true) => write!(f, "{}", TokenKind::True.symbol()),
            Object::Boolean(false) => write!(f, "{}", TokenKind::False.symbol()),
        }
    }
}

fn write_number(f: &mut fmt::Formatter, n: f64) -> fmt::Result {
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        return write!(f, "{}Infinity", sign);
    }

    let integral = n as i64;
    if integral as f64 == n {
        return write!(f, "{}", integral);
    }

    let single = n as f32;
    if f64::from(single) == n {
        write!(f, "{}", single)
    } else {
        write!(f, "{}", n)
    }
}

impl Object {
    /// Like `Display`, but with strings wrapped in single quotes the way they are written in
    /// source.
    pub fn inspect(&self) -> String {
        match self {
            Object::String(s) => format!("'{}'", s),
            obj => obj.to_string(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Object::Nil)
    }

    pub fn type_name(&self) -> &str {
        match self {
            Object::Nil => TokenKind::Nil.symbol(),
            Object::Number(_) => TokenKind::Num.symbol(),
            Object::String(_) => TokenKind::Str.symbol(),
            Object::Boolean(_) => TokenKind::Bool.symbol(),
        }
    }

    /// Whether the value may be stored in a variable declared with `declared`. Nil fits every
    /// type.
    pub fn fits(&self, declared: TokenKind) -> bool {
        matches!(
            (self, declared),
            (Object::Nil, _)
                | (Object::Number(_), TokenKind::Num)
                | (Object::String(_), TokenKind::Str)
                | (Object::Boolean(_), TokenKind::Bool)
        )
    }
}
