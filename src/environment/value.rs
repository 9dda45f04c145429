//! Runtime values.
//!
//! Operator behaviour is chosen by the value's class, so every operator is an
//! exhaustive match over `Value`.

use std::{cmp::Ordering, fmt::Display, rc::Rc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::scope::Function;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Character(char),
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
    List(Vec<Value>),
    Function(Rc<Function>),
}

impl Value {
    pub fn get_class_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Character(_) => "Character",
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::List(_) => "List",
            Value::Function(_) => "Function",
        }
    }

    /// Natural ordering between two values of the same comparable class.
    ///
    /// Booleans, lists and functions have no ordering; neither do values of
    /// different classes.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Nil, Value::Nil) => Some(Ordering::Equal),
            (Value::Character(left), Value::Character(right)) => Some(left.cmp(right)),
            (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
            (Value::Integer(left), Value::Integer(right)) => Some(left.cmp(right)),
            (Value::Decimal(left), Value::Decimal(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }

    /// Value equality, used when matching switch cases.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::List(left), Value::List(right)) => {
                left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.equals(r))
            }
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "NIL"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Character(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Decimal(value) => write!(f, "{}", value.to_plain_string()),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Function(function) => write!(f, "<fun {}/{}>", function.name, function.arity()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
