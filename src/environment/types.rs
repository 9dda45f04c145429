//! Static types and the assignability relation.
//!
//! The language has a closed set of primitive types plus `Any` (accepts
//! everything) and `Comparable` (accepts everything except `Boolean`).
//! Type identity is by name.

use std::{collections::HashMap, fmt::Display};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Nil,
    Comparable,
    Boolean,
    Integer,
    Decimal,
    Character,
    String,
}

impl Type {
    pub fn get_name(&self) -> &str {
        match self {
            Type::Any => "Any",
            Type::Nil => "Nil",
            Type::Comparable => "Comparable",
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Character => "Character",
            Type::String => "String",
        }
    }

    /// Integer or Decimal.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

/// Whether a value of type `source` may be stored where `target` is expected.
pub fn is_assignable(target: &Type, source: &Type) -> bool {
    if target.get_name() == source.get_name() {
        return true;
    }

    match target {
        Type::Any => true,
        Type::Comparable => *source != Type::Boolean,
        _ => false,
    }
}

pub fn require_assignable(target: &Type, source: &Type, position: &Position) -> Result<(), Error> {
    if is_assignable(target, source) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: target.to_string(),
                received: source.to_string(),
            },
            position.clone(),
        ))
    }
}

/// Global name -> type table used to resolve type annotations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    type_lookup: HashMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut type_lookup = HashMap::new();

        for ty in [
            Type::Any,
            Type::Nil,
            Type::Comparable,
            Type::Boolean,
            Type::Integer,
            Type::Decimal,
            Type::Character,
            Type::String,
        ] {
            type_lookup.insert(ty.get_name().to_string(), ty);
        }

        TypeRegistry { type_lookup }
    }

    pub fn get_type(&self, name: &str, position: &Position) -> Result<Type, Error> {
        self.type_lookup.get(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownType {
                    type_: name.to_string(),
                },
                position.clone(),
            )
        })
    }
}
