//! Built-in functions.
//!
//! The analyzer and the interpreter both start from `native_scope`, so the
//! checked signatures and the running bodies are the same definitions.

use std::{io::Write, str::FromStr};

use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};

use crate::{
    environment::{
        scope::{Callable, Function, NativeFn, Scope},
        types::Type,
        value::Value,
    },
    errors::errors::ErrorImpl,
};

fn invalid_argument(function: &str, message: &str) -> ErrorImpl {
    ErrorImpl::InvalidArgument {
        function: function.to_string(),
        message: message.to_string(),
    }
}

/// Writes the display form of its argument followed by a newline.
pub fn print(output: &mut dyn Write, arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let [value] = arguments else {
        return Err(invalid_argument("print", "expected one argument"));
    };

    writeln!(output, "{}", value).map_err(|error| ErrorImpl::OutputError {
        message: error.to_string(),
    })?;

    Ok(Value::Nil)
}

/// Natural logarithm of a positive decimal.
pub fn logarithm(_output: &mut dyn Write, arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let [Value::Decimal(value)] = arguments else {
        return Err(invalid_argument("logarithm", "expected one Decimal"));
    };

    if *value <= BigDecimal::zero() {
        return Err(invalid_argument("logarithm", "argument must be positive"));
    }

    let result = value
        .to_f64()
        .map(f64::ln)
        .filter(|result| result.is_finite())
        .ok_or_else(|| invalid_argument("logarithm", "argument is out of range"))?;

    // Shortest text that round-trips the f64
    BigDecimal::from_str(&format!("{}", result))
        .map(Value::Decimal)
        .map_err(|_| invalid_argument("logarithm", "result is not representable"))
}

/// Renders an integer in the given radix (2 to 36, lowercase digits).
pub fn converter(_output: &mut dyn Write, arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let [Value::Integer(value), Value::Integer(radix)] = arguments else {
        return Err(invalid_argument("converter", "expected two Integers"));
    };

    match radix.to_u32() {
        Some(radix @ 2..=36) => Ok(Value::String(value.to_str_radix(radix))),
        _ => Err(invalid_argument("converter", &format!("radix {} is not between 2 and 36", radix))),
    }
}

/// A root scope holding every built-in, under `builtin::<name>`.
pub fn native_scope() -> Scope {
    let natives: [(&str, Vec<Type>, Type, NativeFn); 3] = [
        ("print", vec![Type::Any], Type::Nil, print),
        ("logarithm", vec![Type::Decimal], Type::Decimal, logarithm),
        ("converter", vec![Type::Integer, Type::Integer], Type::String, converter),
    ];

    Scope::with_functions(natives.into_iter().map(|(name, parameter_types, return_type, body)| {
        Function::new(name, parameter_types, return_type, Callable::Native(body))
            .with_qualified_name(&format!("builtin::{}", name))
    }))
}
