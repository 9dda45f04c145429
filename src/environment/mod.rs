//! Support shared by the analyzer and the interpreter.
//!
//! - `types`: static types, the type registry and assignability
//! - `value`: runtime values
//! - `scope`: variable/function bindings and parent-linked scopes

pub mod scope;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;
