//! Static analysis.
//!
//! Walks the parsed tree once, resolving every name against its own scope
//! chain and checking every expression and statement against the
//! assignability rules. Resolved types and bindings are written back onto
//! the tree for the interpreter.

pub mod analyzer;

#[cfg(test)]
mod tests;
