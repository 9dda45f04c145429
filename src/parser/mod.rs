//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Globals (`LIST`, `VAR`, `VAL`) and function declarations
//! - Statements (`LET`, `IF`, `SWITCH`, `WHILE`, `RETURN`, assignments)
//! - Expressions (binary operators, calls, indexing); list literals only
//!   initialize `LIST` globals
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
