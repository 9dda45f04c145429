//! Tree-walking evaluation of an analyzed program.

pub mod interpreter;
pub mod stdlib;
