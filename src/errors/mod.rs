//! Error types and error handling.
//!
//! This module defines the single error type shared by every phase:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing, analysis and evaluation
//! - Error names and helpful suggestions for display

pub mod errors;
