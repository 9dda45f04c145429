use std::rc::Rc;

use crate::{
    environment::scope::{Function, Variable},
    Span,
};

use super::{expressions::Expr, statements::Stmt};

/// Program root: every global, then every function, in source order.
#[derive(Debug, Clone)]
pub struct Source {
    pub globals: Vec<GlobalDecl>,
    pub functions: Vec<FunctionDecl>,
    pub span: Span,
}

/// Global Declaration
///
/// Covers `LIST`, `VAR` and `VAL`. A `LIST` global always carries a list
/// literal as its value.
#[derive(Debug, Clone)]
pub struct GlobalDecl {
    pub name: String,
    pub mutable: bool,
    /// Declared with `LIST`; only such globals may be indexed.
    pub list: bool,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
    pub span: Span,
    /// Set by the analyzer.
    pub variable: Option<Rc<Variable>>,
}

/// Function Declaration
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub parameter_type_names: Vec<String>,
    pub return_type_name: Option<String>,
    pub statements: Vec<Stmt>,
    pub span: Span,
    /// Set by the analyzer.
    pub function: Option<Rc<Function>>,
}

impl FunctionDecl {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}
