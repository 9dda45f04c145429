use std::rc::Rc;

use crate::{environment::scope::Variable, Span};

use super::expressions::Expr;

/// A bare expression followed by `;`. Only calls are accepted by the analyzer.
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// `LET name (: Type)? (= value)?;`
#[derive(Debug, Clone)]
pub struct DeclarationStmt {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
    pub span: Span,
    pub variable: Option<Rc<Variable>>,
}

#[derive(Debug, Clone)]
pub struct AssignmentStmt {
    pub receiver: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_statements: Vec<Stmt>,
    pub else_statements: Vec<Stmt>,
    pub span: Span,
}

/// One arm of a switch. `value` is `None` for `DEFAULT`.
#[derive(Debug, Clone)]
pub struct CaseStmt {
    pub value: Option<Expr>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub condition: Expr,
    pub cases: Vec<CaseStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Declaration(DeclarationStmt),
    Assignment(AssignmentStmt),
    If(IfStmt),
    Switch(SwitchStmt),
    While(WhileStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Declaration(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::Switch(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
        }
    }
}
