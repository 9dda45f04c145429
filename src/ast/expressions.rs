use std::{fmt::Display, rc::Rc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    environment::{
        scope::{Function, Variable},
        types::Type,
    },
    lexer::tokens::TokenKind,
    Span,
};

// LITERALS

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Boolean(bool),
    Character(char),
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
}

/// Literal Expression
/// Represents a constant written directly in the source.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
    pub ty: Option<Type>,
}

/// Group Expression
/// A parenthesised expression.
#[derive(Debug, Clone)]
pub struct GroupExpr {
    pub expression: Box<Expr>,
    pub span: Span,
    pub ty: Option<Type>,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Less,
    Greater,
    Equals,
    NotEquals,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let operator = match kind {
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::Equals => BinaryOperator::Equals,
            TokenKind::NotEquals => BinaryOperator::NotEquals,
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Dash => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Caret => BinaryOperator::Power,
            _ => return None,
        };

        Some(operator)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Less | BinaryOperator::Greater | BinaryOperator::Equals | BinaryOperator::NotEquals
        )
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
        };

        write!(f, "{}", symbol)
    }
}

/// Binary Expression
/// Represents a binary operation (e.g., a + b, x == y) in the AST.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
    pub ty: Option<Type>,
}

// SYMBOLS

/// Access Expression
/// A variable read, optionally indexed: `name` or `name[offset]`.
#[derive(Debug, Clone)]
pub struct AccessExpr {
    pub name: String,
    pub offset: Option<Box<Expr>>,
    pub span: Span,
    pub ty: Option<Type>,
    pub variable: Option<Rc<Variable>>,
}

/// Call Expression
/// Functions are resolved by name and argument count.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
    pub ty: Option<Type>,
    pub function: Option<Rc<Function>>,
}

/// List Expression
/// `[a, b, c]`. The decorated type is the element type.
#[derive(Debug, Clone)]
pub struct ListExpr {
    pub values: Vec<Expr>,
    pub span: Span,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Group(GroupExpr),
    Binary(BinaryExpr),
    Access(AccessExpr),
    Call(CallExpr),
    List(ListExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Group(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Access(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::List(expr) => &expr.span,
        }
    }

    /// The type resolved by the analyzer, if it has run.
    pub fn get_type(&self) -> Option<&Type> {
        match self {
            Expr::Literal(expr) => expr.ty.as_ref(),
            Expr::Group(expr) => expr.ty.as_ref(),
            Expr::Binary(expr) => expr.ty.as_ref(),
            Expr::Access(expr) => expr.ty.as_ref(),
            Expr::Call(expr) => expr.ty.as_ref(),
            Expr::List(expr) => expr.ty.as_ref(),
        }
    }

    pub fn set_type(&mut self, ty: Type) {
        let slot = match self {
            Expr::Literal(expr) => &mut expr.ty,
            Expr::Group(expr) => &mut expr.ty,
            Expr::Binary(expr) => &mut expr.ty,
            Expr::Access(expr) => &mut expr.ty,
            Expr::Call(expr) => &mut expr.ty,
            Expr::List(expr) => &mut expr.ty,
        };

        *slot = Some(ty);
    }
}
