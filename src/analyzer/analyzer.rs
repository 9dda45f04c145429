use std::rc::Rc;

use num_traits::ToPrimitive;
use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{FunctionDecl, GlobalDecl, Source},
        expressions::{AccessExpr, BinaryExpr, BinaryOperator, CallExpr, Expr, ListExpr, Literal, LiteralExpr},
        statements::{AssignmentStmt, DeclarationStmt, IfStmt, Stmt, SwitchStmt},
    },
    environment::{
        scope::{Callable, Function, Scope, Variable},
        types::{is_assignable, require_assignable, Type, TypeRegistry},
        value::Value,
    },
    errors::errors::{Error, ErrorImpl},
    interpreter::stdlib::native_scope,
    Position,
};

/// Largest magnitude, in bits, an integer literal may have.
const INTEGER_LITERAL_BITS: u64 = 32;

/// Static checker. Resolves every name and type in a `Source`, decorating the
/// tree as it goes, and stops at the first violation.
#[derive(Debug)]
pub struct Analyzer {
    pub types: TypeRegistry,
    pub globals: Scope,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        let globals = native_scope();

        Analyzer {
            types: TypeRegistry::new(),
            globals,
        }
    }

    /// Checks the whole program: globals, then every function signature,
    /// then every function body, then the `main` entry point.
    pub fn analyze(&mut self, source: &mut Source) -> Result<(), Error> {
        let scope = self.globals.clone();

        for global in source.globals.iter_mut() {
            analyze_global(self, global, &scope)?;
        }

        for function in source.functions.iter_mut() {
            declare_function(self, function, &scope)?;
        }

        for function in source.functions.iter_mut() {
            analyze_function(self, function, &scope)?;
        }

        let main_position = source.span.end.clone();
        let main = scope
            .lookup_function("main", 0, &main_position)
            .map_err(|_| Error::new(ErrorImpl::MissingMain, main_position.clone()))?;

        if main.return_type != Type::Integer {
            return Err(Error::new(ErrorImpl::MissingMain, main_position));
        }

        debug!(globals = source.globals.len(), functions = source.functions.len(), "analysis complete");
        Ok(())
    }
}

fn resolve_type(analyzer: &Analyzer, type_name: &str, position: &Position) -> Result<Type, Error> {
    analyzer.types.get_type(type_name, position)
}

/// Shared by globals and `LET`: the declared type wins, otherwise the
/// initializer's type is used.
fn analyze_binding(
    analyzer: &mut Analyzer,
    type_name: Option<&str>,
    value: Option<&mut Expr>,
    scope: &Scope,
    position: &Position,
) -> Result<Type, Error> {
    let declared = match type_name {
        Some(type_name) => Some(resolve_type(analyzer, type_name, position)?),
        None => None,
    };

    match (declared, value) {
        (Some(declared), Some(value)) => {
            let value_type = analyze_expr_in_context(analyzer, value, scope, Some(&declared))?;
            require_assignable(&declared, &value_type, &value.get_span().start)?;
            Ok(declared)
        }
        (Some(declared), None) => Ok(declared),
        (None, Some(value)) => analyze_expr(analyzer, value, scope),
        (None, None) => Err(Error::new(ErrorImpl::ExpectedExplicitValue, position.clone())),
    }
}

pub fn analyze_global(analyzer: &mut Analyzer, global: &mut GlobalDecl, scope: &Scope) -> Result<(), Error> {
    let position = global.span.start.clone();
    let ty = analyze_binding(analyzer, global.type_name.as_deref(), global.value.as_mut(), scope, &position)?;

    let variable = if global.list {
        Variable::new_list(&global.name, ty, global.mutable, Value::Nil)
    } else {
        Variable::new(&global.name, ty, global.mutable, Value::Nil)
    };

    let variable = scope.define_variable(variable, &position)?;
    trace!(name = %global.name, ty = %variable.ty, list = global.list, mutable = global.mutable, "declared global");

    global.variable = Some(variable);
    Ok(())
}

/// Registers the signature of `function` so any body may call it.
pub fn declare_function(analyzer: &mut Analyzer, function: &mut FunctionDecl, scope: &Scope) -> Result<(), Error> {
    let position = function.span.start.clone();

    let parameter_types = function
        .parameter_type_names
        .iter()
        .map(|type_name| resolve_type(analyzer, type_name, &position))
        .collect::<Result<Vec<_>, _>>()?;

    let return_type = match &function.return_type_name {
        Some(type_name) => resolve_type(analyzer, type_name, &position)?,
        None => Type::Nil,
    };

    let declared = scope.define_function(
        Function::new(&function.name, parameter_types, return_type, Callable::Signature),
        &position,
    )?;
    trace!(name = %declared.name, arity = declared.arity(), "declared function");

    function.function = Some(declared);
    Ok(())
}

pub fn analyze_function(analyzer: &mut Analyzer, function: &mut FunctionDecl, scope: &Scope) -> Result<(), Error> {
    let position = function.span.start.clone();
    let signature = match &function.function {
        Some(signature) => Rc::clone(signature),
        None => scope.lookup_function(&function.name, function.arity(), &position)?,
    };

    let body_scope = scope.function_body(signature.return_type.clone());

    for (name, ty) in function.parameters.iter().zip(&signature.parameter_types) {
        body_scope.define_variable(Variable::new(name, ty.clone(), true, Value::Nil), &position)?;
    }

    analyze_block(analyzer, &mut function.statements, &body_scope)
}

fn analyze_block(analyzer: &mut Analyzer, statements: &mut [Stmt], scope: &Scope) -> Result<(), Error> {
    for statement in statements.iter_mut() {
        analyze_stmt(analyzer, statement, scope)?;
    }

    Ok(())
}

pub fn analyze_stmt(analyzer: &mut Analyzer, statement: &mut Stmt, scope: &Scope) -> Result<(), Error> {
    match statement {
        Stmt::Expression(stmt) => {
            if !matches!(stmt.expression, Expr::Call(_)) {
                return Err(Error::new(ErrorImpl::InvalidExpressionStatement, stmt.span.start.clone()));
            }
            analyze_expr(analyzer, &mut stmt.expression, scope)?;
            Ok(())
        }
        Stmt::Declaration(stmt) => analyze_declaration(analyzer, stmt, scope),
        Stmt::Assignment(stmt) => analyze_assignment(analyzer, stmt, scope),
        Stmt::If(stmt) => analyze_if(analyzer, stmt, scope),
        Stmt::Switch(stmt) => analyze_switch(analyzer, stmt, scope),
        Stmt::While(stmt) => {
            let condition = analyze_expr(analyzer, &mut stmt.condition, scope)?;
            require_assignable(&Type::Boolean, &condition, &stmt.condition.get_span().start)?;

            analyze_block(analyzer, &mut stmt.statements, &scope.child())
        }
        Stmt::Return(stmt) => {
            let Some(return_type) = scope.enclosing_return_type() else {
                return Err(Error::new(ErrorImpl::ReturnOutsideFunction, stmt.span.start.clone()));
            };

            let value = analyze_expr_in_context(analyzer, &mut stmt.value, scope, Some(&return_type))?;
            require_assignable(&return_type, &value, &stmt.value.get_span().start)
        }
    }
}

fn analyze_declaration(analyzer: &mut Analyzer, stmt: &mut DeclarationStmt, scope: &Scope) -> Result<(), Error> {
    let position = stmt.span.start.clone();
    let ty = analyze_binding(analyzer, stmt.type_name.as_deref(), stmt.value.as_mut(), scope, &position)?;

    stmt.variable = Some(scope.define_variable(Variable::new(&stmt.name, ty, true, Value::Nil), &position)?);
    Ok(())
}

fn analyze_assignment(analyzer: &mut Analyzer, stmt: &mut AssignmentStmt, scope: &Scope) -> Result<(), Error> {
    let Expr::Access(receiver) = &mut stmt.receiver else {
        return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, stmt.span.start.clone()));
    };

    let target = analyze_access(analyzer, receiver, scope, None)?;

    if let Some(variable) = &receiver.variable {
        if !variable.mutable {
            return Err(Error::new(
                ErrorImpl::ImmutableAssignment {
                    variable: variable.name.clone(),
                },
                stmt.span.start.clone(),
            ));
        }
    }

    let value = analyze_expr_in_context(analyzer, &mut stmt.value, scope, Some(&target))?;
    require_assignable(&target, &value, &stmt.value.get_span().start)
}

fn analyze_if(analyzer: &mut Analyzer, stmt: &mut IfStmt, scope: &Scope) -> Result<(), Error> {
    if stmt.then_statements.is_empty() {
        return Err(Error::new(ErrorImpl::EmptyThenBlock, stmt.span.start.clone()));
    }

    let condition = analyze_expr(analyzer, &mut stmt.condition, scope)?;
    require_assignable(&Type::Boolean, &condition, &stmt.condition.get_span().start)?;

    analyze_block(analyzer, &mut stmt.then_statements, &scope.child())?;
    analyze_block(analyzer, &mut stmt.else_statements, &scope.child())
}

fn analyze_switch(analyzer: &mut Analyzer, stmt: &mut SwitchStmt, scope: &Scope) -> Result<(), Error> {
    let condition = analyze_expr(analyzer, &mut stmt.condition, scope)?;

    match stmt.cases.last() {
        Some(last) if last.value.is_none() => {}
        Some(last) => return Err(Error::new(ErrorImpl::MissingDefaultCase, last.span.start.clone())),
        None => return Err(Error::new(ErrorImpl::MissingDefaultCase, stmt.span.start.clone())),
    }

    for case in stmt.cases.iter_mut() {
        if let Some(value) = &mut case.value {
            let case_type = analyze_expr(analyzer, value, scope)?;
            require_assignable(&condition, &case_type, &value.get_span().start)?;
        }

        analyze_block(analyzer, &mut case.statements, &scope.child())?;
    }

    Ok(())
}

pub fn analyze_expr(analyzer: &mut Analyzer, expr: &mut Expr, scope: &Scope) -> Result<Type, Error> {
    analyze_expr_in_context(analyzer, expr, scope, None)
}

/// `context` is the type the surrounding construct expects. List literals
/// take their element type from it, and a whole list may only be passed
/// where `Any` is expected.
fn analyze_expr_in_context(
    analyzer: &mut Analyzer,
    expr: &mut Expr,
    scope: &Scope,
    context: Option<&Type>,
) -> Result<Type, Error> {
    let ty = match expr {
        Expr::Literal(literal) => analyze_literal(literal)?,
        Expr::Group(group) => analyze_expr_in_context(analyzer, &mut group.expression, scope, context)?,
        Expr::Binary(binary) => analyze_binary(analyzer, binary, scope)?,
        Expr::Access(access) => analyze_access(analyzer, access, scope, context)?,
        Expr::Call(call) => analyze_call(analyzer, call, scope)?,
        Expr::List(list) => analyze_list(analyzer, list, scope, context)?,
    };

    expr.set_type(ty.clone());
    Ok(ty)
}

fn analyze_literal(literal: &LiteralExpr) -> Result<Type, Error> {
    let ty = match &literal.value {
        Literal::Nil => Type::Nil,
        Literal::Boolean(_) => Type::Boolean,
        Literal::Character(_) => Type::Character,
        Literal::String(_) => Type::String,
        Literal::Integer(value) => {
            if value.bits() > INTEGER_LITERAL_BITS {
                return Err(Error::new(
                    ErrorImpl::IntegerOutOfRange {
                        literal: value.to_string(),
                    },
                    literal.span.start.clone(),
                ));
            }
            Type::Integer
        }
        Literal::Decimal(value) => {
            if !value.to_f64().is_some_and(f64::is_finite) {
                return Err(Error::new(
                    ErrorImpl::DecimalOutOfRange {
                        literal: value.to_string(),
                    },
                    literal.span.start.clone(),
                ));
            }
            Type::Decimal
        }
    };

    Ok(ty)
}

fn require_same(left: &Type, right: &Type, position: &Position) -> Result<(), Error> {
    if left == right {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: left.to_string(),
                received: right.to_string(),
            },
            position.clone(),
        ))
    }
}

fn require_numeric(ty: &Type, position: &Position) -> Result<(), Error> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: String::from("Integer or Decimal"),
                received: ty.to_string(),
            },
            position.clone(),
        ))
    }
}

fn analyze_binary(analyzer: &mut Analyzer, binary: &mut BinaryExpr, scope: &Scope) -> Result<Type, Error> {
    let left = analyze_expr(analyzer, &mut binary.left, scope)?;
    let right = analyze_expr(analyzer, &mut binary.right, scope)?;

    let left_position = binary.left.get_span().start.clone();
    let right_position = binary.right.get_span().start.clone();

    let ty = match binary.operator {
        BinaryOperator::And | BinaryOperator::Or => {
            require_assignable(&Type::Boolean, &left, &left_position)?;
            require_assignable(&Type::Boolean, &right, &right_position)?;
            Type::Boolean
        }
        BinaryOperator::Less | BinaryOperator::Greater | BinaryOperator::Equals | BinaryOperator::NotEquals => {
            require_assignable(&Type::Comparable, &left, &left_position)?;
            require_assignable(&Type::Comparable, &right, &right_position)?;
            require_same(&left, &right, &right_position)?;
            Type::Boolean
        }
        BinaryOperator::Add if left == Type::String || right == Type::String => Type::String,
        BinaryOperator::Add => {
            require_numeric(&left, &left_position)?;
            require_same(&left, &right, &right_position)?;
            left
        }
        BinaryOperator::Power => {
            require_assignable(&Type::Integer, &left, &left_position)?;
            require_assignable(&Type::Integer, &right, &right_position)?;
            Type::Integer
        }
        BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide => {
            require_numeric(&left, &left_position)?;
            require_same(&left, &right, &right_position)?;
            left
        }
    };

    Ok(ty)
}

fn analyze_access(
    analyzer: &mut Analyzer,
    access: &mut AccessExpr,
    scope: &Scope,
    context: Option<&Type>,
) -> Result<Type, Error> {
    if let Some(offset) = &mut access.offset {
        let offset_type = analyze_expr(analyzer, offset, scope)?;
        require_assignable(&Type::Integer, &offset_type, &offset.get_span().start)?;
    }

    let variable = scope.lookup_variable(&access.name, &access.span.start)?;

    let ty = match (variable.is_list, &access.offset) {
        (true, Some(_)) | (false, None) => variable.ty.clone(),
        (true, None) if context == Some(&Type::Any) => Type::Any,
        (true, None) => {
            return Err(Error::new(
                ErrorImpl::ListNotIndexed {
                    variable: variable.name.clone(),
                },
                access.span.start.clone(),
            ))
        }
        (false, Some(_)) => {
            return Err(Error::new(
                ErrorImpl::NotAList {
                    variable: variable.name.clone(),
                },
                access.span.start.clone(),
            ))
        }
    };

    access.variable = Some(variable);
    access.ty = Some(ty.clone());
    Ok(ty)
}

fn analyze_call(analyzer: &mut Analyzer, call: &mut CallExpr, scope: &Scope) -> Result<Type, Error> {
    let function = scope.lookup_function(&call.name, call.arguments.len(), &call.span.start)?;

    for (argument, parameter_type) in call.arguments.iter_mut().zip(&function.parameter_types) {
        let argument_type = analyze_expr_in_context(analyzer, argument, scope, Some(parameter_type))?;

        if !is_assignable(parameter_type, &argument_type) {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: parameter_type.to_string(),
                    received: argument_type.to_string(),
                },
                argument.get_span().start.clone(),
            ));
        }
    }

    let ty = function.return_type.clone();
    call.function = Some(function);
    Ok(ty)
}

fn analyze_list(
    analyzer: &mut Analyzer,
    list: &mut ListExpr,
    scope: &Scope,
    context: Option<&Type>,
) -> Result<Type, Error> {
    let element_type = context.cloned().unwrap_or(Type::Any);

    for value in list.values.iter_mut() {
        let ty = analyze_expr_in_context(analyzer, value, scope, Some(&element_type))?;
        require_assignable(&element_type, &ty, &value.get_span().start)?;
    }

    Ok(element_type)
}
