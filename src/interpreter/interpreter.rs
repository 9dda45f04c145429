use std::{cmp::Ordering, io::Write, rc::Rc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{FunctionDecl, GlobalDecl, Source},
        expressions::{AccessExpr, BinaryExpr, BinaryOperator, CallExpr, Expr, Literal},
        statements::{AssignmentStmt, Stmt, SwitchStmt},
    },
    environment::{
        scope::{Callable, Function, Scope, Variable},
        types::Type,
        value::Value,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::stdlib::native_scope;

/// How a statement finished.
#[derive(Debug)]
pub enum Flow {
    Normal,
    /// A `RETURN` is unwinding towards the enclosing call.
    Return(Value),
}

/// Evaluates an analyzed program. Output from `print` goes to `output`.
pub struct Interpreter<W: Write> {
    output: W,
    globals: Scope,
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        let globals = native_scope();

        Interpreter { output, globals }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Defines every global and function, then returns `main` without
    /// calling it.
    pub fn visit_source(&mut self, source: &Source) -> Result<Value, Error> {
        let scope = self.globals.clone();

        for global in &source.globals {
            self.visit_global(global, &scope)?;
        }

        for function in &source.functions {
            self.visit_function(function, &scope)?;
        }

        let main_position = source.span.end.clone();
        let main = scope
            .lookup_function("main", 0, &main_position)
            .map_err(|_| Error::new(ErrorImpl::MissingMain, main_position))?;

        Ok(Value::Function(main))
    }

    /// Defines `source` and runs its `main`.
    pub fn run(&mut self, source: &Source) -> Result<Value, Error> {
        let position = source.span.start.clone();

        match self.visit_source(source)? {
            Value::Function(main) => {
                debug!("running main");
                self.invoke(&main, vec![], &position)
            }
            _ => Err(Error::new(ErrorImpl::MissingMain, position)),
        }
    }

    fn visit_global(&mut self, global: &GlobalDecl, scope: &Scope) -> Result<(), Error> {
        let value = match &global.value {
            Some(value) => self.visit_expr(value, scope)?,
            None => Value::Nil,
        };

        let ty = declared_type(global.variable.as_ref());
        let variable = if global.list {
            Variable::new_list(&global.name, ty, global.mutable, value)
        } else {
            Variable::new(&global.name, ty, global.mutable, value)
        };

        scope.define_variable(variable, &global.span.start)?;
        Ok(())
    }

    fn visit_function(&mut self, declaration: &FunctionDecl, scope: &Scope) -> Result<(), Error> {
        let (parameter_types, return_type) = match &declaration.function {
            Some(signature) => (signature.parameter_types.clone(), signature.return_type.clone()),
            None => (vec![Type::Any; declaration.arity()], Type::Any),
        };

        let function = Function::new(
            &declaration.name,
            parameter_types,
            return_type,
            Callable::User {
                declaration: Rc::new(declaration.clone()),
                closure: scope.downgrade(),
            },
        );

        scope.define_function(function, &declaration.span.start)?;
        Ok(())
    }

    /// Calls `function` with already evaluated arguments.
    pub fn invoke(&mut self, function: &Function, arguments: Vec<Value>, position: &Position) -> Result<Value, Error> {
        trace!(name = %function.qualified_name, arity = arguments.len(), "invoke");

        match &function.body {
            Callable::Native(native) => {
                native(&mut self.output, &arguments).map_err(|error| Error::new(error, position.clone()))
            }
            Callable::User { declaration, closure } => {
                let Some(closure) = closure.upgrade() else {
                    return Err(Error::new(
                        ErrorImpl::NotInvocable {
                            function: function.name.clone(),
                        },
                        position.clone(),
                    ));
                };

                let scope = closure.function_body(function.return_type.clone());

                for ((name, value), ty) in declaration.parameters.iter().zip(arguments).zip(&function.parameter_types) {
                    scope.define_variable(Variable::new(name, ty.clone(), true, value), &declaration.span.start)?;
                }

                match self.execute_block(&declaration.statements, &scope)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Ok(Value::Nil),
                }
            }
            Callable::Signature => Err(Error::new(
                ErrorImpl::NotInvocable {
                    function: function.name.clone(),
                },
                position.clone(),
            )),
        }
    }

    fn execute_block(&mut self, statements: &[Stmt], scope: &Scope) -> Result<Flow, Error> {
        for statement in statements {
            if let Flow::Return(value) = self.visit_stmt(statement, scope)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    pub fn visit_stmt(&mut self, statement: &Stmt, scope: &Scope) -> Result<Flow, Error> {
        match statement {
            Stmt::Expression(stmt) => {
                self.visit_expr(&stmt.expression, scope)?;
                Ok(Flow::Normal)
            }
            Stmt::Declaration(stmt) => {
                let value = match &stmt.value {
                    Some(value) => self.visit_expr(value, scope)?,
                    None => Value::Nil,
                };

                let ty = declared_type(stmt.variable.as_ref());
                scope.define_variable(Variable::new(&stmt.name, ty, true, value), &stmt.span.start)?;
                Ok(Flow::Normal)
            }
            Stmt::Assignment(stmt) => {
                self.visit_assignment(stmt, scope)?;
                Ok(Flow::Normal)
            }
            Stmt::If(stmt) => {
                let statements = if self.visit_condition(&stmt.condition, scope)? {
                    &stmt.then_statements
                } else {
                    &stmt.else_statements
                };

                self.execute_block(statements, &scope.child())
            }
            Stmt::Switch(stmt) => self.visit_switch(stmt, scope),
            Stmt::While(stmt) => {
                while self.visit_condition(&stmt.condition, scope)? {
                    // Fresh scope per iteration
                    if let Flow::Return(value) = self.execute_block(&stmt.statements, &scope.child())? {
                        return Ok(Flow::Return(value));
                    }
                }

                Ok(Flow::Normal)
            }
            Stmt::Return(stmt) => Ok(Flow::Return(self.visit_expr(&stmt.value, scope)?)),
        }
    }

    fn visit_condition(&mut self, condition: &Expr, scope: &Scope) -> Result<bool, Error> {
        match self.visit_expr(condition, scope)? {
            Value::Boolean(value) => Ok(value),
            other => Err(Error::new(
                ErrorImpl::InvalidOperand {
                    operator: String::from("condition"),
                    received: other.get_class_name().to_string(),
                },
                condition.get_span().start.clone(),
            )),
        }
    }

    fn visit_assignment(&mut self, stmt: &AssignmentStmt, scope: &Scope) -> Result<(), Error> {
        let Expr::Access(receiver) = &stmt.receiver else {
            return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, stmt.span.start.clone()));
        };

        let variable = scope.lookup_variable(&receiver.name, &receiver.span.start)?;
        if !variable.mutable {
            return Err(Error::new(
                ErrorImpl::ImmutableAssignment {
                    variable: variable.name.clone(),
                },
                stmt.span.start.clone(),
            ));
        }

        let offset = match &receiver.offset {
            Some(offset) => Some(self.visit_index(offset, scope)?),
            None => None,
        };

        let value = self.visit_expr(&stmt.value, scope)?;

        match offset {
            None => {
                variable.set_value(value);
                Ok(())
            }
            Some(index) => variable.update_value(|current| {
                let (length, slot) = match current {
                    Value::List(values) => (values.len(), index_slot(values, &index)),
                    other => {
                        return Err(invalid_operand("[]", other.get_class_name(), &receiver.span.start));
                    }
                };

                match slot {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(index_out_of_range(&index, length, &receiver.span.start)),
                }
            }),
        }
    }

    fn visit_switch(&mut self, stmt: &SwitchStmt, scope: &Scope) -> Result<Flow, Error> {
        let condition = self.visit_expr(&stmt.condition, scope)?;

        for case in &stmt.cases {
            let matched = match &case.value {
                Some(value) => self.visit_expr(value, scope)?.equals(&condition),
                None => true,
            };

            if matched {
                return self.execute_block(&case.statements, &scope.child());
            }
        }

        Ok(Flow::Normal)
    }

    pub fn visit_expr(&mut self, expr: &Expr, scope: &Scope) -> Result<Value, Error> {
        match expr {
            Expr::Literal(literal) => Ok(match &literal.value {
                Literal::Nil => Value::Nil,
                Literal::Boolean(value) => Value::Boolean(*value),
                Literal::Character(value) => Value::Character(*value),
                Literal::String(value) => Value::String(value.clone()),
                Literal::Integer(value) => Value::Integer(value.clone()),
                Literal::Decimal(value) => Value::Decimal(value.clone()),
            }),
            Expr::Group(group) => self.visit_expr(&group.expression, scope),
            Expr::Binary(binary) => self.visit_binary(binary, scope),
            Expr::Access(access) => self.visit_access(access, scope),
            Expr::Call(call) => self.visit_call(call, scope),
            Expr::List(list) => {
                let values = list
                    .values
                    .iter()
                    .map(|value| self.visit_expr(value, scope))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Value::List(values))
            }
        }
    }

    fn visit_index(&mut self, offset: &Expr, scope: &Scope) -> Result<BigInt, Error> {
        match self.visit_expr(offset, scope)? {
            Value::Integer(index) => Ok(index),
            other => Err(invalid_operand("[]", other.get_class_name(), &offset.get_span().start)),
        }
    }

    fn visit_access(&mut self, access: &AccessExpr, scope: &Scope) -> Result<Value, Error> {
        let variable = scope.lookup_variable(&access.name, &access.span.start)?;

        let Some(offset) = &access.offset else {
            return Ok(variable.get_value());
        };

        let index = self.visit_index(offset, scope)?;
        let value = variable.borrow_value();

        let element = match &*value {
            Value::List(values) => index
                .to_usize()
                .and_then(|index| values.get(index))
                .cloned()
                .ok_or_else(|| index_out_of_range(&index, values.len(), &access.span.start)),
            other => Err(invalid_operand("[]", other.get_class_name(), &access.span.start)),
        };

        element
    }

    fn visit_call(&mut self, call: &CallExpr, scope: &Scope) -> Result<Value, Error> {
        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.visit_expr(argument, scope))
            .collect::<Result<Vec<_>, _>>()?;

        let function = scope.lookup_function(&call.name, arguments.len(), &call.span.start)?;
        self.invoke(&function, arguments, &call.span.start)
    }

    fn visit_binary(&mut self, binary: &BinaryExpr, scope: &Scope) -> Result<Value, Error> {
        let position = &binary.span.start;
        let left = self.visit_expr(&binary.left, scope)?;

        if binary.operator.is_logical() {
            let Value::Boolean(left) = left else {
                return Err(invalid_operand(&binary.operator.to_string(), left.get_class_name(), position));
            };

            // Short circuit
            if (binary.operator == BinaryOperator::And) != left {
                return Ok(Value::Boolean(left));
            }

            return match self.visit_expr(&binary.right, scope)? {
                Value::Boolean(right) => Ok(Value::Boolean(right)),
                right => Err(invalid_operand(&binary.operator.to_string(), right.get_class_name(), position)),
            };
        }

        let right = self.visit_expr(&binary.right, scope)?;
        evaluate_binary(binary.operator, left, right, position)
    }
}

fn declared_type(variable: Option<&Rc<Variable>>) -> Type {
    variable.map(|variable| variable.ty.clone()).unwrap_or(Type::Any)
}

fn invalid_operand(operator: &str, received: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::InvalidOperand {
            operator: operator.to_string(),
            received: received.to_string(),
        },
        position.clone(),
    )
}

fn index_out_of_range(index: &BigInt, length: usize, position: &Position) -> Error {
    Error::new(
        ErrorImpl::IndexOutOfRange {
            index: index.to_string(),
            length,
        },
        position.clone(),
    )
}

fn index_slot<'a>(values: &'a mut [Value], index: &BigInt) -> Option<&'a mut Value> {
    index.to_usize().and_then(move |index| values.get_mut(index))
}

/// Applies a non-logical operator to two evaluated operands.
pub fn evaluate_binary(operator: BinaryOperator, left: Value, right: Value, position: &Position) -> Result<Value, Error> {
    let mismatch = |left: &Value, right: &Value| {
        invalid_operand(
            &operator.to_string(),
            &format!("{} and {}", left.get_class_name(), right.get_class_name()),
            position,
        )
    };

    if operator.is_comparison() {
        let Some(ordering) = left.compare(&right) else {
            return Err(mismatch(&left, &right));
        };

        let result = match operator {
            BinaryOperator::Less => ordering == Ordering::Less,
            BinaryOperator::Greater => ordering == Ordering::Greater,
            BinaryOperator::Equals => ordering == Ordering::Equal,
            _ => ordering != Ordering::Equal,
        };

        return Ok(Value::Boolean(result));
    }

    match (operator, left, right) {
        (BinaryOperator::Add, left @ Value::String(_), right) | (BinaryOperator::Add, left, right @ Value::String(_)) => {
            Ok(Value::String(format!("{}{}", left, right)))
        }
        (BinaryOperator::Add, Value::Integer(left), Value::Integer(right)) => Ok(Value::Integer(left + right)),
        (BinaryOperator::Add, Value::Decimal(left), Value::Decimal(right)) => Ok(Value::Decimal(left + right)),
        (BinaryOperator::Subtract, Value::Integer(left), Value::Integer(right)) => Ok(Value::Integer(left - right)),
        (BinaryOperator::Subtract, Value::Decimal(left), Value::Decimal(right)) => Ok(Value::Decimal(left - right)),
        (BinaryOperator::Multiply, Value::Integer(left), Value::Integer(right)) => Ok(Value::Integer(left * right)),
        (BinaryOperator::Multiply, Value::Decimal(left), Value::Decimal(right)) => Ok(Value::Decimal(left * right)),
        (BinaryOperator::Divide, Value::Integer(left), Value::Integer(right)) => {
            if right.is_zero() {
                return Err(Error::new(ErrorImpl::DivisionByZero, position.clone()));
            }
            Ok(Value::Integer(left / right))
        }
        (BinaryOperator::Divide, Value::Decimal(left), Value::Decimal(right)) => {
            if right.is_zero() {
                return Err(Error::new(ErrorImpl::DivisionByZero, position.clone()));
            }
            Ok(Value::Decimal(divide_half_even(&left, &right)))
        }
        (BinaryOperator::Power, Value::Integer(base), Value::Integer(exponent)) => match exponent.to_u32() {
            Some(exponent) => Ok(Value::Integer(base.pow(exponent))),
            None => Err(invalid_operand("^", &format!("exponent {}", exponent), position)),
        },
        (_, left, right) => Err(mismatch(&left, &right)),
    }
}

/// `left / right` kept at the scale of `left`, rounding half to even.
pub fn divide_half_even(left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
    let (left_digits, left_scale) = left.as_bigint_and_exponent();
    let (right_digits, right_scale) = right.as_bigint_and_exponent();

    // left / right = (ld / 10^ls) / (rd / 10^rs); the quotient at scale ls is
    // ld * 10^rs / rd, so shift whichever side keeps the exponent non-negative.
    let ten = BigInt::from(10);
    let (numerator, denominator) = if right_scale >= 0 {
        (left_digits * ten.pow(right_scale as u32), right_digits)
    } else {
        (left_digits, right_digits * ten.pow(right_scale.unsigned_abs() as u32))
    };

    let (mut quotient, remainder) = numerator.div_rem(&denominator);

    let twice_remainder: BigInt = remainder.abs() * 2;
    let round_away = match twice_remainder.cmp(&denominator.abs()) {
        Ordering::Greater => true,
        Ordering::Equal => quotient.is_odd(),
        Ordering::Less => false,
    };

    if round_away {
        // Away from zero, in the direction of the exact quotient
        if numerator.is_negative() != denominator.is_negative() {
            quotient -= 1;
        } else {
            quotient += 1;
        }
    }

    BigDecimal::new(quotient, left_scale)
}
