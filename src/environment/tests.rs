use std::{cmp::Ordering, rc::Rc, str::FromStr};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;

use super::{
    scope::{Callable, Function, Scope, Variable},
    types::{is_assignable, Type, TypeRegistry},
    value::Value,
};
use crate::Position;

fn all_types() -> Vec<Type> {
    vec![
        Type::Any,
        Type::Nil,
        Type::Comparable,
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::Character,
        Type::String,
    ]
}

fn decimal(literal: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(literal).unwrap())
}

#[test]
fn test_any_accepts_everything() {
    for ty in all_types() {
        assert!(is_assignable(&Type::Any, &ty), "Any should accept {}", ty);
    }
}

#[test]
fn test_comparable_excludes_boolean() {
    assert!(!is_assignable(&Type::Comparable, &Type::Boolean));
    assert!(!is_assignable(&Type::Boolean, &Type::Comparable));

    assert!(is_assignable(&Type::Comparable, &Type::Integer));
    assert!(is_assignable(&Type::Comparable, &Type::String));
    assert!(is_assignable(&Type::Comparable, &Type::Nil));
    assert!(is_assignable(&Type::Comparable, &Type::Comparable));
}

#[test]
fn test_mismatches_are_rejected() {
    assert!(!is_assignable(&Type::Integer, &Type::Decimal));
    assert!(!is_assignable(&Type::Integer, &Type::Any));
    assert!(!is_assignable(&Type::String, &Type::Comparable));
    assert!(is_assignable(&Type::Character, &Type::Character));
}

#[test]
fn test_type_registry() {
    let registry = TypeRegistry::new();
    let position = Position::null();

    assert_eq!(registry.get_type("Integer", &position).unwrap(), Type::Integer);
    assert_eq!(registry.get_type("Comparable", &position).unwrap(), Type::Comparable);
    assert_eq!(registry.get_type("Point", &position).unwrap_err().get_error_name(), "UnknownType");
    assert_eq!(registry.get_type("integer", &position).unwrap_err().get_error_name(), "UnknownType");
}

#[test]
fn test_lookup_walks_parents() {
    let position = Position::null();
    let root = Scope::new(None);
    root.define_variable(Variable::new("x", Type::Integer, true, Value::Nil), &position)
        .unwrap();

    let inner = root.child().child();
    assert_eq!(inner.lookup_variable("x", &position).unwrap().ty, Type::Integer);
    assert_eq!(
        inner.lookup_variable("y", &position).unwrap_err().get_error_name(),
        "VariableNotDeclared"
    );
}

#[test]
fn test_shadowing_and_redeclaration() {
    let position = Position::null();
    let root = Scope::new(None);
    root.define_variable(Variable::new("x", Type::Integer, true, Value::Nil), &position)
        .unwrap();

    let error = root
        .define_variable(Variable::new("x", Type::String, true, Value::Nil), &position)
        .unwrap_err();
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");

    let child = root.child();
    child
        .define_variable(Variable::new("x", Type::String, true, Value::Nil), &position)
        .unwrap();
    assert_eq!(child.lookup_variable("x", &position).unwrap().ty, Type::String);
    assert_eq!(root.lookup_variable("x", &position).unwrap().ty, Type::Integer);
}

#[test]
fn test_list_variables() {
    let scalar = Variable::new("n", Type::Integer, true, Value::Nil);
    let list = Variable::new_list("xs", Type::Integer, false, Value::List(vec![]));

    assert!(!scalar.is_list);
    assert!(list.is_list);
    assert_eq!(list.ty, Type::Integer);
    assert!(!list.mutable);
}

#[test]
fn test_variable_value_cell() {
    let variable = Variable::new("xs", Type::Integer, true, Value::List(vec![Value::Integer(BigInt::from(1))]));

    variable.update_value(|value| {
        if let Value::List(values) = value {
            values.push(Value::Integer(BigInt::from(2)));
        }
    });
    assert_eq!(variable.get_value().to_string(), "[1, 2]");

    variable.set_value(Value::Nil);
    assert!(matches!(*variable.borrow_value(), Value::Nil));
}

#[test]
fn test_functions_keyed_by_arity() {
    let position = Position::null();
    let root = Scope::new(None);

    root.define_function(Function::new("f", vec![], Type::Nil, Callable::Signature), &position)
        .unwrap();
    root.define_function(Function::new("f", vec![Type::Integer], Type::Integer, Callable::Signature), &position)
        .unwrap();

    let error = root
        .define_function(Function::new("f", vec![Type::String], Type::Nil, Callable::Signature), &position)
        .unwrap_err();
    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");

    let child = root.child();
    assert_eq!(child.lookup_function("f", 1, &position).unwrap().return_type, Type::Integer);
    assert_eq!(child.lookup_function("f", 0, &position).unwrap().return_type, Type::Nil);
    assert_eq!(
        child.lookup_function("f", 2, &position).unwrap_err().get_error_name(),
        "FunctionNotDeclared"
    );
}

#[test]
fn test_scope_with_functions() {
    let position = Position::null();
    let root = Scope::with_functions([
        Function::new("f", vec![], Type::Nil, Callable::Signature),
        Function::new("f", vec![Type::Any], Type::String, Callable::Signature),
    ]);

    assert_eq!(root.lookup_function("f", 1, &position).unwrap().return_type, Type::String);
    assert!(root.get_parent().is_none());
    assert_eq!(
        root.define_function(Function::new("f", vec![], Type::Nil, Callable::Signature), &position)
            .unwrap_err()
            .get_error_name(),
        "FunctionAlreadyDeclared"
    );
}

#[test]
fn test_enclosing_return_type() {
    let root = Scope::new(None);
    assert_eq!(root.enclosing_return_type(), None);

    let body = root.function_body(Type::Decimal);
    let nested = body.child().child();
    assert_eq!(nested.enclosing_return_type(), Some(Type::Decimal));

    let inner_function = nested.function_body(Type::String);
    assert_eq!(inner_function.enclosing_return_type(), Some(Type::String));
}

#[test]
fn test_weak_scope_does_not_keep_scope_alive() {
    let scope = Scope::new(None);
    let weak = scope.downgrade();

    assert!(weak.upgrade().is_some());
    drop(scope);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_value_compare() {
    let one = Value::Integer(BigInt::from(1));
    let two = Value::Integer(BigInt::from(2));

    assert_eq!(one.compare(&two), Some(Ordering::Less));
    assert_eq!(decimal("1.0").compare(&decimal("1.00")), Some(Ordering::Equal));
    assert_eq!(Value::String("b".into()).compare(&Value::String("a".into())), Some(Ordering::Greater));
    assert_eq!(Value::Nil.compare(&Value::Nil), Some(Ordering::Equal));

    assert_eq!(one.compare(&decimal("1.0")), None);
    assert_eq!(Value::Boolean(true).compare(&Value::Boolean(true)), None);
}

#[test]
fn test_value_equals() {
    assert!(decimal("1.0").equals(&decimal("1.00")));
    assert!(Value::Boolean(false).equals(&Value::Boolean(false)));
    assert!(!Value::Integer(BigInt::from(1)).equals(&decimal("1")));

    let list = Value::List(vec![Value::Character('a'), Value::Nil]);
    assert!(list.equals(&list.clone()));
    assert!(!list.equals(&Value::List(vec![Value::Character('a')])));

    let function = Rc::new(Function::new("f", vec![], Type::Nil, Callable::Signature));
    let same = Value::Function(Rc::clone(&function));
    assert!(same.equals(&Value::Function(function)));
    assert!(!same.equals(&Value::Function(Rc::new(Function::new("f", vec![], Type::Nil, Callable::Signature)))));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Nil.to_string(), "NIL");
    assert_eq!(Value::Boolean(true).to_string(), "true");
    assert_eq!(Value::Character('z').to_string(), "z");
    assert_eq!(Value::Integer(BigInt::from(-42)).to_string(), "-42");
    assert_eq!(decimal("2.50").to_string(), "2.50");
    assert_eq!(decimal("0.0000001").to_string(), "0.0000001");
    assert_eq!(decimal("1E-8").to_string(), "0.00000001");
    assert_eq!(decimal("-12345678901234567890.5").to_string(), "-12345678901234567890.5");
    assert_eq!(
        Value::List(vec![Value::Integer(BigInt::from(1)), Value::String("two".into())]).to_string(),
        "[1, two]"
    );

    let function = Function::new("add", vec![Type::Integer, Type::Integer], Type::Integer, Callable::Signature);
    assert_eq!(Value::Function(Rc::new(function)).to_string(), "<fun add/2>");
}
