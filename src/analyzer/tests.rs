//! Unit tests for the analyzer.

use pretty_assertions::assert_eq;

use super::analyzer::{analyze_stmt, Analyzer};
use crate::{
    ast::{ast::Source, expressions::Expr, statements::Stmt},
    check,
    environment::types::Type,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn analyze(source: &str) -> Result<Source, Error> {
    check(source, "test.plc")
}

fn error_name(source: &str) -> String {
    analyze(source)
        .expect_err("analysis should fail")
        .get_error_name()
        .to_string()
}

/// Wraps `body` in a valid `main`.
fn with_main(body: &str) -> String {
    format!("FUN main(): Integer DO {} RETURN 0; END", body)
}

fn global_type(source: &str) -> Type {
    let source = analyze(source).unwrap();
    source.globals[0].value.as_ref().unwrap().get_type().cloned().unwrap()
}

#[test]
fn test_minimal_program() {
    let source = analyze("FUN main(): Integer DO RETURN 5; END").unwrap();

    let main = source.functions[0].function.as_ref().unwrap();
    assert_eq!(main.return_type, Type::Integer);
    assert_eq!(main.arity(), 0);
}

#[test]
fn test_main_is_required() {
    assert_eq!(error_name("FUN helper(): Integer DO RETURN 1; END"), "MissingMain");
    assert_eq!(error_name("FUN main(): Decimal DO RETURN 1.0; END"), "MissingMain");
    assert_eq!(error_name("FUN main(x: Integer): Integer DO RETURN x; END"), "MissingMain");
}

#[test]
fn test_integer_literal_range() {
    let fits = format!("VAR x = 4294967295; {}", with_main(""));
    assert_eq!(global_type(&fits), Type::Integer);

    let too_wide = format!("VAR x = 4294967296; {}", with_main(""));
    assert_eq!(error_name(&too_wide), "IntegerOutOfRange");
}

#[test]
fn test_decimal_literal_range() {
    assert_eq!(global_type(&format!("VAR x = 2.5; {}", with_main(""))), Type::Decimal);

    let huge = format!("VAR x = 1{}.0; {}", "0".repeat(400), with_main(""));
    assert_eq!(error_name(&huge), "DecimalOutOfRange");
}

#[test]
fn test_literal_types() {
    assert_eq!(global_type(&format!("VAR x = TRUE; {}", with_main(""))), Type::Boolean);
    assert_eq!(global_type(&format!("VAR x = NIL; {}", with_main(""))), Type::Nil);
    assert_eq!(global_type(&format!("VAR x = 'c'; {}", with_main(""))), Type::Character);
    assert_eq!(global_type(&format!("VAR x = \"s\"; {}", with_main(""))), Type::String);
    assert_eq!(global_type(&format!("VAR x = (1); {}", with_main(""))), Type::Integer);
}

#[test]
fn test_addition_rules() {
    assert_eq!(global_type(&format!("VAR x = \"a\" + 1; {}", with_main(""))), Type::String);
    assert_eq!(global_type(&format!("VAR x = 1 + \"a\"; {}", with_main(""))), Type::String);
    assert_eq!(global_type(&format!("VAR x = 1 + 1; {}", with_main(""))), Type::Integer);
    assert_eq!(global_type(&format!("VAR x = 1.5 + 1.5; {}", with_main(""))), Type::Decimal);

    assert_eq!(error_name(&format!("VAR x = 1 + 1.0; {}", with_main(""))), "TypeMatchError");
    assert_eq!(error_name(&format!("VAR x = TRUE + TRUE; {}", with_main(""))), "TypeMatchError");
}

#[test]
fn test_arithmetic_rules() {
    assert_eq!(global_type(&format!("VAR x = 6 / 3 * 2 - 1; {}", with_main(""))), Type::Integer);
    assert_eq!(global_type(&format!("VAR x = 2 ^ 10; {}", with_main(""))), Type::Integer);

    assert_eq!(error_name(&format!("VAR x = 2.0 ^ 2; {}", with_main(""))), "TypeMatchError");
    assert_eq!(error_name(&format!("VAR x = \"a\" - \"b\"; {}", with_main(""))), "TypeMatchError");
    assert_eq!(error_name(&format!("VAR x = 1.0 * 2; {}", with_main(""))), "TypeMatchError");
}

#[test]
fn test_comparison_and_logic() {
    assert_eq!(global_type(&format!("VAR x = 1 < 2 && 'a' == 'b'; {}", with_main(""))), Type::Boolean);
    assert_eq!(global_type(&format!("VAR x = NIL == NIL || FALSE; {}", with_main(""))), Type::Boolean);

    // Booleans are not comparable
    assert_eq!(error_name(&format!("VAR x = TRUE == TRUE; {}", with_main(""))), "TypeMatchError");
    // Operands must agree
    assert_eq!(error_name(&format!("VAR x = 1 < 1.5; {}", with_main(""))), "TypeMatchError");
    assert_eq!(error_name(&format!("VAR x = 1 && TRUE; {}", with_main(""))), "TypeMatchError");
}

#[test]
fn test_declarations() {
    assert!(analyze(&with_main("LET x : Integer; LET y = 2.0; LET z : Any = 'c';")).is_ok());

    assert_eq!(error_name(&with_main("LET x;")), "ExpectedExplicitValue");
    assert_eq!(error_name(&with_main("LET x : Integer = 1.0;")), "TypeMatchError");
    assert_eq!(error_name(&with_main("LET x : Widget = 1;")), "UnknownType");
    assert_eq!(error_name(&with_main("LET x = 1; LET x = 2;")), "VariableAlreadyDeclared");
    assert_eq!(error_name("VAR a; FUN main(): Integer DO RETURN 0; END"), "ExpectedExplicitValue");
}

#[test]
fn test_inner_scopes_may_shadow() {
    let source = with_main("LET x = 1; IF TRUE DO LET x = \"inner\"; print(x); END");
    assert!(analyze(&source).is_ok());
}

#[test]
fn test_block_scopes_end() {
    let source = with_main("IF TRUE DO LET y = 1; END print(y);");
    assert_eq!(error_name(&source), "VariableNotDeclared");
}

#[test]
fn test_expression_statements_must_be_calls() {
    assert!(analyze(&with_main("print(1);")).is_ok());
    assert_eq!(error_name(&with_main("1 + 2;")), "InvalidExpressionStatement");
}

#[test]
fn test_assignment_rules() {
    assert!(analyze(&format!("VAR total = 0; {}", with_main("total = total + 1;"))).is_ok());

    assert_eq!(error_name(&format!("VAR total = 0; {}", with_main("total = 1.5;"))), "TypeMatchError");
    assert_eq!(error_name(&format!("VAL limit = 10; {}", with_main("limit = 1;"))), "ImmutableAssignment");
    assert_eq!(error_name(&with_main("print(1) = 2;")), "InvalidAssignmentTarget");
    assert_eq!(error_name(&with_main("missing = 2;")), "VariableNotDeclared");
}

#[test]
fn test_list_rules() {
    let source = analyze(&format!("LIST xs : Integer = [1, 2, 3]; {}", with_main("xs[0] = xs[1] + 1;"))).unwrap();
    assert_eq!(source.globals[0].variable.as_ref().unwrap().ty, Type::Integer);

    assert_eq!(error_name(&format!("LIST xs : Integer = [1, 2.0]; {}", with_main(""))), "TypeMatchError");
    assert_eq!(
        error_name(&format!("LIST xs : Integer = [1]; {}", with_main("print(xs[1.0]);"))),
        "TypeMatchError"
    );
    let source = analyze(&format!("LIST xs : Any = [1, 'a', \"b\"]; {}", with_main("print(xs);"))).unwrap();
    assert!(source.globals[0].variable.as_ref().unwrap().is_list);
}

#[test]
fn test_list_literals_only_initialize_lists() {
    assert_eq!(error_name(&with_main("LET x : Integer = [1, 2];")), "UnexpectedToken");
    assert_eq!(error_name("FUN main(): Integer DO RETURN [5]; END"), "UnexpectedToken");
    assert_eq!(error_name(&format!("VAR x = [1]; {}", with_main(""))), "UnexpectedToken");
    assert_eq!(error_name(&format!("LIST xs : Any = [[1]]; {}", with_main(""))), "UnexpectedToken");
}

#[test]
fn test_whole_list_is_not_a_scalar() {
    let list = "LIST xs : Integer = [1, 2];";

    assert_eq!(error_name(&format!("{} {}", list, with_main("RETURN xs + 1;"))), "ListNotIndexed");
    assert_eq!(error_name(&format!("{} {}", list, with_main("LET y = xs;"))), "ListNotIndexed");
    assert_eq!(error_name(&format!("{} {}", list, with_main("xs = 3;"))), "ListNotIndexed");
    assert_eq!(
        error_name(&format!("{} FUN f(n: Integer): Integer DO RETURN n; END {}", list, with_main("f(xs);"))),
        "ListNotIndexed"
    );

    // Only an `Any` slot takes the list itself
    assert!(analyze(&format!("{} {}", list, with_main("print(xs); print((xs));"))).is_ok());
    assert!(analyze(&format!("{} FUN all(): Any DO RETURN xs; END {}", list, with_main(""))).is_ok());
}

#[test]
fn test_index_requires_list() {
    assert_eq!(error_name(&format!("VAR n = 3; {}", with_main("RETURN n[0];"))), "NotAList");
    assert_eq!(error_name(&with_main("LET n = 3; n[0] = 1;")), "NotAList");
    assert_eq!(
        error_name("FUN first(n: Integer): Integer DO RETURN n[0]; END FUN main(): Integer DO RETURN 0; END"),
        "NotAList"
    );
}

#[test]
fn test_if_rules() {
    assert!(analyze(&with_main("IF 1 < 2 DO print(1); ELSE print(2); END")).is_ok());

    assert_eq!(error_name(&with_main("IF TRUE DO ELSE print(2); END")), "EmptyThenBlock");
    assert_eq!(error_name(&with_main("IF 1 DO print(1); END")), "TypeMatchError");
}

#[test]
fn test_while_rules() {
    assert!(analyze(&with_main("LET i = 0; WHILE i < 3 DO i = i + 1; END")).is_ok());
    assert_eq!(error_name(&with_main("WHILE \"yes\" DO print(1); END")), "TypeMatchError");
}

#[test]
fn test_switch_rules() {
    assert!(analyze(&with_main("SWITCH 2 CASE 1: print(1); CASE 2: print(2); DEFAULT print(0); END")).is_ok());
    assert_eq!(
        error_name(&with_main("SWITCH 2 CASE 'a': print(1); DEFAULT print(0); END")),
        "TypeMatchError"
    );
}

#[test]
fn test_switch_must_end_in_default() {
    let tokens = tokenize(with_main("SWITCH 2 CASE 1: print(1); DEFAULT print(0); END"), None).unwrap();
    let mut source = parse(tokens, std::rc::Rc::new("test.plc".to_string())).unwrap();

    let Stmt::Switch(switch) = &mut source.functions[0].statements[0] else {
        panic!("expected switch statement");
    };
    switch.cases.pop();

    let error = Analyzer::new().analyze(&mut source).unwrap_err();
    assert_eq!(error.get_error_name(), "MissingDefaultCase");
}

#[test]
fn test_return_rules() {
    assert!(analyze(&format!("FUN f(): Any DO RETURN 'x'; END {}", with_main(""))).is_ok());
    assert!(analyze(&with_main("WHILE TRUE DO IF TRUE DO RETURN 1; END END")).is_ok());

    assert_eq!(error_name("FUN main(): Integer DO RETURN \"five\"; END"), "TypeMatchError");
    assert_eq!(error_name(&format!("FUN f() DO RETURN 1; END {}", with_main(""))), "TypeMatchError");
}

#[test]
fn test_return_outside_function() {
    let tokens = tokenize(with_main("RETURN 1;"), None).unwrap();
    let mut source = parse(tokens, std::rc::Rc::new("test.plc".to_string())).unwrap();

    let mut statement = source.functions[0].statements.remove(0);
    let mut analyzer = Analyzer::new();
    let scope = analyzer.globals.child();

    let error = analyze_stmt(&mut analyzer, &mut statement, &scope).unwrap_err();
    assert_eq!(error.get_error_name(), "ReturnOutsideFunction");
}

#[test]
fn test_calls() {
    let source = format!(
        "FUN add(a: Integer, b: Integer): Integer DO RETURN a + b; END {}",
        with_main("print(add(1, 2));")
    );
    assert!(analyze(&source).is_ok());

    assert_eq!(error_name(&with_main("print(add(1, 2));")), "FunctionNotDeclared");
    assert_eq!(error_name(&with_main("print(1, 2);")), "FunctionNotDeclared");
    assert_eq!(error_name(&with_main("print(logarithm(1));")), "ArgumentTypeMatchError");
    assert_eq!(error_name(&with_main("print(converter(10, 2.0));")), "ArgumentTypeMatchError");
}

#[test]
fn test_functions_overload_by_arity() {
    let source = format!(
        "FUN size(): Integer DO RETURN 0; END FUN size(a: Integer): Integer DO RETURN a; END {}",
        with_main("print(size() + size(1));")
    );
    assert!(analyze(&source).is_ok());

    let duplicate = format!(
        "FUN size(): Integer DO RETURN 0; END FUN size(): Integer DO RETURN 1; END {}",
        with_main("")
    );
    assert_eq!(error_name(&duplicate), "FunctionAlreadyDeclared");
}

#[test]
fn test_mutual_recursion() {
    let source = "
        FUN even(n: Integer): Boolean DO IF n == 0 DO RETURN TRUE; END RETURN odd(n - 1); END
        FUN odd(n: Integer): Boolean DO IF n == 0 DO RETURN FALSE; END RETURN even(n - 1); END
        FUN main(): Integer DO print(even(4)); RETURN 0; END
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_globals_cannot_call_user_functions() {
    let source = "VAR x = helper(); FUN helper(): Integer DO RETURN 1; END FUN main(): Integer DO RETURN x; END";
    assert_eq!(error_name(source), "FunctionNotDeclared");
}

#[test]
fn test_parameters_are_mutable_variables() {
    let source = format!("FUN bump(n: Integer): Integer DO n = n + 1; RETURN n; END {}", with_main(""));
    assert!(analyze(&source).is_ok());
}

#[test]
fn test_decorations() {
    let source = analyze(&format!(
        "VAR count : Integer = 1; {}",
        "FUN main(): Integer DO print(count * 2); RETURN count; END"
    ))
    .unwrap();

    let Stmt::Expression(statement) = &source.functions[0].statements[0] else {
        panic!("expected expression statement");
    };
    let Expr::Call(call) = &statement.expression else {
        panic!("expected call");
    };

    assert_eq!(call.ty, Some(Type::Nil));
    assert_eq!(call.function.as_ref().unwrap().qualified_name, "builtin::print");

    let Expr::Binary(binary) = &call.arguments[0] else {
        panic!("expected binary expression");
    };
    assert_eq!(binary.ty, Some(Type::Integer));

    let Expr::Access(access) = binary.left.as_ref() else {
        panic!("expected access");
    };
    assert_eq!(access.variable.as_ref().unwrap().name, "count");
    assert_eq!(access.ty, Some(Type::Integer));
}
