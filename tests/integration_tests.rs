//! Integration tests for the whole pipeline.
//!
//! These tests run programs from source text through tokenization, parsing,
//! analysis and evaluation, checking both printed output and results.

use num_bigint::BigInt;
use plc::{check, environment::value::Value, errors::errors::Error, get_line_at_position, run};
use pretty_assertions::assert_eq;

fn execute(source: &str) -> (Result<Value, Error>, String) {
    let mut output = Vec::new();
    let result = run(source, "program.plc", &mut output);

    (result, String::from_utf8(output).unwrap())
}

#[test]
fn test_while_prints_counter() {
    let source = "
        FUN main(): Integer DO
            LET i = 0;
            WHILE i < 3 DO
                print(i);
                i = i + 1;
            END
            RETURN 0;
        END
    ";

    let (result, output) = execute(source);
    assert!(result.is_ok());
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn test_switch_runs_matching_case_only() {
    let source = "
        FUN main(): Integer DO
            SWITCH 2
                CASE 1: print(\"one\");
                CASE 2: print(\"two\");
                DEFAULT print(\"default\");
            END
            RETURN 0;
        END
    ";

    assert_eq!(execute(source).1, "two\n");
}

#[test]
fn test_string_plus_integer() {
    let (_, output) = execute("FUN main(): Integer DO print(\"a\" + 1); RETURN 0; END");
    assert_eq!(output, "a1\n");
}

#[test]
fn test_mixed_numeric_addition_is_rejected() {
    let error = check("FUN main(): Integer DO print(1 + 1.0); RETURN 0; END", "program.plc").unwrap_err();

    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_integer_division_by_zero() {
    let (result, output) = execute("FUN main(): Integer DO print(\"before\"); print(1 / 0); RETURN 0; END");

    assert_eq!(result.unwrap_err().get_error_name(), "DivisionByZero");
    assert_eq!(output, "before\n");
}

#[test]
fn test_decimal_division_rounds_half_even() {
    let (_, output) = execute("FUN main(): Integer DO print(1.0 / 3.0); print(0.5 / 2.0); RETURN 0; END");
    // 0.25 at one decimal place is a tie, which rounds to the even 0.2
    assert_eq!(output, "0.3\n0.2\n");
}

#[test]
fn test_return_five() {
    let source = "
        FUN five(): Integer DO RETURN 5; END
        FUN main(): Integer DO RETURN five(); END
    ";

    assert!(check(source, "program.plc").is_ok());
    assert!(matches!(execute(source).0, Ok(Value::Integer(value)) if value == BigInt::from(5)));
}

#[test]
fn test_full_program() {
    let source = "
        // Sums the even squares below a limit
        LIST squares : Integer = [0, 0, 0, 0, 0];
        VAL limit = 5;
        VAR label : String = \"total: \";

        FUN is_even(n: Integer): Boolean DO
            RETURN n - n / 2 * 2 == 0;
        END

        FUN fill(): Integer DO
            LET i = 0;
            WHILE i < limit DO
                squares[i] = i ^ 2;
                i = i + 1;
            END
            RETURN i;
        END

        FUN main(): Integer DO
            fill();
            LET total = 0;
            LET i = 0;
            WHILE i < limit DO
                IF is_even(squares[i]) DO
                    total = total + squares[i];
                END
                i = i + 1;
            END
            print(label + total);
            print(squares);
            print(converter(total, 2));
            RETURN total;
        END
    ";

    let (result, output) = execute(source);
    assert_eq!(output, "total: 20\n[0, 1, 4, 9, 16]\n10100\n");
    assert!(matches!(result, Ok(Value::Integer(value)) if value == BigInt::from(20)));
}

#[test]
fn test_errors_point_into_source() {
    let source = "FUN main(): Integer DO\n    LET x = 1 + 1.0;\n    RETURN 0;\nEND\n";
    let error = check(source, "program.plc").unwrap_err();

    let (line, text, _) = get_line_at_position(source, error.get_position().0).unwrap();
    assert_eq!(line, 2);
    assert_eq!(text.trim(), "LET x = 1 + 1.0;");
    assert_eq!(error.get_position().1.as_str(), "program.plc");
}

#[test]
fn test_syntax_and_lexical_errors() {
    assert_eq!(check("FUN main(): Integer DO RETURN 0 END", "p.plc").unwrap_err().get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(check("FUN main(): Integer DO RETURN #; END", "p.plc").unwrap_err().get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_list_misuse_is_caught_before_running() {
    let source = "LIST xs : Integer = [1]; FUN main(): Integer DO RETURN xs + 1; END";
    let (result, output) = execute(source);

    assert_eq!(result.unwrap_err().get_error_name(), "ListNotIndexed");
    assert_eq!(output, "");

    let source = "VAR n = 3; FUN main(): Integer DO RETURN n[0]; END";
    assert_eq!(check(source, "program.plc").unwrap_err().get_error_name(), "NotAList");
}
