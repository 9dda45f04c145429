use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ExpectedExplicitValue => "ExpectedExplicitValue",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::InvalidExpressionStatement => "InvalidExpressionStatement",
            ErrorImpl::EmptyThenBlock => "EmptyThenBlock",
            ErrorImpl::MissingDefaultCase => "MissingDefaultCase",
            ErrorImpl::IntegerOutOfRange { .. } => "IntegerOutOfRange",
            ErrorImpl::DecimalOutOfRange { .. } => "DecimalOutOfRange",
            ErrorImpl::MissingMain => "MissingMain",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::ImmutableAssignment { .. } => "ImmutableAssignment",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ListNotIndexed { .. } => "ListNotIndexed",
            ErrorImpl::NotAList { .. } => "NotAList",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::NotInvocable { .. } => "NotInvocable",
            ErrorImpl::OutputError { .. } => "OutputError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already declared in this scope",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function, arity } => ErrorTip::Suggestion(
                format!("Function `{}/{}` already declared", function, arity),
            ),
            ErrorImpl::FunctionNotDeclared { function, arity } => ErrorTip::Suggestion(format!(
                "No function `{}` taking {} arguments",
                function, arity
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ExpectedExplicitValue => ErrorTip::Suggestion(String::from(
                "Expected explicit value when no type is given",
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::InvalidExpressionStatement => ErrorTip::Suggestion(String::from(
                "Only function calls may be used as statements",
            )),
            ErrorImpl::EmptyThenBlock => {
                ErrorTip::Suggestion(String::from("The `DO` block of an `IF` cannot be empty"))
            }
            ErrorImpl::MissingDefaultCase => ErrorTip::Suggestion(String::from(
                "The last case of a `SWITCH` must be `DEFAULT`",
            )),
            ErrorImpl::IntegerOutOfRange { literal } => ErrorTip::Suggestion(format!(
                "Integer `{}` does not fit in 32 bits",
                literal
            )),
            ErrorImpl::DecimalOutOfRange { literal } => ErrorTip::Suggestion(format!(
                "Decimal `{}` is too large to be represented",
                literal
            )),
            ErrorImpl::MissingMain => ErrorTip::Suggestion(String::from(
                "Declare `FUN main(): Integer DO ... END`",
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables and list elements can be assigned to",
            )),
            ErrorImpl::ImmutableAssignment { variable } => {
                ErrorTip::Suggestion(format!("`{}` is declared with VAL", variable))
            }
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::ListNotIndexed { variable } => ErrorTip::Suggestion(format!(
                "`{}` is a list; index it, or pass it where `Any` is expected",
                variable
            )),
            ErrorImpl::NotAList { variable } => {
                ErrorTip::Suggestion(format!("`{}` is not declared with LIST", variable))
            }
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::InvalidOperand { operator, received } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to {}",
                operator, received
            )),
            ErrorImpl::IndexOutOfRange { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is outside a list of length {}",
                index, length
            )),
            ErrorImpl::InvalidArgument { function, message } => {
                ErrorTip::Suggestion(format!("`{}`: {}", function, message))
            }
            ErrorImpl::NotInvocable { function } => ErrorTip::Suggestion(format!(
                "`{}` only carries a signature and has no body",
                function
            )),
            ErrorImpl::OutputError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.internal_error, self.position)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} with {arity} parameters already declared")]
    FunctionAlreadyDeclared { function: String, arity: usize },
    #[error("function {function:?} with {arity} parameters not declared")]
    FunctionNotDeclared { function: String, arity: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("expected explicit value when no type is given")]
    ExpectedExplicitValue,
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("expression statement is not a function call")]
    InvalidExpressionStatement,
    #[error("if statement has an empty then block")]
    EmptyThenBlock,
    #[error("switch statement must end with a default case")]
    MissingDefaultCase,
    #[error("integer literal {literal} is out of range")]
    IntegerOutOfRange { literal: String },
    #[error("decimal literal {literal} is out of range")]
    DecimalOutOfRange { literal: String },
    #[error("missing function main/0 returning Integer")]
    MissingMain,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("cannot assign to immutable variable {variable:?}")]
    ImmutableAssignment { variable: String },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("list {variable:?} used without an index")]
    ListNotIndexed { variable: String },
    #[error("variable {variable:?} is not a list")]
    NotAList { variable: String },
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("invalid operand for {operator}: {received}")]
    InvalidOperand { operator: String, received: String },
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: String, length: usize },
    #[error("invalid argument to {function}: {message}")]
    InvalidArgument { function: String, message: String },
    #[error("function {function:?} cannot be invoked")]
    NotInvocable { function: String },
    #[error("failed to write output: {message}")]
    OutputError { message: String },
}
