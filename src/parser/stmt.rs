use crate::{
    ast::{
        ast::{FunctionDecl, GlobalDecl},
        expressions::Expr,
        statements::{
            AssignmentStmt, CaseStmt, DeclarationStmt, ExpressionStmt, IfStmt, ReturnStmt, Stmt, SwitchStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{expr::parse_list_expr, parser::Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return stmt_fn(parser);
    }

    let start = parser.get_position();
    let expression = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;

        return Ok(Stmt::Assignment(AssignmentStmt {
            receiver: expression,
            value,
            span: parser.span_from(start),
        }));
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        expression,
        span: parser.span_from(start),
    }))
}

/// Statements up to (not including) the block's closing keyword.
fn parse_block(parser: &mut Parser, terminators: &[TokenKind]) -> Result<Vec<Stmt>, Error> {
    let mut statements = vec![];

    while !terminators.contains(&parser.current_token_kind()) {
        if !parser.has_tokens() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("block is never closed"),
                },
                parser.get_position(),
            ));
        }
        statements.push(parse_stmt(parser)?);
    }

    Ok(statements)
}

fn expect_identifier(parser: &mut Parser, context: &str) -> Result<String, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: format!("expected identifier {}", context),
        },
        parser.get_position(),
    );

    Ok(parser.expect_error(TokenKind::Identifier, Some(error))?.value)
}

/// `: Type`, if present.
fn parse_type_annotation(parser: &mut Parser) -> Result<Option<String>, Error> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(None);
    }

    parser.advance();
    Ok(Some(expect_identifier(parser, "as type name")?))
}

pub fn parse_global_decl(parser: &mut Parser) -> Result<GlobalDecl, Error> {
    let start_token = parser.advance().clone();
    let name = expect_identifier(parser, "during global declaration")?;

    let (mutable, type_name, value) = match start_token.kind {
        TokenKind::List => {
            parser.expect(TokenKind::Colon)?;
            let type_name = expect_identifier(parser, "as list element type")?;
            parser.expect(TokenKind::Assignment)?;
            (true, Some(type_name), Some(parse_list_expr(parser)?))
        }
        TokenKind::Var => {
            let type_name = parse_type_annotation(parser)?;
            let value = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                Some(parse_expr(parser, BindingPower::Default)?)
            } else {
                None
            };
            (true, type_name, value)
        }
        TokenKind::Val => {
            let type_name = parse_type_annotation(parser)?;
            let error = Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected rhs in constant definition"),
                },
                parser.get_position(),
            );
            parser.expect_error(TokenKind::Assignment, Some(error))?;
            (false, type_name, Some(parse_expr(parser, BindingPower::Default)?))
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: start_token.value },
                start_token.span.start,
            ))
        }
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(GlobalDecl {
        name,
        mutable,
        list: start_token.kind == TokenKind::List,
        type_name,
        value,
        span: parser.span_from(start_token.span.start),
        variable: None,
    })
}

pub fn parse_function_decl(parser: &mut Parser) -> Result<FunctionDecl, Error> {
    let start = parser.expect(TokenKind::Fun)?.span.start;
    let name = expect_identifier(parser, "as function name")?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    let mut parameter_type_names = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            parameters.push(expect_identifier(parser, "as parameter name")?);
            parser.expect(TokenKind::Colon)?;
            parameter_type_names.push(expect_identifier(parser, "as parameter type")?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type_name = parse_type_annotation(parser)?;

    parser.expect(TokenKind::Do)?;
    let statements = parse_block(parser, &[TokenKind::End])?;
    parser.expect(TokenKind::End)?;

    Ok(FunctionDecl {
        name,
        parameters,
        parameter_type_names,
        return_type_name,
        statements,
        span: parser.span_from(start),
        function: None,
    })
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Let)?.span.start;
    let name = expect_identifier(parser, "during variable declaration")?;
    let type_name = parse_type_annotation(parser)?;

    let value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Declaration(DeclarationStmt {
        name,
        type_name,
        value,
        span: parser.span_from(start),
        variable: None,
    }))
}

pub fn parse_switch_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Switch)?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;

    let mut cases = vec![];

    while parser.current_token_kind() == TokenKind::Case {
        let case_start = parser.advance().span.start.clone();
        let value: Expr = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Colon)?;
        let statements = parse_block(parser, &[TokenKind::Case, TokenKind::Default])?;

        cases.push(CaseStmt {
            value: Some(value),
            statements,
            span: parser.span_from(case_start),
        });
    }

    let default_start = parser.expect(TokenKind::Default)?.span.start;
    let statements = parse_block(parser, &[TokenKind::End])?;
    cases.push(CaseStmt {
        value: None,
        statements,
        span: parser.span_from(default_start),
    });

    parser.expect(TokenKind::End)?;

    Ok(Stmt::Switch(SwitchStmt {
        condition,
        cases,
        span: parser.span_from(start),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Do)?;
    let then_statements = parse_block(parser, &[TokenKind::Else, TokenKind::End])?;

    let else_statements = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        parse_block(parser, &[TokenKind::End])?
    } else {
        vec![]
    };

    parser.expect(TokenKind::End)?;

    Ok(Stmt::If(IfStmt {
        condition,
        then_statements,
        else_statements,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::While)?.span.start;
    let condition = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Do)?;
    let statements = parse_block(parser, &[TokenKind::End])?;
    parser.expect(TokenKind::End)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        statements,
        span: parser.span_from(start),
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Return)?.span.start;
    let value = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}
