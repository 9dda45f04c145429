use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    ast::expressions::{AccessExpr, BinaryExpr, BinaryOperator, CallExpr, Expr, GroupExpr, ListExpr, Literal, LiteralExpr},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

fn number_error(token: &Token) -> Error {
    Error::new(
        ErrorImpl::NumberParseError {
            token: token.value.clone(),
        },
        token.span.start.clone(),
    )
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let value = match token.kind {
        TokenKind::Integer => Literal::Integer(BigInt::from_str(&token.value).map_err(|_| number_error(&token))?),
        TokenKind::Decimal => {
            Literal::Decimal(BigDecimal::from_str(&token.value).map_err(|_| number_error(&token))?)
        }
        TokenKind::Character => {
            let mut chars = token.value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Literal::Character(ch),
                _ => return Err(parser.unexpected()),
            }
        }
        TokenKind::String => Literal::String(token.value.clone()),
        TokenKind::True => Literal::Boolean(true),
        TokenKind::False => Literal::Boolean(false),
        TokenKind::Nil => Literal::Nil,
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(Expr::Literal(LiteralExpr { value, span: token.span, ty: None }))
}

/// `name`, `name[offset]` or `name(arguments)`.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    let start = name_token.span.start.clone();

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let mut arguments = vec![];

            if parser.current_token_kind() != TokenKind::CloseParen {
                arguments.push(parse_expr(parser, BindingPower::Default)?);
                while parser.current_token_kind() == TokenKind::Comma {
                    parser.advance();
                    arguments.push(parse_expr(parser, BindingPower::Default)?);
                }
            }

            parser.expect(TokenKind::CloseParen)?;

            Ok(Expr::Call(CallExpr {
                name: name_token.value,
                arguments,
                span: parser.span_from(start),
                ty: None,
                function: None,
            }))
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let offset = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::CloseBracket)?;

            Ok(Expr::Access(AccessExpr {
                name: name_token.value,
                offset: Some(Box::new(offset)),
                span: parser.span_from(start),
                ty: None,
                variable: None,
            }))
        }
        _ => Ok(Expr::Access(AccessExpr {
            name: name_token.value,
            offset: None,
            span: name_token.span,
            ty: None,
            variable: None,
        })),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(operator) = BinaryOperator::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken { token: operator_token.value },
            operator_token.span.start,
        ));
    };

    // Parsing the right side at the operator's own power keeps it left-associative
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        operator,
        left: Box::new(left),
        right: Box::new(right),
        ty: None,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Group(GroupExpr {
        expression: Box::new(expression),
        span: parser.span_from(start),
        ty: None,
    }))
}

/// `[a, b, ...]`, the initializer of a `LIST` global.
pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;
    let mut values = vec![];

    if parser.current_token_kind() != TokenKind::CloseBracket {
        values.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            values.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::List(ListExpr {
        values,
        span: parser.span_from(start),
        ty: None,
    }))
}
