use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("LIST", TokenKind::List);
        map.insert("VAR", TokenKind::Var);
        map.insert("VAL", TokenKind::Val);
        map.insert("FUN", TokenKind::Fun);
        map.insert("DO", TokenKind::Do);
        map.insert("END", TokenKind::End);
        map.insert("LET", TokenKind::Let);
        map.insert("SWITCH", TokenKind::Switch);
        map.insert("CASE", TokenKind::Case);
        map.insert("DEFAULT", TokenKind::Default);
        map.insert("IF", TokenKind::If);
        map.insert("ELSE", TokenKind::Else);
        map.insert("WHILE", TokenKind::While);
        map.insert("RETURN", TokenKind::Return);
        map.insert("TRUE", TokenKind::True);
        map.insert("FALSE", TokenKind::False);
        map.insert("NIL", TokenKind::Nil);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    Integer,
    Decimal,
    Character,
    String,

    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=
    Less,
    Greater,

    Or,
    And,

    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Caret,

    // Reserved
    List,
    Var,
    Val,
    Fun,
    Do,
    End,
    Let,
    Switch,
    Case,
    Default,
    If,
    Else,
    While,
    Return,
    True,
    False,
    Nil,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}
