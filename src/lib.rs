#![allow(clippy::module_inception)]

use std::{fmt::Display, io::Write, path::Path, rc::Rc};

use crate::{
    analyzer::analyzer::Analyzer,
    ast::ast::Source,
    environment::value::Value,
    errors::errors::{Error, ErrorTip},
    interpreter::interpreter::Interpreter,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

pub mod analyzer;
pub mod ast;
pub mod environment;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;

/// Byte offset into a source file, together with the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Lexes, parses and analyzes `source`, returning the decorated tree.
pub fn check(source: &str, file: &str) -> Result<Source, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    let mut ast = parse(tokens, Rc::new(file.to_string()))?;

    Analyzer::new().analyze(&mut ast)?;
    Ok(ast)
}

/// Runs the whole pipeline and returns the value produced by `main()`.
pub fn run<W: Write>(source: &str, file: &str, output: W) -> Result<Value, Error> {
    let ast = check(source, file)?;
    let mut interpreter = Interpreter::new(output);

    interpreter.run(&ast)
}

/// Returns the 1-based line number, the line text and the offset within it.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Position at EOF points just past the last line
    content
        .lines()
        .last()
        .map(|line| (line_number.saturating_sub(1).max(1), line.to_string(), line.len()))
}


pub fn display_error(error: &Error, content: &str, file: &Path) {
    /*
        Error: message
        -> main.plc
           |
        20 | LET a = #;
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file.as_os_str().to_string_lossy());

    let Some((line, line_text, line_pos)) = get_line_at_position(content, error.get_position().0)
    else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (String::from(&string[start..]), start)
}
