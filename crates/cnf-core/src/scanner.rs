//! Scanner — turns a character stream into configuration tokens.
//!
//! The scanner keeps exactly one character of lookahead and never rewinds.
//! At every node boundary the current character picks a production:
//!
//! | first char     | production   |
//! |----------------|--------------|
//! | whitespace     | `Whitespace` |
//! | `#`            | `Comment`    |
//! | `[`            | `Section`    |
//! | alphanumeric   | `KeyValue`   |
//! | `.`            | `Directive`  |
//!
//! Each production consumes its node completely, storing every character it
//! reads in one of the node's fields (the `#`, `[`, `]`, `=`, and `.` markers
//! are implied by the node kind). Section tokens come out empty; attaching the
//! nodes that follow a header is the assembler's job (see [`crate::document`]).
//!
//! # Key design decisions
//!
//! - **Iterator of `Result`**: the scanner yields `Result<Node>` and fuses after
//!   the first error, so a structural error aborts the whole parse.
//! - **Unclassifiable characters**: a node cannot start with, say, a stray `=`.
//!   [`ParseOptions::strict`] reports it as [`CnfError::UnexpectedChar`];
//!   [`ParseOptions::lenient`] stops scanning there and drops the rest of the
//!   input, logging the position at `warn` level.

use crate::error::{CnfError, Result};
use crate::node::{Comment, Directive, KeyValue, Node, Section, Whitespace};
use tracing::{trace, warn};

/// Knobs for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Stop silently instead of failing when a node starts with a character
    /// no production accepts.
    pub lenient: bool,
}

impl ParseOptions {
    /// Fail on unclassifiable characters. This is the default.
    pub fn strict() -> Self {
        Self { lenient: false }
    }

    /// Truncate the document at the first unclassifiable character.
    pub fn lenient() -> Self {
        Self { lenient: true }
    }
}

/// What the first character of a node says about the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Start {
    Whitespace,
    Comment,
    Section,
    KeyValue,
    Directive,
    Unknown,
}

fn classify(c: char) -> Start {
    match c {
        c if c.is_whitespace() => Start::Whitespace,
        '#' => Start::Comment,
        '[' => Start::Section,
        c if c.is_alphanumeric() => Start::KeyValue,
        '.' => Start::Directive,
        _ => Start::Unknown,
    }
}

/// CR, LF, or end of input.
fn is_line_end(c: Option<char>) -> bool {
    matches!(c, None | Some('\r') | Some('\n'))
}

/// Single-pass tokenizer over any character iterator.
pub struct Scanner<I: Iterator<Item = char>> {
    chars: I,
    current: Option<char>,
    /// 1-based position of `current`.
    line: usize,
    column: usize,
    options: ParseOptions,
    done: bool,
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn new(mut chars: I, options: ParseOptions) -> Self {
        let current = chars.next();
        Self {
            chars,
            current,
            line: 1,
            column: 1,
            options,
            done: false,
        }
    }

    /// Move past the current character and return it.
    fn bump(&mut self) -> Option<char> {
        let c = self.current?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.current = self.chars.next();
        Some(c)
    }

    /// Append the current character to `buf` and move past it.
    fn take_into(&mut self, buf: &mut String) {
        if let Some(c) = self.bump() {
            buf.push(c);
        }
    }

    fn scan_whitespace(&mut self) -> Node {
        let mut text = String::new();
        while self.current.is_some_and(char::is_whitespace) {
            self.take_into(&mut text);
        }
        Node::Whitespace(Whitespace::from_scanned(text))
    }

    fn scan_comment(&mut self) -> Node {
        self.bump(); // '#'
        let mut text = String::new();
        while !is_line_end(self.current) {
            self.take_into(&mut text);
        }
        Node::Comment(Comment { text })
    }

    fn scan_section(&mut self) -> Result<Node> {
        self.bump(); // '['
        let mut pre = String::new();
        let mut name = String::new();
        let mut post = String::new();

        loop {
            match self.current {
                None => return Err(self.unterminated_section()),
                Some(c) if c.is_whitespace() => self.take_into(&mut pre),
                Some(_) => break,
            }
        }

        loop {
            match self.current {
                None => return Err(self.unterminated_section()),
                Some(c) if c.is_whitespace() || c == ']' => break,
                Some(_) => self.take_into(&mut name),
            }
        }

        loop {
            match self.current {
                None => return Err(self.unterminated_section()),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => self.take_into(&mut post),
            }
        }

        Ok(Node::Section(Section::with_spacing(pre, name, post)))
    }

    fn scan_key_value(&mut self) -> Result<Node> {
        let mut key = String::new();
        let mut key_post = String::new();
        let mut value_pre = String::new();
        let mut value = String::new();

        loop {
            match self.current {
                None | Some('\r') | Some('\n') => return Err(self.malformed_key()),
                Some(c) if c.is_whitespace() || c == '=' => break,
                Some(_) => self.take_into(&mut key),
            }
        }

        loop {
            match self.current {
                None | Some('\r') | Some('\n') => return Err(self.malformed_key()),
                Some('=') => break,
                Some(_) => self.take_into(&mut key_post),
            }
        }
        self.bump(); // '='

        loop {
            match self.current {
                Some('\r') | Some('\n') => {
                    return Err(CnfError::MalformedValueStart {
                        line: self.line,
                        column: self.column,
                    })
                }
                Some(c) if c.is_whitespace() => self.take_into(&mut value_pre),
                _ => break,
            }
        }

        while !is_line_end(self.current) && self.current != Some('#') {
            self.take_into(&mut value);
        }

        Ok(Node::KeyValue(KeyValue {
            key,
            key_post,
            value_pre,
            value,
        }))
    }

    fn scan_directive(&mut self) -> Node {
        self.bump(); // '.'
        let mut name = String::new();
        let mut spacer = String::new();
        let mut args = String::new();

        while let Some(c) = self.current {
            if c.is_whitespace() || c == '#' {
                break;
            }
            self.take_into(&mut name);
        }

        while !is_line_end(self.current) && self.current.is_some_and(char::is_whitespace) {
            self.take_into(&mut spacer);
        }

        while !is_line_end(self.current) && self.current != Some('#') {
            self.take_into(&mut args);
        }

        Node::Directive(Directive { name, spacer, args })
    }

    fn unterminated_section(&self) -> CnfError {
        CnfError::UnterminatedSection {
            line: self.line,
            column: self.column,
        }
    }

    fn malformed_key(&self) -> CnfError {
        CnfError::MalformedKey {
            line: self.line,
            column: self.column,
        }
    }

    /// Produce the next token, `Ok(None)` once the input is exhausted.
    fn scan_node(&mut self) -> Result<Option<Node>> {
        let Some(c) = self.current else {
            return Ok(None);
        };
        let (line, column) = (self.line, self.column);

        let node = match classify(c) {
            Start::Whitespace => self.scan_whitespace(),
            Start::Comment => self.scan_comment(),
            Start::Section => self.scan_section()?,
            Start::KeyValue => self.scan_key_value()?,
            Start::Directive => self.scan_directive(),
            Start::Unknown if self.options.lenient => {
                warn!(ch = ?c, line, column, "unrecognised character, ignoring rest of input");
                return Ok(None);
            }
            Start::Unknown => return Err(CnfError::UnexpectedChar { ch: c, line, column }),
        };

        trace!(line, column, ?node, "token");
        Ok(Some(node))
    }
}

impl<I: Iterator<Item = char>> Iterator for Scanner<I> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scan_node() {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<I: Iterator<Item = char>> std::iter::FusedIterator for Scanner<I> {}
