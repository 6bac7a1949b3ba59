//! Tolerant parser for script-level data literals
//!
//! Accepts the JSON superset that hand-maintained inline data tends to use:
//! `'single'` and `` `backtick` `` strings, bare property names, trailing
//! commas before `}`/`]`, and `//` or `/* */` comments. Produces a
//! `serde_json::Value` so callers can work with ordinary JSON types.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest array/object nesting accepted before giving up
pub const MAX_DEPTH: usize = 128;

/// A structural error with the position where parsing stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line within the parsed text
    pub line: usize,
    /// 1-based column (in characters) within the line
    pub column: usize,
}

/// Parse a single value, allowing only whitespace and comments after it
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    parser.skip_trivia()?;
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected trailing character '{}'", c))),
    }
}

struct Parser<'a> {
    src: &'a str,
    /// Byte offset into `src`
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    let rest = &self.src[self.pos..];
                    self.pos += rest.find('\n').unwrap_or(rest.len());
                }
                (Some('/'), Some('*')) => {
                    let rest = &self.src[self.pos + 2..];
                    match rest.find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => return Err(self.error("unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('"' | '\'' | '`')) => self.parse_string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                let word = self.parse_ident();
                match word {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    other => {
                        let other = other.to_string();
                        self.pos = start;
                        Err(self.error(format!("unexpected identifier '{}'", other)))
                    }
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(']') {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error("expected ',' or ']'"));
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') {
                break;
            }
            let key = match self.peek() {
                Some(q @ ('"' | '\'' | '`')) => self.parse_string(q)?,
                Some(c) if is_ident_start(c) => self.parse_ident().to_string(),
                Some(c) => {
                    return Err(self.error(format!("expected property name, found '{}'", c)))
                }
                None => return Err(self.error("unexpected end of input")),
            };
            self.skip_trivia()?;
            if !self.eat(':') {
                return Err(self.error(format!("expected ':' after property '{}'", key)));
            }
            self.skip_trivia()?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_trivia()?;
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.error("expected ',' or '}'"));
        }
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn parse_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
                Some(c) if c == quote => return Ok(out),
                Some('\n') if quote != '`' => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some('u') => out.push(self.parse_unicode_escape()?),
            // Line continuation
            Some('\n') => {}
            Some(c) => out.push(c),
            None => return Err(self.error("unterminated escape sequence")),
        }
        Ok(())
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.parse_hex4()?;
        if (0xD800..0xDC00).contains(&high) && self.src[self.pos..].starts_with("\\u") {
            self.pos += 2;
            let low = self.parse_hex4()?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined)
                    .ok_or_else(|| self.error("invalid unicode escape"));
            }
            return Err(self.error("invalid surrogate pair"));
        }
        char::from_u32(high).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self.src.get(self.pos..self.pos + 4).unwrap_or("");
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error("expected four hex digits in unicode escape"));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error("expected four hex digits in unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E') {
                self.bump();
            } else {
                break;
            }
        }
        let literal = self.src[start..self.pos].trim_start_matches('+');

        let number = if let Ok(n) = literal.parse::<i64>() {
            Some(Number::from(n))
        } else if let Ok(n) = literal.parse::<u64>() {
            Some(Number::from(n))
        } else {
            literal.parse::<f64>().ok().and_then(Number::from_f64)
        };

        match number {
            Some(n) => Ok(Value::Number(n)),
            None => {
                let literal = literal.to_string();
                self.pos = start;
                Err(self.error(format!("invalid number '{}'", literal)))
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
