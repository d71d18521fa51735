//! Recursive-descent JSON parser.
//!
//! Strict about structure, lenient about two string details: a broken
//! `\uXXXX` escape becomes U+FFFD instead of failing, and an unknown escape
//! letter is kept as the bare letter.

use thiserror::Error;

use super::value::{JsonValue, Map, Number};

/// Nesting deeper than this is rejected rather than risking the stack.
const MAX_DEPTH: usize = 512;

/// Syntax error with the byte offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("JSON parse error at byte {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parse a complete JSON document. Trailing non-whitespace is an error.
pub fn parse(text: &str) -> Result<JsonValue, ParseError> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    let value = parser.value(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.src.len() {
        return Err(ParseError::new(
            parser.pos,
            "unexpected trailing data after top-level value",
        ));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.pos, message)
    }

    fn value(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        match self.peek() {
            Some('{') => self.object(depth),
            Some('[') => self.array(depth),
            Some('"') => self.string().map(JsonValue::String),
            Some('-' | '0'..='9') => self.number(),
            Some('t') => self.literal("true", JsonValue::Bool(true)),
            Some('f') => self.literal("false", JsonValue::Bool(false)),
            Some('n') => self.literal("null", JsonValue::Null),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn literal(&mut self, word: &str, value: JsonValue) -> Result<JsonValue, ParseError> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.error(format!("invalid literal, expected '{}'", word)))
        }
    }

    fn object(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        self.advance(); // {
        let mut map = Map::new();

        self.skip_whitespace();
        if self.match_char('}') {
            return Ok(JsonValue::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some('"') {
                return Err(self.error("expected string key"));
            }
            let key = self.string()?;

            self.skip_whitespace();
            if !self.match_char(':') {
                return Err(self.error("expected ':' after object key"));
            }

            self.skip_whitespace();
            let value = self.value(depth + 1)?;
            map.insert(key, value);

            self.skip_whitespace();
            if self.match_char(',') {
                continue;
            }
            if self.match_char('}') {
                return Ok(JsonValue::Object(map));
            }
            return Err(self.error("expected ',' or '}' in object"));
        }
    }

    fn array(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        self.advance(); // [
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.match_char(']') {
            return Ok(JsonValue::Array(items));
        }

        loop {
            self.skip_whitespace();
            items.push(self.value(depth + 1)?);

            self.skip_whitespace();
            if self.match_char(',') {
                continue;
            }
            if self.match_char(']') {
                return Ok(JsonValue::Array(items));
            }
            return Err(self.error("expected ',' or ']' in array"));
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('"') => return Ok(value),
                Some('\\') => match self.advance() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('/') => value.push('/'),
                    Some('b') => value.push('\u{0008}'),
                    Some('f') => value.push('\u{000C}'),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('u') => value.push(self.unicode_escape()),
                    Some(other) => value.push(other),
                    None => return Err(ParseError::new(start, "unterminated string")),
                },
                Some(c) => value.push(c),
                None => return Err(ParseError::new(start, "unterminated string")),
            }
        }
    }

    /// Body of a `\u` escape, after the `u`. Never fails.
    fn unicode_escape(&mut self) -> char {
        let Some(unit) = self.hex4() else {
            return char::REPLACEMENT_CHARACTER;
        };

        if (0xD800..0xDC00).contains(&unit) {
            // High surrogate: only meaningful when a low surrogate follows.
            if self.src[self.pos..].starts_with("\\u") {
                let save = self.pos;
                self.pos += 2;
                match self.hex4() {
                    Some(low) if (0xDC00..0xE000).contains(&low) => {
                        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
                    }
                    _ => self.pos = save,
                }
            }
            return char::REPLACEMENT_CHARACTER;
        }

        char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Up to four hex digits. Stops before the first non-hex character so
    /// that it is read again as ordinary string content.
    fn hex4(&mut self) -> Option<u32> {
        let mut unit = 0u32;
        for _ in 0..4 {
            let digit = self.peek().and_then(|c| c.to_digit(16))?;
            self.pos += 1;
            unit = unit * 16 + digit;
        }
        Some(unit)
    }

    fn number(&mut self) -> Result<JsonValue, ParseError> {
        let start = self.pos;
        let mut is_float = false;

        self.match_char('-');
        if self.digits() == 0 {
            return Err(self.error("malformed number: expected digit"));
        }

        if self.match_char('.') {
            is_float = true;
            if self.digits() == 0 {
                return Err(self.error("malformed number: expected digit after '.'"));
            }
        }

        if let Some('e' | 'E') = self.peek() {
            is_float = true;
            self.pos += 1;
            if let Some('+' | '-') = self.peek() {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.error("malformed number: expected exponent digits"));
            }
        }

        let text = &self.src[start..self.pos];
        if is_float {
            let f = text
                .parse::<f64>()
                .map_err(|_| ParseError::new(start, format!("malformed number '{}'", text)))?;
            if !f.is_finite() {
                return Err(ParseError::new(start, format!("number out of range '{}'", text)));
            }
            Ok(JsonValue::Number(Number::F64(f)))
        } else {
            text.parse::<i64>()
                .map(|n| JsonValue::Number(Number::from_integer(n)))
                .map_err(|_| ParseError::new(start, format!("integer out of range '{}'", text)))
        }
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while let Some('0'..='9') = self.peek() {
            self.pos += 1;
            count += 1;
        }
        count
    }
}
