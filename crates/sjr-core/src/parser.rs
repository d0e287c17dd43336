//! SJR parser — recursive descent from text into a [`Node`] tree.
//!
//! At each value position the parser commits to the first alternative whose
//! leading token matches, in this order:
//!
//! 1. string (`"`), or a labeled object (`"name": { ... }`)
//! 2. bool (`true` / `false`, exact prefix match)
//! 3. number (`+`, `-` or a digit)
//! 4. array (`[`)
//! 5. object (`{`)
//!
//! # Format quirks
//!
//! - Quoted literals have no escapes: `"` always terminates and `\` is an
//!   ordinary byte.
//! - Whitespace inside string and key literals is dropped unless
//!   [`ParseOptions::keep_string_whitespace`] is set.
//! - Trailing commas before `]` and `}` are accepted.
//! - Repeated object keys overwrite the earlier value.
//!
//! Every failure, however deeply nested, aborts the whole parse with
//! [`SjrError::Format`] pointing at the offending byte. No partially built
//! tree is ever returned.

use std::str::FromStr;

use crate::error::{Result, SjrError};
use crate::node::Node;

/// Default bound on array/object nesting.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested arrays/objects. Deeper input is rejected
    /// instead of exhausting the stack.
    pub max_depth: usize,
    /// Keep whitespace bytes inside quoted strings and keys. Off by default:
    /// the format drops them.
    pub keep_string_whitespace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            keep_string_whitespace: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_string_whitespace(mut self, keep: bool) -> Self {
        self.keep_string_whitespace = keep;
        self
    }
}

/// Parse a complete SJR document with default options.
///
/// ```
/// use sjr_core::{parse, Kind};
///
/// let doc = parse(r#"{"a": 1, "b": 2.5, "c": true}"#).unwrap();
/// assert_eq!(doc.kind(), Kind::Object);
/// assert_eq!(doc.child_count(), 3);
/// assert_eq!(doc["b"].value::<f64>().unwrap(), 2.5);
/// ```
pub fn parse(input: &str) -> Result<Node> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a complete SJR document.
///
/// The value may be surrounded by whitespace; anything else after it is an
/// error.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Node> {
    let mut parser = Parser {
        cursor: Cursor::new(input.as_bytes()),
        options,
        depth: 0,
    };
    let node = parser.parse_value()?;
    parser.cursor.skip_whitespace();
    if !parser.cursor.at_end() {
        return Err(parser.error("unexpected content after the document value"));
    }
    tracing::trace!(bytes = input.len(), kind = %node.kind(), "parsed document");
    Ok(node)
}

impl FromStr for Node {
    type Err = SjrError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Whitespace as classified by C `isspace` in the default locale.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Bounds-checked forward-only read position over the input bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Value of the current byte if it is an ASCII digit.
    fn digit(&self) -> Option<u8> {
        self.peek()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
    }

    fn bump(&mut self) {
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    options: &'a ParseOptions,
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> SjrError {
        SjrError::format(self.cursor.pos, message)
    }

    fn parse_value(&mut self) -> Result<Node> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Err(self.error("unexpected end of input, expected a value")),
            Some(b'"') => self.parse_string_or_label(),
            Some(b't' | b'f') if self.at_bool() => self.parse_bool(),
            Some(b'+' | b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b) => Err(self.error(format!(
                "unexpected {:?}, expected a value",
                char::from(b)
            ))),
        }
    }

    /// Run a container parser one level deeper, enforcing `max_depth`.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Node>) -> Result<Node> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(format!(
                "nesting exceeds the maximum depth of {}",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Read a `"`-delimited literal. The cursor must be on the opening quote.
    fn parse_quoted(&mut self) -> Result<String> {
        let start = self.cursor.pos;
        self.cursor.bump();
        let mut text = Vec::new();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(self.error(format!(
                        "unterminated string literal starting at byte {start}"
                    )))
                }
                Some(b'"') => {
                    self.cursor.bump();
                    break;
                }
                Some(b) if is_space(b) && !self.options.keep_string_whitespace => {
                    self.cursor.bump();
                }
                Some(b) => {
                    text.push(b);
                    self.cursor.bump();
                }
            }
        }
        String::from_utf8(text)
            .map_err(|_| SjrError::format(start, "string literal is not valid UTF-8"))
    }

    /// A string value, or `"label": { ... }` naming the object that follows.
    fn parse_string_or_label(&mut self) -> Result<Node> {
        let text = self.parse_quoted()?;
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(b':') {
            return Ok(Node::from(text));
        }
        self.cursor.bump();
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(b'{') {
            return Err(self.error(format!("expected an object after label {text:?}")));
        }
        let mut node = self.nested(Self::parse_object)?;
        node.set_label(text);
        Ok(node)
    }

    fn at_bool(&self) -> bool {
        self.cursor.starts_with(b"true") || self.cursor.starts_with(b"false")
    }

    fn parse_bool(&mut self) -> Result<Node> {
        let value = self.cursor.starts_with(b"true");
        self.cursor.advance(if value { 4 } else { 5 });
        Ok(Node::from(value))
    }

    /// `[+-]digits[.digits][(e|E)[+-]digits]`
    ///
    /// Digits are accumulated by hand. The integer part is kept as an exact
    /// `u64` while it fits; past that it is only usable as a float, and a
    /// literal without a fraction or exponent is rejected. Fractional digits
    /// fold in one at a time as `v = (v * 10^shift + d) / 10^shift`, so the
    /// rounding of a given literal is always the same.
    fn parse_number(&mut self) -> Result<Node> {
        let start = self.cursor.pos;
        let negative = match self.cursor.peek() {
            Some(b'-') => {
                self.cursor.bump();
                true
            }
            Some(b'+') => {
                self.cursor.bump();
                false
            }
            _ => false,
        };

        let digits_start = self.cursor.pos;
        let mut magnitude: Option<u64> = Some(0);
        while let Some(d) = self.cursor.digit() {
            magnitude = magnitude
                .and_then(|m| m.checked_mul(10))
                .and_then(|m| m.checked_add(u64::from(d)));
            self.cursor.bump();
        }
        if self.cursor.pos == digits_start {
            return Err(self.error("expected a digit"));
        }
        let whole = match magnitude {
            Some(m) => m as f64,
            None => self.wide_integer(digits_start)?,
        };

        let mut float = None;
        if self.cursor.peek() == Some(b'.') {
            self.cursor.bump();
            let mut value = whole;
            let mut shift = 1;
            while let Some(d) = self.cursor.digit() {
                // zero digits add nothing
                if d != 0 {
                    let scale = 10f64.powi(shift);
                    let next = (value * scale + f64::from(d)) / scale;
                    // past the float's range the digit no longer contributes
                    if next.is_finite() {
                        value = next;
                    }
                }
                shift = shift.saturating_add(1);
                self.cursor.bump();
            }
            float = Some(value);
        }

        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            self.cursor.bump();
            let exponent = self.parse_exponent()?;
            let mantissa = float.unwrap_or(whole);
            float = Some(mantissa * 10f64.powi(exponent));
        }

        match (float, magnitude) {
            (Some(value), _) if !value.is_finite() => {
                Err(SjrError::format(start, "number is out of float range"))
            }
            (Some(value), _) => Ok(Node::from(if negative { -value } else { value })),
            (None, Some(magnitude)) => {
                let signed = if negative {
                    -i128::from(magnitude)
                } else {
                    i128::from(magnitude)
                };
                i64::try_from(signed)
                    .map(Node::from)
                    .map_err(|_| SjrError::format(start, "integer does not fit in 64 bits"))
            }
            (None, None) => Err(SjrError::format(start, "integer does not fit in 64 bits")),
        }
    }

    /// Integer digits from `from` to the cursor that overflow a `u64`, read as
    /// the nearest `f64`.
    fn wide_integer(&self, from: usize) -> Result<f64> {
        std::str::from_utf8(&self.cursor.bytes[from..self.cursor.pos])
            .ok()
            .and_then(|digits| digits.parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .ok_or_else(|| SjrError::format(from, "number is out of float range"))
    }

    /// Exponent after `e`/`E`: optional sign, then at least one digit.
    fn parse_exponent(&mut self) -> Result<i32> {
        let negative = match self.cursor.peek() {
            Some(b'-') => {
                self.cursor.bump();
                true
            }
            Some(b'+') => {
                self.cursor.bump();
                false
            }
            _ => false,
        };
        let start = self.cursor.pos;
        let mut exponent: i32 = 0;
        while let Some(d) = self.cursor.digit() {
            exponent = exponent
                .checked_mul(10)
                .and_then(|e| e.checked_add(i32::from(d)))
                .ok_or_else(|| SjrError::format(start, "exponent is too large"))?;
            self.cursor.bump();
        }
        if self.cursor.pos == start {
            return Err(self.error("expected exponent digits"));
        }
        Ok(if negative { -exponent } else { exponent })
    }

    fn parse_array(&mut self) -> Result<Node> {
        self.cursor.bump();
        let mut node = Node::array();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.peek() == Some(b']') {
                self.cursor.bump();
                return Ok(node);
            }
            node.push(self.parse_value()?);
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b',') => self.cursor.bump(),
                Some(b']') => {
                    self.cursor.bump();
                    return Ok(node);
                }
                None => return Err(self.error("unterminated array, expected ']'")),
                Some(_) => return Err(self.error("expected ',' or ']' in array")),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Node> {
        self.cursor.bump();
        let mut node = Node::object();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b'}') => {
                    self.cursor.bump();
                    return Ok(node);
                }
                Some(b'"') => {}
                None => return Err(self.error("unterminated object, expected '}'")),
                Some(_) => return Err(self.error("expected a quoted key")),
            }

            let key = self.parse_quoted()?;
            self.cursor.skip_whitespace();
            if self.cursor.peek() != Some(b':') {
                return Err(self.error(format!("expected ':' after key {key:?}")));
            }
            self.cursor.bump();
            let value = self.parse_value()?;
            node.insert(key, value);

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b',') => self.cursor.bump(),
                Some(b'}') => {
                    self.cursor.bump();
                    return Ok(node);
                }
                None => return Err(self.error("unterminated object, expected '}'")),
                Some(_) => return Err(self.error("expected ',' or '}' in object")),
            }
        }
    }
}
