//! Decode Python-style literal text into a typed value
//!
//! Tabular dumps of API records often carry nested objects as their Python
//! repr, for example:
//! ```text
//! {'id': 'https://openalex.org/I1', 'ror': None, 'country_code': 'DE'}
//! ```
//!
//! [`decode_literal`] parses such text back into a [`Literal`]. Anything it
//! cannot parse (prose, truncated text, expressions that are not literals)
//! yields `None`; it never panics.

use std::fmt;

use num_bigint::BigInt;
use serde_json::{Map, Number, Value, json};

/// Nesting limit; deeper input is rejected rather than recursed into.
const MAX_DEPTH: usize = 128;

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range
    BigInt(BigInt),
    Float(f64),
    Complex {
        re: f64,
        im: f64,
    },
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    /// Entries in insertion order; a repeated key keeps its first position
    /// and its last value.
    Dict(Vec<(Literal, Literal)>),
}

/// Parse `text` as a single literal expression.
///
/// # Example
/// ```
/// use alexfetch_core::literal::{Literal, decode_literal};
///
/// let value = decode_literal("{'a': 1}").unwrap();
/// assert_eq!(value, Literal::Dict(vec![(Literal::Str("a".into()), Literal::Int(1))]));
/// assert!(decode_literal("not a literal").is_none());
/// ```
pub fn decode_literal(text: &str) -> Option<Literal> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    parser.at_end().then_some(value)
}

/// [`decode_literal`] followed by [`Literal::to_json`].
pub fn decode_literal_json(text: &str) -> Option<Value> {
    decode_literal(text).map(|l| l.to_json())
}

/// `Int` when the value fits, `BigInt` otherwise
fn int_literal(n: BigInt) -> Literal {
    match i64::try_from(&n) {
        Ok(i) => Literal::Int(i),
        Err(_) => Literal::BigInt(n),
    }
}

fn float_json(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

impl Literal {
    /// Whether the value may be a dict key or set member.
    pub fn is_hashable(&self) -> bool {
        match self {
            Self::List(_) | Self::Dict(_) | Self::Set(_) => false,
            Self::Tuple(items) => items.iter().all(Literal::is_hashable),
            _ => true,
        }
    }

    /// Convert to JSON.
    ///
    /// Tuples and sets become arrays and non-finite floats become null.
    /// Integers beyond `u64` become decimal strings, complex numbers
    /// `{"real", "imag"}` objects and bytes lossy UTF-8 text. Non-string
    /// dict keys are rendered with their literal repr.
    pub fn to_json(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::BigInt(n) => match u64::try_from(n) {
                Ok(u) => Value::from(u),
                Err(_) => Value::String(n.to_string()),
            },
            Self::Float(f) => float_json(*f),
            Self::Complex { re, im } => json!({"real": float_json(*re), "imag": float_json(*im)}),
            Self::Str(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => {
                Value::Array(items.iter().map(Literal::to_json).collect())
            }
            Self::Dict(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    let key = match key {
                        Self::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    map.insert(key, value.to_json());
                }
                Value::Object(map)
            }
        }
    }

    /// Real value of an `int` or `float`, the left operand `a + bj` allows.
    fn real_part(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::BigInt(n) => n.to_string().parse().ok(),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn negate(self) -> Option<Literal> {
        match self {
            Self::Int(i) => Some(match i.checked_neg() {
                Some(n) => Self::Int(n),
                None => Self::BigInt(-BigInt::from(i)),
            }),
            Self::BigInt(n) => Some(int_literal(-n)),
            Self::Float(f) => Some(Self::Float(-f)),
            Self::Complex { re, im } => Some(Self::Complex { re: -re, im: -im }),
            _ => None,
        }
    }
}

/// Float text the way Python's `repr` writes it: positional between 1e-4
/// and 1e16, exponent form (`1e+16`, `1.5e-05`) outside.
fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-4..1e16).contains(&abs) {
        let text = v.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        let text = format!("{v:e}");
        let (mantissa, exp) = text.split_once('e').unwrap_or((text.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

/// Component of a complex repr: like a float, minus a trailing `.0`
fn complex_part(v: f64) -> String {
    let text = float_repr(v);
    match text.strip_suffix(".0") {
        Some(short) => short.to_string(),
        None => text,
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_str_repr(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    write!(f, "{quote}")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

fn write_bytes_repr(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };
    write!(f, "b{}", quote as char)?;
    for &b in bytes {
        match b {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if b == quote => write!(f, "\\{}", b as char)?,
            0x20..=0x7e => write!(f, "{}", b as char)?,
            b => write!(f, "\\x{b:02x}")?,
        }
    }
    write!(f, "{}", quote as char)
}

/// Renders the literal back in its source syntax.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Float(v) => f.write_str(&float_repr(*v)),
            Self::Complex { re, im } if *re == 0.0 && re.is_sign_positive() => {
                write!(f, "{}j", complex_part(*im))
            }
            Self::Complex { re, im } => {
                // a negative imaginary part carries its own sign
                let sign = if im.is_sign_negative() && !im.is_nan() {
                    ""
                } else {
                    "+"
                };
                write!(f, "({}{sign}{}j)", complex_part(*re), complex_part(*im))
            }
            Self::Str(s) => write_str_repr(f, s),
            Self::Bytes(b) => write_bytes_repr(f, b),
            Self::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Set(items) if items.is_empty() => f.write_str("set()"),
            Self::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Self::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// String prefix flags: `r` keeps backslashes, `b` makes bytes.
#[derive(Debug, Clone, Copy)]
struct Prefix {
    raw: bool,
    bytes: bool,
}

/// Prefix and its length when `text` opens a string literal.
///
/// `u`, `r`, `b`, `br` and `rb` in any case; f-strings are not literals.
fn string_prefix(text: &str) -> Option<(Prefix, usize)> {
    let len = text.find(['\'', '"'])?;
    if len > 2 {
        return None;
    }
    let (raw, bytes) = match text[..len].to_ascii_lowercase().as_str() {
        "" | "u" => (false, false),
        "r" => (true, false),
        "b" => (false, true),
        "br" | "rb" => (true, true),
        _ => return None,
    };
    Some((Prefix { raw, bytes }, len))
}

/// Recursive-descent parser over the input text.
///
/// Every method returns `None` on malformed input; there is no backtracking.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
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

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.src.len()
    }

    fn value(&mut self) -> Option<Literal> {
        self.skip_ws();
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = match self.peek()? {
            '{' => self.brace(),
            '[' => self.list(),
            '(' => self.paren(),
            '\'' | '"' => self.strings(),
            '-' | '+' => self.signed(),
            c if c.is_ascii_digit() || c == '.' => self.number(),
            c if c.is_alphabetic() || c == '_' => {
                if string_prefix(self.rest()).is_some() {
                    self.strings()
                } else {
                    self.name()
                }
            }
            _ => None,
        };
        let value = value.and_then(|v| self.complex_tail(v));
        self.depth -= 1;
        value
    }

    /// Comma-separated values up to `close`, trailing comma allowed.
    ///
    /// Also reports whether any comma was seen, which separates `(1)` from `(1,)`.
    fn items(&mut self, close: char) -> Option<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some((items, comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                comma = true;
                continue;
            }
            return self.eat(close).then_some((items, comma));
        }
    }

    fn list(&mut self) -> Option<Literal> {
        self.bump()?;
        let (items, _) = self.items(']')?;
        Some(Literal::List(items))
    }

    fn paren(&mut self) -> Option<Literal> {
        self.bump()?;
        let (mut items, comma) = self.items(')')?;
        if items.len() == 1 && !comma {
            return items.pop();
        }
        Some(Literal::Tuple(items))
    }

    /// `{}` dict, `{k: v, ...}` dict or `{a, b}` set.
    fn brace(&mut self) -> Option<Literal> {
        self.bump()?;
        self.skip_ws();
        if self.eat('}') {
            return Some(Literal::Dict(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.eat(':') {
            self.dict_from(first)
        } else {
            self.set_from(first)
        }
    }

    fn dict_from(&mut self, first_key: Literal) -> Option<Literal> {
        let mut entries: Vec<(Literal, Literal)> = Vec::new();
        let mut key = first_key;
        loop {
            let value = self.value()?;
            if !key.is_hashable() {
                return None;
            }
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            if !self.eat(',') {
                return None;
            }
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            key = self.value()?;
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
        }
        Some(Literal::Dict(entries))
    }

    fn set_from(&mut self, first: Literal) -> Option<Literal> {
        let mut items = vec![first];
        if !self.eat('}') {
            if !self.eat(',') {
                return None;
            }
            let (rest, _) = self.items('}')?;
            items.extend(rest);
        }
        if !items.iter().all(Literal::is_hashable) {
            return None;
        }
        let mut unique: Vec<Literal> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Some(Literal::Set(unique))
    }

    /// One or more adjacent string literals, concatenated.
    ///
    /// Pieces must agree on being text or bytes.
    fn strings(&mut self) -> Option<Literal> {
        let (mut out, bytes) = self.string_piece()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            match string_prefix(self.rest()) {
                Some((prefix, _)) if prefix.bytes == bytes => out.push_str(&self.string_piece()?.0),
                Some(_) => return None,
                None => {
                    self.pos = save;
                    break;
                }
            }
        }
        if bytes {
            let raw = out
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect::<Option<Vec<u8>>>()?;
            Some(Literal::Bytes(raw))
        } else {
            Some(Literal::Str(out))
        }
    }

    /// One prefixed, quoted piece; bytes come back as chars below U+0100.
    fn string_piece(&mut self) -> Option<(String, bool)> {
        let (prefix, len) = string_prefix(self.rest())?;
        self.pos += len;
        let text = self.quoted(prefix)?;
        Some((text, prefix.bytes))
    }

    fn quoted(&mut self, prefix: Prefix) -> Option<String> {
        let quote = self.bump()?;
        let closing_pair: String = [quote, quote].iter().collect();
        let triple = self.rest().starts_with(&closing_pair);
        if triple {
            self.pos += 2;
        }
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.rest().starts_with(&closing_pair) {
                        self.pos += 2;
                        break;
                    }
                    out.push(c);
                }
                '\\' if prefix.raw => {
                    // kept verbatim, but still protects the next char
                    out.push('\\');
                    out.push(self.bump()?);
                }
                '\\' => self.escape(&mut out, prefix.bytes)?,
                '\n' if !triple => return None,
                c if prefix.bytes && !c.is_ascii() => return None,
                c => out.push(c),
            }
        }
        Some(out)
    }

    fn escape(&mut self, out: &mut String, bytes: bool) -> Option<()> {
        let c = self.bump()?;
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(c),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8)?;
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                if bytes && code > 0xff {
                    return None;
                }
                out.push(char::from_u32(code)?);
            }
            'x' => out.push(self.hex_escape(2)?),
            'u' if !bytes => out.push(self.hex_escape(4)?),
            'U' if !bytes => out.push(self.hex_escape(8)?),
            // named escapes need the Unicode name table
            'N' if !bytes => return None,
            other => {
                // unknown escapes are kept verbatim
                out.push('\\');
                out.push(other);
            }
        }
        Some(())
    }

    fn hex_escape(&mut self, digits: usize) -> Option<char> {
        let hex = self.rest().get(..digits)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(hex, 16).ok()?;
        self.pos += digits;
        char::from_u32(code)
    }

    /// A single unary sign applied to a number, parenthesized or not.
    fn signed(&mut self) -> Option<Literal> {
        let negative = self.bump()? == '-';
        self.skip_ws();
        let value = self.bare_number()?;
        if negative {
            value.negate()
        } else {
            Some(value)
        }
    }

    /// An unsigned numeric literal, possibly wrapped in parentheses.
    fn bare_number(&mut self) -> Option<Literal> {
        match self.peek()? {
            '(' => {
                if self.depth >= MAX_DEPTH {
                    return None;
                }
                self.depth += 1;
                self.bump();
                self.skip_ws();
                let inner = self.bare_number();
                self.skip_ws();
                self.depth -= 1;
                let inner = inner?;
                self.eat(')').then_some(inner)
            }
            c if c.is_ascii_digit() || c == '.' => self.number(),
            _ => None,
        }
    }

    /// `real + imag j` or `real - imag j` after a real number; the only
    /// binary expression a literal may contain.
    fn complex_tail(&mut self, left: Literal) -> Option<Literal> {
        let Some(re) = left.real_part() else {
            return Some(left);
        };
        let save = self.pos;
        self.skip_ws();
        let negative = match self.peek() {
            Some('+') => false,
            Some('-') => true,
            _ => {
                self.pos = save;
                return Some(left);
            }
        };
        self.pos += 1;
        self.skip_ws();
        match self.bare_number()? {
            Literal::Complex { im, .. } => Some(Literal::Complex {
                re,
                im: if negative { -im } else { im },
            }),
            _ => None,
        }
    }

    fn number(&mut self) -> Option<Literal> {
        let radix = match self.rest().get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.pos += 2;
            let start = self.pos;
            while let Some(c) = self.peek() {
                if !(c.is_ascii_alphanumeric() || c == '_') {
                    break;
                }
                self.pos += 1;
            }
            let digits: String = self.src[start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            return parse_int(&digits, radix);
        }

        let start = self.pos;
        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let accepted = c.is_ascii_digit()
                || matches!(c, '_' | '.' | 'e' | 'E')
                || (matches!(c, '+' | '-') && matches!(prev, 'e' | 'E'));
            if !accepted {
                break;
            }
            prev = c;
            self.pos += 1;
        }
        let clean: String = self.src[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        let imaginary = matches!(self.peek(), Some('j' | 'J'));
        if imaginary {
            self.pos += 1;
        }
        // identifiers glued to digits
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return None;
        }
        if imaginary {
            return clean
                .parse::<f64>()
                .ok()
                .map(|im| Literal::Complex { re: 0.0, im });
        }
        if clean.contains(['.', 'e', 'E']) {
            return clean.parse::<f64>().ok().map(Literal::Float);
        }
        // leading zeros are only valid for zero itself
        if clean.len() > 1 && clean.starts_with('0') && clean.chars().any(|c| c != '0') {
            return None;
        }
        parse_int(&clean, 10)
    }

    fn name(&mut self) -> Option<Literal> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            self.pos += c.len_utf8();
        }
        match &self.src[start..self.pos] {
            "True" => Some(Literal::Bool(true)),
            "False" => Some(Literal::Bool(false)),
            "None" => Some(Literal::None),
            // the empty set has no literal of its own
            "set" => {
                self.skip_ws();
                if !self.eat('(') {
                    return None;
                }
                self.skip_ws();
                self.eat(')').then(|| Literal::Set(Vec::new()))
            }
            _ => None,
        }
    }
}

/// Unsigned digits in `radix`, any size
fn parse_int(digits: &str, radix: u32) -> Option<Literal> {
    if digits.is_empty() {
        return None;
    }
    if let Ok(i) = i64::from_str_radix(digits, radix) {
        return Some(Literal::Int(i));
    }
    BigInt::parse_bytes(digits.as_bytes(), radix).map(int_literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(v: &str) -> Literal {
        Literal::Str(v.to_string())
    }

    fn big(digits: &str) -> Literal {
        Literal::BigInt(digits.parse().unwrap())
    }

    fn complex(re: f64, im: f64) -> Literal {
        Literal::Complex { re, im }
    }

    #[test]
    fn dict_of_scalars() {
        let value = decode_literal("{'id': 'I1', 'works_count': 12, 'ror': None}").unwrap();
        assert_eq!(
            value,
            Literal::Dict(vec![
                (s("id"), s("I1")),
                (s("works_count"), Literal::Int(12)),
                (s("ror"), Literal::None),
            ])
        );
    }

    #[test]
    fn nested_structure_to_json() {
        let value = decode_literal_json(
            r#"{"display_name": "Uni", "geo": {"lat": 52.5, "lng": -13.4}, "ids": ['a', "b"], "is_oa": True}"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "display_name": "Uni",
                "geo": {"lat": 52.5, "lng": -13.4},
                "ids": ["a", "b"],
                "is_oa": true
            })
        );
    }

    #[test]
    fn prose_is_none() {
        assert!(decode_literal("This is a sentence about universities.").is_none());
        assert!(decode_literal("hello").is_none());
    }

    #[test]
    fn empty_and_whitespace_are_none() {
        assert!(decode_literal("").is_none());
        assert!(decode_literal("   ").is_none());
    }

    #[test]
    fn malformed_is_none() {
        assert!(decode_literal("{'a': 1").is_none());
        assert!(decode_literal("[1, 2").is_none());
        assert!(decode_literal("{'a' 1}").is_none());
        assert!(decode_literal("[1,,2]").is_none());
        assert!(decode_literal("'unterminated").is_none());
        assert!(decode_literal("1 2").is_none());
        assert!(decode_literal("--1").is_none());
        assert!(decode_literal("1k").is_none());
        assert!(decode_literal("007").is_none());
    }

    #[test]
    fn unhashable_keys_rejected() {
        assert!(decode_literal("{[1]: 2}").is_none());
        assert!(decode_literal("{{'a': 1}}").is_none());
    }

    #[test]
    fn surrounding_whitespace_allowed() {
        assert_eq!(decode_literal("  \t42\n"), Some(Literal::Int(42)));
    }

    #[test]
    fn numbers() {
        assert_eq!(decode_literal("-7"), Some(Literal::Int(-7)));
        assert_eq!(decode_literal("+7"), Some(Literal::Int(7)));
        assert_eq!(decode_literal("1_000"), Some(Literal::Int(1000)));
        assert_eq!(decode_literal("0x1F"), Some(Literal::Int(31)));
        assert_eq!(decode_literal("0b101"), Some(Literal::Int(5)));
        assert_eq!(decode_literal("0"), Some(Literal::Int(0)));
        assert_eq!(decode_literal("2.5"), Some(Literal::Float(2.5)));
        assert_eq!(decode_literal(".5"), Some(Literal::Float(0.5)));
        assert_eq!(decode_literal("1e3"), Some(Literal::Float(1000.0)));
        assert_eq!(decode_literal("-1.5e-2"), Some(Literal::Float(-0.015)));
        assert_eq!(
            decode_literal("-9223372036854775808"),
            Some(Literal::Int(i64::MIN))
        );
    }

    #[test]
    fn tuples_and_parens() {
        assert_eq!(decode_literal("()"), Some(Literal::Tuple(vec![])));
        assert_eq!(decode_literal("(1)"), Some(Literal::Int(1)));
        assert_eq!(
            decode_literal("(1,)"),
            Some(Literal::Tuple(vec![Literal::Int(1)]))
        );
        assert_eq!(
            decode_literal("(1, 'a')"),
            Some(Literal::Tuple(vec![Literal::Int(1), s("a")]))
        );
    }

    #[test]
    fn sets_deduplicate() {
        assert_eq!(
            decode_literal("{1, 2, 1}"),
            Some(Literal::Set(vec![Literal::Int(1), Literal::Int(2)]))
        );
        assert!(decode_literal("{[1], 2}").is_none());
    }

    #[test]
    fn duplicate_dict_key_keeps_last_value() {
        assert_eq!(
            decode_literal("{'a': 1, 'a': 2}"),
            Some(Literal::Dict(vec![(s("a"), Literal::Int(2))]))
        );
    }

    #[test]
    fn trailing_commas() {
        assert_eq!(
            decode_literal("[1, 2,]"),
            Some(Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
        );
        assert_eq!(
            decode_literal("{'a': 1,}"),
            Some(Literal::Dict(vec![(s("a"), Literal::Int(1))]))
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(decode_literal(r"'a\nb'"), Some(s("a\nb")));
        assert_eq!(decode_literal(r"'it\'s'"), Some(s("it's")));
        assert_eq!(decode_literal(r"'\x41é\101'"), Some(s("AéA")));
        assert_eq!(decode_literal(r"'\d'"), Some(s("\\d")));
        assert_eq!(decode_literal("'ab' \"cd\""), Some(s("abcd")));
        assert_eq!(decode_literal("'''a'b'''"), Some(s("a'b")));
        assert_eq!(decode_literal("''"), Some(s("")));
    }

    #[test]
    fn unicode_content() {
        assert_eq!(decode_literal("'Universität Wien'"), Some(s("Universität Wien")));
    }

    #[test]
    fn depth_limit_is_none_not_overflow() {
        let deep = "[".repeat(10_000) + &"]".repeat(10_000);
        assert!(decode_literal(&deep).is_none());
        let ok = "[".repeat(20) + &"]".repeat(20);
        assert!(decode_literal(&ok).is_some());
    }

    #[test]
    fn non_string_keys_in_json() {
        let value = decode_literal_json("{1: 'a', (1, 2): 'b', None: 'c'}").unwrap();
        assert_eq!(value, json!({"1": "a", "(1, 2)": "b", "None": "c"}));
    }

    #[test]
    fn display_roundtrips_through_parser() {
        let text = "{'a': [1, 2.0, None], 'b': (True,), 'c': \"it's\"}";
        let value = decode_literal(text).unwrap();
        assert_eq!(decode_literal(&value.to_string()), Some(value));
    }

    #[test]
    fn integers_beyond_i64() {
        let value = decode_literal("{'id': 12345678901234567890}").unwrap();
        assert_eq!(value, Literal::Dict(vec![(s("id"), big("12345678901234567890"))]));
        assert_eq!(value.to_json(), json!({"id": 12345678901234567890u64}));

        let huge = decode_literal("123456789012345678901234567890").unwrap();
        assert_eq!(huge, big("123456789012345678901234567890"));
        assert_eq!(huge.to_json(), json!("123456789012345678901234567890"));

        assert_eq!(decode_literal("-99999999999999999999"), Some(big("-99999999999999999999")));
        assert_eq!(decode_literal("0xFFFFFFFFFFFFFFFFFF"), Some(big("4722366482869645213695")));
        assert_eq!(decode_literal("9223372036854775807"), Some(Literal::Int(i64::MAX)));
    }

    #[test]
    fn empty_set_call() {
        assert_eq!(decode_literal("set()"), Some(Literal::Set(vec![])));
        assert_eq!(decode_literal(" set ( ) "), Some(Literal::Set(vec![])));
        assert_eq!(Literal::Set(vec![]).to_string(), "set()");
        assert!(decode_literal("set([1])").is_none());
        assert!(decode_literal("set").is_none());
        assert!(decode_literal("{set(): 1}").is_none());
    }

    #[test]
    fn string_prefixes() {
        assert_eq!(decode_literal("u'abc'"), Some(s("abc")));
        assert_eq!(decode_literal("U\"abc\""), Some(s("abc")));
        assert_eq!(decode_literal(r"r'C:\dir'"), Some(s(r"C:\dir")));
        assert_eq!(decode_literal(r"R'a\'b'"), Some(s(r"a\'b")));
        assert_eq!(decode_literal("'ab' u'cd'"), Some(s("abcd")));
        assert!(decode_literal("f'x'").is_none());
        assert!(decode_literal("ur'x'").is_none());
    }

    #[test]
    fn bytes_literals() {
        assert_eq!(decode_literal("b'abc'"), Some(Literal::Bytes(b"abc".to_vec())));
        assert_eq!(
            decode_literal(r"b'\x00\xff\n'"),
            Some(Literal::Bytes(vec![0x00, 0xff, b'\n']))
        );
        assert_eq!(decode_literal(r"rb'\x00'"), Some(Literal::Bytes(br"\x00".to_vec())));
        assert_eq!(decode_literal(r"b'\u0041'"), Some(Literal::Bytes(br"\u0041".to_vec())));
        assert_eq!(decode_literal("b'ab' B'cd'"), Some(Literal::Bytes(b"abcd".to_vec())));
        // text and bytes do not concatenate
        assert!(decode_literal("'a' b'c'").is_none());
        assert!(decode_literal("b'é'").is_none());
        assert_eq!(decode_literal_json("b'hi'"), Some(json!("hi")));
    }

    #[test]
    fn complex_numbers() {
        assert_eq!(decode_literal("1j"), Some(complex(0.0, 1.0)));
        assert_eq!(decode_literal("2.5J"), Some(complex(0.0, 2.5)));
        assert_eq!(decode_literal("1+2j"), Some(complex(1.0, 2.0)));
        assert_eq!(decode_literal("-1.5 - 2j"), Some(complex(-1.5, -2.0)));
        assert_eq!(decode_literal("(1)+(2j)"), Some(complex(1.0, 2.0)));
        assert_eq!(
            decode_literal("[1+2j, 3]"),
            Some(Literal::List(vec![complex(1.0, 2.0), Literal::Int(3)]))
        );
        assert_eq!(decode_literal_json("1+2j"), Some(json!({"real": 1.0, "imag": 2.0})));
        // only `real +/- imaginary` is a literal
        assert!(decode_literal("1+2").is_none());
        assert!(decode_literal("1j+2").is_none());
        assert!(decode_literal("1+2j+3j").is_none());
        assert!(decode_literal("True+1j").is_none());
    }

    #[test]
    fn complex_display() {
        assert_eq!(complex(0.0, 1.0).to_string(), "1j");
        assert_eq!(complex(1.0, 2.0).to_string(), "(1+2j)");
        assert_eq!(complex(1.5, -2.0).to_string(), "(1.5-2j)");
        let value = decode_literal("(3-4j)").unwrap();
        assert_eq!(decode_literal(&value.to_string()), Some(value));
    }

    #[test]
    fn sign_on_parenthesized_number() {
        assert_eq!(decode_literal("-(1)"), Some(Literal::Int(-1)));
        assert_eq!(decode_literal("+(2.5)"), Some(Literal::Float(2.5)));
        assert_eq!(decode_literal("-((3))"), Some(Literal::Int(-3)));
        assert_eq!(decode_literal("-(1j)"), Some(complex(-0.0, -1.0)));
        assert!(decode_literal("-(-1)").is_none());
        assert!(decode_literal("-(1,)").is_none());
        assert!(decode_literal("-('a')").is_none());
    }

    #[test]
    fn float_repr_stays_a_float() {
        assert_eq!(Literal::Float(1e16).to_string(), "1e+16");
        assert_eq!(Literal::Float(-2.5e300).to_string(), "-2.5e+300");
        assert_eq!(Literal::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Literal::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Literal::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Literal::Float(-0.0).to_string(), "-0.0");
        for v in [1e16, 1.5e-5, 1e22, 123.25] {
            let text = Literal::Float(v).to_string();
            assert_eq!(decode_literal(&text), Some(Literal::Float(v)), "{text}");
        }
    }

    #[test]
    fn bytes_and_big_ints_roundtrip_through_display() {
        for text in ["b'a\\'b'", "{b'k': 12345678901234567890}", "[-99999999999999999999, set()]"] {
            let value = decode_literal(text).unwrap();
            assert_eq!(decode_literal(&value.to_string()), Some(value), "{text}");
        }
    }
}
