//! EDN values, printer and reader.
//!
//! Only the subset the control bus exchanges is supported: maps, vectors,
//! lists, strings, keywords, symbols, numbers, booleans and `nil`. The reader
//! skips commas, `;` comments and `#_` discarded forms, and rejects anything
//! nested deeper than [`MAX_DEPTH`].

use std::fmt::{self, Write as _};
use thiserror::Error;

/// Deepest nesting the reader accepts
pub const MAX_DEPTH: usize = 128;

/// A keyword such as `:token` or `:application/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    namespace: Option<String>,
    name: String,
}

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    fn from_token(token: &str) -> Self {
        match token.split_once('/') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Self::namespaced(namespace, name)
            }
            _ => Self::new(token),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, ":{}/{}", namespace, self.name),
            None => write!(f, ":{}", self.name),
        }
    }
}

/// An EDN value
#[derive(Debug, Clone, PartialEq)]
pub enum Edn {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Keyword(Keyword),
    Symbol(String),
    List(Vec<Edn>),
    Vector(Vec<Edn>),
    /// Entries in document order
    Map(Vec<(Edn, Edn)>),
}

impl Edn {
    /// Look up a keyword key in a map
    pub fn get(&self, key: &Keyword) -> Option<&Edn> {
        match self {
            Edn::Map(entries) => entries.iter().find_map(|(k, v)| match k {
                Edn::Keyword(k) if k == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Edn::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a vector or list
    pub fn as_seq(&self) -> Option<&[Edn]> {
        match self {
            Edn::Vector(items) | Edn::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Edn::Nil => "nil",
            Edn::Bool(_) => "boolean",
            Edn::Integer(_) => "integer",
            Edn::Float(_) => "float",
            Edn::String(_) => "string",
            Edn::Keyword(_) => "keyword",
            Edn::Symbol(_) => "symbol",
            Edn::List(_) => "list",
            Edn::Vector(_) => "vector",
            Edn::Map(_) => "map",
        }
    }
}

impl From<&str> for Edn {
    fn from(s: &str) -> Self {
        Edn::String(s.to_string())
    }
}

impl From<String> for Edn {
    fn from(s: String) -> Self {
        Edn::String(s)
    }
}

impl From<Keyword> for Edn {
    fn from(k: Keyword) -> Self {
        Edn::Keyword(k)
    }
}

impl<T: Into<Edn>> From<Option<T>> for Edn {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Edn::Nil)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: char, items: &[Edn], close: char) -> fmt::Result {
    f.write_char(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(close)
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Edn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edn::Nil => f.write_str("nil"),
            Edn::Bool(b) => write!(f, "{b}"),
            Edn::Integer(i) => write!(f, "{i}"),
            Edn::Float(x) if x.is_nan() => f.write_str("##NaN"),
            Edn::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "##Inf" } else { "##-Inf" })
            }
            Edn::Float(x) => write!(f, "{x:?}"),
            Edn::String(s) => write_string(f, s),
            Edn::Keyword(k) => write!(f, "{k}"),
            Edn::Symbol(s) => f.write_str(s),
            Edn::List(items) => write_seq(f, '(', items, ')'),
            Edn::Vector(items) => write_seq(f, '[', items, ']'),
            Edn::Map(entries) => {
                f.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{key} {value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Syntax errors raised by the reader
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdnError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("invalid number '{token}'")]
    InvalidNumber { token: String },

    #[error("map literal at offset {offset} has an odd number of forms")]
    OddMapEntries { offset: usize },

    #[error("forms nested deeper than {MAX_DEPTH} at offset {offset}")]
    TooDeep { offset: usize },

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

/// Read exactly one value from `input`
pub fn parse(input: &str) -> Result<Edn, EdnError> {
    let mut reader = Reader {
        src: input,
        pos: 0,
        depth: 0,
    };
    let value = reader.read()?;
    reader.skip_ignorable()?;
    match reader.peek() {
        None => Ok(value),
        Some(_) => Err(EdnError::TrailingInput { offset: reader.pos }),
    }
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
}

impl<'a> Reader<'a> {
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

    /// Skip whitespace, commas, line comments and `#_` discarded forms
    fn skip_ignorable(&mut self) -> Result<(), EdnError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.bump();
                }
                Some(';') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('#') if self.peek_second() == Some('_') => {
                    self.pos += 2;
                    self.read()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Read one form; every nested read counts against [`MAX_DEPTH`]
    fn read(&mut self) -> Result<Edn, EdnError> {
        if self.depth >= MAX_DEPTH {
            return Err(EdnError::TooDeep { offset: self.pos });
        }
        self.depth += 1;
        let value = self.read_form();
        self.depth -= 1;
        value
    }

    fn read_form(&mut self) -> Result<Edn, EdnError> {
        self.skip_ignorable()?;
        let offset = self.pos;
        let c = self.peek().ok_or(EdnError::UnexpectedEof)?;
        match c {
            '(' => {
                self.bump();
                Ok(Edn::List(self.read_until(')')?))
            }
            '[' => {
                self.bump();
                Ok(Edn::Vector(self.read_until(']')?))
            }
            '{' => {
                self.bump();
                let forms = self.read_until('}')?;
                if forms.len() % 2 != 0 {
                    return Err(EdnError::OddMapEntries { offset });
                }
                let mut forms = forms.into_iter();
                let mut entries = Vec::new();
                while let (Some(k), Some(v)) = (forms.next(), forms.next()) {
                    entries.push((k, v));
                }
                Ok(Edn::Map(entries))
            }
            '"' => {
                self.bump();
                self.read_string()
            }
            ':' => {
                self.bump();
                let token = self.token();
                if token.is_empty() {
                    return Err(EdnError::UnexpectedChar { ch: ':', offset });
                }
                Ok(Edn::Keyword(Keyword::from_token(token)))
            }
            '#' if self.peek_second() == Some('#') => {
                self.pos += 2;
                match self.token() {
                    "Inf" => Ok(Edn::Float(f64::INFINITY)),
                    "-Inf" => Ok(Edn::Float(f64::NEG_INFINITY)),
                    "NaN" => Ok(Edn::Float(f64::NAN)),
                    _ => Err(EdnError::UnexpectedChar { ch: '#', offset }),
                }
            }
            ')' | ']' | '}' | '#' | '\\' => Err(EdnError::UnexpectedChar { ch: c, offset }),
            c if c.is_ascii_digit() => self.read_number(),
            '+' | '-' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                self.read_number()
            }
            _ => {
                let token = self.token();
                if token.is_empty() {
                    return Err(EdnError::UnexpectedChar { ch: c, offset });
                }
                Ok(match token {
                    "nil" => Edn::Nil,
                    "true" => Edn::Bool(true),
                    "false" => Edn::Bool(false),
                    symbol => Edn::Symbol(symbol.to_string()),
                })
            }
        }
    }

    fn read_until(&mut self, close: char) -> Result<Vec<Edn>, EdnError> {
        let mut items = Vec::new();
        loop {
            self.skip_ignorable()?;
            match self.peek() {
                None => return Err(EdnError::UnexpectedEof),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => items.push(self.read()?),
            }
        }
    }

    fn read_string(&mut self) -> Result<Edn, EdnError> {
        let mut out = String::new();
        loop {
            let offset = self.pos;
            match self.bump().ok_or(EdnError::UnexpectedEof)? {
                '"' => return Ok(Edn::String(out)),
                '\\' => match self.bump().ok_or(EdnError::UnexpectedEof)? {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => {
                        let c = self
                            .src
                            .get(self.pos..self.pos + 4)
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .and_then(char::from_u32)
                            .ok_or(EdnError::InvalidEscape { offset })?;
                        self.pos += 4;
                        out.push(c);
                    }
                    _ => return Err(EdnError::InvalidEscape { offset }),
                },
                c => out.push(c),
            }
        }
    }

    fn read_number(&mut self) -> Result<Edn, EdnError> {
        let token = self.token();
        let invalid = || EdnError::InvalidNumber {
            token: token.to_string(),
        };

        if let Some(digits) = token.strip_suffix('M') {
            return digits.parse().map(Edn::Float).map_err(|_| invalid());
        }
        if token.contains(['.', 'e', 'E']) {
            return token.parse().map(Edn::Float).map_err(|_| invalid());
        }
        let digits = token.strip_suffix('N').unwrap_or(token);
        digits.parse().map(Edn::Integer).map_err(|_| invalid())
    }
}
