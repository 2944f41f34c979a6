mod escape;
mod location;
mod symbols;

pub use self::location::*;
pub use self::symbols::{is_symbol, is_unicode_symbol, is_whitespace};

use thiserror::Error;

use crate::{
    config::{Configuration, ConfigurationCategory, Flag, WarningLevel},
    value::Value,
};

/// Problems that stop a program from being read
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadError {
    #[error("MalformedProgram: unterminated list starting at {start}")]
    UnterminatedList { start: Location },

    #[error("MalformedProgram: unterminated string starting at {start}")]
    UnterminatedString { start: Location },

    #[error("MalformedProgram: unexpected character {found:?} at {at}")]
    UnexpectedChar { found: char, at: Location },

    #[error("MalformedProgram: quote at {at} is not followed by an expression")]
    DanglingQuote { at: Location },

    #[error("MalformedProgram: number {literal} at {at} cannot be represented")]
    InvalidNumber { literal: String, at: Location },

    #[error("MalformedProgram: {warning} at {at}")]
    Denied { warning: ReadWarning, at: Location },

    #[error("MalformedProgram: expression at {at} is nested more than {} levels deep", MAX_DEPTH)]
    TooDeep { at: Location },
}

impl ReadError {
    /// Where in the source the error was found
    pub fn location(&self) -> Location {
        match self {
            ReadError::UnterminatedList { start } | ReadError::UnterminatedString { start } => {
                *start
            }
            ReadError::UnexpectedChar { at, .. }
            | ReadError::DanglingQuote { at }
            | ReadError::InvalidNumber { at, .. }
            | ReadError::Denied { at, .. }
            | ReadError::TooDeep { at } => *at,
        }
    }
}

/// Findings that do not stop a program from being read, their severity is
/// controlled by a warning flag
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadWarning {
    #[error("Unrecognised escape sequence `\\{sequence}` kept as written")]
    UnknownEscape { sequence: char },

    #[error("Directive marker `@` has no effect")]
    Directive,
}

pub static F_UNICODE_SYMBOLS: Flag = Flag::new(ConfigurationCategory::Reader, "unicode-symbols")
    .bool(true)
    .help("Allow non-ascii letters and digits inside atoms");

pub static F_EXTENDED_WHITESPACE: Flag =
    Flag::new(ConfigurationCategory::Reader, "extended-whitespace")
        .bool(false)
        .help("Treat all unicode whitespace as whitespace, not only the ascii set");

pub static W_UNKNOWN_ESCAPE: Flag = Flag::new(ConfigurationCategory::Warning, "unknown-escape")
    .warning(WarningLevel::Allow)
    .help("Escape sequences in strings other than \\\\ \\\" \\n and \\t");

pub static W_DIRECTIVE: Flag = Flag::new(ConfigurationCategory::Warning, "directive")
    .warning(WarningLevel::Allow)
    .help("Uses of the `@` directive marker, which reads as nil");

static READER_WARNINGS: [&Flag; 2] = [&W_UNKNOWN_ESCAPE, &W_DIRECTIVE];

pub static W_ALL: Flag = Flag::new(ConfigurationCategory::Warning, "all")
    .alias(&READER_WARNINGS)
    .help("Every reader warning");

/// How many lists and quotes can enclose an expression
pub const MAX_DEPTH: usize = 512;

/// State used when converting source text into values
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The source code being read
    source: &'a str,

    /// Byte offset of the next character to be read
    position: usize,

    /// Number of lists and quotes enclosing the expression being read
    depth: usize,

    /// Decides which characters can be part of an atom
    is_symbol: fn(char) -> bool,

    unicode_symbols: bool,
    extended_whitespace: bool,

    unknown_escape: WarningLevel,
    directive: WarningLevel,

    /// Diagnostics raised at the warn level
    warnings: Vec<WithLocation<ReadWarning>>,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of the source
    pub fn new(source: &'a str, config: &Configuration) -> Self {
        Self::at(source, 0, config)
    }

    /// Create a reader positioned at a byte offset into the source.  An
    /// offset inside a character is moved back to the start of it.
    pub fn at(source: &'a str, cursor: usize, config: &Configuration) -> Self {
        let mut position = cursor.min(source.len());
        while !source.is_char_boundary(position) {
            position -= 1;
        }

        Self {
            source,
            position,
            depth: 0,
            is_symbol: symbols::is_symbol,
            unicode_symbols: config.bool(F_UNICODE_SYMBOLS).unwrap_or(true),
            extended_whitespace: config.bool(F_EXTENDED_WHITESPACE).unwrap_or(false),
            unknown_escape: config
                .warning_level(W_UNKNOWN_ESCAPE)
                .unwrap_or(WarningLevel::Allow),
            directive: config
                .warning_level(W_DIRECTIVE)
                .unwrap_or(WarningLevel::Allow),
            warnings: vec![],
        }
    }

    /// Replace the predicate deciding which characters make up atoms
    pub fn with_symbols(self, is_symbol: fn(char) -> bool) -> Self {
        Self { is_symbol, ..self }
    }

    /// Byte offset of the next character to be read
    pub fn cursor(&self) -> usize {
        self.position
    }

    /// Line and column of the next character to be read
    pub fn location(&self) -> Location {
        self.location_of(self.position)
    }

    pub fn is_at_end(&self) -> bool {
        self.peek(0).is_none()
    }

    pub fn warnings(&self) -> &[WithLocation<ReadWarning>] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<WithLocation<ReadWarning>> {
        std::mem::take(&mut self.warnings)
    }

    /// Read the next expression.  If only whitespace and comments are left
    /// the result is nil.
    pub fn read_one(&mut self) -> Result<Value, ReadError> {
        self.skip_trivia();
        if self.is_at_end() {
            return Ok(Value::Nil);
        }

        self.read_expression()
    }

    /// Read every expression until the end of the source
    pub fn read_all(&mut self) -> Result<Vec<Value>, ReadError> {
        let mut values = vec![];

        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }

            let start = self.cursor();
            values.push(self.read_expression()?);

            // stop if no input was consumed
            if self.cursor() == start {
                break;
            }
        }

        tracing::debug!(count = values.len(), "read program");
        Ok(values)
    }

    /// Read an expression starting at the current character, whitespace and
    /// comments must already have been skipped
    fn read_expression(&mut self) -> Result<Value, ReadError> {
        let at = self.position;
        let next = match self.peek(0) {
            Some(next) => next,
            None => return Ok(Value::Nil),
        };

        tracing::trace!(position = at, ?next, "reading expression");

        match next {
            '\'' => self.nested(at, Self::read_quote),
            '(' => self.nested(at, Self::read_list),
            c if c.is_ascii_digit() => self.read_number(),
            '-' if self.peek(1).map_or(false, |c| c.is_ascii_digit()) => self.read_number(),
            '"' => self.read_string(),
            '@' => self.read_directive(),
            c if self.is_symbol_char(c) => Ok(self.read_atom()),
            found => Err(ReadError::UnexpectedChar {
                found,
                at: self.location_of(at),
            }),
        }
    }

    /// Run a reader for an expression that contains other expressions,
    /// failing once they are nested too deeply
    fn nested(
        &mut self,
        at: usize,
        read: fn(&mut Self) -> Result<Value, ReadError>,
    ) -> Result<Value, ReadError> {
        if self.depth >= MAX_DEPTH {
            return Err(ReadError::TooDeep {
                at: self.location_of(at),
            });
        }

        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// 'datum
    fn read_quote(&mut self) -> Result<Value, ReadError> {
        let at = self.position;
        self.advance();
        self.skip_trivia();

        if self.is_at_end() {
            return Err(ReadError::DanglingQuote {
                at: self.location_of(at),
            });
        }

        Ok(Value::quote(self.read_expression()?))
    }

    /// (datum*)
    fn read_list(&mut self) -> Result<Value, ReadError> {
        let start = self.position;
        self.advance();

        let mut values = vec![];
        loop {
            self.skip_trivia();
            match self.peek(0) {
                None => {
                    return Err(ReadError::UnterminatedList {
                        start: self.location_of(start),
                    })
                }
                Some(')') => {
                    self.advance();
                    break;
                }
                Some(_) => values.push(self.read_expression()?),
            }
        }

        self.skip_whitespace();
        Ok(Value::List(values))
    }

    /// -?digit+(.digit*)?
    fn read_number(&mut self) -> Result<Value, ReadError> {
        let at = self.position;
        let mut literal = String::new();

        if self.peek(0) == Some('-') {
            literal.extend(self.advance());
        }
        self.take_digits(&mut literal);

        let is_float = self.peek(0) == Some('.');
        if is_float {
            literal.extend(self.advance());
            self.take_digits(&mut literal);
        }

        self.skip_whitespace();

        let value = if is_float {
            literal.parse().map(Value::Float64).ok()
        } else {
            literal.parse().map(Value::Int64).ok()
        };

        value.ok_or_else(|| ReadError::InvalidNumber {
            literal,
            at: self.location_of(at),
        })
    }

    fn take_digits(&mut self, literal: &mut String) {
        while self.peek(0).map_or(false, |c| c.is_ascii_digit()) {
            literal.extend(self.advance());
        }
    }

    /// "text", a backslash stops the next character ending the string
    fn read_string(&mut self) -> Result<Value, ReadError> {
        let start = self.position;
        self.advance();

        let mut raw = vec![];
        loop {
            match self.advance() {
                None => break,
                Some('"') => {
                    let (text, unknown) = escape::decode_escapes(&raw);
                    for sequence in unknown {
                        self.diagnose(
                            self.unknown_escape,
                            ReadWarning::UnknownEscape { sequence },
                            start,
                        )?;
                    }

                    self.skip_whitespace();
                    return Ok(Value::String(text));
                }
                Some('\\') => {
                    raw.push('\\');
                    match self.advance() {
                        Some(escaped) => raw.push(escaped),
                        None => break,
                    }
                }
                Some(ch) => raw.push(ch),
            }
        }

        Err(ReadError::UnterminatedString {
            start: self.location_of(start),
        })
    }

    /// The directive marker reads as nil and leaves the next expression in
    /// the source
    fn read_directive(&mut self) -> Result<Value, ReadError> {
        let at = self.position;
        self.advance();
        self.diagnose(self.directive, ReadWarning::Directive, at)?;

        self.skip_whitespace();
        Ok(Value::Nil)
    }

    fn read_atom(&mut self) -> Value {
        let mut name = String::new();
        while let Some(ch) = self.peek(0) {
            if !self.is_symbol_char(ch) {
                break;
            }
            name.push(ch);
            self.advance();
        }

        self.skip_whitespace();
        Value::Atom(name)
    }

    /// Record or raise a diagnostic depending on its warning level, the
    /// diagnostic covers the source from start up to the current position
    fn diagnose(
        &mut self,
        level: WarningLevel,
        warning: ReadWarning,
        start: usize,
    ) -> Result<(), ReadError> {
        match level {
            WarningLevel::Allow => Ok(()),
            WarningLevel::Warn => {
                let location = self.location_of(start);
                tracing::debug!(%location, %warning, "reader warning");
                self.warnings.push(WithLocation {
                    location,
                    length: self.source[start..self.position].chars().count(),
                    content: warning,
                });
                Ok(())
            }
            WarningLevel::Deny => Err(ReadError::Denied {
                warning,
                at: self.location_of(start),
            }),
        }
    }

    /// Line and column are only worked out when a location is reported
    fn location_of(&self, position: usize) -> Location {
        Location::of(self.source, position)
    }

    fn is_symbol_char(&self, c: char) -> bool {
        (self.is_symbol)(c) || (self.unicode_symbols && symbols::is_unicode_symbol(c))
    }

    fn is_space(&self, c: char) -> bool {
        if self.extended_whitespace {
            c.is_whitespace()
        } else {
            symbols::is_whitespace(c)
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).map_or(false, |c| self.is_space(c)) {
            self.advance();
        }
    }

    /// Skip whitespace and line comments that are not part of an expression
    fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek(0) != Some(';') {
                return;
            }
            while self.peek(0).map_or(false, |c| c != '\n') {
                self.advance();
            }
        }
    }

    /// Consume and return one character from the input
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Look at a character without consuming it, count == 0 is the next
    /// character
    fn peek(&self, count: usize) -> Option<char> {
        self.source[self.position..].chars().nth(count)
    }
}

/// Read the expression at a byte offset with the default configuration,
/// moving the cursor past it.  The cursor is left alone if reading fails.
pub fn read_one(source: &str, cursor: &mut usize) -> Result<Value, ReadError> {
    let mut reader = Reader::at(source, *cursor, &Configuration::new());
    let value = reader.read_one()?;
    *cursor = reader.cursor();
    Ok(value)
}

/// Read every top level expression with the default configuration
pub fn read_all(source: &str) -> Result<Vec<Value>, ReadError> {
    Reader::new(source, &Configuration::new()).read_all()
}
