use std::fmt;

/// A position in the source being read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Character offset from the start of the source
    pub offset: usize,

    /// One based line number
    pub line: usize,

    /// One based column, counted in characters
    pub column: usize,
}

impl Location {
    pub const START: Location = Location {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Work out the location of a byte offset into the source
    pub fn of(source: &str, position: usize) -> Self {
        let mut location = Location::START;
        for ch in source[..position.min(source.len())].chars() {
            location.step(ch);
        }
        location
    }

    /// Move past a single character
    fn step(&mut self, ch: char) {
        self.offset += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Wrapper providing source location information for a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WithLocation<T> {
    /// Where the span starts
    pub(crate) location: Location,

    /// The number of characters this location spans
    pub(crate) length: usize,

    /// The data found at the location
    pub(crate) content: T,
}

impl<T> WithLocation<T> {
    /// Get a ref to the content stored
    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Separate the content from the location data
    pub fn split(self) -> (T, WithLocation<()>) {
        (
            self.content,
            WithLocation {
                content: (),
                location: self.location,
                length: self.length,
            },
        )
    }
}

impl<T: fmt::Display> fmt::Display for WithLocation<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.content)
    }
}
