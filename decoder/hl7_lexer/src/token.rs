use std::fmt;

/// Represents a token's location in the input.
///
/// Lines are counted per segment terminator, so for a well-formed message
/// `line` is the 1-based ordinal of the raw segment line (blank lines
/// included). Columns are 1-based byte columns within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// The 1-based line number
    pub line: usize,
    /// The 1-based byte column within the line
    pub column: usize,
    /// The 0-based byte offset from the start of the input
    pub offset: usize,
}

/// Kinds of token the lexer produces.
///
/// `Text` borrows its payload from the input. Escape spans are kept verbatim
/// inside it, bounding escape bytes included; resolving them is left to the
/// parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType<'a> {
    Text(&'a [u8]),
    FieldSep,
    RepetitionSep,
    ComponentSep,
    SubComponentSep,
    SegmentEnd,
    EndOfInput,
}

impl<'a> TokenType<'a> {
    /// True for the tokens that close a segment.
    pub fn ends_segment(&self) -> bool {
        matches!(self, TokenType::SegmentEnd | TokenType::EndOfInput)
    }

    pub fn text(&self) -> Option<&'a [u8]> {
        match self {
            TokenType::Text(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Text(bytes) => write!(f, "text {:?}", String::from_utf8_lossy(bytes)),
            TokenType::FieldSep => f.write_str("field separator"),
            TokenType::RepetitionSep => f.write_str("repetition separator"),
            TokenType::ComponentSep => f.write_str("component separator"),
            TokenType::SubComponentSep => f.write_str("subcomponent separator"),
            TokenType::SegmentEnd => f.write_str("segment end"),
            TokenType::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A token together with where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub token_type: TokenType<'a>,
    pub location: Location,
}

impl<'a> Token<'a> {
    pub fn new(token_type: TokenType<'a>, location: Location) -> Self {
        Self {
            token_type,
            location,
        }
    }
}
