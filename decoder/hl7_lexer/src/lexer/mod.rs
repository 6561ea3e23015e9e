//! Pull lexer for the body of an HL7 v2 message.
//!
//! The lexer is driven one token at a time through [`Iterator`]. It knows
//! the message's [`Delimiters`] and splits the input into separator tokens
//! and text runs. Escape spans (`\F\`, `\X0D\`, ...) are recognised only so
//! that separator bytes inside them are not mistaken for structure; their
//! contents are passed through untouched inside the surrounding text token.
//!
//! ```
//! use hl7_lexer::{Delimiters, Lexer, TokenType};
//!
//! let tokens: Vec<_> = Lexer::new(b"PV1|a^b", Delimiters::default())
//!     .map(|t| t.map(|t| t.token_type))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(
//!     tokens,
//!     vec![
//!         TokenType::Text(b"PV1"),
//!         TokenType::FieldSep,
//!         TokenType::Text(b"a"),
//!         TokenType::ComponentSep,
//!         TokenType::Text(b"b"),
//!         TokenType::EndOfInput,
//!     ]
//! );
//! ```

use std::iter::FusedIterator;

use log::trace;
use memchr::memchr3;
use thiserror::Error;

use crate::delimiters::{ByteClass, Delimiters};
use crate::token::{Location, Token, TokenType};

#[cfg(test)]
mod tests;

/// Configuration for the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Longest escape span interior, in bytes, scanned before giving up.
    /// Bounds the work done on input with an escape byte that never closes.
    pub max_escape_len: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            max_escape_len: 1024,
        }
    }
}

/// Lexing failures. Both are fatal for the segment they occur in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    /// An escape span reached a segment terminator or the end of input
    /// before its closing escape byte.
    #[error("escape sequence opened at byte {offset} is never closed")]
    UnterminatedEscape { offset: usize },
    /// An escape span ran past the configured length guard.
    #[error("escape sequence opened at byte {offset} is longer than {limit} bytes")]
    EscapeTooLong { offset: usize, limit: usize },
}

impl LexError {
    /// Byte offset of the escape byte that opened the failing span.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedEscape { offset } | LexError::EscapeTooLong { offset, .. } => {
                *offset
            }
        }
    }
}

/// HL7 v2 lexer over an in-memory buffer.
///
/// Forward-only: once [`TokenType::EndOfInput`] or an error has been
/// returned the lexer yields `None` forever. Re-scanning needs a new
/// instance.
pub struct Lexer<'a> {
    input: &'a [u8],
    delimiters: Delimiters,
    config: LexerConfig,
    /// Current byte offset
    pos: usize,
    /// Current line number (1-based)
    line: usize,
    /// Offset of the first byte of the current line
    line_start: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer with the default configuration
    pub fn new(input: &'a [u8], delimiters: Delimiters) -> Self {
        Self::with_config(input, delimiters, LexerConfig::default())
    }

    pub fn with_config(input: &'a [u8], delimiters: Delimiters, config: LexerConfig) -> Self {
        Self {
            input,
            delimiters,
            config,
            pos: 0,
            line: 1,
            line_start: 0,
            done: false,
        }
    }

    /// Skip the first `offset` bytes, e.g. the header prefix already consumed
    /// by the header scanner. Locations keep counting from the start of the
    /// input.
    pub fn starting_at(mut self, offset: usize) -> Self {
        let offset = offset.min(self.input.len());
        while self.pos < offset {
            let byte = self.input[self.pos];
            if crate::delimiters::is_segment_terminator(byte) {
                self.consume_terminator(byte);
            } else {
                self.pos += 1;
            }
        }
        self.pos = offset;
        self
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.pos - self.line_start + 1,
            offset: self.pos,
        }
    }

    /// Get the next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> Option<Result<Token<'a>, LexError>> {
        if self.done {
            return None;
        }

        let location = self.location();
        let Some(&byte) = self.input.get(self.pos) else {
            self.done = true;
            trace!("{}:{} {}", location.line, location.column, TokenType::EndOfInput);
            return Some(Ok(Token::new(TokenType::EndOfInput, location)));
        };

        let token_type = match self.delimiters.classify(byte) {
            ByteClass::Field => {
                self.pos += 1;
                TokenType::FieldSep
            }
            ByteClass::Component => {
                self.pos += 1;
                TokenType::ComponentSep
            }
            ByteClass::Repetition => {
                self.pos += 1;
                TokenType::RepetitionSep
            }
            ByteClass::SubComponent => {
                self.pos += 1;
                TokenType::SubComponentSep
            }
            ByteClass::SegmentEnd => {
                self.consume_terminator(byte);
                TokenType::SegmentEnd
            }
            ByteClass::Escape | ByteClass::Text => match self.lex_text() {
                Ok(token_type) => token_type,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            },
        };

        trace!("{}:{} {}", location.line, location.column, token_type);
        Some(Ok(Token::new(token_type, location)))
    }

    /// CR, LF and CRLF each end exactly one segment.
    fn consume_terminator(&mut self, byte: u8) {
        self.pos += 1;
        if byte == b'\r' && self.input.get(self.pos) == Some(&b'\n') {
            self.pos += 1;
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    fn lex_text(&mut self) -> Result<TokenType<'a>, LexError> {
        let start = self.pos;
        while let Some(&byte) = self.input.get(self.pos) {
            match self.delimiters.classify(byte) {
                ByteClass::Text => self.pos += 1,
                ByteClass::Escape => self.skip_escape_span()?,
                _ => break,
            }
        }
        Ok(TokenType::Text(&self.input[start..self.pos]))
    }

    /// Moves past an escape span, leaving `pos` just after its closing byte.
    fn skip_escape_span(&mut self) -> Result<(), LexError> {
        let open = self.pos;
        let escape = self.delimiters.escape();
        let limit = self.config.max_escape_len;
        let interior = &self.input[open + 1..];
        let window = &interior[..interior.len().min(limit.saturating_add(1))];

        match memchr3(escape, b'\r', b'\n', window) {
            Some(i) if window[i] == escape => {
                self.pos = open + i + 2;
                Ok(())
            }
            Some(_) => Err(LexError::UnterminatedEscape { offset: open }),
            None if window.len() > limit => Err(LexError::EscapeTooLong {
                offset: open,
                limit,
            }),
            None => Err(LexError::UnterminatedEscape { offset: open }),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl FusedIterator for Lexer<'_> {}
