//! Structural parser: folds the lexer's token stream into a [`Message`].
//!
//! The parser pulls tokens one segment at a time, cuts the segment into
//! fields on field separators and hands each field to the folder, which
//! applies the repetition → component → subcomponent hierarchy.

mod fold;

pub use fold::NULL_MARKER;

use hl7_ast::{CompositeKind, Data, Message};
use hl7_lexer::{Lexer, Token, TokenType};
use log::{debug, trace};

use crate::config::DecoderConfig;
use crate::error::{DecodeError, SegmentFault};
use crate::header::Header;
use fold::{composite, FieldFolder};

fn is_field_sep(token: &Token<'_>) -> bool {
    token.token_type == TokenType::FieldSep
}

/// Parser state for one message. Consumed by [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a [u8],
    lexer: Lexer<'a>,
    header: Header<'a>,
    folder: FieldFolder,
    segments: Vec<Data>,
}

impl<'a> Parser<'a> {
    /// Sets up a parser for `input` whose header has already been scanned.
    pub fn new(input: &'a [u8], header: Header<'a>, config: DecoderConfig) -> Self {
        let lexer = Lexer::with_config(input, header.delimiters, config.lexer)
            .starting_at(header.body_offset);
        Self {
            input,
            lexer,
            header,
            folder: FieldFolder::new(header.delimiters, config.unknown_escape),
            segments: Vec::new(),
        }
    }

    /// Decodes every remaining segment. Stops at the first error.
    pub fn parse(mut self) -> Result<Message, DecodeError> {
        let mut span = Vec::new();
        let mut in_header = true;
        loop {
            span.clear();
            let terminator = self.collect_segment(&mut span)?;
            let index = self.segments.len();

            let segment = if in_header {
                in_header = false;
                Some(self.fold_header(&span, index)?)
            } else {
                self.fold_segment(&span)?
            };

            match segment {
                Some(segment) => {
                    debug!(
                        "segment {index} {:?}: {} field(s)",
                        segment
                            .segment_id()
                            .map(String::from_utf8_lossy)
                            .unwrap_or_default(),
                        segment.children().len()
                    );
                    self.segments.push(segment);
                }
                None => trace!("discarding empty segment before segment {index}"),
            }

            if terminator == TokenType::EndOfInput {
                break;
            }
        }
        Ok(Message::new(self.segments))
    }

    /// Pulls tokens up to the next segment end, returning the token that
    /// closed the segment.
    fn collect_segment(&mut self, span: &mut Vec<Token<'a>>) -> Result<TokenType<'a>, DecodeError> {
        loop {
            match self.lexer.next_token() {
                Some(Ok(token)) if token.token_type.ends_segment() => return Ok(token.token_type),
                Some(Ok(token)) => span.push(token),
                Some(Err(err)) => {
                    return Err(DecodeError::Segment {
                        index: self.segments.len(),
                        fault: SegmentFault::from(err),
                    })
                }
                None => {
                    return Err(DecodeError::InternalInvariant(
                        "lexer exhausted without end of input".to_string(),
                    ))
                }
            }
        }
    }

    /// The header's identifier and encoding characters were consumed by the
    /// header scanner and are attached verbatim; the lexer resumes right
    /// after them.
    fn fold_header(&self, span: &[Token<'a>], index: usize) -> Result<Data, DecodeError> {
        let mut fields = vec![
            Data::text(self.header.identifier),
            Data::text(self.header.encoding),
        ];

        let mut slices = span.split(is_field_sep);
        if let Some(leading) = slices.next() {
            if let Some(first) = leading.first() {
                return Err(DecodeError::InternalInvariant(format!(
                    "encoding characters run into {} at byte {}",
                    first.token_type, first.location.offset
                )));
            }
        }
        for slice in slices {
            fields.push(self.folder.fold(slice)?);
        }

        // `MSH|^~\&|` followed directly by a terminator opens a field it never fills
        if let [_, _, trailing] = fields.as_slice() {
            if *trailing == Data::absent() {
                return Err(DecodeError::Segment {
                    index,
                    fault: SegmentFault::HeaderTooShort {
                        fields: fields.len(),
                    },
                });
            }
        }
        composite(CompositeKind::Segment, fields)
    }

    /// Folds an ordinary segment. Returns `None` for segments with no
    /// content at all (blank lines, bare separators).
    fn fold_segment(&self, span: &[Token<'a>]) -> Result<Option<Data>, DecodeError> {
        if span.iter().all(is_field_sep) {
            return Ok(None);
        }

        let mut slices = span.split(is_field_sep);
        let mut fields = Vec::new();
        if let Some(identifier) = slices.next() {
            fields.push(self.identifier_leaf(identifier));
        }
        for slice in slices {
            fields.push(self.folder.fold(slice)?);
        }
        composite(CompositeKind::Segment, fields).map(Some)
    }

    /// The identifier is taken as received: no splitting, no unescaping.
    fn identifier_leaf(&self, tokens: &[Token<'a>]) -> Data {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => {
                let end = last.location.offset + token_len(&last.token_type);
                Data::text(&self.input[first.location.offset..end])
            }
            _ => Data::absent(),
        }
    }
}

/// Bytes a token occupies in the input.
fn token_len(token_type: &TokenType<'_>) -> usize {
    match token_type {
        TokenType::Text(bytes) => bytes.len(),
        TokenType::EndOfInput => 0,
        _ => 1,
    }
}
