use hl7_lexer::{DelimiterError, LexError};
use thiserror::Error;

use crate::header::{HEADER_SEGMENT_ID, MIN_HEADER_LEN};

/// Problems with the fixed-format header prefix (`MSH|^~\&`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("input is {len} bytes; a header needs at least {}", MIN_HEADER_LEN)]
    TooShort { len: usize },
    #[error(
        "message must start with {:?}, found {found:?}",
        String::from_utf8_lossy(HEADER_SEGMENT_ID)
    )]
    BadIdentifier { found: String },
    #[error("encoding characters field must be exactly 4 bytes, found {len}")]
    EncodingLength { len: usize },
    #[error(transparent)]
    InvalidDelimiters(#[from] DelimiterError),
}

/// What went wrong inside a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SegmentFault {
    #[error("escape sequence opened at byte {offset} is never closed")]
    UnterminatedEscape { offset: usize },
    #[error("escape sequence opened at byte {offset} is longer than {limit} bytes")]
    EscapeTooLong { offset: usize, limit: usize },
    #[error("header segment ends after {fields} field(s) with an empty trailing field")]
    HeaderTooShort { fields: usize },
}

impl From<LexError> for SegmentFault {
    fn from(err: LexError) -> Self {
        match err {
            LexError::UnterminatedEscape { offset } => SegmentFault::UnterminatedEscape { offset },
            LexError::EscapeTooLong { offset, limit } => {
                SegmentFault::EscapeTooLong { offset, limit }
            }
        }
    }
}

/// Every way a decode can fail. Decoding stops at the first error and no
/// partial message is returned with it.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input buffer was empty.
    #[error("no data to decode")]
    EmptyInput,
    #[error("invalid header: {0}")]
    Header(#[from] HeaderError),
    /// `index` is the 0-based position the segment would have had in the
    /// decoded message; discarded blank lines are not counted.
    #[error("segment {index}: {fault}")]
    Segment { index: usize, fault: SegmentFault },
    /// Should be unreachable; reported instead of panicking.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            DecodeError::Segment { index, .. } => Some(*index),
            _ => None,
        }
    }
}
