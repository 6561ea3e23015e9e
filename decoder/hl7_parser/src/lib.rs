//! HL7 v2 message decoder.
//!
//! [`decode`] takes the raw bytes of one message and returns its full
//! [`Message`] tree, or the first error encountered. The steps are:
//!
//! 1. [`scan_header`] reads the delimiters declared by the `MSH` prefix.
//! 2. [`hl7_lexer::Lexer`] tokenizes the rest of the input against them.
//! 3. [`Parser`] folds the tokens segment by segment, unescaping leaf
//!    values with [`unescape`] as they are attached.
//!
//! ```
//! use hl7_parser::decode;
//!
//! let msg = decode(b"MSH|^~\\&|APP\rPID|1||Doe^Jane").unwrap();
//! let pid = msg.segment("PID").unwrap();
//! assert_eq!(pid.child(3).unwrap().to_string(), r#"Component[Leaf("Doe"), Leaf("Jane")]"#);
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod escape;
pub mod header;
pub mod parser;

pub use config::{DecoderConfig, EmptyInputPolicy, UnknownEscapePolicy};
pub use decoder::Decoder;
pub use error::{DecodeError, HeaderError, SegmentFault};
pub use escape::unescape;
pub use header::{scan_header, Header, HEADER_SEGMENT_ID};
pub use hl7_ast::{Composite, CompositeKind, Data, Message, Value};
pub use hl7_lexer::{Delimiters, LexerConfig};
pub use parser::{Parser, NULL_MARKER};

use log::debug;

/// Decodes one message with the default configuration.
pub fn decode(input: &[u8]) -> Result<Message, DecodeError> {
    decode_with(input, &DecoderConfig::default())
}

/// Decodes one message.
pub fn decode_with(input: &[u8], config: &DecoderConfig) -> Result<Message, DecodeError> {
    if input.is_empty() {
        return match config.empty_input {
            EmptyInputPolicy::Reject => Err(DecodeError::EmptyInput),
            EmptyInputPolicy::Accept => Ok(Message::default()),
        };
    }

    let header = scan_header(input)?;
    debug!(
        "decoding {} bytes with delimiters {:?}",
        input.len(),
        String::from_utf8_lossy(&header.delimiters.encoding_characters())
    );
    Parser::new(input, header, *config).parse()
}
