//! Header scanning.
//!
//! The first eight bytes of an HL7 v2 message have a fixed shape: the
//! `MSH` identifier, the field separator, then the four encoding characters.
//! Everything after that is ordinary segment data and goes to the lexer.

use hl7_lexer::{is_segment_terminator, Delimiters};
use nom::bytes::complete::{take, take_till};
use nom::number::complete::u8 as any_byte;
use nom::IResult;

use crate::error::HeaderError;

/// Identifier the first segment must carry.
pub const HEADER_SEGMENT_ID: &[u8; 3] = b"MSH";

/// `MSH` + field separator + four encoding characters.
pub const MIN_HEADER_LEN: usize = 8;

/// Result of scanning the header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub delimiters: Delimiters,
    /// The segment identifier as received
    pub identifier: &'a [u8],
    /// The encoding characters field as received
    pub encoding: &'a [u8],
    /// Offset of the first byte after the encoding characters
    pub body_offset: usize,
}

fn header_prefix(input: &[u8]) -> IResult<&[u8], (&[u8], u8, &[u8])> {
    let (rest, identifier) = take(3usize)(input)?;
    let (rest, field) = any_byte(rest)?;
    let (rest, encoding) = take_till(move |b: u8| b == field || is_segment_terminator(b))(rest)?;
    Ok((rest, (identifier, field, encoding)))
}

/// Reads the delimiters declared by the message header.
///
/// ```
/// use hl7_parser::scan_header;
///
/// let header = scan_header(b"MSH|^~\\&|APP|FAC").unwrap();
/// assert_eq!(header.delimiters.component(), b'^');
/// assert_eq!(header.body_offset, 8);
/// ```
pub fn scan_header(input: &[u8]) -> Result<Header<'_>, HeaderError> {
    if input.len() < MIN_HEADER_LEN {
        return Err(HeaderError::TooShort { len: input.len() });
    }

    let (rest, (identifier, field, encoding)) = header_prefix(input)
        .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| HeaderError::TooShort {
            len: input.len(),
        })?;

    if identifier != HEADER_SEGMENT_ID {
        return Err(HeaderError::BadIdentifier {
            found: String::from_utf8_lossy(identifier).into_owned(),
        });
    }

    let encoding_chars: [u8; 4] = encoding
        .try_into()
        .map_err(|_| HeaderError::EncodingLength {
            len: encoding.len(),
        })?;
    let delimiters = Delimiters::from_encoding(field, encoding_chars)?;

    Ok(Header {
        delimiters,
        identifier,
        encoding,
        body_offset: input.len() - rest.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_lexer::DelimiterError;

    #[test]
    fn scans_standard_header() {
        let input = b"MSH|^~\\&|SRC|FAC\rPID|1";
        let header = scan_header(input).unwrap();
        assert_eq!(header.delimiters, Delimiters::default());
        assert_eq!(header.identifier, b"MSH");
        assert_eq!(header.encoding, b"^~\\&");
        assert_eq!(header.body_offset, 8);
        assert_eq!(input[header.body_offset], b'|');
    }

    #[test]
    fn header_may_end_right_after_encoding_characters() {
        assert_eq!(scan_header(b"MSH|^~\\&").unwrap().body_offset, 8);
        assert_eq!(scan_header(b"MSH|^~\\&\rPID").unwrap().body_offset, 8);
    }

    #[test]
    fn nonstandard_delimiters() {
        let header = scan_header(b"MSH#$*!%#APP").unwrap();
        let d = header.delimiters;
        assert_eq!(
            (d.field(), d.component(), d.repetition(), d.escape(), d.subcomponent()),
            (b'#', b'$', b'*', b'!', b'%')
        );
    }

    #[test]
    fn too_short() {
        assert_eq!(
            scan_header(b"MSH|^~\\"),
            Err(HeaderError::TooShort { len: 7 })
        );
    }

    #[test]
    fn identifier_is_case_sensitive() {
        assert_eq!(
            scan_header(b"msh|^~\\&|"),
            Err(HeaderError::BadIdentifier {
                found: "msh".to_string()
            })
        );
        assert!(matches!(
            scan_header(b"BAD|^~\\&|stuff|things"),
            Err(HeaderError::BadIdentifier { .. })
        ));
    }

    #[test]
    fn encoding_field_length_must_be_four() {
        assert_eq!(
            scan_header(b"MSH|^~\\|APP|FAC"),
            Err(HeaderError::EncodingLength { len: 3 })
        );
        assert_eq!(
            scan_header(b"MSH|^~\\&#|APP"),
            Err(HeaderError::EncodingLength { len: 5 })
        );
        assert_eq!(
            scan_header(b"MSH|^~\r\\&|APP"),
            Err(HeaderError::EncodingLength { len: 2 })
        );
    }

    #[test]
    fn repeated_delimiter_bytes_are_rejected() {
        assert!(matches!(
            scan_header(b"MSH|^^\\&|APP"),
            Err(HeaderError::InvalidDelimiters(DelimiterError::Duplicate { byte: b'^', .. }))
        ));
    }
}
