//! The five message-local separator bytes.
//!
//! HL7 v2 does not hard-code its separators: the header segment declares
//! them (`MSH|^~\&` declares `|` `^` `~` `\` `&`) and every later byte of the
//! message is interpreted against that declaration.

use thiserror::Error;

/// Carriage return, the standard segment terminator.
pub const SEGMENT_TERMINATOR: u8 = b'\r';

/// Returns true for bytes that end a segment (CR, and LF for files saved
/// with Unix or Windows line endings).
#[inline]
pub fn is_segment_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Reasons a set of delimiter bytes is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DelimiterError {
    /// Two roles were assigned the same byte.
    #[error("delimiter byte {byte:#04x} is used for both {first} and {second}")]
    Duplicate {
        byte: u8,
        first: &'static str,
        second: &'static str,
    },
    /// A role was assigned a segment terminator.
    #[error("{role} delimiter cannot be a segment terminator ({byte:#04x})")]
    Terminator { role: &'static str, byte: u8 },
}

/// What a single byte means under a given set of delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Field,
    Component,
    Repetition,
    Escape,
    SubComponent,
    SegmentEnd,
    Text,
}

/// Separator bytes for one message. Built once from the header, then only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiters {
    field: u8,
    component: u8,
    repetition: u8,
    escape: u8,
    subcomponent: u8,
}

impl Delimiters {
    /// Validates and builds a delimiter set. All five bytes must differ and
    /// none may be a segment terminator.
    pub fn new(
        field: u8,
        component: u8,
        repetition: u8,
        escape: u8,
        subcomponent: u8,
    ) -> Result<Self, DelimiterError> {
        let roles = [
            ("field", field),
            ("component", component),
            ("repetition", repetition),
            ("escape", escape),
            ("subcomponent", subcomponent),
        ];
        for (i, &(role, byte)) in roles.iter().enumerate() {
            if is_segment_terminator(byte) {
                return Err(DelimiterError::Terminator { role, byte });
            }
            if let Some(&(other, _)) = roles[i + 1..].iter().find(|(_, b)| *b == byte) {
                return Err(DelimiterError::Duplicate {
                    byte,
                    first: role,
                    second: other,
                });
            }
        }
        Ok(Self {
            field,
            component,
            repetition,
            escape,
            subcomponent,
        })
    }

    /// Builds the set from a field separator and the four encoding
    /// characters in header order: component, repetition, escape,
    /// subcomponent.
    pub fn from_encoding(field: u8, encoding: [u8; 4]) -> Result<Self, DelimiterError> {
        let [component, repetition, escape, subcomponent] = encoding;
        Self::new(field, component, repetition, escape, subcomponent)
    }

    pub fn field(&self) -> u8 {
        self.field
    }

    pub fn component(&self) -> u8 {
        self.component
    }

    pub fn repetition(&self) -> u8 {
        self.repetition
    }

    pub fn escape(&self) -> u8 {
        self.escape
    }

    pub fn subcomponent(&self) -> u8 {
        self.subcomponent
    }

    /// The encoding characters as they appear in the header.
    pub fn encoding_characters(&self) -> [u8; 4] {
        [self.component, self.repetition, self.escape, self.subcomponent]
    }

    #[inline]
    pub fn classify(&self, byte: u8) -> ByteClass {
        if byte == self.field {
            ByteClass::Field
        } else if byte == self.component {
            ByteClass::Component
        } else if byte == self.repetition {
            ByteClass::Repetition
        } else if byte == self.escape {
            ByteClass::Escape
        } else if byte == self.subcomponent {
            ByteClass::SubComponent
        } else if is_segment_terminator(byte) {
            ByteClass::SegmentEnd
        } else {
            ByteClass::Text
        }
    }
}

/// The conventional `|^~\&` set.
impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: b'|',
            component: b'^',
            repetition: b'~',
            escape: b'\\',
            subcomponent: b'&',
        }
    }
}
