//! HL7 v2 lexical analysis
//!
//! This crate turns the body of an HL7 v2 message into a flat stream of
//! tokens for the structural parser. The separators it recognises are not
//! fixed: they come from a [`Delimiters`] value read out of the message's
//! own header.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod delimiters;
pub mod lexer;
pub mod token;

// Re-export the main types for convenience
pub use delimiters::{is_segment_terminator, ByteClass, DelimiterError, Delimiters};
pub use lexer::{LexError, Lexer, LexerConfig};
pub use token::{Location, Token, TokenType};
