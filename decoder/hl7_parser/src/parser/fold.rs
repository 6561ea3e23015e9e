// Field folding: one field's token slice becomes a leaf or a nested composite.
// Levels are tried in order and only materialize when their separator occurs.

use hl7_ast::{Composite, CompositeKind, Data};
use hl7_lexer::{Delimiters, Token, TokenType};

use crate::config::UnknownEscapePolicy;
use crate::error::DecodeError;
use crate::escape::unescape;

/// The explicit null value, distinct from an empty field.
pub const NULL_MARKER: &[u8] = b"\"\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Repetition,
    Component,
    SubComponent,
}

impl Level {
    fn separator(self) -> TokenType<'static> {
        match self {
            Level::Repetition => TokenType::RepetitionSep,
            Level::Component => TokenType::ComponentSep,
            Level::SubComponent => TokenType::SubComponentSep,
        }
    }

    fn kind(self) -> CompositeKind {
        match self {
            Level::Repetition => CompositeKind::Repeated,
            Level::Component => CompositeKind::Component,
            Level::SubComponent => CompositeKind::SubComponent,
        }
    }

    fn next(self) -> Option<Level> {
        match self {
            Level::Repetition => Some(Level::Component),
            Level::Component => Some(Level::SubComponent),
            Level::SubComponent => None,
        }
    }
}

/// Builds a composite, reporting a too-short child list as an invariant
/// violation rather than panicking.
pub(crate) fn composite(kind: CompositeKind, children: Vec<Data>) -> Result<Data, DecodeError> {
    let count = children.len();
    Composite::new(kind, children)
        .map(Data::from)
        .ok_or_else(|| DecodeError::InternalInvariant(format!("{kind} built with {count} child(ren)")))
}

pub(crate) struct FieldFolder {
    delimiters: Delimiters,
    unknown_escape: UnknownEscapePolicy,
}

impl FieldFolder {
    pub(crate) fn new(delimiters: Delimiters, unknown_escape: UnknownEscapePolicy) -> Self {
        Self {
            delimiters,
            unknown_escape,
        }
    }

    /// Folds the tokens of one field (field separators already removed).
    pub(crate) fn fold(&self, tokens: &[Token<'_>]) -> Result<Data, DecodeError> {
        self.fold_at(tokens, Some(Level::Repetition))
    }

    fn fold_at(&self, tokens: &[Token<'_>], level: Option<Level>) -> Result<Data, DecodeError> {
        let Some(level) = level else {
            return self.leaf(tokens);
        };

        let separator = level.separator();
        if !tokens.iter().any(|t| t.token_type == separator) {
            return self.fold_at(tokens, level.next());
        }

        let children = tokens
            .split(|t| t.token_type == separator)
            .map(|part| self.fold_at(part, level.next()))
            .collect::<Result<Vec<_>, _>>()?;
        composite(level.kind(), children)
    }

    fn leaf(&self, tokens: &[Token<'_>]) -> Result<Data, DecodeError> {
        match tokens {
            [] => Ok(Data::absent()),
            [Token {
                token_type: TokenType::Text(raw),
                ..
            }] => Ok(self.text_leaf(raw)),
            [first, ..] => Err(DecodeError::InternalInvariant(format!(
                "leaf at byte {} spans {} tokens",
                first.location.offset,
                tokens.len()
            ))),
        }
    }

    fn text_leaf(&self, raw: &[u8]) -> Data {
        if raw.is_empty() {
            Data::absent()
        } else if raw == NULL_MARKER {
            Data::null()
        } else {
            Data::text(unescape(raw, &self.delimiters, self.unknown_escape).into_owned())
        }
    }
}
