use hl7_lexer::LexerConfig;

/// How to treat a zero-length input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Fail with [`DecodeError::EmptyInput`](crate::DecodeError::EmptyInput).
    #[default]
    Reject,
    /// Return a message with no segments.
    Accept,
}

/// What the escape decoder does with a sequence it does not recognise,
/// e.g. `\H\` or `\X0D\`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownEscapePolicy {
    /// Keep the interior and drop the bounding escape bytes (`\H\` → `H`).
    #[default]
    Strip,
    /// Keep the whole sequence as received (`\H\` → `\H\`).
    Preserve,
}

/// Configuration for a decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Settings passed through to the lexer
    pub lexer: LexerConfig,
    pub empty_input: EmptyInputPolicy,
    pub unknown_escape: UnknownEscapePolicy,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_input(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    pub fn with_unknown_escape(mut self, policy: UnknownEscapePolicy) -> Self {
        self.unknown_escape = policy;
        self
    }

    pub fn with_max_escape_len(mut self, max: usize) -> Self {
        self.lexer.max_escape_len = max;
        self
    }
}
