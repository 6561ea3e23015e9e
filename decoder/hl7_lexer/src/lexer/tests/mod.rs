
use super::*;

/// Lex `input` with the default delimiters and keep only the token types.
fn kinds(input: &[u8]) -> Result<Vec<TokenType<'_>>, LexError> {
    Lexer::new(input, Delimiters::default())
        .map(|t| t.map(|t| t.token_type))
        .collect()
}
