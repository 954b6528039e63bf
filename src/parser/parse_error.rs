use thiserror::Error;

use crate::parser::ExprParser;

/// Parse failure with the character span it covers and the text found there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {start}..{end} near '{text}'")]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    /// Error spanning from `pivot` to the parser's cursor.
    pub fn new(message: &str, pivot: usize, parser: &ExprParser) -> Self {
        Self {
            message: message.to_string(),
            text: parser.text_from_range(pivot, parser.position + 1),
            start: pivot,
            end: parser.position,
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ExprParser, ParseError};

    #[test]
    pub fn test_parse_error_span() {
        let mut parser = ExprParser::new("a = 'open");
        parser.jump(6);
        let error = ParseError::new("unterminated string", 4, &parser);

        assert_eq!(error.text, "'op");
        assert_eq!(error.to_string(), "unterminated string at 4..6 near ''op'");
    }
}
