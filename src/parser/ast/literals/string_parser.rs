use crate::parser::{ast::Literal, ExprParser, ParseError, WordComparer};

pub struct StringParser;

impl StringParser {
    pub fn is_string_delimiter(parser: &ExprParser) -> bool {
        parser.current() == '\''
    }

    /// Parses a single-quoted literal; a doubled quote inside is an escaped quote.
    pub fn parse(parser: &mut ExprParser) -> Result<Literal, ParseError> {
        let pivot = parser.position;

        if !StringParser::is_string_delimiter(parser) {
            return Err(ParseError::new("Invalid string value", pivot, parser));
        }
        parser.next();

        let mut text = String::new();
        loop {
            if parser.eof() || WordComparer::is_current_break_line(parser) {
                return Err(ParseError::new("Invalid string", pivot, parser));
            }

            if StringParser::is_string_delimiter(parser) {
                if parser.peek(1) == '\'' {
                    text.push('\'');
                    parser.jump(2);
                    continue;
                }
                parser.next();
                break;
            }

            text.push(parser.current());
            parser.next();
        }

        Ok(Literal::String(text))
    }
}
