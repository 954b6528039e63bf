use crate::parser::{ast::Literal, ExprParser, ParseError};

pub struct NullParser;

impl NullParser {
    pub fn is_null(parser: &ExprParser) -> bool {
        parser.comparers.null.compare(parser)
    }

    pub fn parse(parser: &mut ExprParser) -> Result<Literal, ParseError> {
        if !NullParser::is_null(parser) {
            return ParseError::new("Invalid null value", parser.position, parser).err();
        }
        parser.jump(parser.comparers.null.length);

        Ok(Literal::Null)
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{Literal, NullParser}, ExprParser};

    #[test]
    pub fn test_null_parser() {
        let mut parser = ExprParser::new("null");
        assert_eq!(NullParser::parse(&mut parser).expect("Failed to parse null"), Literal::Null);
        assert!(parser.eof());
    }

    #[test]
    pub fn test_null_parser_prefix_is_identifier() {
        let parser = ExprParser::new("nullable");
        assert!(!NullParser::is_null(&parser));
    }
}
