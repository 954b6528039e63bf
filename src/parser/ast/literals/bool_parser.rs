use crate::parser::{ast::Literal, ExprParser, ParseError};

pub struct BoolParser;

impl BoolParser {
    pub fn is_bool(parser: &ExprParser) -> bool {
        parser.comparers.b_true.compare(parser) || parser.comparers.b_false.compare(parser)
    }

    pub fn parse(parser: &mut ExprParser) -> Result<Literal, ParseError> {
        if parser.comparers.b_true.compare(parser) {
            parser.jump(parser.comparers.b_true.length);
            return Ok(Literal::Bool(true));
        }

        if parser.comparers.b_false.compare(parser) {
            parser.jump(parser.comparers.b_false.length);
            return Ok(Literal::Bool(false));
        }

        ParseError::new("Invalid bool value", parser.position, parser).err()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{BoolParser, Literal}, ExprParser};

    #[test]
    pub fn test_bool_parser_case_insensitive() {
        let mut parser = ExprParser::new("tRuE");
        assert_eq!(BoolParser::parse(&mut parser).expect("Failed to parse bool"), Literal::Bool(true));

        let mut parser = ExprParser::new("FALSE)");
        assert_eq!(BoolParser::parse(&mut parser).expect("Failed to parse bool"), Literal::Bool(false));
    }

    #[test]
    pub fn test_bool_parser_rejects_identifier() {
        let parser = ExprParser::new("truest");
        assert!(!BoolParser::is_bool(&parser));
    }
}
