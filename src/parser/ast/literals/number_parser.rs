use ordered_float::NotNan;

use crate::parser::{ast::Literal, ExprParser, ParseError};

pub struct NumberParser;

impl NumberParser {
    pub fn is_number(parser: &ExprParser) -> bool {
        let current = parser.current();
        current.is_ascii_digit() || ((current == '+' || current == '-') && parser.peek(1).is_ascii_digit())
    }

    pub fn parse(parser: &mut ExprParser) -> Result<Literal, ParseError> {
        let pivot = parser.position;
        let mut is_float = false;

        if !NumberParser::is_number(parser) {
            return Err(ParseError::new("Invalid number value", pivot, parser));
        }

        if parser.current() == '+' || parser.current() == '-' {
            parser.next();
        }

        while parser.current().is_ascii_digit() {
            parser.next();
        }

        if parser.current() == '.' {
            is_float = true;
            parser.next();
            while parser.current().is_ascii_digit() {
                parser.next();
            }
        }

        if parser.current() == 'e' || parser.current() == 'E' {
            is_float = true;
            parser.next();
            if parser.current() == '+' || parser.current() == '-' {
                parser.next();
            }
            if !parser.current().is_ascii_digit() {
                return Err(ParseError::new("Invalid number exponent", pivot, parser));
            }
            while parser.current().is_ascii_digit() {
                parser.next();
            }
        }

        if parser.current().is_alphanumeric() || parser.current() == '_' {
            return Err(ParseError::new("Invalid number value", pivot, parser));
        }

        let number = parser.text_from_pivot(pivot);
        let number = match is_float {
            true => {
                let value = number.parse::<f64>().map_err(|_| ParseError::new("Invalid number", pivot, parser))?;
                Literal::Float(NotNan::new(value).map_err(|_| ParseError::new("Invalid number", pivot, parser))?)
            },
            false => Literal::Int(number.parse::<i64>().map_err(|_| ParseError::new("Invalid number", pivot, parser))?),
        };

        Ok(number)
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{Literal, NumberParser}, ExprParser};

    #[test]
    pub fn test_number_parser_int() {
        let mut parser = ExprParser::new("32");

        match NumberParser::parse(&mut parser) {
            Ok(Literal::Int(value)) => assert_eq!(value, 32),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_int_negative() {
        let mut parser = ExprParser::new("-32)");

        match NumberParser::parse(&mut parser) {
            Ok(Literal::Int(value)) => assert_eq!(value, -32),
            _ => panic!(),
        }
        assert_eq!(parser.current(), ')');
    }

    #[test]
    pub fn test_number_parser_float() {
        let mut parser = ExprParser::new("32.5");

        match NumberParser::parse(&mut parser) {
            Ok(Literal::Float(value)) => assert_eq!(value.into_inner(), 32.5),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_exponent() {
        let mut parser = ExprParser::new("1e-7");

        match NumberParser::parse(&mut parser) {
            Ok(Literal::Float(value)) => assert_eq!(value.into_inner(), 1e-7),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_stops_at_operator() {
        let mut parser = ExprParser::new("1-2");

        match NumberParser::parse(&mut parser) {
            Ok(Literal::Int(value)) => assert_eq!(value, 1),
            _ => panic!(),
        }
        assert_eq!(parser.current(), '-');
    }

    #[test]
    pub fn test_number_parser_error_letter() {
        let mut parser = ExprParser::new("9column");

        match NumberParser::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.start, 0);
                assert_eq!(err.end, 1);
                assert_eq!(err.text, "9c");
            },
        }
    }
}
