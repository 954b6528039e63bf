use crate::parser::{ast::ScalarExpr, ExprParser, ParseError};

pub struct ArgsParser;

impl ArgsParser {
    /// Parses `( arg, arg, ... )`; `*` is accepted as an argument when `allow_wildcard` is set.
    pub fn parse(parser: &mut ExprParser, allow_wildcard: bool) -> Result<Vec<ScalarExpr>, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if parser.current() != '(' {
            return ParseError::new("Invalid arguments", pivot, parser).err();
        }
        parser.next();
        parser.next_non_whitespace();

        let mut args = vec![];
        if parser.current() == ')' {
            parser.next();
            return Ok(args);
        }

        loop {
            parser.next_non_whitespace();
            if allow_wildcard && parser.current() == '*' {
                parser.next();
                args.push(ScalarExpr::WildCard);
            } else {
                args.push(ScalarExpr::parse(parser)?);
            }

            parser.next_non_whitespace();
            match parser.current() {
                ',' => parser.next(),
                ')' => {
                    parser.next();
                    return Ok(args);
                },
                _ => return ParseError::new("Invalid arguments", pivot, parser).err(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{ArgsParser, Literal, ScalarExpr}, ExprParser};

    #[test]
    pub fn test_args_empty() {
        let mut parser = ExprParser::new("( )");
        assert!(ArgsParser::parse(&mut parser, false).expect("Failed to parse args").is_empty());
    }

    #[test]
    pub fn test_args_wildcard() {
        let mut parser = ExprParser::new("(*)");
        assert_eq!(ArgsParser::parse(&mut parser, true).expect("Failed to parse args"), vec![ScalarExpr::WildCard]);

        let mut parser = ExprParser::new("(*)");
        assert!(ArgsParser::parse(&mut parser, false).is_err());
    }

    #[test]
    pub fn test_args_list() {
        let mut parser = ExprParser::new("(6, 51,455 )");

        let args = ArgsParser::parse(&mut parser, false).expect("Failed to parse args");

        assert_eq!(args, vec![
            ScalarExpr::Literal(Literal::Int(6)),
            ScalarExpr::Literal(Literal::Int(51)),
            ScalarExpr::Literal(Literal::Int(455)),
        ]);
        assert!(parser.eof());
    }

    #[test]
    pub fn test_args_unclosed() {
        let mut parser = ExprParser::new("(1, 2");

        match ArgsParser::parse(&mut parser, false) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.start, 0),
        }
    }
}
