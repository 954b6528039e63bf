use crate::parser::{ExprParser, ParseError};

pub struct TextCollector;

impl TextCollector {
    pub fn is_identifier_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    pub fn is_identifier_part(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }

    /// Collects one identifier; stops at the first character that cannot belong to it.
    /// A double-quoted identifier is returned with its quotes.
    pub fn collect(parser: &mut ExprParser) -> Result<String, ParseError> {
        let pivot = parser.position;
        if parser.current() == '"' {
            return Self::collect_quoted(parser);
        }
        if !Self::is_identifier_start(parser.current()) {
            return Err(ParseError::new("Invalid identifier", pivot, parser));
        }
        while !parser.eof() && Self::is_identifier_part(parser.current()) {
            parser.next();
        }
        Ok(parser.text_from_pivot(pivot))
    }

    fn collect_quoted(parser: &mut ExprParser) -> Result<String, ParseError> {
        let pivot = parser.position;
        parser.next();

        loop {
            if parser.eof() {
                return Err(ParseError::new("Unterminated quoted identifier", pivot, parser));
            }
            if parser.current() == '"' {
                parser.next();
                // "" stands for one quote inside the name
                if parser.current() != '"' {
                    break;
                }
            }
            parser.next();
        }

        if parser.position - pivot == 2 {
            return Err(ParseError::new("Empty quoted identifier", pivot, parser));
        }
        Ok(parser.text_from_pivot(pivot))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::TextCollector, ExprParser};

    #[test]
    pub fn test_text_collector_collect() {
        let mut parser = ExprParser::new("text ");

        let result = TextCollector::collect(&mut parser).expect("Failed to collect text");

        assert_eq!(result, "text");
    }

    #[test]
    pub fn test_text_collector_stops_at_operator() {
        let mut parser = ExprParser::new("r_name='x'");

        let result = TextCollector::collect(&mut parser).expect("Failed to collect text");

        assert_eq!(result, "r_name");
        assert_eq!(parser.current(), '=');
    }

    #[test]
    pub fn test_text_collector_quoted_identifier() {
        let mut parser = ExprParser::new("\"Order\".id");

        let result = TextCollector::collect(&mut parser).expect("Failed to collect text");

        assert_eq!(result, "\"Order\"");
        assert_eq!(parser.current(), '.');

        let mut parser = ExprParser::new("\"say \"\"hi\"\"\" = 1");
        assert_eq!(TextCollector::collect(&mut parser).unwrap(), "\"say \"\"hi\"\"\"");
        assert_eq!(parser.position, 12);
    }

    #[test]
    pub fn test_text_collector_unterminated_quote() {
        let mut parser = ExprParser::new("\"Order.id");

        match TextCollector::collect(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.start, 0);
                assert_eq!(err.end, 9);
            },
        }

        assert!(TextCollector::collect(&mut ExprParser::new("\"\" = 1")).is_err());
    }

    #[test]
    pub fn test_text_collector_with_wrong_start() {
        let mut parser = ExprParser::new("#123");

        match TextCollector::collect(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.text, "#");
                assert_eq!(err.start, 0);
                assert_eq!(err.end, 0);
            },
        }
    }
}
