use crate::parser::{ast::{ArgsParser, Function, ScalarExpr, TextCollector}, ExprParser, ParseError};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Name { name: String },
    WithCollection { collection: String, name: String },
}

impl Column {
    pub fn name(&self) -> &str {
        match self {
            Column::Name { name } => name,
            Column::WithCollection { name, .. } => name,
        }
    }

    pub fn collection(&self) -> Option<&str> {
        match self {
            Column::Name { .. } => None,
            Column::WithCollection { collection, .. } => Some(collection),
        }
    }

    /// Same column, qualified by `collection`.
    pub fn qualified(&self, collection: &str) -> Column {
        Column::WithCollection { collection: collection.to_string(), name: self.name().to_string() }
    }

    /// Same column without its qualifier.
    pub fn unqualified(&self) -> Column {
        Column::Name { name: self.name().to_string() }
    }

    /// Parses `name`, `collection.name`, `fn(args)` or `schema.fn(args)`.
    pub fn parse_column_or_function(parser: &mut ExprParser) -> Result<ScalarExpr, ParseError> {
        let pivot = parser.position;
        let mut name = TextCollector::collect(parser)?;
        let mut collection: Option<String> = None;

        while parser.current() == '.' {
            if collection.is_some() {
                return ParseError::new("Column reference with more than one qualifier", pivot, parser).err();
            }
            parser.next();
            collection = Some(std::mem::replace(&mut name, TextCollector::collect(parser)?));
        }

        if parser.current() == '(' {
            let name = match &collection {
                Some(collection) => format!("{}.{}", collection, name),
                None => name,
            };
            let args = ArgsParser::parse(parser, true)?;
            return Ok(ScalarExpr::Function(Function { name, args }));
        }

        Ok(ScalarExpr::Column(match collection {
            Some(collection) => Column::WithCollection { collection, name },
            None => Column::Name { name },
        }))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.collection() {
            Some(collection) => write!(f, "{}.{}", collection, self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({})", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{Column, ScalarExpr}, ExprParser};

    fn parse(text: &str) -> (ScalarExpr, ExprParser) {
        let mut parser = ExprParser::new(text);
        let expr = Column::parse_column_or_function(&mut parser).unwrap();
        (expr, parser)
    }

    #[test]
    pub fn test_plain_column() {
        match parse("l_quantity").0 {
            ScalarExpr::Column(Column::Name { name }) => assert_eq!(name, "l_quantity"),
            other => panic!("expected plain column, got {:?}", other),
        }
    }

    #[test]
    pub fn test_qualified_column_stops_at_delimiter() {
        let (expr, parser) = parse("o.o_custkey = c.c_custkey");

        match expr {
            ScalarExpr::Column(column) => {
                assert_eq!(column.collection(), Some("o"));
                assert_eq!(column.name(), "o_custkey");
            },
            other => panic!("expected qualified column, got {:?}", other),
        }
        assert_eq!(parser.position, 11);
    }

    #[test]
    pub fn test_three_part_reference_rejected() {
        let mut parser = ExprParser::new("sales.orders.o_id");

        match Column::parse_column_or_function(&mut parser) {
            Err(err) => {
                assert_eq!(err.start, 0);
                assert_eq!(err.end, 12);
            },
            Ok(expr) => panic!("expected error, got {:?}", expr),
        }
    }

    #[test]
    pub fn test_schema_qualified_function() {
        match parse("pg_catalog.substr(p_name, 1, 3)").0 {
            ScalarExpr::Function(function) => {
                assert_eq!(function.name, "pg_catalog.substr");
                assert_eq!(function.args.len(), 3);
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    pub fn test_qualify_and_strip() {
        let column = Column::Name { name: "id".into() };

        assert_eq!(column.qualified("orders").to_string(), "orders.id");
        assert_eq!(column.qualified("orders").unqualified(), column);
        assert_eq!(format!("{:?}", column.qualified("orders")), "Column(orders.id)");
    }
}
