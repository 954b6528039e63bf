use crate::parser::{ast::{ArithmeticOp, BoolParser, Column, Function, Literal, NullParser, NumberParser, StringParser}, ExprParser, ParseError};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ScalarExpr {
    Literal(Literal),
    Column(Column),
    Function(Function),
    Binary { left: Box<ScalarExpr>, op: ArithmeticOp, right: Box<ScalarExpr> },
    WildCard,
}

impl ScalarExpr {
    pub fn parse(parser: &mut ExprParser) -> Result<ScalarExpr, ParseError> {
        Self::parse_binary(parser, 1)
    }

    /// Precedence climbing over `+ -` (level 1) and `* /` (level 2); all left-associative.
    fn parse_binary(parser: &mut ExprParser, min_precedence: u8) -> Result<ScalarExpr, ParseError> {
        let mut left = if min_precedence >= 2 {
            Self::parse_atom(parser)?
        } else {
            Self::parse_binary(parser, min_precedence + 1)?
        };

        loop {
            parser.next_non_whitespace();
            let op = match ArithmeticOp::from_char(parser.current()) {
                Some(op) if op.precedence() == min_precedence => op,
                _ => break,
            };
            parser.next();

            let right = if min_precedence >= 2 {
                Self::parse_atom(parser)?
            } else {
                Self::parse_binary(parser, min_precedence + 1)?
            };

            left = ScalarExpr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }

        Ok(left)
    }

    fn parse_atom(parser: &mut ExprParser) -> Result<ScalarExpr, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if parser.eof() {
            return ParseError::new("Invalid scalar value", pivot, parser).err();
        }

        if parser.current() == '(' {
            parser.next();
            let inner = Self::parse(parser)?;
            parser.next_non_whitespace();
            if parser.current() != ')' {
                return ParseError::new("Missing closing parenthesis", pivot, parser).err();
            }
            parser.next();
            return Ok(inner);
        }

        if NumberParser::is_number(parser) {
            return NumberParser::parse(parser)
                .map(ScalarExpr::Literal);
        }
        if StringParser::is_string_delimiter(parser) {
            return StringParser::parse(parser)
                .map(ScalarExpr::Literal);
        }
        if BoolParser::is_bool(parser) {
            return BoolParser::parse(parser)
                .map(ScalarExpr::Literal);
        }

        if NullParser::is_null(parser) {
            return  NullParser::parse(parser)
                .map(ScalarExpr::Literal);
        }

        if parser.comparers.is_reserved(parser) {
            return ParseError::new("Unexpected keyword", pivot, parser).err();
        }

        Column::parse_column_or_function(parser)
    }

    pub fn has_function(&self) -> bool {
        match self {
            ScalarExpr::Function(_) => true,
            ScalarExpr::Binary { left, right, .. } => left.has_function() || right.has_function(),
            _ => false,
        }
    }

    /// Every column reference, in text order.
    pub fn columns(&self) -> Vec<&Column> {
        let mut out = vec![];
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a Column>) {
        match self {
            ScalarExpr::Column(column) => out.push(column),
            ScalarExpr::Function(function) => function.args.iter().for_each(|arg| arg.collect_columns(out)),
            ScalarExpr::Binary { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            },
            ScalarExpr::Literal(_) | ScalarExpr::WildCard => {},
        }
    }

    /// Rebuilds the expression with every column passed through `f`.
    pub fn map_columns<F>(&self, f: &mut F) -> ScalarExpr
    where
        F: FnMut(&Column) -> Column,
    {
        match self {
            ScalarExpr::Column(column) => ScalarExpr::Column(f(column)),
            ScalarExpr::Function(function) => ScalarExpr::Function(Function {
                name: function.name.clone(),
                args: function.args.iter().map(|arg| arg.map_columns(f)).collect(),
            }),
            ScalarExpr::Binary { left, op, right } => ScalarExpr::Binary {
                left: Box::new(left.map_columns(f)),
                op: *op,
                right: Box::new(right.map_columns(f)),
            },
            other => other.clone(),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: ArithmeticOp, is_right: bool) -> fmt::Result {
        match self {
            ScalarExpr::Binary { op, .. }
                if op.precedence() < parent.precedence() || (is_right && op.precedence() == parent.precedence()) =>
            {
                write!(f, "({})", self)
            },
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::Literal(l) => write!(f, "{}", l),
            ScalarExpr::Column(c) => write!(f, "{}", c),
            ScalarExpr::Function(fun) => write!(f, "{}", fun),
            ScalarExpr::Binary { left, op, right } => {
                left.fmt_operand(f, *op, false)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f, *op, true)
            },
            ScalarExpr::WildCard => write!(f, "*"),
        }
    }
}

impl fmt::Debug for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::Literal(_) => write!(f, "Literal({})", self),
            ScalarExpr::Column(_) => write!(f, "Column({})", self),
            ScalarExpr::Function(_) => write!(f, "Function({})", self),
            ScalarExpr::Binary { .. } => write!(f, "Binary({})", self),
            ScalarExpr::WildCard => write!(f, "WildCard(*)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{ArithmeticOp, Column, Literal, ScalarExpr}, ExprParser};

    fn parse(text: &str) -> ScalarExpr {
        let mut parser = ExprParser::new(text);
        ScalarExpr::parse(&mut parser).expect("Failed to parse ScalarExpr")
    }

    #[test]
    pub fn test_scalar_column_name_prefixed_with_whitespace() {
        match parse("   column") {
            ScalarExpr::Column(Column::Name { name }) => assert_eq!(name, "column"),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_scalar_literals() {
        assert_eq!(parse("null"), ScalarExpr::Literal(Literal::Null));
        assert_eq!(parse("true"), ScalarExpr::Literal(Literal::Bool(true)));
        assert_eq!(parse("42"), ScalarExpr::Literal(Literal::Int(42)));
        assert_eq!(parse("'Porto'"), ScalarExpr::Literal(Literal::String("Porto".into())));
    }

    #[test]
    pub fn test_scalar_empty() {
        let mut parser = ExprParser::new("   ");

        match ScalarExpr::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Invalid scalar value"),
        }
    }

    #[test]
    pub fn test_scalar_precedence() {
        match parse("a + b * 2") {
            ScalarExpr::Binary { op, right, .. } => {
                assert_eq!(op, ArithmeticOp::Add);
                assert!(matches!(*right, ScalarExpr::Binary { op: ArithmeticOp::Mul, .. }));
            },
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_scalar_display_keeps_needed_parentheses() {
        assert_eq!(parse("l.price * (1 - l.discount)").to_string(), "l.price * (1 - l.discount)");
        assert_eq!(parse("(a + b) + c").to_string(), "a + b + c");
        assert_eq!(parse("a - (b - c)").to_string(), "a - (b - c)");
        assert_eq!(parse("((a))").to_string(), "a");
    }

    #[test]
    pub fn test_scalar_function_detected() {
        assert!(parse("date_part('year', ce.charttime) - 1").has_function());
        assert!(!parse("ce.value + 1").has_function());
    }

    #[test]
    pub fn test_scalar_columns_in_order() {
        let expr = parse("f(a.x, 2) * b.y");
        let names = expr.columns().iter().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["a.x", "b.y"]);
    }

    #[test]
    pub fn test_scalar_keyword_rejected() {
        let mut parser = ExprParser::new("AND x");
        assert!(ScalarExpr::parse(&mut parser).is_err());
    }
}
