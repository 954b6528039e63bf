use std::fmt;

use crate::parser::ExprParser;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq
}

impl fmt::Display for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorOp::Eq => write!(f, "="),
            ComparatorOp::NotEq => write!(f, "<>"),
            ComparatorOp::Lt => write!(f, "<"),
            ComparatorOp::LtEq => write!(f, "<="),
            ComparatorOp::Gt => write!(f, ">"),
            ComparatorOp::GtEq => write!(f, ">="),
        }
    }
}

impl fmt::Debug for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparatorOp({})", self)
    }
}

impl ComparatorOp {
    /// Two-character operators are tried first so `<=` never reads as `<`.
    pub fn check(parser: &mut ExprParser) -> Option<ComparatorOp> {
        let candidates = [
            (&parser.comparers.less_than_or_equal, ComparatorOp::LtEq),
            (&parser.comparers.greater_than_or_equal, ComparatorOp::GtEq),
            (&parser.comparers.not_equal_b, ComparatorOp::NotEq),
            (&parser.comparers.not_equal_c, ComparatorOp::NotEq),
            (&parser.comparers.equal, ComparatorOp::Eq),
            (&parser.comparers.less_than, ComparatorOp::Lt),
            (&parser.comparers.greater_than, ComparatorOp::Gt),
        ];

        let found = candidates
            .iter()
            .find(|(comparer, _)| comparer.compare(parser))
            .map(|(comparer, op)| (comparer.length, *op));

        found.map(|(length, op)| {
            parser.jump(length);
            op
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div
}

impl ArithmeticOp {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(ArithmeticOp::Add),
            '-' => Some(ArithmeticOp::Sub),
            '*' => Some(ArithmeticOp::Mul),
            '/' => Some(ArithmeticOp::Div),
            _ => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            ArithmeticOp::Add | ArithmeticOp::Sub => 1,
            ArithmeticOp::Mul | ArithmeticOp::Div => 2,
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Sub => write!(f, "-"),
            ArithmeticOp::Mul => write!(f, "*"),
            ArithmeticOp::Div => write!(f, "/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::ComparatorOp, ExprParser};

    #[test]
    pub fn test_comparator_longest_match() {
        let cases = [
            ("<= 3", ComparatorOp::LtEq, 2),
            (">=3", ComparatorOp::GtEq, 2),
            ("<> 3", ComparatorOp::NotEq, 2),
            ("!= 3", ComparatorOp::NotEq, 2),
            ("= 3", ComparatorOp::Eq, 1),
            ("<3", ComparatorOp::Lt, 1),
            ("> 3", ComparatorOp::Gt, 1),
        ];

        for (text, expected, consumed) in cases {
            let mut parser = ExprParser::new(text);
            assert_eq!(ComparatorOp::check(&mut parser), Some(expected), "{text}");
            assert_eq!(parser.position, consumed, "{text}");
        }
    }

    #[test]
    pub fn test_comparator_none() {
        let mut parser = ExprParser::new("LIKE 'x'");
        assert_eq!(ComparatorOp::check(&mut parser), None);
        assert_eq!(parser.position, 0);
    }
}
