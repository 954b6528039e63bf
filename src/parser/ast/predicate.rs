use std::fmt;

use crate::parser::{ast::{ArgsParser, Column, ComparatorOp, Literal, ScalarExpr}, is_synthetic_object_name, ExprParser, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),

    // Predicates that *embed* scalars:
    Compare { left: ScalarExpr, op: ComparatorOp, right: ScalarExpr }, // =, <, <=, >, >=, <>, !=
    IsNull  { expr: ScalarExpr, negated: bool },
    InList  { expr: ScalarExpr, list: Vec<ScalarExpr>, negated: bool },
    Like    { expr: ScalarExpr, pattern: ScalarExpr, negated: bool },
    /// A boolean column or function used on its own, as in `NOT is_deleted`.
    Truth(ScalarExpr),
    Const(bool),
}

impl Predicate {
    /// Parses a whole predicate text; anything left after it is an error.
    pub fn parse_text(text: &str) -> Result<Self, ParseError> {
        let mut parser = ExprParser::new(text);
        let predicate = Self::parse(&mut parser)?;

        if !parser.at_end() {
            return ParseError::new("Unexpected text after predicate", parser.position, &parser).err();
        }

        Ok(predicate)
    }

    pub fn parse(parser: &mut ExprParser) -> Result<Self, ParseError> {
        Self::parse_or(parser)
    }

    fn parse_or(parser: &mut ExprParser) -> Result<Self, ParseError> {
        let mut predicates = vec![Self::parse_and(parser)?];

        loop {
            parser.next_non_whitespace();
            if !parser.comparers.or.compare(parser) {
                break;
            }
            parser.jump(parser.comparers.or.length);

            match Self::parse_and(parser)? {
                Predicate::Or(inner) => predicates.extend(inner),
                other => predicates.push(other),
            }
        }

        if predicates.len() == 1 {
            return Ok(predicates.remove(0));
        }

        Ok(Self::flatten_or(predicates))
    }

    fn parse_and(parser: &mut ExprParser) -> Result<Self, ParseError> {
        let mut predicates = vec![Self::parse_not(parser)?];

        loop {
            parser.next_non_whitespace();
            if !parser.comparers.and.compare(parser) {
                break;
            }
            parser.jump(parser.comparers.and.length);

            predicates.push(Self::parse_not(parser)?);
        }

        if predicates.len() == 1 {
            return Ok(predicates.remove(0));
        }

        Ok(Self::flatten_and(predicates))
    }

    fn parse_not(parser: &mut ExprParser) -> Result<Self, ParseError> {
        parser.next_non_whitespace();

        if parser.comparers.not.compare(parser) {
            parser.jump(parser.comparers.not.length);
            return Ok(Predicate::Not(Box::new(Self::parse_not(parser)?)));
        }

        Self::parse_primary(parser)
    }

    /// A parenthesis opens either a nested predicate or a scalar such as `(a + b) > 3`;
    /// the predicate reading is tried first and the cursor rewinds if it fails or if
    /// the closing parenthesis is followed by more of a scalar, as in `(a) > 3`.
    fn parse_primary(parser: &mut ExprParser) -> Result<Self, ParseError> {
        parser.next_non_whitespace();

        if parser.current() == '(' {
            let pivot = parser.position;
            parser.next();

            if let Ok(inner) = Self::parse_or(parser) {
                parser.next_non_whitespace();
                if parser.current() == ')' {
                    parser.next();
                    let after = parser.position;
                    if !Self::continues_scalar(parser) {
                        parser.rewind(after);
                        return Ok(inner);
                    }
                }
            }

            parser.rewind(pivot);
        }

        Self::parse_single(parser)
    }

    /// True when the text at the cursor extends a scalar rather than ending a predicate.
    fn continues_scalar(parser: &mut ExprParser) -> bool {
        parser.next_non_whitespace();
        matches!(parser.current(), '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/')
            || parser.comparers.is.compare(parser)
            || parser.comparers.r#in.compare(parser)
            || parser.comparers.like.compare(parser)
            || parser.comparers.not.compare(parser)
    }

    pub fn parse_single(parser: &mut ExprParser) -> Result<Self, ParseError> {
        let left = ScalarExpr::parse(parser)?;

        parser.next_non_whitespace();

        let pivot = parser.position;
        if let Some(op) = ComparatorOp::check(parser) {
            let right = ScalarExpr::parse(parser)?;
            return Ok(Self::Compare { left, op, right });
        }

        if parser.comparers.is.compare(parser) {
            parser.jump(parser.comparers.is.length);
            parser.next_non_whitespace();

            let negated = parser.comparers.not.compare(parser);
            if negated {
                parser.jump(parser.comparers.not.length);
                parser.next_non_whitespace();
            }

            if !parser.comparers.null.compare(parser) {
                return ParseError::new("Invalid IS predicate", pivot, parser).err();
            }
            parser.jump(parser.comparers.null.length);

            return Ok(Self::IsNull { expr: left, negated });
        }

        let negated = parser.comparers.not.compare(parser);
        if negated {
            parser.jump(parser.comparers.not.length);
            parser.next_non_whitespace();
        }

        if parser.comparers.r#in.compare(parser) {
            parser.jump(parser.comparers.r#in.length);
            let list = ArgsParser::parse(parser, false)?;
            return Ok(Self::InList { expr: left, list, negated });
        }

        if parser.comparers.like.compare(parser) {
            parser.jump(parser.comparers.like.length);
            let pattern = ScalarExpr::parse(parser)?;
            return Ok(Self::Like { expr: left, pattern, negated });
        }

        if !negated {
            match left {
                ScalarExpr::Literal(Literal::Bool(value)) => return Ok(Self::Const(value)),
                ScalarExpr::Column(_) | ScalarExpr::Function(_) => return Ok(Self::Truth(left)),
                _ => {},
            }
        }

        ParseError::new("Invalid predicate", pivot, parser).err()
    }

    fn flatten_and(predicates: Vec<Predicate>) -> Predicate {
        let mut flat = vec![];
        for predicate in predicates {
            match predicate {
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Predicate::And(flat)
    }

    fn flatten_or(predicates: Vec<Predicate>) -> Predicate {
        let mut flat = vec![];
        for predicate in predicates {
            match predicate {
                Predicate::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Predicate::Or(flat)
    }

    /// Joins predicates with AND; `None` for an empty list.
    pub fn conjunction(predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.into_iter().next(),
            _ => Some(Self::flatten_and(predicates)),
        }
    }

    /// Top-level AND terms; anything else is a single term.
    pub fn conjuncts(&self) -> Vec<&Predicate> {
        match self {
            Predicate::And(predicates) => predicates.iter().flat_map(|p| p.conjuncts()).collect(),
            other => vec![other],
        }
    }

    pub fn scalars(&self) -> Vec<&ScalarExpr> {
        let mut out = vec![];
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars<'a>(&'a self, out: &mut Vec<&'a ScalarExpr>) {
        match self {
            Predicate::And(predicates) | Predicate::Or(predicates) => {
                predicates.iter().for_each(|p| p.collect_scalars(out))
            },
            Predicate::Not(inner) => inner.collect_scalars(out),
            Predicate::Compare { left, right, .. } => {
                out.push(left);
                out.push(right);
            },
            Predicate::IsNull { expr, .. } => out.push(expr),
            Predicate::InList { expr, list, .. } => {
                out.push(expr);
                out.extend(list.iter());
            },
            Predicate::Like { expr, pattern, .. } => {
                out.push(expr);
                out.push(pattern);
            },
            Predicate::Truth(expr) => out.push(expr),
            Predicate::Const(_) => {},
        }
    }

    pub fn columns(&self) -> Vec<&Column> {
        self.scalars().into_iter().flat_map(|s| s.columns()).collect()
    }

    pub fn has_function(&self) -> bool {
        self.scalars().iter().any(|s| s.has_function())
    }

    /// Objects referenced by qualified columns; unqualified columns count as `default_object`.
    pub fn referenced_objects(&self, default_object: &str) -> Vec<String> {
        let mut objects: Vec<String> = vec![];
        for column in self.columns() {
            let object = column.collection().unwrap_or(default_object).to_string();
            if !objects.contains(&object) {
                objects.push(object);
            }
        }
        objects
    }

    /// True when the predicate references at least one object and every one of them
    /// is a planner-generated intermediate.
    pub fn references_only_synthetic_objects(&self, default_object: &str) -> bool {
        let objects = self.referenced_objects(default_object);
        !objects.is_empty() && objects.iter().all(|o| is_synthetic_object_name(o))
    }

    /// Rebuilds the predicate with every column passed through `f`.
    pub fn map_columns<F>(&self, f: &mut F) -> Predicate
    where
        F: FnMut(&Column) -> Column,
    {
        match self {
            Predicate::And(predicates) => Predicate::And(predicates.iter().map(|p| p.map_columns(f)).collect()),
            Predicate::Or(predicates) => Predicate::Or(predicates.iter().map(|p| p.map_columns(f)).collect()),
            Predicate::Not(inner) => Predicate::Not(Box::new(inner.map_columns(f))),
            Predicate::Compare { left, op, right } => Predicate::Compare {
                left: left.map_columns(f),
                op: *op,
                right: right.map_columns(f),
            },
            Predicate::IsNull { expr, negated } => Predicate::IsNull { expr: expr.map_columns(f), negated: *negated },
            Predicate::InList { expr, list, negated } => Predicate::InList {
                expr: expr.map_columns(f),
                list: list.iter().map(|s| s.map_columns(f)).collect(),
                negated: *negated,
            },
            Predicate::Like { expr, pattern, negated } => Predicate::Like {
                expr: expr.map_columns(f),
                pattern: pattern.map_columns(f),
                negated: *negated,
            },
            Predicate::Truth(expr) => Predicate::Truth(expr.map_columns(f)),
            Predicate::Const(value) => Predicate::Const(*value),
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(_) | Predicate::Or(_) => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = |negated: &bool| if *negated { "NOT " } else { "" };

        match self {
            Predicate::And(predicates) | Predicate::Or(predicates) => {
                let keyword = if matches!(self, Predicate::And(_)) { " AND " } else { " OR " };
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", keyword)?;
                    }
                    predicate.fmt_nested(f)?;
                }
                Ok(())
            },
            Predicate::Not(inner) => {
                write!(f, "NOT ")?;
                inner.fmt_nested(f)
            },
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Predicate::IsNull { expr, negated } => write!(f, "{} IS {}NULL", expr, not(negated)),
            Predicate::InList { expr, list, negated } => {
                let list = list.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "{} {}IN ({})", expr, not(negated), list)
            },
            Predicate::Like { expr, pattern, negated } => write!(f, "{} {}LIKE {}", expr, not(negated), pattern),
            Predicate::Truth(expr) => write!(f, "{}", expr),
            Predicate::Const(true) => write!(f, "TRUE"),
            Predicate::Const(false) => write!(f, "FALSE"),
        }
    }
}
