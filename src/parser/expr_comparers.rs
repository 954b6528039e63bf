use crate::parser::WordComparer;

#[derive(Debug)]
pub struct ExprComparers {
    pub and: WordComparer,
    pub or: WordComparer,
    pub not: WordComparer,
    pub is: WordComparer,
    pub null: WordComparer,
    pub r#in: WordComparer,
    pub like: WordComparer,
    pub b_true: WordComparer,
    pub b_false: WordComparer,
    pub equal: WordComparer,
    pub not_equal_b: WordComparer, // basic
    pub not_equal_c: WordComparer, // c
    pub greater_than: WordComparer,
    pub greater_than_or_equal: WordComparer,
    pub less_than: WordComparer,
    pub less_than_or_equal: WordComparer,
}

impl Default for ExprComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprComparers {
    pub fn new() -> Self {
        Self {
            and: WordComparer::new("AND").with_any_delimiter_postfix().with_eof(),
            or: WordComparer::new("OR").with_any_delimiter_postfix().with_eof(),
            not: WordComparer::new("NOT").with_any_delimiter_postfix().with_eof(),
            is: WordComparer::new("IS").with_whitespace_postfix(),
            null: WordComparer::new("NULL").with_any_delimiter_postfix().with_eof(),
            r#in: WordComparer::new("IN").with_any_delimiter_postfix(),
            like: WordComparer::new("LIKE").with_any_delimiter_postfix(),
            b_true: WordComparer::new("TRUE").with_any_delimiter_postfix().with_eof(),
            b_false: WordComparer::new("FALSE").with_any_delimiter_postfix().with_eof(),
            equal: WordComparer::new("="),
            not_equal_b: WordComparer::new("<>"),
            not_equal_c: WordComparer::new("!="),
            greater_than: WordComparer::new(">"),
            greater_than_or_equal: WordComparer::new(">="),
            less_than: WordComparer::new("<"),
            less_than_or_equal: WordComparer::new("<="),
        }
    }

    /// True when the cursor sits on a keyword that can never start an identifier.
    pub fn is_reserved(&self, parser: &crate::parser::ExprParser) -> bool {
        self.and.compare(parser) || self.or.compare(parser) || self.not.compare(parser) ||
            self.is.compare(parser) || self.r#in.compare(parser) || self.like.compare(parser)
    }
}
