use crate::parser::ExprComparers;

/// Character cursor over a single predicate or scalar text.
#[derive(Debug, Default)]
pub struct ExprParser {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
    pub text: String,
    pub comparers: ExprComparers,
}

impl ExprParser {
    pub fn new(text: &str) -> Self {
        let text_v: Vec<char> = text.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
            text: text.to_string(),
            comparers: ExprComparers::new(),
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        if self.position < self.length {
            return self.text_v[self.position];
        }

        '\0'
    }

    pub fn peek(&self, ahead: usize) -> char {
        self.text_v.get(self.position + ahead).copied().unwrap_or('\0')
    }

    pub fn next(&mut self) {
        if self.position < self.length {
            self.position += 1;
        }
    }

    pub fn next_non_whitespace(&mut self) {
        while self.current().is_whitespace() {
            self.next();
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    /// Moves the cursor back to a previously saved position.
    pub fn rewind(&mut self, position: usize) {
        self.position = position.min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        let start = start.min(end);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    /// True when only whitespace is left.
    pub fn at_end(&mut self) -> bool {
        self.next_non_whitespace();
        self.eof()
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ExprParser;

    #[test]
    pub fn test_cursor_moves_and_clamps() {
        let mut parser = ExprParser::new("ab c");

        assert_eq!(parser.current(), 'a');
        assert_eq!(parser.peek(1), 'b');
        assert_eq!(parser.peek(10), '\0');

        parser.jump(2);
        parser.next_non_whitespace();
        assert_eq!(parser.current(), 'c');

        parser.jump(10);
        assert!(parser.eof());
        assert_eq!(parser.current(), '\0');
    }

    #[test]
    pub fn test_text_from_pivot() {
        let mut parser = ExprParser::new("orders.id");
        parser.jump(6);

        assert_eq!(parser.text_from_pivot(0), "orders");
        assert_eq!(parser.text_from_range(7, 100), "id");
    }

    #[test]
    pub fn test_rewind() {
        let mut parser = ExprParser::new("a = 1");
        parser.jump(3);
        parser.rewind(1);

        assert_eq!(parser.position, 1);
        assert!(!parser.at_end());
    }
}
