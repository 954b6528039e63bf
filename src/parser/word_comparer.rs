use crate::parser::ExprParser;

/// What must follow a matched word for the match to count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordBoundary {
    /// Symbols such as `<=` match whatever comes next.
    #[default]
    None,
    Whitespace,
    /// Whitespace or one of `,().'`.
    AnyDelimiter,
}

/// Case-insensitive matcher for one keyword or operator symbol at the cursor.
#[derive(Debug, Default)]
pub struct WordComparer {
    pub length: usize,
    word: Vec<char>,
    boundary: WordBoundary,
    matches_at_end: bool,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.to_uppercase().chars().collect();
        Self { length: word.len(), word, ..Self::default() }
    }

    pub fn with_eof(mut self) -> Self {
        self.matches_at_end = true;
        self
    }

    pub fn with_whitespace_postfix(mut self) -> Self {
        self.boundary = WordBoundary::Whitespace;
        self
    }

    pub fn with_any_delimiter_postfix(mut self) -> Self {
        self.boundary = WordBoundary::AnyDelimiter;
        self
    }

    pub fn is_delimiter(ch: char) -> bool {
        ch.is_ascii_whitespace() || matches!(ch, ',' | '(' | ')' | '.' | '\'')
    }

    pub fn is_current_break_line(parser: &ExprParser) -> bool {
        matches!(parser.current(), '\r' | '\n')
    }

    pub fn compare(&self, parser: &ExprParser) -> bool {
        let start = parser.position;
        let Some(candidate) = parser.text_v.get(start..start + self.length) else {
            return false;
        };
        if !candidate.iter().zip(&self.word).all(|(c, w)| c.to_ascii_uppercase() == *w) {
            return false;
        }

        match (self.boundary, parser.text_v.get(start + self.length)) {
            (WordBoundary::None, _) => true,
            (_, None) => self.matches_at_end,
            (WordBoundary::Whitespace, Some(next)) => next.is_ascii_whitespace(),
            (WordBoundary::AnyDelimiter, Some(next)) => Self::is_delimiter(*next),
        }
    }

    /// Compares and, on a match, moves the cursor past the word.
    pub fn consume(&self, parser: &mut ExprParser) -> bool {
        if !self.compare(parser) {
            return false;
        }
        parser.jump(self.length);
        true
    }
}
