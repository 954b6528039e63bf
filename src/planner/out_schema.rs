use indexmap::IndexMap;

use crate::parser::{ast::ScalarExpr, ExprParser};

/// Output columns of an operator, keyed by name in output order.
pub type OutSchema = IndexMap<String, OutputColumn>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub is_hidden: bool,
    pub name: String,
    pub expression_text: String,
}

impl OutputColumn {
    pub fn new(name: &str, expression_text: &str) -> Self {
        Self { is_hidden: false, name: name.to_string(), expression_text: expression_text.to_string() }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// True when the column is a plain pass-through of a same-named input.
    pub fn is_passthrough(&self) -> bool {
        let text = self.expression_text.trim();
        text.is_empty()
            || text == self.name
            || text.rsplit_once('.').is_some_and(|(_, column)| column == self.name)
    }

    /// Parsed expression, or `None` when the text is not a scalar expression we understand.
    pub fn expression(&self) -> Option<ScalarExpr> {
        let mut parser = ExprParser::new(&self.expression_text);
        let expr = ScalarExpr::parse(&mut parser).ok()?;
        parser.at_end().then_some(expr)
    }
}

/// Builds a schema from `(name, expression)` pairs.
pub fn out_schema<'a>(columns: impl IntoIterator<Item = (&'a str, &'a str)>) -> OutSchema {
    columns
        .into_iter()
        .map(|(name, expr)| (name.to_string(), OutputColumn::new(name, expr)))
        .collect()
}

pub fn visible_columns(schema: &OutSchema) -> impl Iterator<Item = &OutputColumn> {
    schema.values().filter(|column| !column.is_hidden)
}

#[cfg(test)]
mod tests {
    use crate::planner::{out_schema, visible_columns, OutputColumn};

    #[test]
    pub fn test_out_schema_keeps_order() {
        let mut schema = out_schema([("b", "t.b"), ("a", "t.a")]);
        schema.insert("c".to_string(), OutputColumn::new("c", "t.c").hidden());

        let names: Vec<_> = visible_columns(&schema).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    pub fn test_output_column_passthrough() {
        assert!(OutputColumn::new("id", "o.id").is_passthrough());
        assert!(OutputColumn::new("id", "").is_passthrough());
        assert!(!OutputColumn::new("total", "sum(o.price)").is_passthrough());
    }

    #[test]
    pub fn test_output_column_expression() {
        assert!(OutputColumn::new("total", "sum(o.price)").expression().unwrap().has_function());
        assert!(OutputColumn::new("x", "count(*) filter").expression().is_none());
    }
}
