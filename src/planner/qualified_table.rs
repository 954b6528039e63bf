use std::fmt;

/// Schema every engine resolves unqualified names against; never written out.
pub const DEFAULT_SCHEMA: &str = "public";

/// Table reference as the relational island writes it in a FROM list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTableRef {
    pub name: String,
    pub schema_name: Option<String>,
    pub alias: Option<String>,
}

impl QualifiedTableRef {
    /// Drops the default schema and any alias that only repeats the name.
    pub fn new(name: &str, schema_name: Option<&str>, alias: Option<&str>) -> Self {
        let schema_name = schema_name
            .filter(|schema| *schema != DEFAULT_SCHEMA)
            .map(|schema| schema.to_string());
        let alias = alias
            .filter(|alias| !alias.eq_ignore_ascii_case(name))
            .map(|alias| alias.to_string());

        Self { name: name.to_string(), schema_name, alias }
    }

    /// `schema.name`, or just `name` in the default schema.
    pub fn qualified_name(&self) -> String {
        match &self.schema_name {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// The name columns are qualified with inside the query.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for QualifiedTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::planner::QualifiedTableRef;

    #[test]
    pub fn test_qualified_ref_default_schema_omitted() {
        let table = QualifiedTableRef::new("orders", Some("public"), None);
        assert_eq!(table.schema_name, None);
        assert_eq!(table.qualified_name(), "orders");

        let upper = QualifiedTableRef::new("orders", Some("PUBLIC"), None);
        assert_eq!(upper.schema_name.as_deref(), Some("PUBLIC"));
        assert_eq!(upper.qualified_name(), "PUBLIC.orders");
    }

    #[test]
    pub fn test_qualified_ref_other_schema_kept() {
        let table = QualifiedTableRef::new("orders", Some("sales"), Some("o"));
        assert_eq!(table.qualified_name(), "sales.orders");
        assert_eq!(table.to_string(), "sales.orders AS o");
        assert_eq!(table.reference_name(), "o");
    }

    #[test]
    pub fn test_qualified_ref_alias_equal_to_name_dropped() {
        let table = QualifiedTableRef::new("Orders", None, Some("orders"));
        assert_eq!(table.alias, None);
        assert_eq!(table.to_string(), "Orders");
        assert_eq!(table.reference_name(), "Orders");
    }
}
