use crate::{
    error::{PlanError, PlanResult},
    parser::{ast::Predicate, normalize_filter_text, synthetic_object_name},
    planner::{OperatorParams, QualifiedTableRef, ALIAS, CTE_NAME, FILTER, RELATION_NAME, SCHEMA},
};

/// Leaf read of one data object, optionally filtered.
///
/// A scan is never blocking. Its filter, once parsed, is never mutated in place:
/// `set_filter_expression` replaces it wholesale.
#[derive(Debug, PartialEq)]
pub struct Scan {
    source_object_name: String,
    table_alias: Option<String>,
    filter_expression: Option<Predicate>,
    has_function_in_filter: bool,
    qualified_ref: QualifiedTableRef,
}

impl Scan {
    /// Builds a scan from explain parameters.
    ///
    /// The object name comes from `Relation-Name`, then `CTE-Name`. A scan over a
    /// child result may have neither; it then reads an intermediate named after
    /// the child node.
    pub fn from_params(params: &OperatorParams, child_ordinal: Option<usize>) -> PlanResult<Self> {
        let source_object_name = match (params.get(RELATION_NAME).or(params.get(CTE_NAME)), child_ordinal) {
            (Some(name), _) => name.to_string(),
            (None, Some(ordinal)) => synthetic_object_name("intermediate", ordinal),
            (None, None) => {
                return Err(PlanError::construction(
                    "scan",
                    format!("neither '{}' nor '{}' given and no child to read from", RELATION_NAME, CTE_NAME),
                ))
            },
        };

        let table_alias = params.get(ALIAS).map(|alias| alias.to_string());
        let filter_expression = match params.get(FILTER) {
            Some(text) => Some(parse_filter(text)?),
            None => None,
        };
        let qualified_ref = QualifiedTableRef::new(&source_object_name, params.get(SCHEMA), table_alias.as_deref());

        Ok(Self::assemble(source_object_name, table_alias, filter_expression, qualified_ref))
    }

    fn assemble(
        source_object_name: String,
        table_alias: Option<String>,
        filter_expression: Option<Predicate>,
        qualified_ref: QualifiedTableRef,
    ) -> Self {
        let has_function_in_filter = filter_expression.as_ref().is_some_and(|f| f.has_function());
        Self { source_object_name, table_alias, filter_expression, has_function_in_filter, qualified_ref }
    }

    /// Independent copy. The filter goes through its canonical text and back, so
    /// the copy shares nothing with `self`.
    pub fn try_clone(&self) -> PlanResult<Self> {
        let filter_expression = match &self.filter_expression {
            Some(filter) => {
                let text = filter.to_string();
                Some(Predicate::parse_text(&text).map_err(|e| PlanError::expression_parse(text, e))?)
            },
            None => None,
        };

        let qualified_ref = QualifiedTableRef {
            name: self.qualified_ref.name.clone(),
            schema_name: self.qualified_ref.schema_name.clone(),
            alias: self.qualified_ref.alias.clone(),
        };

        Ok(Self::assemble(
            self.source_object_name.clone(),
            self.table_alias.clone(),
            filter_expression,
            qualified_ref,
        ))
    }

    pub fn source_object_name(&self) -> &str {
        &self.source_object_name
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    pub fn filter_expression(&self) -> Option<&Predicate> {
        self.filter_expression.as_ref()
    }

    pub fn has_function_in_filter(&self) -> bool {
        self.has_function_in_filter
    }

    pub fn qualified_ref(&self) -> &QualifiedTableRef {
        &self.qualified_ref
    }

    /// Schema-qualified name used as the key for locations and signatures.
    pub fn canonical_name(&self) -> String {
        self.qualified_ref.qualified_name()
    }

    /// Name unqualified columns in the filter refer to.
    pub fn reference_name(&self) -> &str {
        self.table_alias.as_deref().unwrap_or(&self.source_object_name)
    }

    pub fn filter_text(&self) -> Option<String> {
        self.filter_expression.as_ref().map(|f| f.to_string())
    }

    pub fn set_filter_expression(&mut self, filter_expression: Option<Predicate>) {
        self.has_function_in_filter = filter_expression.as_ref().is_some_and(|f| f.has_function());
        self.filter_expression = filter_expression;
    }
}

/// Parses a filter as explain output prints it.
pub fn parse_filter(text: &str) -> PlanResult<Predicate> {
    let normalized = normalize_filter_text(text);
    Predicate::parse_text(&normalized).map_err(|e| PlanError::expression_parse(text, e))
}
