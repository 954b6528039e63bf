use crate::{
    error::PlanResult,
    islands::{render_child, GenerationContext, GeneratorOptions, OperatorVisitor},
    parser::ast::{ComparatorOp, Predicate, ScalarExpr},
    planner::{visible_columns, Aggregate, Filter, Island, Join, NodeId, OperatorTree, Scan, Sort},
};

/// Array island generator producing nested AFL calls.
#[derive(Debug)]
pub struct AflQueryGenerator {
    context: GenerationContext<String>,
}

impl Default for AflQueryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AflQueryGenerator {
    pub fn new() -> Self {
        Self { context: GenerationContext::new("afl generator") }
    }

    fn context(&mut self) -> &mut GenerationContext<String> {
        &mut self.context
    }

    fn child(&mut self, tree: &OperatorTree, child: NodeId) -> PlanResult<String> {
        render_child(self, Self::context, tree, child, |token| token.to_string())
    }
}

/// Splits a join predicate into `column = column` pairs and whatever is left.
fn split_join_predicate(predicate: Option<&Predicate>) -> (Vec<(String, String)>, Option<Predicate>) {
    let mut pairs = vec![];
    let mut rest = vec![];

    for conjunct in predicate.map(|p| p.conjuncts()).unwrap_or_default() {
        match conjunct {
            Predicate::Compare { left: ScalarExpr::Column(left), op: ComparatorOp::Eq, right: ScalarExpr::Column(right) } => {
                pairs.push((left.to_string(), right.to_string()))
            },
            other => rest.push(other.clone()),
        }
    }

    (pairs, Predicate::conjunction(rest))
}

impl OperatorVisitor for AflQueryGenerator {
    fn island(&self) -> Island {
        Island::Array
    }

    fn configure(&mut self, options: GeneratorOptions) -> PlanResult<()> {
        self.context.configure(options)
    }

    fn visit_scan(&mut self, tree: &OperatorTree, id: NodeId, scan: &Scan) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let base = match tree.children(id).first() {
            Some(child) => self.child(tree, *child)?,
            None => scan.source_object_name().to_string(),
        };

        let mut text = match scan.filter_expression() {
            Some(filter) => format!("filter({}, {})", base, filter),
            None if self.context.is_nested() => base,
            None => format!("scan({})", base),
        };
        if let Some(alias) = scan.table_alias() {
            if self.context.is_nested() {
                text = format!("{} as {}", text, alias);
            }
        }

        self.context.push(text);
        Ok(())
    }

    fn visit_filter(&mut self, tree: &OperatorTree, id: NodeId, filter: &Filter) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let child = self.child(tree, tree.single_child(id)?)?;
        self.context.push(format!("filter({}, {})", child, filter.predicate));
        Ok(())
    }

    fn visit_project(&mut self, tree: &OperatorTree, id: NodeId) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let mut text = self.child(tree, tree.single_child(id)?)?;
        let schema = tree.node(id).out_schema();

        let computed: Vec<String> = visible_columns(schema)
            .filter(|column| !column.is_passthrough())
            .map(|column| format!("{}, {}", column.name, column.expression_text.trim()))
            .collect();
        if !computed.is_empty() {
            text = format!("apply({}, {})", text, computed.join(", "));
        }

        let names: Vec<&str> = visible_columns(schema).map(|column| column.name.as_str()).collect();
        if !names.is_empty() {
            text = format!("project({}, {})", text, names.join(", "));
        }

        self.context.push(text);
        Ok(())
    }

    fn visit_join(&mut self, tree: &OperatorTree, id: NodeId, join: &Join) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let mut inputs = vec![];
        for child in tree.children(id) {
            inputs.push(self.child(tree, *child)?);
        }

        let (pairs, rest) = split_join_predicate(join.predicate.as_ref());
        for (left, right) in pairs {
            inputs.push(left);
            inputs.push(right);
        }

        let mut text = format!("cross_join({})", inputs.join(", "));
        if let Some(rest) = rest {
            text = format!("filter({}, {})", text, rest);
        }

        self.context.push(text);
        Ok(())
    }

    fn visit_aggregate(&mut self, tree: &OperatorTree, id: NodeId, aggregate: &Aggregate) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let child = self.child(tree, tree.single_child(id)?)?;

        let mut arguments: Vec<String> = visible_columns(tree.node(id).out_schema())
            .filter(|column| column.expression().is_some_and(|expr| expr.has_function()))
            .map(|column| format!("{} as {}", column.expression_text.trim(), column.name))
            .collect();
        if arguments.is_empty() {
            arguments.push("count(*)".to_string());
        }
        arguments.extend(aggregate.group_keys.iter().cloned());

        self.context.push(format!("aggregate({}, {})", child, arguments.join(", ")));
        Ok(())
    }

    fn visit_sort(&mut self, tree: &OperatorTree, id: NodeId, sort: &Sort) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Array)?;

        let child = self.child(tree, tree.single_child(id)?)?;
        let keys: Vec<String> = sort
            .keys
            .iter()
            .map(|key| if key.descending { format!("{} desc", key.column) } else { key.column.clone() })
            .collect();

        self.context.push(format!("sort({}, {})", child, keys.join(", ")));
        Ok(())
    }

    fn generate_statement_string(&self) -> String {
        match self.context.last() {
            Some(text) if self.context.options().terminate_statement => format!("{};", text),
            Some(text) => text.clone(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        islands::{generate_statement, AflQueryGenerator, GeneratorOptions, OperatorVisitor},
        planner::{
            out_schema, Island, NodeId, OperatorParams, OperatorTree, OutSchema, ALIAS, FILTER, GROUP_KEY, JOIN_FILTER,
            RELATION_NAME, SORT_KEY,
        },
    };

    fn scan(tree: &mut OperatorTree, name: &str, alias: Option<&str>, filter: Option<&str>) -> NodeId {
        let mut params = OperatorParams::new().with(RELATION_NAME, name);
        if let Some(alias) = alias {
            params.insert(ALIAS, alias);
        }
        if let Some(filter) = filter {
            params.insert(FILTER, filter);
        }
        tree.add_scan(Island::Array, &params, OutSchema::new(), None).unwrap()
    }

    fn afl(tree: &OperatorTree, root: NodeId) -> String {
        generate_statement(tree, root, &mut AflQueryGenerator::new(), GeneratorOptions::default()).unwrap()
    }

    #[test]
    pub fn test_afl_empty_before_visit() {
        assert_eq!(AflQueryGenerator::new().generate_statement_string(), "");
    }

    #[test]
    pub fn test_afl_root_scan() {
        let mut tree = OperatorTree::new();
        let leaf = scan(&mut tree, "readings", None, None);
        assert_eq!(afl(&tree, leaf), "scan(readings)");
    }

    #[test]
    pub fn test_afl_cross_join_with_aliases() {
        let mut tree = OperatorTree::new();
        let region = scan(&mut tree, "region", Some("region_trimmed"), Some("region.r_name = 'AMERICA'"));
        let nation = scan(&mut tree, "nation", Some("nation_trimmed"), None);
        let join = tree
            .add_join(
                Island::Array,
                &OperatorParams::new().with(JOIN_FILTER, "region_trimmed.r_regionkey = nation_trimmed.n_regionkey"),
                OutSchema::new(),
                region,
                nation,
            )
            .unwrap();

        let options = GeneratorOptions { terminate_statement: true, ..Default::default() };
        let text = generate_statement(&tree, join, &mut AflQueryGenerator::new(), options).unwrap();
        assert_eq!(
            text,
            "cross_join(filter(region, region.r_name = 'AMERICA') as region_trimmed, nation as nation_trimmed, \
             region_trimmed.r_regionkey, nation_trimmed.n_regionkey);"
        );
    }

    #[test]
    pub fn test_afl_join_remainder_filtered() {
        let mut tree = OperatorTree::new();
        let a = scan(&mut tree, "a", None, None);
        let b = scan(&mut tree, "b", None, None);
        let join = tree
            .add_join(Island::Array, &OperatorParams::new().with(JOIN_FILTER, "a.x = b.y AND a.t < b.t"), OutSchema::new(), a, b)
            .unwrap();

        assert_eq!(afl(&tree, join), "filter(cross_join(a, b, a.x, b.y), a.t < b.t)");
    }

    #[test]
    pub fn test_afl_project_with_apply() {
        let mut tree = OperatorTree::new();
        let leaf = scan(&mut tree, "readings", None, None);
        let project = tree
            .add_project(Island::Array, out_schema([("v", "v"), ("v2", "v * 2")]), leaf)
            .unwrap();

        assert_eq!(afl(&tree, project), "project(apply(readings, v2, v * 2), v, v2)");
    }

    #[test]
    pub fn test_afl_aggregate_and_sort() {
        let mut tree = OperatorTree::new();
        let leaf = scan(&mut tree, "readings", None, Some("v > 0"));
        let aggregate = tree
            .add_aggregate(Island::Array, &OperatorParams::new().with(GROUP_KEY, "station"), out_schema([("total", "sum(v)")]), leaf)
            .unwrap();
        let sort = tree
            .add_sort(Island::Array, &OperatorParams::new().with(SORT_KEY, "total DESC"), OutSchema::new(), aggregate)
            .unwrap();

        assert_eq!(afl(&tree, sort), "sort(aggregate(filter(readings, v > 0), sum(v) as total, station), total desc)");
    }

    #[test]
    pub fn test_afl_pruned_child_as_token() {
        let mut tree = OperatorTree::new();
        let leaf = scan(&mut tree, "readings", None, Some("v > 0"));
        tree.set_prune_token(leaf, Some("island_pruned_0".to_string())).unwrap();
        let filter = tree
            .add_filter(Island::Array, &OperatorParams::new().with(FILTER, "v < 9"), OutSchema::new(), leaf)
            .unwrap();

        let options = GeneratorOptions { emit_pruned_tokens: true, ..Default::default() };
        let text = generate_statement(&tree, filter, &mut AflQueryGenerator::new(), options).unwrap();
        assert_eq!(text, "filter(island_pruned_0, v < 9)");
        assert_eq!(afl(&tree, filter), "filter(filter(readings, v > 0), v < 9)");
    }
}
