use crate::{
    error::PlanResult,
    islands::{render_child, GenerationContext, GeneratorOptions, OperatorVisitor},
    parser::{ast::Predicate, synthetic_object_name},
    planner::{visible_columns, Aggregate, Filter, Island, Join, NodeId, OperatorTree, OutSchema, Scan, Sort},
};

/// One SELECT under construction. Operators fold into the block of their child
/// until a clause is already taken, then the child becomes a derived table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBlock {
    pub select: Vec<String>,
    pub from: Vec<String>,
    pub conditions: Vec<Predicate>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
}

impl SelectBlock {
    pub fn table(name: &str) -> Self {
        Self { from: vec![name.to_string()], ..Default::default() }
    }

    /// Only FROM and WHERE are in use.
    pub fn is_simple(&self) -> bool {
        self.select.is_empty() && self.group_by.is_empty() && self.order_by.is_empty()
    }

    pub fn derived(self, alias: &str) -> Self {
        Self::table(&format!("({}) AS {}", self.to_sql(), alias))
    }

    pub fn to_sql(&self) -> String {
        let select = if self.select.is_empty() { "*".to_string() } else { self.select.join(", ") };
        let mut sql = format!("SELECT {} FROM {}", select, self.from.join(", "));

        if let Some(condition) = Predicate::conjunction(self.conditions.clone()) {
            sql.push_str(&format!(" WHERE {}", condition));
        }
        if !self.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }
        sql
    }
}

/// Relational island generator: flattens the tree into as few SELECTs as possible.
#[derive(Debug)]
pub struct SqlQueryGenerator {
    context: GenerationContext<SelectBlock>,
}

impl Default for SqlQueryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlQueryGenerator {
    pub fn new() -> Self {
        Self { context: GenerationContext::new("sql generator") }
    }

    fn context(&mut self) -> &mut GenerationContext<SelectBlock> {
        &mut self.context
    }

    /// Block of `child`, wrapped as a derived table when it is blocking and `wrap_blocking` is set.
    fn child_block(&mut self, tree: &OperatorTree, child: NodeId, wrap_blocking: bool) -> PlanResult<SelectBlock> {
        let block = render_child(self, Self::context, tree, child, SelectBlock::table)?;
        if wrap_blocking && tree.node(child).is_blocking() && !block.is_simple() {
            return Ok(block.derived(&derived_alias(tree, child)));
        }
        Ok(block)
    }
}

fn derived_alias(tree: &OperatorTree, id: NodeId) -> String {
    match tree.node(id).prune_token() {
        Some(token) => token.to_string(),
        None => synthetic_object_name("intermediate", id.0),
    }
}

fn select_list(schema: &OutSchema) -> Vec<String> {
    visible_columns(schema)
        .map(|column| {
            if column.is_passthrough() {
                if column.expression_text.trim().is_empty() {
                    column.name.clone()
                } else {
                    column.expression_text.trim().to_string()
                }
            } else {
                format!("{} AS {}", column.expression_text.trim(), column.name)
            }
        })
        .collect()
}

impl OperatorVisitor for SqlQueryGenerator {
    fn island(&self) -> Island {
        Island::Relational
    }

    fn configure(&mut self, options: GeneratorOptions) -> PlanResult<()> {
        self.context.configure(options)
    }

    fn visit_scan(&mut self, tree: &OperatorTree, id: NodeId, scan: &Scan) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let mut block = match tree.children(id).first() {
            Some(child) => {
                let inner = self.child_block(tree, *child, false)?;
                SelectBlock::table(&format!("({}) AS {}", inner.to_sql(), scan.reference_name()))
            },
            None => SelectBlock::table(&scan.qualified_ref().to_string()),
        };
        if let Some(filter) = scan.filter_expression() {
            block.conditions.extend(filter.conjuncts().into_iter().cloned());
        }

        self.context.push(block);
        Ok(())
    }

    fn visit_filter(&mut self, tree: &OperatorTree, id: NodeId, filter: &Filter) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let child = tree.single_child(id)?;
        let mut block = self.child_block(tree, child, true)?;
        if !block.select.is_empty() {
            block = block.derived(&derived_alias(tree, child));
        }
        block.conditions.extend(filter.predicate.conjuncts().into_iter().cloned());

        self.context.push(block);
        Ok(())
    }

    fn visit_project(&mut self, tree: &OperatorTree, id: NodeId) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let child = tree.single_child(id)?;
        let mut block = self.child_block(tree, child, false)?;
        if !block.select.is_empty() {
            block = block.derived(&derived_alias(tree, child));
        }
        block.select = select_list(tree.node(id).out_schema());

        self.context.push(block);
        Ok(())
    }

    fn visit_join(&mut self, tree: &OperatorTree, id: NodeId, join: &Join) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let mut block = SelectBlock::default();
        for child in tree.children(id) {
            let mut side = self.child_block(tree, *child, true)?;
            if !side.is_simple() {
                side = side.derived(&derived_alias(tree, *child));
            }
            block.from.extend(side.from);
            block.conditions.extend(side.conditions);
        }
        if let Some(predicate) = &join.predicate {
            block.conditions.extend(predicate.conjuncts().into_iter().cloned());
        }

        self.context.push(block);
        Ok(())
    }

    fn visit_aggregate(&mut self, tree: &OperatorTree, id: NodeId, aggregate: &Aggregate) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let child = tree.single_child(id)?;
        let mut block = self.child_block(tree, child, true)?;
        if !block.is_simple() {
            block = block.derived(&derived_alias(tree, child));
        }
        block.group_by = aggregate.group_keys.clone();
        block.select = select_list(tree.node(id).out_schema());
        if block.select.is_empty() {
            block.select = aggregate.group_keys.clone();
        }

        self.context.push(block);
        Ok(())
    }

    fn visit_sort(&mut self, tree: &OperatorTree, id: NodeId, sort: &Sort) -> PlanResult<()> {
        self.context.enter(tree, id, Island::Relational)?;

        let child = tree.single_child(id)?;
        let mut block = self.child_block(tree, child, false)?;
        if !block.order_by.is_empty() {
            block = block.derived(&derived_alias(tree, child));
        }
        block.order_by = sort.keys.iter().map(|key| key.to_string()).collect();

        self.context.push(block);
        Ok(())
    }

    fn generate_statement_string(&self) -> String {
        match self.context.last() {
            Some(block) if self.context.options().terminate_statement => format!("{};", block.to_sql()),
            Some(block) => block.to_sql(),
            None => String::new(),
        }
    }
}
