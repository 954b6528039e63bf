use serde::Deserialize;

use crate::{
    error::{PlanError, PlanResult},
    planner::{Aggregate, Filter, Island, Join, NodeId, OperatorTree, Scan, Sort},
};

/// Generation-mode flags, fixed before the first visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Render a child carrying a prune token as that token instead of walking it.
    pub emit_pruned_tokens: bool,
    /// End the statement with `;`.
    pub terminate_statement: bool,
}

/// Walk state threaded through a generator: its options, how deep the walk is
/// and the fragments rendered so far. A parent pops what its children pushed.
#[derive(Debug)]
pub struct GenerationContext<F> {
    options: GeneratorOptions,
    configured_by: &'static str,
    visited: bool,
    depth: usize,
    fragments: Vec<F>,
}

impl<F> GenerationContext<F> {
    pub fn new(configured_by: &'static str) -> Self {
        Self { options: GeneratorOptions::default(), configured_by, visited: false, depth: 0, fragments: vec![] }
    }

    pub fn configure(&mut self, options: GeneratorOptions) -> PlanResult<()> {
        if self.visited {
            return Err(PlanError::construction(self.configured_by, "cannot configure a generator after it has visited a node"));
        }
        self.options = options;
        Ok(())
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Starts a visit of `id`, which must belong to `island`.
    pub fn enter(&mut self, tree: &OperatorTree, id: NodeId, island: Island) -> PlanResult<()> {
        self.visited = true;
        let node_island = tree.node(id).island();
        if node_island != island {
            return Err(PlanError::construction(
                tree.describe(id),
                format!("{} generator cannot render an operator of the {} island", island, node_island),
            ));
        }
        Ok(())
    }

    /// True while rendering something below the node the walk started from.
    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    pub fn push(&mut self, fragment: F) {
        self.fragments.push(fragment);
    }

    pub fn pop(&mut self, tree: &OperatorTree, id: NodeId) -> PlanResult<F> {
        self.fragments
            .pop()
            .ok_or_else(|| PlanError::construction(tree.describe(id), "child produced no output"))
    }

    pub fn last(&self) -> Option<&F> {
        self.fragments.last()
    }

    fn descend(&mut self) {
        self.depth += 1;
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Renders an operator tree into one island's query language.
///
/// [`OperatorTree::accept`] calls exactly the `visit_*` matching a node's variant;
/// each visit renders its node and decides how to recurse into the children.
pub trait OperatorVisitor {
    fn island(&self) -> Island;

    /// Sets the generation flags. Fails once any node has been visited.
    fn configure(&mut self, options: GeneratorOptions) -> PlanResult<()>;

    fn visit_scan(&mut self, tree: &OperatorTree, id: NodeId, scan: &Scan) -> PlanResult<()>;
    fn visit_filter(&mut self, tree: &OperatorTree, id: NodeId, filter: &Filter) -> PlanResult<()>;
    fn visit_project(&mut self, tree: &OperatorTree, id: NodeId) -> PlanResult<()>;
    fn visit_join(&mut self, tree: &OperatorTree, id: NodeId, join: &Join) -> PlanResult<()>;
    fn visit_aggregate(&mut self, tree: &OperatorTree, id: NodeId, aggregate: &Aggregate) -> PlanResult<()>;
    fn visit_sort(&mut self, tree: &OperatorTree, id: NodeId, sort: &Sort) -> PlanResult<()>;

    /// Text for the last walked tree; empty before any visit.
    fn generate_statement_string(&self) -> String;
}

/// Walks `child` one level deeper and pops the fragment it left behind.
/// With pruned tokens enabled, a pruned child becomes `from_token(token)` without a walk.
pub fn render_child<V, F>(
    visitor: &mut V,
    context: fn(&mut V) -> &mut GenerationContext<F>,
    tree: &OperatorTree,
    child: NodeId,
    from_token: impl FnOnce(&str) -> F,
) -> PlanResult<F>
where
    V: OperatorVisitor,
{
    if context(visitor).options().emit_pruned_tokens {
        if let Some(token) = tree.node(child).prune_token() {
            return Ok(from_token(token));
        }
    }

    context(visitor).descend();
    let walked = tree.accept(child, visitor);
    context(visitor).ascend();
    walked?;

    context(visitor).pop(tree, child)
}

/// Configures `visitor`, walks the tree from `root` and returns the statement.
pub fn generate_statement(
    tree: &OperatorTree,
    root: NodeId,
    visitor: &mut dyn OperatorVisitor,
    options: GeneratorOptions,
) -> PlanResult<String> {
    visitor.configure(options)?;
    tree.accept(root, visitor)?;
    let statement = visitor.generate_statement_string();
    tracing::debug!(island = %visitor.island(), root = %tree.describe(root), %statement, "statement generated");
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use crate::{
        error::PlanError,
        islands::{GenerationContext, GeneratorOptions},
        planner::{Island, OperatorParams, OperatorTree, OutSchema, RELATION_NAME},
    };

    #[test]
    pub fn test_context_configure_before_visit_only() {
        let mut tree = OperatorTree::new();
        let leaf = tree
            .add_scan(Island::Relational, &OperatorParams::new().with(RELATION_NAME, "t"), OutSchema::new(), None)
            .unwrap();

        let mut context: GenerationContext<String> = GenerationContext::new("test");
        context.configure(GeneratorOptions { emit_pruned_tokens: true, terminate_statement: false }).unwrap();
        assert!(context.options().emit_pruned_tokens);

        context.enter(&tree, leaf, Island::Relational).unwrap();
        match context.configure(GeneratorOptions::default()) {
            Err(PlanError::Construction { node, .. }) => assert_eq!(node, "test"),
            other => panic!("expected construction error, got {:?}", other),
        }
    }

    #[test]
    pub fn test_context_rejects_foreign_island() {
        let mut tree = OperatorTree::new();
        let leaf = tree
            .add_scan(Island::Array, &OperatorParams::new().with(RELATION_NAME, "a"), OutSchema::new(), None)
            .unwrap();

        let mut context: GenerationContext<String> = GenerationContext::new("test");
        assert!(context.enter(&tree, leaf, Island::Relational).is_err());
    }

    #[test]
    pub fn test_context_pop_empty() {
        let mut tree = OperatorTree::new();
        let leaf = tree
            .add_scan(Island::Relational, &OperatorParams::new().with(RELATION_NAME, "t"), OutSchema::new(), None)
            .unwrap();

        let mut context: GenerationContext<String> = GenerationContext::new("test");
        assert!(context.pop(&tree, leaf).is_err());
        context.push("t".to_string());
        assert_eq!(context.last().map(|s| s.as_str()), Some("t"));
        assert_eq!(context.pop(&tree, leaf).unwrap(), "t");
    }
}
