use std::fmt;

use crate::{
    error::{PlanError, PlanResult},
    islands::OperatorVisitor,
    planner::{Aggregate, Filter, Island, Join, Operator, OperatorKind, OperatorParams, OutSchema, Scan, Sort},
};

/// Handle to an operator inside the [`OperatorTree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning every operator of one or more island plans.
///
/// Children are ordered; each node has at most one parent, assigned when it is
/// attached and never changed afterwards. Nodes are never removed.
#[derive(Debug, Default)]
pub struct OperatorTree {
    nodes: Vec<Operator>,
}

impl OperatorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Operator> {
        self.nodes.get(id.0)
    }

    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &Operator {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The one input of a unary operator.
    pub fn single_child(&self, id: NodeId) -> PlanResult<NodeId> {
        match self.children(id) {
            [child] => Ok(*child),
            children => Err(PlanError::construction(
                self.describe(id),
                format!("expected one input, found {}", children.len()),
            )),
        }
    }

    /// Most recently added node without a parent.
    pub fn root(&self) -> Option<NodeId> {
        (0..self.nodes.len()).rev().map(NodeId).find(|id| self.node(*id).parent.is_none())
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn scan(&self, id: NodeId) -> Option<&Scan> {
        match &self.get(id)?.kind {
            OperatorKind::Scan(scan) => Some(scan),
            _ => None,
        }
    }

    pub fn scan_mut(&mut self, id: NodeId) -> Option<&mut Scan> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            OperatorKind::Scan(scan) => Some(scan),
            _ => None,
        }
    }

    /// Short label for logs and errors, e.g. `scan#3(orders)`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(Operator { kind: OperatorKind::Scan(scan), .. }) => format!("scan{}({})", id, scan.canonical_name()),
            Some(node) => format!("{}{}", node.kind.name(), id),
            None => format!("unknown{}", id),
        }
    }

    pub(crate) fn check(&self, id: NodeId) -> PlanResult<()> {
        if id.0 >= self.nodes.len() {
            return Err(PlanError::construction(id.to_string(), "node does not belong to this tree"));
        }
        Ok(())
    }

    /// Adds a node over `children`, which must all be unattached.
    pub fn add(
        &mut self,
        island: Island,
        kind: OperatorKind,
        out_schema: OutSchema,
        children: Vec<NodeId>,
    ) -> PlanResult<NodeId> {
        for (i, child) in children.iter().enumerate() {
            self.check(*child)?;
            if self.node(*child).parent.is_some() || children[..i].contains(child) {
                return Err(PlanError::construction(
                    kind.name(),
                    format!("child {} already has a parent", self.describe(*child)),
                ));
            }
        }

        let id = NodeId(self.nodes.len());
        let is_blocking = kind.blocking_by_default();
        for child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(Operator { island, kind, children, parent: None, is_blocking, out_schema, prune_token: None });

        tracing::debug!(node = %self.describe(id), %island, "operator added");
        Ok(id)
    }

    /// Appends `child` to `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> PlanResult<()> {
        self.check(parent)?;
        self.check(child)?;

        if self.node(child).parent.is_some() {
            return Err(PlanError::construction(
                self.describe(parent),
                format!("child {} already has a parent", self.describe(child)),
            ));
        }
        if self.root_of(parent) == child {
            return Err(PlanError::construction(
                self.describe(parent),
                format!("attaching {} would create a cycle", self.describe(child)),
            ));
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub fn add_scan(
        &mut self,
        island: Island,
        params: &OperatorParams,
        out_schema: OutSchema,
        child: Option<NodeId>,
    ) -> PlanResult<NodeId> {
        let scan = Scan::from_params(params, child.map(|c| c.0))?;
        self.add(island, OperatorKind::Scan(scan), out_schema, child.into_iter().collect())
    }

    pub fn add_filter(&mut self, island: Island, params: &OperatorParams, out_schema: OutSchema, child: NodeId) -> PlanResult<NodeId> {
        let filter = Filter::from_params(params)?;
        self.add(island, OperatorKind::Filter(filter), out_schema, vec![child])
    }

    pub fn add_project(&mut self, island: Island, out_schema: OutSchema, child: NodeId) -> PlanResult<NodeId> {
        self.add(island, OperatorKind::Project, out_schema, vec![child])
    }

    pub fn add_join(
        &mut self,
        island: Island,
        params: &OperatorParams,
        out_schema: OutSchema,
        left: NodeId,
        right: NodeId,
    ) -> PlanResult<NodeId> {
        let join = Join::from_params(params)?;
        self.add(island, OperatorKind::Join(join), out_schema, vec![left, right])
    }

    pub fn add_aggregate(&mut self, island: Island, params: &OperatorParams, out_schema: OutSchema, child: NodeId) -> PlanResult<NodeId> {
        let aggregate = Aggregate::from_params(params);
        self.add(island, OperatorKind::Aggregate(aggregate), out_schema, vec![child])
    }

    pub fn add_sort(&mut self, island: Island, params: &OperatorParams, out_schema: OutSchema, child: NodeId) -> PlanResult<NodeId> {
        let sort = Sort::from_params(params)?;
        self.add(island, OperatorKind::Sort(sort), out_schema, vec![child])
    }

    /// Marks a non-scan operator as a materialization point, or clears the mark.
    pub fn set_blocking(&mut self, id: NodeId, is_blocking: bool) -> PlanResult<()> {
        self.check(id)?;
        if is_blocking && matches!(self.node(id).kind, OperatorKind::Scan(_)) {
            return Err(PlanError::construction(self.describe(id), "a scan is never blocking"));
        }
        self.nodes[id.0].is_blocking = is_blocking;
        Ok(())
    }

    pub fn set_prune_token(&mut self, id: NodeId, token: Option<String>) -> PlanResult<()> {
        self.check(id)?;
        self.nodes[id.0].prune_token = token;
        Ok(())
    }

    /// First blocking node on the way up from `id` (itself included), or the root.
    pub fn nearest_blocking_ancestor(&self, id: NodeId) -> PlanResult<NodeId> {
        self.check(id)?;
        let mut current = id;
        loop {
            let node = self.node(current);
            match node.parent {
                Some(parent) if !node.is_blocking => current = parent,
                _ => return Ok(current),
            }
        }
    }

    /// `id` and everything below it, parents before children. Panics on a foreign `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Calls exactly the visitor method matching the node's variant.
    pub fn accept(&self, id: NodeId, visitor: &mut dyn OperatorVisitor) -> PlanResult<()> {
        self.check(id)?;
        tracing::debug!(node = %self.describe(id), "visiting operator");

        match &self.node(id).kind {
            OperatorKind::Scan(scan) => visitor.visit_scan(self, id, scan),
            OperatorKind::Filter(filter) => visitor.visit_filter(self, id, filter),
            OperatorKind::Project => visitor.visit_project(self, id),
            OperatorKind::Join(join) => visitor.visit_join(self, id, join),
            OperatorKind::Aggregate(aggregate) => visitor.visit_aggregate(self, id, aggregate),
            OperatorKind::Sort(sort) => visitor.visit_sort(self, id, sort),
        }
    }

    /// Independent copy of the subtree under `id`; its root is the copy's [`root`](Self::root).
    pub fn deep_copy(&self, id: NodeId) -> PlanResult<OperatorTree> {
        self.check(id)?;
        let mut copy = OperatorTree::new();
        self.copy_into(id, &mut copy)?;
        Ok(copy)
    }

    fn copy_into(&self, id: NodeId, target: &mut OperatorTree) -> PlanResult<NodeId> {
        let node = self.node(id);
        let children = node
            .children
            .iter()
            .map(|child| self.copy_into(*child, target))
            .collect::<PlanResult<Vec<_>>>()?;

        let new_id = target.add(node.island, node.kind.try_clone()?, node.out_schema.clone(), children)?;
        target.nodes[new_id.0].is_blocking = node.is_blocking;
        target.nodes[new_id.0].prune_token = node.prune_token.clone();
        Ok(new_id)
    }

    /// Shape of the subtree as nested braces, e.g. `{join{scan}{filter{scan}}}`.
    pub fn tree_representation(&self, id: NodeId) -> PlanResult<String> {
        self.check(id)?;
        let mut out = String::new();
        self.write_shape(id, &mut out);
        Ok(out)
    }

    fn write_shape(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push('{');
        out.push_str(node.kind.name());
        for child in &node.children {
            self.write_shape(*child, out);
        }
        out.push('}');
    }
}
