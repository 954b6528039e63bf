use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

use crate::{
    error::{PlanError, PlanResult},
    parser::{ast::{Column, Predicate}, is_synthetic_object_name},
    planner::{NodeId, OperatorKind, OperatorTree, Scan},
};

/// Lower-cased alias, name or qualified name to the canonical object name.
pub type AliasMapping = HashMap<String, String>;

/// Canonical object name to the normalized predicate fragments constraining it.
pub type SignatureMapping = BTreeMap<String, BTreeSet<String>>;

impl OperatorTree {
    /// Names visible at `boundary`: every scan reachable from it without entering
    /// another blocking node. Aliases shadow plain names.
    pub fn data_object_aliases_or_names(&self, boundary: NodeId) -> PlanResult<AliasMapping> {
        self.check(boundary)?;
        let scans = self.boundary_scans(boundary);
        let mut mapping = AliasMapping::new();

        for scan in &scans {
            let canonical = scan.canonical_name();
            mapping.insert(scan.source_object_name().to_lowercase(), canonical.clone());
            mapping.insert(canonical.to_lowercase(), canonical);
        }
        for scan in &scans {
            if let Some(alias) = scan.table_alias() {
                mapping.insert(alias.to_lowercase(), scan.canonical_name());
            }
        }

        Ok(mapping)
    }

    fn boundary_scans(&self, boundary: NodeId) -> Vec<&Scan> {
        let mut scans = vec![];
        let mut stack = vec![boundary];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if id != boundary && node.is_blocking {
                continue;
            }
            if let OperatorKind::Scan(scan) = &node.kind {
                scans.push(scan);
            }
            stack.extend(node.children.iter().rev());
        }

        scans
    }

    /// Predicate fragments per data object for the subtree under `id`.
    ///
    /// Inner nodes contribute the union of their children; only scan filters are
    /// recorded. Nothing in the tree is modified.
    pub fn object_to_expression_mapping(&self, id: NodeId) -> PlanResult<SignatureMapping> {
        self.check(id)?;
        let node = self.node(id);

        if !node.children.is_empty() {
            let mut mapping = SignatureMapping::new();
            for child in &node.children {
                for (object, fragments) in self.object_to_expression_mapping(*child)? {
                    mapping.entry(object).or_default().extend(fragments);
                }
            }
            return Ok(mapping);
        }

        match &node.kind {
            OperatorKind::Scan(scan) => self.scan_expression_mapping(id, scan),
            _ => Ok(SignatureMapping::new()),
        }
    }

    fn scan_expression_mapping(&self, id: NodeId, scan: &Scan) -> PlanResult<SignatureMapping> {
        let mut mapping = SignatureMapping::new();

        let Some(filter) = scan.filter_expression() else {
            return Ok(mapping);
        };
        let own_reference = scan.reference_name();
        if filter.references_only_synthetic_objects(own_reference) {
            return Ok(mapping);
        }

        let boundary = self.nearest_blocking_ancestor(id)?;
        let aliases = self.data_object_aliases_or_names(boundary)?;

        // work on a fresh copy so nothing reachable from the scan is touched
        let filter_text = filter.to_string();
        let fresh = Predicate::parse_text(&filter_text).map_err(|e| PlanError::expression_parse(filter_text.clone(), e))?;

        for conjunct in fresh.conjuncts() {
            let mut resolved: HashMap<String, String> = HashMap::new();
            let mut objects: Vec<String> = vec![];

            for reference in conjunct.referenced_objects(own_reference) {
                if is_synthetic_object_name(&reference) {
                    continue;
                }
                let key = reference.to_lowercase();
                let canonical = aliases.get(&key).ok_or_else(|| PlanError::UnresolvedAlias {
                    alias: reference.clone(),
                    node: self.describe(id),
                    filter: filter_text.clone(),
                })?;
                if !objects.contains(canonical) {
                    objects.push(canonical.clone());
                }
                resolved.insert(key, canonical.clone());
            }

            if objects.is_empty() {
                continue;
            }

            let single_object = objects.len() == 1;
            let fragment = conjunct
                .map_columns(&mut |column: &Column| {
                    let key = column.collection().unwrap_or(own_reference).to_lowercase();
                    match resolved.get(&key) {
                        Some(_) if single_object => column.unqualified(),
                        Some(canonical) => column.qualified(canonical),
                        None => column.clone(),
                    }
                })
                .to_string();

            for object in objects {
                mapping.entry(object).or_default().insert(fragment.clone());
            }
        }

        tracing::debug!(node = %self.describe(id), boundary = %self.describe(boundary), objects = mapping.len(), "scan signature computed");
        Ok(mapping)
    }
}

/// Fingerprint of a plan: its shape plus the predicates applied per object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub tree_representation: String,
    pub object_expressions: SignatureMapping,
}

impl Signature {
    pub fn from_tree(tree: &OperatorTree, root: NodeId) -> PlanResult<Self> {
        Ok(Self {
            tree_representation: tree.tree_representation(root)?,
            object_expressions: tree.object_to_expression_mapping(root)?,
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree_representation)?;
        for (object, fragments) in &self.object_expressions {
            let fragments = fragments.iter().cloned().collect::<Vec<_>>().join("; ");
            write!(f, "\n  {}: {}", object, fragments)?;
        }
        Ok(())
    }
}
