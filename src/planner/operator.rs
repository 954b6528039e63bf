use std::fmt;

use crate::{
    error::{PlanError, PlanResult},
    parser::ast::Predicate,
    planner::{parse_filter, Island, NodeId, OperatorParams, OutSchema, Scan, FILTER, GROUP_KEY, JOIN_FILTER, SORT_KEY},
};

/// One node of an island plan. Owned by an [`OperatorTree`](crate::planner::OperatorTree).
#[derive(Debug)]
pub struct Operator {
    pub(crate) island: Island,
    pub(crate) kind: OperatorKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) is_blocking: bool,
    pub(crate) out_schema: OutSchema,
    pub(crate) prune_token: Option<String>,
}

impl Operator {
    pub fn island(&self) -> Island {
        self.island
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Must fully consume its input before producing output.
    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    pub fn out_schema(&self) -> &OutSchema {
        &self.out_schema
    }

    /// Name standing in for this subtree once its result is cached.
    pub fn prune_token(&self) -> Option<&str> {
        self.prune_token.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, PartialEq)]
pub enum OperatorKind {
    Scan(Scan),
    Filter(Filter),
    Project,
    Join(Join),
    Aggregate(Aggregate),
    Sort(Sort),
}

impl OperatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Scan(_) => "scan",
            OperatorKind::Filter(_) => "filter",
            OperatorKind::Project => "project",
            OperatorKind::Join(_) => "join",
            OperatorKind::Aggregate(_) => "aggregate",
            OperatorKind::Sort(_) => "sort",
        }
    }

    pub fn blocking_by_default(&self) -> bool {
        matches!(self, OperatorKind::Aggregate(_) | OperatorKind::Sort(_))
    }

    pub(crate) fn try_clone(&self) -> PlanResult<Self> {
        Ok(match self {
            OperatorKind::Scan(scan) => OperatorKind::Scan(scan.try_clone()?),
            OperatorKind::Filter(filter) => OperatorKind::Filter(Filter { predicate: reparse(&filter.predicate)? }),
            OperatorKind::Project => OperatorKind::Project,
            OperatorKind::Join(join) => OperatorKind::Join(Join {
                predicate: join.predicate.as_ref().map(reparse).transpose()?,
            }),
            OperatorKind::Aggregate(aggregate) => OperatorKind::Aggregate(aggregate.clone()),
            OperatorKind::Sort(sort) => OperatorKind::Sort(sort.clone()),
        })
    }
}

fn reparse(predicate: &Predicate) -> PlanResult<Predicate> {
    let text = predicate.to_string();
    Predicate::parse_text(&text).map_err(|e| PlanError::expression_parse(text, e))
}

#[derive(Debug, PartialEq)]
pub struct Filter {
    pub predicate: Predicate,
}

impl Filter {
    pub fn from_params(params: &OperatorParams) -> PlanResult<Self> {
        let text = params
            .get(FILTER)
            .ok_or_else(|| PlanError::construction("filter", format!("'{}' is required", FILTER)))?;
        Ok(Self { predicate: parse_filter(text)? })
    }
}

/// Inner join; no predicate means a cross product.
#[derive(Debug, PartialEq)]
pub struct Join {
    pub predicate: Option<Predicate>,
}

impl Join {
    pub fn from_params(params: &OperatorParams) -> PlanResult<Self> {
        let predicate = params.get(JOIN_FILTER).map(parse_filter).transpose()?;
        Ok(Self { predicate })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub group_keys: Vec<String>,
}

impl Aggregate {
    pub fn from_params(params: &OperatorParams) -> Self {
        Self { group_keys: params.get_list(GROUP_KEY) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "{} DESC", self.column)
        } else {
            write!(f, "{}", self.column)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub keys: Vec<SortKey>,
}

impl Sort {
    /// Keys as `col [ASC|DESC]`, comma separated.
    pub fn from_params(params: &OperatorParams) -> PlanResult<Self> {
        let keys = params
            .get_list(SORT_KEY)
            .into_iter()
            .map(|key| {
                let mut words = key.split_whitespace();
                let column = words.next().unwrap_or_default().to_string();
                let descending = match words.next() {
                    None => false,
                    Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
                    Some(dir) => {
                        return Err(PlanError::construction("sort", format!("unknown direction '{}' in '{}'", dir, key)))
                    },
                };
                Ok(SortKey { column, descending })
            })
            .collect::<PlanResult<Vec<_>>>()?;

        if keys.is_empty() {
            return Err(PlanError::construction("sort", format!("'{}' is required", SORT_KEY)));
        }
        Ok(Self { keys })
    }
}
