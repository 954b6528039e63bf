use std::collections::HashMap;

use crate::{
    catalog::LocationLookup,
    error::PlanResult,
    planner::{NodeId, OperatorKind, OperatorTree},
};

/// Known physical locations per schema-qualified object name.
pub type LocationMap = HashMap<String, Vec<String>>;

/// Every object a subtree reads; `None` where no location is known.
pub type ResolvedLocations = HashMap<String, Option<Vec<String>>>;

impl OperatorTree {
    /// Collects the objects scanned under `id` with their locations from `locations_in`.
    ///
    /// Children are merged first in order; a key already present is kept.
    pub fn table_locations(&self, id: NodeId, locations_in: &LocationMap) -> PlanResult<ResolvedLocations> {
        self.check(id)?;
        Ok(self.collect_locations(id, locations_in))
    }

    fn collect_locations(&self, id: NodeId, locations_in: &LocationMap) -> ResolvedLocations {
        let mut result = ResolvedLocations::new();

        for child in self.children(id) {
            for (name, locations) in self.collect_locations(*child, locations_in) {
                result.entry(name).or_insert(locations);
            }
        }

        if let OperatorKind::Scan(scan) = &self.node(id).kind {
            let name = scan.canonical_name();
            let locations = locations_in.get(&name).cloned();
            if locations.is_none() {
                tracing::warn!(object = %name, node = %self.describe(id), "no known location for object");
            }
            result.insert(name, locations);
        }

        result
    }

    /// Schema-qualified names of every object scanned under `id`, first occurrence order.
    pub fn scanned_objects(&self, id: NodeId) -> PlanResult<Vec<String>> {
        self.check(id)?;
        let mut names: Vec<String> = vec![];
        for node in self.descendants(id) {
            if let Some(scan) = self.scan(node) {
                let name = scan.canonical_name();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Asks `lookup` for every scanned object, then resolves as [`table_locations`](Self::table_locations).
    pub fn resolve_locations(&self, id: NodeId, lookup: &dyn LocationLookup) -> PlanResult<ResolvedLocations> {
        let names = self.scanned_objects(id)?;
        let locations_in = lookup.object_locations(&names);
        Ok(self.collect_locations(id, &locations_in))
    }
}
