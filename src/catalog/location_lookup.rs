use crate::planner::LocationMap;

/// Where data objects physically live. The planner only ever asks this.
pub trait LocationLookup {
    /// Locations for the given schema-qualified names; unknown names are left out.
    fn object_locations(&self, names: &[String]) -> LocationMap;
}
