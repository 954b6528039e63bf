pub mod location_lookup;
pub use location_lookup::*;

pub mod memory_catalog;
pub use memory_catalog::*;
