pub mod island;
pub use island::*;

pub mod params;
pub use params::*;

pub mod out_schema;
pub use out_schema::*;

pub mod qualified_table;
pub use qualified_table::*;

pub mod scan;
pub use scan::*;

pub mod operator;
pub use operator::*;

pub mod operator_tree;
pub use operator_tree::*;

pub mod locations;
pub use locations::*;

pub mod signature;
pub use signature::*;
