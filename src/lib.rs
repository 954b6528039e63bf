pub mod parser;

pub mod planner;
pub use planner::{Island, NodeId, Operator, OperatorKind, OperatorParams, OperatorTree, Scan, Signature};

pub mod islands;
pub use islands::{AflQueryGenerator, GeneratorOptions, OperatorVisitor, SqlQueryGenerator};

pub mod catalog;
pub use catalog::{LocationLookup, MemoryCatalog};

pub mod network;

pub mod config;
pub use config::PolyplanConfig;

pub mod error;
pub use error::{LoadError, PlanError, PlanResult};
