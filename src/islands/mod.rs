pub mod visitor;
pub use visitor::*;

pub mod sql_generator;
pub use sql_generator::*;

pub mod afl_generator;
pub use afl_generator::*;
