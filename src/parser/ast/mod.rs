pub mod literals;
pub use literals::*;

pub mod text_collector;
pub use text_collector::*;

pub mod operators;
pub use operators::*;

pub mod column;
pub use column::*;

pub mod function;
pub use function::*;

pub mod args_parser;
pub use args_parser::*;

pub mod scalar_expr;
pub use scalar_expr::*;

pub mod predicate;
pub use predicate::*;
