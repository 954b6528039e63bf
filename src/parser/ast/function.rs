use std::fmt;

use crate::parser::ast::ScalarExpr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    pub name: String,
    pub args: Vec<ScalarExpr>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>().join(", ");
        write!(f, "{}({})", self.name, args)
    }
}
