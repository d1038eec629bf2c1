//! Module for building polynomial expressions over decision variables

pub mod expression;
pub mod ops;
pub mod term;
pub mod variable;

#[cfg(test)]
mod proptests;

pub use expression::{quicksum, Expr, ExprError};
pub use term::Term;
pub use variable::Variable;
