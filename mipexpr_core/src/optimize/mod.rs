//! Module for constructing optimization problems from expressions

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;
