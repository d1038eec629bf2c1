//! Boundary between a [`Problem`](crate::optimize::problem::Problem) and a solver engine
//!
//! No solver ships with this crate. A backend implements [`SolverBackend`] and receives the
//! problem through [`Problem::load_into`](crate::optimize::problem::Problem::load_into).
use crate::expr::variable::Variable;
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::Objective;
use crate::optimize::variable::VariableData;

/// A solver engine able to receive a problem definition
///
/// Calls arrive in order: every variable, then every constraint, then the objective. Variable
/// bounds have already been resolved against the problem configuration, so both bounds are
/// always `Some`, possibly infinite.
pub trait SolverBackend {
    /// Error reported by the backend when it rejects part of the problem
    type Error: std::error::Error;

    /// Register a variable
    fn add_variable(&mut self, variable: Variable, data: &VariableData) -> Result<(), Self::Error>;

    /// Register a constraint
    ///
    /// Backends which only handle linear or quadratic constraints should reject others here,
    /// see [`Constraint::degree`].
    fn add_constraint(&mut self, name: &str, constraint: &Constraint) -> Result<(), Self::Error>;

    /// Set the objective
    fn set_objective(&mut self, objective: &Objective) -> Result<(), Self::Error>;
}
