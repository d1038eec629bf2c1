//! Provides struct for representing an optimization problem's objective
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::expr::expression::Expr;

/// Represents the Objective of an optimization problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Expression to optimize
    expr: Expr,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl Objective {
    /// Create a new objective
    pub fn new<E: Into<Expr>>(expr: E, sense: ObjectiveSense) -> Self {
        Self {
            expr: expr.into(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(Expr::zero(), ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(Expr::zero(), ObjectiveSense::Minimize)
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// The objective expression, including any constant offset
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Replace the objective expression
    pub fn set_expr<E: Into<Expr>>(&mut self, expr: E) {
        self.expr = expr.into();
    }

    /// True if the objective has terms of degree two or more
    pub fn contains_nonlinear(&self) -> bool {
        !self.expr.is_linear()
    }
}

impl Display for Objective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.sense {
            ObjectiveSense::Minimize => write!(f, "minimize {}", self.expr),
            ObjectiveSense::Maximize => write!(f, "maximize {}", self.expr),
        }
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable::Variable;

    #[test]
    fn sense_and_expr() {
        let x = Variable::new(0);
        let mut objective = Objective::new_minimize();
        assert!(objective.expr().is_empty());
        objective.set_expr(2.0 * x + 1.0);
        objective.set_sense(ObjectiveSense::Maximize);
        assert_eq!(objective.sense(), ObjectiveSense::Maximize);
        assert_eq!(objective.expr()[()], 1.0);
        assert!(!objective.contains_nonlinear());
        assert_eq!(objective.to_string(), "maximize 2*x0 + 1");
    }

    #[test]
    fn quadratic_objective() {
        let x = Variable::new(0);
        let objective = Objective::new(x * x, ObjectiveSense::Minimize);
        assert!(objective.contains_nonlinear());
    }
}
