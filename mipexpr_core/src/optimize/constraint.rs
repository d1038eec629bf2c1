//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::expression::{Expr, ExprError};
use crate::expr::variable::Variable;

/// Represents a constraint `lhs <= expr <= rhs` in an optimization problem
///
/// At least one of the bounds is always present. Any constant term of the expression the
/// constraint was built from is moved into the bounds, so `expr` never has a constant term.
///
/// Constraints are normally built with the methods of [`Compare`], and ranged either by
/// [`between`] or by adding the missing bound with [`Constraint::with_lower`] or
/// [`Constraint::with_upper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintRepr")]
pub struct Constraint {
    /// Expression being bounded, without constant term
    expr: Expr,
    /// Lower bound, None if the constraint has no lower bound
    lhs: Option<f64>,
    /// Upper bound, None if the constraint has no upper bound
    rhs: Option<f64>,
}

/// Serialized form of a [`Constraint`], checked by [`Constraint::new`] when deserialized
#[derive(Deserialize)]
struct ConstraintRepr {
    expr: Expr,
    lhs: Option<f64>,
    rhs: Option<f64>,
}

impl TryFrom<ConstraintRepr> for Constraint {
    type Error = ConstraintError;

    fn try_from(repr: ConstraintRepr) -> Result<Self, Self::Error> {
        Constraint::new(repr.expr, repr.lhs, repr.rhs)
    }
}

impl Constraint {
    /// Create a new constraint
    ///
    /// # Parameters
    /// - `expr`: Expression to bound, its constant term will be folded into the bounds
    /// - `lhs`: Lower bound, None if unbounded below
    /// - `rhs`: Upper bound, None if unbounded above
    ///
    /// # Returns
    /// The constraint, or [`ConstraintError::MissingBounds`] if both bounds are None
    ///
    /// # Examples
    /// ```rust
    /// use mipexpr_core::expr::variable::Variable;
    /// use mipexpr_core::optimize::constraint::Constraint;
    /// let x = Variable::new(0);
    /// let y = Variable::new(1);
    /// // represents 2 <= 3*x + 2*y + 1 <= 6
    /// let cons = Constraint::new(3.0 * x + 2.0 * y + 1.0, Some(2.), Some(6.)).unwrap();
    /// assert_eq!(cons.lhs(), Some(1.));
    /// assert_eq!(cons.rhs(), Some(5.));
    /// ```
    pub fn new<E: Into<Expr>>(
        expr: E,
        lhs: Option<f64>,
        rhs: Option<f64>,
    ) -> Result<Self, ConstraintError> {
        if lhs.is_none() && rhs.is_none() {
            return Err(ConstraintError::MissingBounds);
        }
        Ok(Constraint::folded(expr.into(), lhs, rhs))
    }

    /// Move the constant of `expr` into the bounds, callers guarantee a bound is present
    fn folded(expr: Expr, lhs: Option<f64>, rhs: Option<f64>) -> Self {
        let constant = expr.constant();
        Constraint {
            expr: expr.without_constant(),
            lhs: lhs.map(|b| b - constant),
            rhs: rhs.map(|b| b - constant),
        }
    }

    // region Accessors
    /// The bounded expression, whose constant term is always zero
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Lower bound of the constraint
    pub fn lhs(&self) -> Option<f64> {
        self.lhs
    }

    /// Upper bound of the constraint
    pub fn rhs(&self) -> Option<f64> {
        self.rhs
    }

    /// True if both bounds are present
    pub fn is_ranged(&self) -> bool {
        self.lhs.is_some() && self.rhs.is_some()
    }

    /// True if both bounds are present and equal
    pub fn is_equality(&self) -> bool {
        matches!((self.lhs, self.rhs), (Some(l), Some(r)) if l == r)
    }

    /// Degree of the bounded expression
    pub fn degree(&self) -> usize {
        self.expr.degree()
    }

    /// Variables appearing in the constraint
    pub fn variables(&self) -> Vec<Variable> {
        self.expr.variables()
    }
    // endregion Accessors

    // region Ranging
    /// Add an upper bound to a constraint which only has a lower bound
    ///
    /// Mirrors `(expr >= lo) <= hi`. Fails if the constraint already has an upper bound.
    ///
    /// # Examples
    /// ```rust
    /// use mipexpr_core::expr::variable::Variable;
    /// use mipexpr_core::optimize::constraint::Compare;
    /// let x = Variable::new(0);
    /// let ranged = x.geq(3).with_upper(5.).unwrap();
    /// assert_eq!((ranged.lhs(), ranged.rhs()), (Some(3.), Some(5.)));
    /// assert!(x.leq(5).with_upper(3.).is_err());
    /// ```
    pub fn with_upper(&self, rhs: f64) -> Result<Self, ConstraintError> {
        if self.is_ranged() {
            return Err(ConstraintError::AlreadyRanged);
        }
        if self.rhs.is_some() {
            return Err(ConstraintError::AlreadyHasUpperBound);
        }
        Ok(Constraint {
            expr: self.expr.clone(),
            lhs: self.lhs,
            rhs: Some(rhs),
        })
    }

    /// Add a lower bound to a constraint which only has an upper bound
    ///
    /// Mirrors `lo <= (expr <= hi)`. Fails if the constraint already has a lower bound.
    pub fn with_lower(&self, lhs: f64) -> Result<Self, ConstraintError> {
        if self.is_ranged() {
            return Err(ConstraintError::AlreadyRanged);
        }
        if self.lhs.is_some() {
            return Err(ConstraintError::AlreadyHasLowerBound);
        }
        Ok(Constraint {
            expr: self.expr.clone(),
            lhs: Some(lhs),
            rhs: self.rhs,
        })
    }
    // endregion Ranging

    /// Apply `f` to each present bound
    pub(crate) fn map_bounds<F: Fn(f64) -> f64>(self, f: F) -> Self {
        Constraint {
            expr: self.expr,
            lhs: self.lhs.map(&f),
            rhs: self.rhs.map(&f),
        }
    }

    // region Checking Points
    /// How far a point is outside the bounds of the constraint, 0 if it is within them
    pub fn violation(&self, values: &IndexMap<Variable, f64>) -> Result<f64, ExprError> {
        let value = self.expr.evaluate(values)?;
        let below = self.lhs.map_or(0.0, |l| l - value);
        let above = self.rhs.map_or(0.0, |r| value - r);
        Ok(below.max(above).max(0.0))
    }

    /// Check whether a point satisfies the constraint up to `tolerance`
    pub fn is_satisfied(
        &self,
        values: &IndexMap<Variable, f64>,
        tolerance: f64,
    ) -> Result<bool, ExprError> {
        Ok(self.violation(values)? <= tolerance)
    }
    // endregion Checking Points
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.lhs, self.rhs) {
            (Some(l), Some(r)) if l == r => write!(f, "{} = {}", self.expr, r),
            (Some(l), Some(r)) => write!(f, "{} <= {} <= {}", l, self.expr, r),
            (Some(l), None) => write!(f, "{} >= {}", self.expr, l),
            (None, r) => write!(f, "{} <= {}", self.expr, r.unwrap_or(f64::INFINITY)),
        }
    }
}

/// Comparison operations turning expressions into constraints
///
/// Rust comparison operators must return `bool`, so comparisons are methods. Both sides may
/// be expressions, variables or numbers: `a.leq(b)` is normalized to `a - b <= 0` and the
/// constant of `a - b` is moved to the bound.
///
/// # Examples
/// ```rust
/// use mipexpr_core::expr::variable::Variable;
/// use mipexpr_core::optimize::constraint::Compare;
/// let x = Variable::new(0);
/// let y = Variable::new(1);
/// // 5 <= x + 2*y - 3
/// let cons = (x + 2.0 * y - 3.0).geq(5);
/// assert_eq!(cons.lhs(), Some(8.));
/// assert_eq!(cons.rhs(), None);
/// ```
pub trait Compare {
    /// `self <= bound`
    fn leq<B: Into<Expr>>(&self, bound: B) -> Constraint;
    /// `self >= bound`
    fn geq<B: Into<Expr>>(&self, bound: B) -> Constraint;
    /// `self == bound`
    fn equals<B: Into<Expr>>(&self, bound: B) -> Constraint;
}

impl<T: Clone + Into<Expr>> Compare for T {
    fn leq<B: Into<Expr>>(&self, bound: B) -> Constraint {
        Constraint::folded(difference(self, bound), None, Some(0.0))
    }

    fn geq<B: Into<Expr>>(&self, bound: B) -> Constraint {
        Constraint::folded(difference(self, bound), Some(0.0), None)
    }

    fn equals<B: Into<Expr>>(&self, bound: B) -> Constraint {
        Constraint::folded(difference(self, bound), Some(0.0), Some(0.0))
    }
}

fn difference<T: Clone + Into<Expr>, B: Into<Expr>>(lhs: &T, rhs: B) -> Expr {
    let lhs: Expr = lhs.clone().into();
    lhs - rhs
}

/// Build the ranged constraint `lhs <= expr <= rhs`
///
/// This is the direct way to write a two sided constraint, equivalent to
/// `expr.leq(rhs).with_lower(lhs)`.
pub fn between<E: Into<Expr>>(lhs: f64, expr: E, rhs: f64) -> Constraint {
    Constraint::folded(expr.into(), Some(lhs), Some(rhs))
}

/// Errors associated with building constraints
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// Error when adding an upper bound to a constraint which already has one
    #[error("Constraint already has an upper bound")]
    AlreadyHasUpperBound,
    /// Error when adding a lower bound to a constraint which already has one
    #[error("Constraint already has a lower bound")]
    AlreadyHasLowerBound,
    /// Error when adding a bound to a ranged or equality constraint
    #[error("Ranged constraint can not be bounded further")]
    AlreadyRanged,
    /// Error when creating a constraint without any bound
    #[error("Constraint needs a lower bound, an upper bound, or both")]
    MissingBounds,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> (Variable, Variable, Variable) {
        (Variable::new(0), Variable::new(1), Variable::new(2))
    }

    #[test]
    fn inequality() {
        let (x, y, z) = vars();
        let expr = x + 2.0 * y;

        let cons = expr.leq(0);
        assert_eq!(cons.lhs(), None);
        assert_eq!(cons.rhs(), Some(0.0));
        assert_eq!(cons.expr()[x], 1.0);
        assert_eq!(cons.expr()[y], 2.0);
        assert_eq!(cons.expr()[z], 0.0);
        assert_eq!(cons.expr()[()], 0.0);

        let cons = expr.geq(5);
        assert_eq!(cons.lhs(), Some(5.0));
        assert_eq!(cons.rhs(), None);
        assert_eq!(cons.expr()[x], 1.0);
        assert_eq!(cons.expr()[y], 2.0);
        assert_eq!(cons.expr()[()], 0.0);

        let cons = (x + 2.0 * y - 3.0).geq(5);
        assert_eq!(cons.lhs(), Some(8.0));
        assert_eq!(cons.rhs(), None);
        assert_eq!(cons.expr()[x], 1.0);
        assert_eq!(cons.expr()[y], 2.0);
        assert_eq!(cons.expr()[z], 0.0);
        assert_eq!(cons.expr()[()], 0.0);
    }

    #[test]
    fn expression_on_both_sides() {
        let (x, y, _) = vars();
        // y <= x + 4  is  y - x <= 4
        let cons = y.leq(x + 4.0);
        assert_eq!(cons.rhs(), Some(4.0));
        assert_eq!(cons.expr()[x], -1.0);
        assert_eq!(cons.expr()[y], 1.0);
        assert_eq!(cons.expr()[()], 0.0);
    }

    #[test]
    fn ranged() {
        let (x, y, _) = vars();
        let expr = x + 2.0 * y;

        let ranged = expr.geq(3).with_upper(5.0).unwrap();
        assert_eq!(ranged.lhs(), Some(3.0));
        assert_eq!(ranged.rhs(), Some(5.0));
        assert_eq!(ranged.expr()[y], 2.0);
        assert_eq!(ranged.expr()[()], 0.0);
        assert!(ranged.is_ranged());

        let ranged = expr.leq(5).with_lower(3.0).unwrap();
        assert_eq!(ranged.lhs(), Some(3.0));
        assert_eq!(ranged.rhs(), Some(5.0));
        assert_eq!(ranged.expr()[y], 2.0);
        assert_eq!(ranged.expr()[()], 0.0);

        assert_eq!(
            expr.leq(5).with_upper(3.0),
            Err(ConstraintError::AlreadyHasUpperBound)
        );
        assert_eq!(
            expr.geq(3).with_lower(1.0),
            Err(ConstraintError::AlreadyHasLowerBound)
        );
        assert_eq!(ranged.with_upper(7.0), Err(ConstraintError::AlreadyRanged));
        assert_eq!(ranged.with_lower(0.0), Err(ConstraintError::AlreadyRanged));
    }

    #[test]
    fn ranging_keeps_folded_constant() {
        let (x, _, _) = vars();
        let ranged = (x + 1.0).leq(5).with_lower(3.0).unwrap();
        // the new bound applies to the residual expression
        assert_eq!(ranged.lhs(), Some(3.0));
        assert_eq!(ranged.rhs(), Some(4.0));
    }

    #[test]
    fn between_folds_constant() {
        let (x, y, _) = vars();
        let cons = between(3.0, x + 2.0 * y + 1.0, 5.0);
        assert_eq!(cons.lhs(), Some(2.0));
        assert_eq!(cons.rhs(), Some(4.0));
        assert_eq!(cons.expr()[()], 0.0);
        assert!(cons.with_lower(0.0).is_err());
    }

    #[test]
    fn equation() {
        let (x, y, _) = vars();
        let equation = (2.0 * x - 3.0 * y).equals(1);
        assert_eq!(equation.lhs(), equation.rhs());
        assert_eq!(equation.lhs(), Some(1.0));
        assert_eq!(equation.expr()[x], 2.0);
        assert_eq!(equation.expr()[y], -3.0);
        assert_eq!(equation.expr()[()], 0.0);
        assert!(equation.is_equality());
        assert_eq!(
            equation.with_upper(2.0),
            Err(ConstraintError::AlreadyRanged)
        );
    }

    #[test]
    fn explicit_construction() {
        let (x, _, _) = vars();
        assert_eq!(
            Constraint::new(x, None, None),
            Err(ConstraintError::MissingBounds)
        );
        let cons = Constraint::new(x - 2.0, Some(0.0), None).unwrap();
        assert_eq!(cons, x.geq(2));
    }

    #[test]
    fn violation() {
        let (x, y, _) = vars();
        let cons = between(1.0, x + y, 3.0);
        let mut values = IndexMap::new();
        values.insert(x, 1.0);
        values.insert(y, 1.0);
        assert_eq!(cons.violation(&values).unwrap(), 0.0);
        values.insert(y, 4.0);
        assert!((cons.violation(&values).unwrap() - 2.0).abs() < 1e-12);
        assert!(!cons.is_satisfied(&values, 1e-6).unwrap());
        assert!(cons.is_satisfied(&values, 2.5).unwrap());
    }

    #[test]
    fn display() {
        let (x, y, _) = vars();
        assert_eq!((x + 2.0 * y).leq(4).to_string(), "x0 + 2*x1 <= 4");
        assert_eq!((x + 2.0 * y).geq(1).to_string(), "x0 + 2*x1 >= 1");
        assert_eq!(between(1.0, x, 2.0).to_string(), "1 <= x0 <= 2");
        assert_eq!(x.equals(y).to_string(), "x0 - x1 = 0");
    }

    #[test]
    fn serde_snapshot() {
        let (x, _, _) = vars();
        let cons = (3.0 * x).leq(6);
        let json = serde_json::to_value(&cons).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "expr": [{"vars": [0], "coefficient": 3.0}],
                "lhs": null,
                "rhs": 6.0
            })
        );
    }

    #[test]
    fn deserialize_checks_bounds() {
        let unbounded = serde_json::json!({
            "expr": [{"vars": [0], "coefficient": 1.0}, {"vars": [], "coefficient": 4.0}],
            "lhs": null,
            "rhs": null
        });
        assert!(serde_json::from_value::<Constraint>(unbounded).is_err());

        let (x, _, _) = vars();
        let with_constant = serde_json::json!({
            "expr": [{"vars": [0], "coefficient": 1.0}, {"vars": [], "coefficient": 4.0}],
            "lhs": null,
            "rhs": 10.0
        });
        let cons: Constraint = serde_json::from_value(with_constant).unwrap();
        assert_eq!(cons.expr(), &Expr::from(x));
        assert_eq!(cons.rhs(), Some(6.0));
        assert_eq!(cons.lhs(), None);
    }
}
