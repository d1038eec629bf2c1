//! Provides the polynomial expression type, a mapping from [`Term`] to coefficient
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::Index;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::expr::term::Term;
use crate::expr::variable::Variable;

static ZERO: f64 = 0.0;

/// A polynomial over [`Variable`]s
///
/// Each [`Term`] maps to its coefficient, the empty term holds the constant. Coefficients which
/// cancel to exactly zero are dropped, and looking up an absent term gives `0.0`, so two
/// expressions compare equal whenever they represent the same polynomial.
///
/// Expressions are normally built with the arithmetic operators, see [`crate::expr::ops`].
///
/// # Examples
/// ```rust
/// use mipexpr_core::expr::expression::Expr;
/// use mipexpr_core::expr::variable::Variable;
/// let x = Variable::new(0);
/// let y = Variable::new(1);
/// let expr = (x + 3.0) * y;
/// assert_eq!(expr[(x, y)], 1.0);
/// assert_eq!(expr[y], 3.0);
/// assert_eq!(expr[x], 0.0);
/// assert_eq!(expr.degree(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TermEntry>", into = "Vec<TermEntry>")]
pub struct Expr {
    terms: IndexMap<Term, f64>,
}

impl Expr {
    // region Creation Functions
    /// Create a new, empty expression (the zero polynomial)
    pub fn new() -> Self {
        Self::default()
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Self::default()
    }

    /// The constant polynomial `1`, the multiplicative identity
    pub fn one() -> Self {
        Self::from_constant(1.0)
    }

    /// Create a constant expression
    pub fn from_constant(constant: f64) -> Self {
        Self::from_term((), constant)
    }

    /// Create an expression holding a single term
    pub fn from_term<T: Into<Term>>(term: T, coefficient: f64) -> Self {
        let mut expr = Self::default();
        expr.accumulate(term.into(), coefficient);
        expr
    }

    /// Create an expression from (term, coefficient) pairs, summing repeated terms
    pub fn from_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Term>,
    {
        let mut expr = Self::default();
        for (term, coefficient) in terms {
            expr.accumulate(term.into(), coefficient);
        }
        expr
    }
    // endregion Creation Functions

    // region Accessors
    /// Coefficient of a term, `0.0` when the term is absent
    pub fn coefficient<T: Into<Term>>(&self, term: T) -> f64 {
        self.terms.get(&term.into()).copied().unwrap_or(0.0)
    }

    /// Coefficient of the constant term
    pub fn constant(&self) -> f64 {
        self.coefficient(())
    }

    /// Iterate over the stored terms and their coefficients
    pub fn terms(&self) -> impl Iterator<Item = (&Term, f64)> + '_ {
        self.terms.iter().map(|(t, c)| (t, *c))
    }

    /// Number of stored (non-zero) terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if the expression is the zero polynomial
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest number of variable factors in any term, 0 for constant or empty expressions
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Term::degree).max().unwrap_or(0)
    }

    /// True if the expression has degree at most one
    pub fn is_linear(&self) -> bool {
        self.degree() <= 1
    }

    /// True if the expression has degree at most two
    pub fn is_quadratic(&self) -> bool {
        self.degree() <= 2
    }

    /// All variables appearing in the expression, sorted and without repeats
    pub fn variables(&self) -> Vec<Variable> {
        self.terms
            .keys()
            .flat_map(|t| t.variables().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
    // endregion Accessors

    // region Derived Expressions
    /// Copy of the expression with the constant term removed
    pub fn without_constant(&self) -> Self {
        let mut expr = self.clone();
        expr.terms.shift_remove(&Term::constant());
        expr
    }

    /// Multiply every coefficient by a factor
    pub fn scale(&self, by: f64) -> Self {
        let mut expr = Self::default();
        for (term, coefficient) in &self.terms {
            expr.accumulate(term.clone(), coefficient * by);
        }
        expr
    }

    /// Raise the expression to a power
    ///
    /// Only non-negative integer exponents are supported, anything else fails with
    /// [`ExprError::UnsupportedExponent`]. Any expression to the power 0 is the constant `1`.
    ///
    /// # Examples
    /// ```rust
    /// use mipexpr_core::expr::expression::Expr;
    /// use mipexpr_core::expr::variable::Variable;
    /// let x = Variable::new(0);
    /// let square = (x + 3.0).pow(2.).unwrap();
    /// assert_eq!(square, x * x + 6.0 * x + 9.0);
    /// assert!((x + 1.0).pow(0.5).is_err());
    /// ```
    pub fn pow(&self, exponent: f64) -> Result<Self, ExprError> {
        if !exponent.is_finite()
            || exponent < 0.0
            || exponent.fract() != 0.0
            || exponent > u32::MAX as f64
        {
            return Err(ExprError::UnsupportedExponent(exponent));
        }
        Ok(self.powi(exponent as u32))
    }

    /// Raise the expression to a non-negative integer power
    pub fn powi(&self, exponent: u32) -> Self {
        trace!(exponent, terms = self.len(), "expanding power of expression");
        let mut result = Self::one();
        let mut base = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.product(&base);
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.product(&base);
            }
        }
        result
    }

    /// Evaluate the expression at a point
    ///
    /// # Parameters
    /// - `values`: Value of each variable appearing in the expression
    ///
    /// # Returns
    /// The value of the polynomial, or [`ExprError::MissingValue`] naming the first variable
    /// without a value
    pub fn evaluate(&self, values: &IndexMap<Variable, f64>) -> Result<f64, ExprError> {
        let mut total = 0.0;
        for (term, coefficient) in &self.terms {
            let mut product = *coefficient;
            for var in term.variables() {
                match values.get(var) {
                    Some(value) => product *= value,
                    None => return Err(ExprError::MissingValue(*var)),
                }
            }
            total += product;
        }
        Ok(total)
    }
    // endregion Derived Expressions

    // region Crate Internal Mutation
    /*
    In place updates used while building a new expression. Public operations never mutate an
    expression the caller still holds.
    */
    /// Add `coefficient` to the coefficient of `term`, dropping the term if it cancels
    pub(crate) fn accumulate(&mut self, term: Term, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        match self.terms.entry(term) {
            Entry::Occupied(mut entry) => {
                let updated = *entry.get() + coefficient;
                if updated == 0.0 {
                    entry.shift_remove();
                } else {
                    *entry.get_mut() = updated;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(coefficient);
            }
        }
    }

    /// Add `factor * other` into this expression
    pub(crate) fn add_scaled(&mut self, other: &Expr, factor: f64) {
        for (term, coefficient) in &other.terms {
            self.accumulate(term.clone(), coefficient * factor);
        }
    }

    /// Distribute the product of two expressions
    pub(crate) fn product(&self, other: &Expr) -> Expr {
        let mut expr = Expr::default();
        for (left_term, left_coefficient) in &self.terms {
            for (right_term, right_coefficient) in &other.terms {
                expr.accumulate(
                    Term::merge(left_term, right_term),
                    left_coefficient * right_coefficient,
                );
            }
        }
        expr
    }
    // endregion Crate Internal Mutation
}

// region Conversions
impl From<f64> for Expr {
    fn from(constant: f64) -> Self {
        Expr::from_constant(constant)
    }
}

impl From<i32> for Expr {
    fn from(constant: i32) -> Self {
        Expr::from_constant(f64::from(constant))
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Expr::from_term(variable, 1.0)
    }
}

impl From<Term> for Expr {
    fn from(term: Term) -> Self {
        Expr::from_term(term, 1.0)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl<T: Into<Term>> Index<T> for Expr {
    type Output = f64;

    fn index(&self, term: T) -> &f64 {
        self.terms.get(&term.into()).unwrap_or(&ZERO)
    }
}

/// Serialized form of a single term of an expression
#[derive(Serialize, Deserialize)]
pub struct TermEntry {
    vars: Term,
    coefficient: f64,
}

impl From<Vec<TermEntry>> for Expr {
    fn from(entries: Vec<TermEntry>) -> Self {
        Expr::from_terms(entries.into_iter().map(|e| (e.vars, e.coefficient)))
    }
}

impl From<Expr> for Vec<TermEntry> {
    fn from(expr: Expr) -> Self {
        expr.terms
            .into_iter()
            .map(|(vars, coefficient)| TermEntry { vars, coefficient })
            .collect()
    }
}
// endregion Conversions

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        // Highest degree first, then by variable order, constant last
        let mut terms = self.terms.iter().collect::<Vec<_>>();
        terms.sort_by(|(a, _), (b, _)| b.degree().cmp(&a.degree()).then_with(|| a.cmp(b)));
        for (i, (term, coefficient)) in terms.into_iter().enumerate() {
            let magnitude = coefficient.abs();
            match (i, *coefficient < 0.0) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if term.is_constant() {
                write!(f, "{}", magnitude)?;
            } else if magnitude == 1.0 {
                write!(f, "{}", term)?;
            } else {
                write!(f, "{}*{}", magnitude, term)?;
            }
        }
        Ok(())
    }
}

/// Sum an iterator of expressions (or anything convertible to one) into a single expression
///
/// Accumulates in place, so summing many terms does not build intermediate expressions.
///
/// # Examples
/// ```rust
/// use mipexpr_core::expr::expression::quicksum;
/// use mipexpr_core::expr::variable::Variable;
/// let vars = [Variable::new(0), Variable::new(1), Variable::new(2)];
/// let costs = [1.5, 2.0, 0.5];
/// let total = quicksum(vars.iter().zip(costs).map(|(v, c)| c * *v));
/// assert_eq!(total[vars[1]], 2.0);
/// ```
pub fn quicksum<I, T>(items: I) -> Expr
where
    I: IntoIterator<Item = T>,
    T: Into<Expr>,
{
    let mut total = Expr::zero();
    for item in items {
        total.add_scaled(&item.into(), 1.0);
    }
    total
}

/// Errors associated with building or evaluating expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Error when raising an expression to a negative, fractional, or non-finite power
    #[error("Exponent {0} is not supported, only non-negative integer powers are")]
    UnsupportedExponent(f64),
    /// Error when evaluating an expression without a value for one of its variables
    #[error("No value given for variable {0}")]
    MissingValue(Variable),
}
