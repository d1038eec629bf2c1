//! Provides the canonical monomial key used by expressions
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::expr::variable::Variable;

/// A product of variables, stored as a sorted tuple
///
/// The empty term is the constant term, a term of length one is linear, a term of length two
/// is quadratic, and so on. Variables may repeat, so `x*x` is the term `(x, x)`, distinct from
/// `(x,)`. Sorting on construction makes `x*y` and `y*x` the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Variable>", into = "Vec<Variable>")]
pub struct Term(Vec<Variable>);

impl Term {
    /// Create a term from a collection of variables, sorting them into canonical order
    pub fn new(mut variables: Vec<Variable>) -> Self {
        variables.sort_unstable();
        Term(variables)
    }

    /// The constant term (empty tuple)
    pub fn constant() -> Self {
        Term(Vec::new())
    }

    /// Merge two terms into the term representing their product
    ///
    /// # Examples
    /// ```rust
    /// use mipexpr_core::expr::term::Term;
    /// use mipexpr_core::expr::variable::Variable;
    /// let x = Variable::new(0);
    /// let y = Variable::new(1);
    /// let xy = Term::merge(&Term::from(y), &Term::from(x));
    /// assert_eq!(xy, Term::from((x, y)));
    /// ```
    pub fn merge(left: &Term, right: &Term) -> Self {
        let mut variables = Vec::with_capacity(left.0.len() + right.0.len());
        variables.extend_from_slice(&left.0);
        variables.extend_from_slice(&right.0);
        Term::new(variables)
    }

    /// Number of variable factors in the term
    pub fn degree(&self) -> usize {
        self.0.len()
    }

    /// True for the empty (constant) term
    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    /// The variables of the term, in canonical order, repeats included
    pub fn variables(&self) -> &[Variable] {
        &self.0
    }
}

impl From<Vec<Variable>> for Term {
    fn from(variables: Vec<Variable>) -> Self {
        Term::new(variables)
    }
}

impl From<Term> for Vec<Variable> {
    fn from(term: Term) -> Self {
        term.0
    }
}

impl From<()> for Term {
    fn from(_: ()) -> Self {
        Term::constant()
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term(vec![variable])
    }
}

impl From<(Variable, Variable)> for Term {
    fn from((a, b): (Variable, Variable)) -> Self {
        Term::new(vec![a, b])
    }
}

impl From<(Variable, Variable, Variable)> for Term {
    fn from((a, b, c): (Variable, Variable, Variable)) -> Self {
        Term::new(vec![a, b, c])
    }
}

impl From<&[Variable]> for Term {
    fn from(variables: &[Variable]) -> Self {
        Term::new(variables.to_vec())
    }
}

impl<const N: usize> From<[Variable; N]> for Term {
    fn from(variables: [Variable; N]) -> Self {
        Term::new(variables.to_vec())
    }
}

impl From<&Term> for Term {
    fn from(term: &Term) -> Self {
        term.clone()
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let factors = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("*");
        write!(f, "{}", factors)
    }
}
