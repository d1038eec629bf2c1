//! Python wrappers for expressions and constraints
use mipexpr_core::expr::expression::{Expr, ExprError};
use mipexpr_core::expr::term::Term;
use mipexpr_core::expr::variable::Variable;
use mipexpr_core::optimize::constraint::{Compare, Constraint};
use pyo3::exceptions::{PyNotImplementedError, PyTypeError};
use pyo3::prelude::*;
use pyo3::types::PyTuple;

/// Right hand operand of an arithmetic or comparison operator
#[derive(FromPyObject)]
pub enum Operand {
    Expr(PyExpr),
    Number(f64),
}

impl From<Operand> for Expr {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Expr(expr) => expr.inner,
            Operand::Number(value) => Expr::from_constant(value),
        }
    }
}

/// Polynomial expression over model variables, variables themselves are single term
/// expressions
#[pyclass(name = "Expr", module = "pymipexpr")]
#[derive(Clone, Debug)]
pub struct PyExpr {
    pub(crate) inner: Expr,
}

impl PyExpr {
    pub(crate) fn new(inner: Expr) -> Self {
        PyExpr { inner }
    }

    /// The variable this expression stands for, if it is a bare variable
    fn as_variable(&self) -> Option<Variable> {
        let mut terms = self.inner.terms();
        match (terms.next(), terms.next()) {
            (Some((term, coefficient)), None) if term.degree() == 1 && coefficient == 1.0 => {
                Some(term.variables()[0])
            }
            _ => None,
        }
    }

    fn variable_pair(&self, other: Operand) -> PyResult<(Variable, Variable)> {
        let other = match other {
            Operand::Expr(expr) => expr.as_variable(),
            Operand::Number(_) => None,
        };
        match (self.as_variable(), other) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(PyTypeError::new_err("only variables can be ordered")),
        }
    }
}

/// Convert an index key (a variable, or a tuple of variables) into a term
fn term_from_key(key: &Bound<'_, PyAny>) -> PyResult<Term> {
    let not_a_variable = || PyTypeError::new_err("expected a variable or a tuple of variables");
    if let Ok(tuple) = key.downcast::<PyTuple>() {
        let mut variables = Vec::with_capacity(tuple.len());
        for item in tuple.iter() {
            let expr = item.extract::<PyRef<'_, PyExpr>>()?;
            variables.push(expr.as_variable().ok_or_else(not_a_variable)?);
        }
        return Ok(Term::new(variables));
    }
    let expr = key.extract::<PyRef<'_, PyExpr>>()?;
    expr.as_variable().map(Term::from).ok_or_else(not_a_variable)
}

fn unsupported(err: ExprError) -> PyErr {
    PyNotImplementedError::new_err(err.to_string())
}

#[pymethods]
impl PyExpr {
    #[new]
    #[pyo3(signature = (constant=0.0))]
    fn py_new(constant: f64) -> Self {
        PyExpr::new(Expr::from_constant(constant))
    }

    fn __add__(&self, other: Operand) -> Self {
        PyExpr::new(&self.inner + Expr::from(other))
    }

    fn __radd__(&self, other: Operand) -> Self {
        PyExpr::new(Expr::from(other) + &self.inner)
    }

    fn __sub__(&self, other: Operand) -> Self {
        PyExpr::new(&self.inner - Expr::from(other))
    }

    fn __rsub__(&self, other: Operand) -> Self {
        PyExpr::new(Expr::from(other) - &self.inner)
    }

    fn __mul__(&self, other: Operand) -> Self {
        PyExpr::new(&self.inner * Expr::from(other))
    }

    fn __rmul__(&self, other: Operand) -> Self {
        PyExpr::new(Expr::from(other) * &self.inner)
    }

    fn __neg__(&self) -> Self {
        PyExpr::new(-&self.inner)
    }

    fn __pow__(&self, exponent: f64, _modulo: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        self.inner.pow(exponent).map(PyExpr::new).map_err(unsupported)
    }

    fn __getitem__(&self, key: &Bound<'_, PyAny>) -> PyResult<f64> {
        Ok(self.inner.coefficient(term_from_key(key)?))
    }

    fn __le__(&self, other: Operand) -> PyConstraint {
        PyConstraint::new(self.inner.leq(other))
    }

    fn __ge__(&self, other: Operand) -> PyConstraint {
        PyConstraint::new(self.inner.geq(other))
    }

    fn __eq__(&self, other: Operand) -> PyConstraint {
        PyConstraint::new(self.inner.equals(other))
    }

    /// Variables are ordered by creation, other expressions have no order
    fn __lt__(&self, other: Operand) -> PyResult<bool> {
        let (left, right) = self.variable_pair(other)?;
        Ok(left < right)
    }

    fn __gt__(&self, other: Operand) -> PyResult<bool> {
        let (left, right) = self.variable_pair(other)?;
        Ok(left > right)
    }

    fn degree(&self) -> usize {
        self.inner.degree()
    }

    /// Terms as (variable ids, coefficient) pairs
    #[getter]
    fn terms(&self) -> Vec<(Vec<u32>, f64)> {
        self.inner
            .terms()
            .map(|(t, c)| (t.variables().iter().map(|v| v.id()).collect(), c))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!("Expr({})", self.inner)
    }
}

/// Constraint with lower and/or upper bound
#[pyclass(name = "Constraint", module = "pymipexpr")]
#[derive(Clone, Debug)]
pub struct PyConstraint {
    pub(crate) inner: Constraint,
}

impl PyConstraint {
    pub(crate) fn new(inner: Constraint) -> Self {
        PyConstraint { inner }
    }
}

#[pymethods]
impl PyConstraint {
    #[getter]
    fn lhs(&self) -> Option<f64> {
        self.inner.lhs()
    }

    #[getter]
    fn rhs(&self) -> Option<f64> {
        self.inner.rhs()
    }

    #[getter]
    fn expr(&self) -> PyExpr {
        PyExpr::new(self.inner.expr().clone())
    }

    /// `(expr >= lo) <= hi`
    fn __le__(&self, other: f64) -> PyResult<Self> {
        self.inner
            .with_upper(other)
            .map(PyConstraint::new)
            .map_err(|e| PyTypeError::new_err(e.to_string()))
    }

    /// `lo <= (expr <= hi)`, which Python evaluates as `(expr <= hi) >= lo`
    fn __ge__(&self, other: f64) -> PyResult<Self> {
        self.inner
            .with_lower(other)
            .map(PyConstraint::new)
            .map_err(|e| PyTypeError::new_err(e.to_string()))
    }

    /// Constraints have no truth value, so `lo <= expr <= hi` fails instead of dropping `lo`
    fn __bool__(&self) -> PyResult<bool> {
        Err(PyTypeError::new_err(
            "use parentheses or between() to build a ranged constraint",
        ))
    }

    fn __repr__(&self) -> String {
        format!("Constraint({})", self.inner)
    }
}

/// Build the ranged constraint `lhs <= expr <= rhs`
#[pyfunction]
pub fn between(lhs: f64, expr: Operand, rhs: f64) -> PyConstraint {
    PyConstraint::new(mipexpr_core::optimize::constraint::between(
        lhs,
        Expr::from(expr),
        rhs,
    ))
}

/// Sum an iterable of expressions and numbers
#[pyfunction]
pub fn quicksum(terms: &Bound<'_, PyAny>) -> PyResult<PyExpr> {
    let mut operands = Vec::new();
    for item in terms.try_iter()? {
        operands.push(item?.extract::<Operand>()?);
    }
    Ok(PyExpr::new(mipexpr_core::expr::expression::quicksum(operands)))
}
