//! Python wrapper for the problem session
use mipexpr_core::expr::expression::Expr;
use mipexpr_core::optimize::objective::ObjectiveSense;
use mipexpr_core::optimize::problem::{Problem, ProblemError};
use mipexpr_core::optimize::variable::{VariableData, VariableType};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::expr::{Operand, PyConstraint, PyExpr};

fn problem_error(err: ProblemError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_sense(sense: &str) -> PyResult<ObjectiveSense> {
    match sense.to_ascii_lowercase().as_str() {
        "minimize" | "min" => Ok(ObjectiveSense::Minimize),
        "maximize" | "max" => Ok(ObjectiveSense::Maximize),
        _ => Err(PyValueError::new_err(format!("unknown objective sense {}", sense))),
    }
}

fn parse_vtype(vtype: &str) -> PyResult<VariableType> {
    match vtype.to_ascii_uppercase().as_str() {
        "C" | "CONTINUOUS" => Ok(VariableType::Continuous),
        "I" | "INTEGER" => Ok(VariableType::Integer),
        "B" | "BINARY" => Ok(VariableType::Binary),
        _ => Err(PyValueError::new_err(format!("unknown variable type {}", vtype))),
    }
}

/// Model holding variables, constraints and the objective
#[pyclass(name = "Model", module = "pymipexpr")]
pub struct PyModel {
    inner: Problem,
}

#[pymethods]
impl PyModel {
    #[new]
    #[pyo3(signature = (sense="minimize"))]
    fn new(sense: &str) -> PyResult<Self> {
        Ok(PyModel {
            inner: Problem::new(parse_sense(sense)?),
        })
    }

    /// Add a variable, `lb=None` means unbounded below and `ub=None` unbounded above
    #[pyo3(name = "addVar", signature = (name=None, vtype="C", lb=Some(0.0), ub=None, obj=0.0))]
    fn add_var(
        &mut self,
        name: Option<String>,
        vtype: &str,
        lb: Option<f64>,
        ub: Option<f64>,
        obj: f64,
    ) -> PyResult<PyExpr> {
        let name = name.unwrap_or_else(|| format!("x{}", self.inner.num_variables()));
        let data = VariableData {
            name,
            variable_type: parse_vtype(vtype)?,
            lower_bound: Some(lb.unwrap_or(f64::NEG_INFINITY)),
            upper_bound: ub,
            objective_coefficient: obj,
        };
        let variable = self.inner.add_variable(data).map_err(problem_error)?;
        Ok(PyExpr::new(Expr::from(variable)))
    }

    /// Add a constraint, returning the name it was stored under
    #[pyo3(name = "addCons", signature = (cons, name=None))]
    fn add_cons(&mut self, cons: PyConstraint, name: Option<&str>) -> PyResult<String> {
        self.inner
            .add_constraint(name, cons.inner)
            .map_err(problem_error)
    }

    #[pyo3(name = "setObjective", signature = (expr, sense="minimize"))]
    fn set_objective(&mut self, expr: Operand, sense: &str) -> PyResult<()> {
        self.inner
            .set_objective(Expr::from(expr), parse_sense(sense)?)
            .map_err(problem_error)
    }

    #[pyo3(name = "getNVars")]
    fn get_n_vars(&self) -> usize {
        self.inner.num_variables()
    }

    #[pyo3(name = "getNConss")]
    fn get_n_conss(&self) -> usize {
        self.inner.num_constraints()
    }

    /// Model as a JSON string, for handing to an out-of-process solver
    #[pyo3(name = "toJson")]
    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(problem_error)
    }
}
