mod expr;
mod model;

use pyo3::prelude::*;

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<model::PyModel>()?;
    m.add_class::<expr::PyExpr>()?;
    m.add_class::<expr::PyConstraint>()?;
    m.add_function(wrap_pyfunction!(expr::quicksum, m)?)?;
    m.add_function(wrap_pyfunction!(expr::between, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::exceptions::PyTypeError;

    /// Run `code` against a fresh module holding a model with variables `x` and `y`
    fn run_with_model(py: Python<'_>, code: &std::ffi::CStr) -> PyResult<()> {
        let module = PyModule::new(py, "_core")?;
        _core(&module)?;
        let globals = module.dict();
        py.run(
            c"m = Model()\nx = m.addVar('x')\ny = m.addVar('y')",
            Some(&globals),
            None,
        )?;
        py.run(code, Some(&globals), None)
    }

    #[test]
    fn chained_comparison_is_rejected() {
        Python::with_gil(|py| {
            let err = run_with_model(py, c"c = 0 <= x <= 5").unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_with_model(py, c"c = (x + 2*y <= 5) <= 3").unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_with_model(py, c"if x <= 5:\n    pass").unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }

    #[test]
    fn parenthesized_and_between_ranging() {
        Python::with_gil(|py| {
            run_with_model(
                py,
                c"c = 3 <= (x + 2*y <= 5)
assert (c.lhs, c.rhs) == (3.0, 5.0)
d = between(3, x + 2*y + 1, 5)
assert (d.lhs, d.rhs) == (2.0, 4.0)
assert m.addCons(d) == 'c0'
assert m.getNConss() == 1",
            )
            .unwrap();
        });
    }

    #[test]
    fn variables_are_ordered() {
        Python::with_gil(|py| {
            run_with_model(py, c"assert x < y\nassert y > x\nassert not (y < x)").unwrap();
            let err = run_with_model(py, c"x + 1 < y").unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_with_model(py, c"x < 3").unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }
}
