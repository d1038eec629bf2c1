//! Settings carried by each [`Problem`](crate::optimize::problem::Problem)
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Lower bound given to variables created without one
    pub lower_bound: f64,
    /// Upper bound given to variables created without one
    pub upper_bound: f64,
    /// Bounds at or beyond this magnitude are handed to solvers as infinite
    pub infinity: f64,
    /// Feasibility tolerance used when checking a solution against the constraints
    pub tolerance: f64,
}

impl Configuration {
    /// Clamp a bound to infinity if its magnitude reaches the configured infinity
    pub fn normalize_bound(&self, bound: f64) -> f64 {
        if bound >= self.infinity {
            f64::INFINITY
        } else if bound <= -self.infinity {
            f64::NEG_INFINITY
        } else {
            bound
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: 0.,
            upper_bound: f64::INFINITY,
            infinity: 1e20,
            tolerance: 1e-06,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_bound() {
        let config = Configuration::default();
        assert_eq!(config.normalize_bound(1e21), f64::INFINITY);
        assert_eq!(config.normalize_bound(-1e20), f64::NEG_INFINITY);
        assert_eq!(config.normalize_bound(42.), 42.);
    }
}
