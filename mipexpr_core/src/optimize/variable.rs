//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Definition of a decision variable, as registered with a
/// [`Problem`](crate::optimize::problem::Problem)
///
/// Built with [`VariableDataBuilder`], fields left unset take the defaults shown below, except
/// the bounds which fall back to the problem's [`Configuration`](crate::configuration::Configuration).
///
/// # Examples
/// ```rust
/// use mipexpr_core::optimize::variable::{VariableDataBuilder, VariableType};
/// let data = VariableDataBuilder::default()
///     .name("y")
///     .variable_type(VariableType::Integer)
///     .upper_bound(10.)
///     .build()
///     .unwrap();
/// assert_eq!(data.upper_bound, Some(10.));
/// assert_eq!(data.lower_bound, None);
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct VariableData {
    /// Name of the variable, must be unique within a problem
    pub name: String,
    /// Type of the variable
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// Lower bound, None for the problem default
    #[builder(setter(strip_option), default)]
    pub lower_bound: Option<f64>,
    /// Upper bound, None for the problem default
    #[builder(setter(strip_option), default)]
    pub upper_bound: Option<f64>,
    /// Coefficient of the variable in the objective
    #[builder(default = "0.")]
    pub objective_coefficient: f64,
}

impl Display for VariableData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.variable_type)
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, Serialize, Deserialize)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
    /// Binary Variable, an integer variable restricted to [0, 1]
    Binary,
}

impl VariableType {
    /// True for the integral variable types
    pub fn is_integral(&self) -> bool {
        matches!(self, VariableType::Integer | VariableType::Binary)
    }
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
            VariableType::Binary => write!(f, "BINARY"),
        }
    }
}
