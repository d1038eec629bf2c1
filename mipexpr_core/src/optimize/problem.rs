//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::configuration::Configuration;
use crate::expr::expression::{Expr, ExprError};
use crate::expr::variable::Variable;
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense};
use crate::optimize::solvers::SolverBackend;
use crate::optimize::variable::{
    VariableData, VariableDataBuilder, VariableDataBuilderError, VariableType,
};

/// An optimization problem
///
/// The problem is the session object of a model: it hands out [`Variable`] handles, keeps the
/// data describing each variable, and collects the constraints and objective built from
/// expressions over those handles. It is passed explicitly to whatever needs it, there is no
/// global model state.
///
/// # Examples
/// ```rust
/// use mipexpr_core::optimize::constraint::Compare;
/// use mipexpr_core::optimize::objective::ObjectiveSense;
/// use mipexpr_core::optimize::problem::Problem;
/// use mipexpr_core::optimize::variable::VariableType;
/// let mut problem = Problem::new_maximization();
/// let x = problem.add_new_variable("x", VariableType::Integer, 0., 10.).unwrap();
/// let y = problem.add_new_variable("y", VariableType::Continuous, 0., 5.).unwrap();
/// problem.add_constraint(Some("capacity"), (x + 2.0 * y).leq(14)).unwrap();
/// problem.set_objective(3.0 * x + y, ObjectiveSense::Maximize).unwrap();
/// assert_eq!(problem.num_constraints(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    /// Settings used when adding variables and checking solutions
    configuration: Configuration,
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, in creation order
    variables: IndexMap<Variable, VariableData>,
    /// Lookup from variable name to handle
    variable_names: IndexMap<String, Variable>,
    /// Constraints of the optimization problem, keyed by name
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self::with_configuration(objective_sense, Configuration::default())
    }

    /// Create a new optimization problem with specific settings
    pub fn with_configuration(objective_sense: ObjectiveSense, configuration: Configuration) -> Self {
        Self {
            configuration,
            objective: Objective::new(Expr::zero(), objective_sense),
            variables: IndexMap::new(),
            variable_names: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    /// Settings of the problem
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The current objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Look up a variable handle by name
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.variable_names.get(name).copied()
    }

    /// Data of a variable, with bounds resolved against the configuration
    pub fn variable_data(&self, variable: Variable) -> Option<&VariableData> {
        self.variables.get(&variable)
    }

    /// Iterate over the variables in creation order
    pub fn variables(&self) -> impl Iterator<Item = (Variable, &VariableData)> + '_ {
        self.variables.iter().map(|(v, d)| (*v, d))
    }

    /// Look up a constraint by name
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    /// Iterate over the constraints in the order they were added
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> + '_ {
        self.constraints.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Current number of variables in the problem
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints in the problem
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    // region Update Objective
    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    /// Replace the objective of the problem
    ///
    /// This replaces any objective coefficients given when variables were added.
    pub fn set_objective<E: Into<Expr>>(
        &mut self,
        expr: E,
        sense: ObjectiveSense,
    ) -> Result<(), ProblemError> {
        let expr = expr.into();
        if !self.contains_all(&expr.variables()) {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        debug!(terms = expr.len(), degree = expr.degree(), ?sense, "setting objective");
        self.objective = Objective::new(expr, sense);
        Ok(())
    }
    // endregion Update Objective

    // region Adding Variables
    /// Add a variable to the optimization problem
    ///
    /// Missing bounds are taken from the configuration, binary variables are clamped to
    /// [0, 1], and a non-zero objective coefficient is added to the objective.
    ///
    /// # Returns
    /// The handle of the new variable
    pub fn add_variable(&mut self, mut data: VariableData) -> Result<Variable, ProblemError> {
        if self.variable_names.contains_key(&data.name) {
            return Err(ProblemError::VariableNameAlreadyExists(data.name));
        }
        let (lower_bound, upper_bound) = self.resolve_bounds(
            data.variable_type,
            data.lower_bound.unwrap_or(self.configuration.lower_bound),
            data.upper_bound.unwrap_or(self.configuration.upper_bound),
        )?;
        data.lower_bound = Some(lower_bound);
        data.upper_bound = Some(upper_bound);

        let id = u32::try_from(self.variables.len()).map_err(|_| ProblemError::TooManyVariables)?;
        let variable = Variable::new(id);
        if data.objective_coefficient != 0. {
            let mut expr = self.objective.expr().clone();
            expr += data.objective_coefficient * variable;
            self.objective.set_expr(expr);
        }
        debug!(name = %data.name, id, variable_type = %data.variable_type, "added variable");
        self.variable_names.insert(data.name.clone(), variable);
        self.variables.insert(variable, data);
        Ok(variable)
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        name: &str,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<Variable, ProblemError> {
        let data = VariableDataBuilder::default()
            .name(name)
            .variable_type(variable_type)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .build()?;
        self.add_variable(data)
    }
    // endregion Adding Variables

    // region Update Variable Bounds
    /// Update the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        variable: Variable,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let variable_type = match self.variables.get(&variable) {
            Some(data) => data.variable_type,
            None => return Err(ProblemError::NonExistentVariable),
        };
        let (lower_bound, upper_bound) =
            self.resolve_bounds(variable_type, lower_bound, upper_bound)?;
        if let Some(data) = self.variables.get_mut(&variable) {
            data.lower_bound = Some(lower_bound);
            data.upper_bound = Some(upper_bound);
        }
        Ok(())
    }

    /// Normalize infinite bounds, clamp binary variables to [0, 1], and check the bounds
    /// are ordered
    fn resolve_bounds(
        &self,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(f64, f64), ProblemError> {
        let mut lower_bound = self.configuration.normalize_bound(lower_bound);
        let mut upper_bound = self.configuration.normalize_bound(upper_bound);
        if variable_type == VariableType::Binary {
            lower_bound = lower_bound.max(0.);
            upper_bound = upper_bound.min(1.);
        }
        if lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds);
        }
        Ok((lower_bound, upper_bound))
    }
    // endregion Update Variable Bounds

    // region Adding Constraints
    /// Add a constraint to the problem
    ///
    /// # Parameters
    /// - `name`: Name of the constraint, if None a name of the form `c{n}` is generated
    /// - `constraint`: The constraint, every variable in it must belong to this problem
    ///
    /// Bounds at or beyond the configured infinity are stored as infinite.
    ///
    /// # Returns
    /// The name the constraint was stored under
    pub fn add_constraint(
        &mut self,
        name: Option<&str>,
        constraint: Constraint,
    ) -> Result<String, ProblemError> {
        let name = match name {
            Some(name) => {
                if self.constraints.contains_key(name) {
                    return Err(ProblemError::ConstraintNameAlreadyExists(name.to_string()));
                }
                name.to_string()
            }
            None => self.generate_constraint_name(),
        };
        if !self.contains_all(&constraint.variables()) {
            return Err(ProblemError::NonExistentVariablesInConstraint);
        }
        let constraint = constraint.map_bounds(|b| self.configuration.normalize_bound(b));
        debug!(name = %name, degree = constraint.degree(), "added constraint");
        self.constraints.insert(name.clone(), constraint);
        Ok(name)
    }

    /// Remove a constraint (by name) from the problem, returning it if it existed
    pub fn remove_constraint(&mut self, name: &str) -> Option<Constraint> {
        self.constraints.shift_remove(name)
    }

    fn generate_constraint_name(&self) -> String {
        let mut index = self.constraints.len();
        loop {
            let candidate = format!("c{}", index);
            if !self.constraints.contains_key(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }
    // endregion Adding Constraints

    // region Check Problem
    /*
    Functions for checking properties of the Problem, such as if integer variables are
    present, the largest degree of any expression, etc.
    */
    /// True if any variable is integer or binary
    pub fn has_integer_variables(&self) -> bool {
        self.variables.values().any(|d| d.variable_type.is_integral())
    }

    /// Largest degree of the objective and all constraints
    pub fn max_degree(&self) -> usize {
        self.constraints
            .values()
            .map(Constraint::degree)
            .chain(std::iter::once(self.objective.expr().degree()))
            .max()
            .unwrap_or(0)
    }

    /// Classify the problem by the degree of its expressions and its variable types
    pub fn problem_type(&self) -> ProblemType {
        let integer = self.has_integer_variables();
        match (self.max_degree(), integer) {
            (0 | 1, false) => ProblemType::LinearContinuous,
            (0 | 1, true) => ProblemType::LinearMixedInteger,
            (2, false) => ProblemType::QuadraticContinuous,
            (2, true) => ProblemType::QuadraticMixedInteger,
            (_, false) => ProblemType::PolynomialContinuous,
            (_, true) => ProblemType::PolynomialMixedInteger,
        }
    }

    /// Check a candidate solution against every constraint
    ///
    /// # Returns
    /// Names and violation amounts of the constraints violated by more than the configured
    /// tolerance, empty if the point is feasible for all constraints
    pub fn check_solution(
        &self,
        values: &IndexMap<Variable, f64>,
    ) -> Result<Vec<(String, f64)>, ProblemError> {
        let mut violated = Vec::new();
        for (name, constraint) in &self.constraints {
            let violation = constraint.violation(values)?;
            if violation > self.configuration.tolerance {
                violated.push((name.clone(), violation));
            }
        }
        Ok(violated)
    }

    fn contains_all(&self, variables: &[Variable]) -> bool {
        variables.iter().all(|v| self.variables.contains_key(v))
    }
    // endregion Check Problem

    // region Hand Off
    /// Load the whole problem into a solver backend
    pub fn load_into<B: SolverBackend>(&self, backend: &mut B) -> Result<(), B::Error> {
        debug!(
            variables = self.num_variables(),
            constraints = self.num_constraints(),
            problem_type = ?self.problem_type(),
            "loading problem into solver backend"
        );
        for (variable, data) in &self.variables {
            backend.add_variable(*variable, data)?;
        }
        for (name, constraint) in &self.constraints {
            backend.add_constraint(name, constraint)?;
        }
        backend.set_objective(&self.objective)
    }

    /// Serialize the problem to a JSON string
    ///
    /// Infinite bounds are written as `null`.
    pub fn to_json(&self) -> Result<String, ProblemError> {
        let snapshot = ProblemSnapshot {
            variables: self
                .variables
                .iter()
                .map(|(v, d)| VariableSnapshot { id: *v, data: d })
                .collect(),
            constraints: &self.constraints,
            objective: &self.objective,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }
    // endregion Hand Off
}

/// Serialized view of a problem
#[derive(Serialize)]
struct ProblemSnapshot<'a> {
    variables: Vec<VariableSnapshot<'a>>,
    constraints: &'a IndexMap<String, Constraint>,
    objective: &'a Objective,
}

#[derive(Serialize)]
struct VariableSnapshot<'a> {
    id: Variable,
    #[serde(flatten)]
    data: &'a VariableData,
}

/// Types of optimization problems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    /// Problem with linear objectives and constraints, and continuous variables
    LinearContinuous,
    /// Problem with quadratic objective or constraints, and continuous variables
    QuadraticContinuous,
    /// Problem with linear objective and constraints, with integer and continuous variables
    LinearMixedInteger,
    /// Problem with quadratic objective or constraints, and some integer variables
    QuadraticMixedInteger,
    /// Problem with terms of degree three or more, and continuous variables
    ///
    /// # Note:
    /// Most solver backends reject this problem type when it is loaded
    PolynomialContinuous,
    /// Problem with terms of degree three or more, and some integer variables
    PolynomialMixedInteger,
}

/// Errors associated with the Problem
#[derive(Error, Debug)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same name as an existing variable
    #[error("Tried to add a variable named {0}, but a variable with that name already exists")]
    VariableNameAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when the variable definition could not be built
    #[error("Invalid variable definition")]
    VariableDefinition(#[from] VariableDataBuilderError),
    /// Error when more variables are added than handles can represent
    #[error("Tried to add more variables than a problem can hold")]
    TooManyVariables,
    /// Error when trying to add a constraint with the same name as an existing constraint
    #[error("Tried to add a constraint named {0}, but a constraint with that name already exists")]
    ConstraintNameAlreadyExists(String),
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add a constraint with variables not in the model")]
    NonExistentVariablesInConstraint,
    /// Error when trying to set an objective which includes variables not in the model
    #[error("Tried setting an objective with variables not in the model")]
    NonExistentVariablesInObjective,
    /// Error when trying to perform an update on a variable that doesn't exist
    #[error("Tried to access a variable that doesn't exist")]
    NonExistentVariable,
    /// Error when a solution could not be evaluated
    #[error("Could not evaluate a constraint at the given point")]
    Evaluation(#[from] ExprError),
    /// Error when the problem could not be serialized
    #[error("Could not serialize the problem")]
    Serialization(#[from] serde_json::Error),
}
