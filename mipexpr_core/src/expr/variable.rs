//! Module providing the opaque variable handle used as the atom of expressions
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Handle to a decision variable
///
/// The handle is only an identifier, the data describing the variable (name, type, bounds)
/// lives in the [`Problem`](crate::optimize::problem::Problem) that created it. Handles are
/// ordered by their id, which is the order used to canonicalize products of variables.
///
/// # Examples
/// ```rust
/// use mipexpr_core::expr::variable::Variable;
/// let x = Variable::new(0);
/// let y = Variable::new(1);
/// assert!(x < y);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable(u32);

impl Variable {
    /// Create a handle from a raw id
    pub fn new(id: u32) -> Self {
        Variable(id)
    }

    /// Get the raw id of the handle
    pub fn id(self) -> u32 {
        self.0
    }
}

impl From<u32> for Variable {
    fn from(id: u32) -> Self {
        Variable(id)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_id() {
        let x = Variable::new(3);
        let y = Variable::new(7);
        assert!(x < y);
        assert!(!(y < x));
        assert_eq!(x, Variable::from(3));
        assert_eq!(y.id(), 7);
    }

    #[test]
    fn display() {
        assert_eq!(Variable::new(12).to_string(), "x12");
    }
}
