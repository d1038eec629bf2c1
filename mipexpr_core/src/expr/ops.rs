//! Arithmetic operator implementations for expressions and variables
//!
//! Every combination of [`Expr`], `&Expr`, [`Variable`] and a scalar (`f64` or `i32`) can be
//! added, subtracted and multiplied, in either order, and always produces a new [`Expr`].
//! Borrowed operands are cloned, never modified.
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::expr::expression::Expr;
use crate::expr::variable::Variable;

fn sum(mut lhs: Expr, rhs: Expr) -> Expr {
    lhs.add_scaled(&rhs, 1.0);
    lhs
}

fn difference(mut lhs: Expr, rhs: Expr) -> Expr {
    lhs.add_scaled(&rhs, -1.0);
    lhs
}

fn product(lhs: Expr, rhs: Expr) -> Expr {
    // Scaling by a constant does not need the full distribution
    match (lhs.degree(), rhs.degree()) {
        (_, 0) => lhs.scale(rhs.constant()),
        (0, _) => rhs.scale(lhs.constant()),
        _ => lhs.product(&rhs),
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $method:ident, $combine:ident) => {
        impl<T: Into<Expr>> $op_trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $combine(self, rhs.into())
            }
        }

        impl<T: Into<Expr>> $op_trait<T> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $combine(self.clone(), rhs.into())
            }
        }

        impl<T: Into<Expr>> $op_trait<T> for Variable {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $combine(Expr::from(self), rhs.into())
            }
        }

        impl_binary_op!(@scalar $op_trait, $method, $combine, f64);
        impl_binary_op!(@scalar $op_trait, $method, $combine, i32);
    };
    (@scalar $op_trait:ident, $method:ident, $combine:ident, $scalar:ty) => {
        impl $op_trait<Expr> for $scalar {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $combine(Expr::from(self), rhs)
            }
        }

        impl $op_trait<&Expr> for $scalar {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $combine(Expr::from(self), rhs.clone())
            }
        }

        impl $op_trait<Variable> for $scalar {
            type Output = Expr;

            fn $method(self, rhs: Variable) -> Expr {
                $combine(Expr::from(self), Expr::from(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, sum);
impl_binary_op!(Sub, sub, difference);
impl_binary_op!(Mul, mul, product);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}

impl Neg for Variable {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::from_term(self, -1.0)
    }
}

// region Compound Assignment
/*
These only update the caller's own binding, which is the usual way to accumulate an
expression inside a loop.
*/
impl<T: Into<Expr>> AddAssign<T> for Expr {
    fn add_assign(&mut self, rhs: T) {
        self.add_scaled(&rhs.into(), 1.0);
    }
}

impl<T: Into<Expr>> SubAssign<T> for Expr {
    fn sub_assign(&mut self, rhs: T) {
        self.add_scaled(&rhs.into(), -1.0);
    }
}

impl MulAssign<f64> for Expr {
    fn mul_assign(&mut self, rhs: f64) {
        *self = self.scale(rhs);
    }
}
// endregion Compound Assignment

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        crate::expr::expression::quicksum(iter)
    }
}

impl<'a> Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Expr {
        let mut total = Expr::zero();
        for expr in iter {
            total.add_scaled(expr, 1.0);
        }
        total
    }
}

impl Sum<Variable> for Expr {
    fn sum<I: Iterator<Item = Variable>>(iter: I) -> Expr {
        crate::expr::expression::quicksum(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_on_either_side() {
        let x = Variable::new(0);
        assert_eq!(2.0 * x, x * 2.0);
        assert_eq!(2 * x, x * 2);
        assert_eq!(1.0 + x, x + 1.0);
        assert_eq!((5.0 - x)[x], -1.0);
        assert_eq!((5.0 - x)[()], 5.0);
        assert_eq!((x - 5)[()], -5.0);
    }

    #[test]
    fn borrowed_and_owned_agree() {
        let x = Variable::new(0);
        let y = Variable::new(1);
        let a = x + 2.0 * y;
        let b = y - 1.0;
        assert_eq!(&a + &b, a.clone() + b.clone());
        assert_eq!(&a - &b, a.clone() - b.clone());
        assert_eq!(&a * &b, a.clone() * b.clone());
        assert_eq!(-&a, -a.clone());
        assert_eq!(3.0 * &a, a.scale(3.0));
    }

    #[test]
    fn multiplying_by_zero_clears_terms() {
        let x = Variable::new(0);
        let y = Variable::new(1);
        assert!(((x + y * y) * 0.0).is_empty());
        assert!((0 * (x + 1.0)).is_empty());
        assert_eq!((x + y * y) * 0.0, Expr::zero());
    }

    #[test]
    fn distribution_sums_collisions() {
        let x = Variable::new(0);
        let y = Variable::new(1);
        // (x + y)(y + x) = x^2 + 2xy + y^2
        let expr = (x + y) * (y + x);
        assert_eq!(expr[(x, x)], 1.0);
        assert_eq!(expr[(x, y)], 2.0);
        assert_eq!(expr[(y, y)], 1.0);
        assert_eq!(expr.len(), 3);
    }

    #[test]
    fn compound_assignment() {
        let x = Variable::new(0);
        let y = Variable::new(1);
        let mut expr = Expr::zero();
        for _ in 0..3 {
            expr += x;
        }
        expr -= y;
        expr += 2.5;
        expr *= 2.0;
        assert_eq!(expr, 6.0 * x - 2.0 * y + 5.0);
    }

    #[test]
    fn iterator_sum() {
        let vars = (0..4).map(Variable::new).collect::<Vec<_>>();
        let total: Expr = vars.iter().copied().sum();
        assert_eq!(total.len(), 4);
        let exprs = vars.iter().map(|v| 2.0 * *v).collect::<Vec<_>>();
        let borrowed: Expr = exprs.iter().sum();
        let owned: Expr = exprs.into_iter().sum();
        assert_eq!(borrowed, owned);
        assert_eq!(owned[vars[3]], 2.0);
    }
}
