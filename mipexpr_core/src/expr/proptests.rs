//! Property-based tests for the expression algebra

use proptest::prelude::*;

use crate::expr::expression::Expr;
use crate::expr::term::Term;
use crate::expr::variable::Variable;

// Small integer coefficients keep float arithmetic exact
fn small_coeff() -> impl Strategy<Value = f64> {
    (-20i32..20i32).prop_map(f64::from)
}

fn small_term() -> impl Strategy<Value = Term> {
    proptest::collection::vec((0u32..4).prop_map(Variable::new), 0..=3).prop_map(Term::new)
}

// Polynomials over four variables, degree at most 3
fn small_expr() -> impl Strategy<Value = Expr> {
    proptest::collection::vec((small_term(), small_coeff()), 0..6)
        .prop_map(|terms| Expr::from_terms(terms))
}

proptest! {
    #[test]
    fn add_commutative(a in small_expr(), b in small_expr()) {
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn add_associative(a in small_expr(), b in small_expr(), c in small_expr()) {
        prop_assert_eq!((&a + &b) + &c, &a + (&b + &c));
    }

    #[test]
    fn mul_commutative(a in small_expr(), b in small_expr()) {
        prop_assert_eq!(&a * &b, &b * &a);
    }

    #[test]
    fn distributive(a in small_expr(), b in small_expr(), c in small_expr()) {
        let left = &a * (&b + &c);
        let right = &a * &b + &a * &c;
        prop_assert_eq!(left, right);
    }

    #[test]
    fn additive_inverse(a in small_expr()) {
        prop_assert!((&a - &a).is_empty());
        prop_assert_eq!(-(-&a), a);
    }

    #[test]
    fn one_is_identity(a in small_expr()) {
        prop_assert_eq!(&a * Expr::one(), a.clone());
        prop_assert_eq!(a.powi(1), a);
    }

    #[test]
    fn power_is_repeated_product(a in small_expr(), k in 0u32..4) {
        let mut expected = Expr::one();
        for _ in 0..k {
            expected = &expected * &a;
        }
        prop_assert_eq!(a.powi(k), expected);
    }

    #[test]
    fn degree_of_product(a in small_expr(), b in small_expr()) {
        let product = &a * &b;
        prop_assert!(product.degree() <= a.degree() + b.degree());
        prop_assert!(product.terms().all(|(_, c)| c != 0.0));
    }
}
