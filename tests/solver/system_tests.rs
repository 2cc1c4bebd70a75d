//! Tests for the solve pipeline on hand-built equation sets

use approx::assert_abs_diff_eq;
use geosolve_rs::expression::{Equation, Expr};
use geosolve_rs::parameters::{IdList, Param, ParamRef};
use geosolve_rs::solver::{Jacobian, SolverConfig, System};
use geosolve_rs::{SolveStatus, SolverError};

fn register(params: &[&ParamRef]) -> IdList<ParamRef> {
    let mut list = IdList::new();
    for p in params {
        list.add_and_assign_id((*p).clone()).unwrap();
    }
    list
}

fn equations(texts: &[&str], params: &[ParamRef]) -> IdList<Equation> {
    let mut list = IdList::new();
    for text in texts {
        let expr = Expr::parse_with_params(text, params).unwrap();
        list.add_and_assign_id(Equation::new(expr)).unwrap();
    }
    list
}

#[test]
fn test_under_constrained_dof() {
    let x = Param::shared(1.0, "x");
    let y = Param::shared(2.0, "y");
    let z = Param::shared(3.0, "z");
    register(&[&x, &y, &z]);
    let all = [x.clone(), y.clone(), z.clone()];

    let mut system = System::default();
    system
        .prepare(equations(&["x * y + z - 10", "sq(x) + sq(y) - 9"], &all), &[])
        .unwrap();
    let report = system.solve(false).unwrap();

    assert_eq!(report.status, SolveStatus::SolvedOkay);
    assert_eq!(report.dof, report.unknowns - report.equations);
    assert_eq!(report.dof, 1);
    assert_abs_diff_eq!(x.value() * y.value() + z.value(), 10.0, epsilon = 1e-8);
    assert_abs_diff_eq!(x.value().hypot(y.value()), 3.0, epsilon = 1e-8);
}

#[test]
fn test_substitution_chain() {
    let a = Param::shared(0.0, "a");
    let b = Param::shared(5.0, "b");
    let c = Param::shared(9.0, "c");
    register(&[&a, &b, &c]);
    let all = [a.clone(), b.clone(), c.clone()];

    let mut system = System::default();
    system
        .prepare(equations(&["a - b", "b - c", "a + b + c - 12"], &all), &[])
        .unwrap();
    let report = system.solve(false).unwrap();

    assert_eq!(report.substituted, 2);
    assert_abs_diff_eq!(a.value(), 4.0, epsilon = 1e-8);
    assert_abs_diff_eq!(b.value(), 4.0, epsilon = 1e-8);
    assert_abs_diff_eq!(c.value(), 4.0, epsilon = 1e-8);
}

#[test]
fn test_redundant_pair() {
    let a = Param::shared(0.0, "a");
    let b = Param::shared(1.0, "b");
    register(&[&a, &b]);
    let all = [a.clone(), b.clone()];

    let mut system = System::default();
    system.prepare(equations(&["a - b", "b - a"], &all), &[]).unwrap();
    let err = system.solve(false).unwrap_err();
    assert_eq!(err.status(), SolveStatus::RedundantConstraint);
}

#[test]
fn test_too_many_unknowns() {
    let ps: Vec<ParamRef> = (0..4).map(|i| Param::shared(i as f64, &format!("p{}", i))).collect();
    let refs: Vec<&ParamRef> = ps.iter().collect();
    register(&refs);

    let mut system = System::new(SolverConfig::default().with_max_unknowns(3));
    system
        .prepare(equations(&["p0 * p1 + p2 * p3 - 1"], &ps), &[])
        .unwrap();
    assert!(matches!(
        system.solve(false),
        Err(SolverError::TooManyUnknowns { count: 4, limit: 3 })
    ));
}

#[test]
fn test_dragged_parameter_moves_least() {
    let x = Param::shared(0.0, "x");
    let y = Param::shared(0.0, "y");
    register(&[&x, &y]);
    let all = [x.clone(), y.clone()];

    let mut system = System::default();
    system.prepare(equations(&["x + y - 2"], &all), &[x.clone()]).unwrap();
    system.solve(false).unwrap();

    assert_abs_diff_eq!(x.value() + y.value(), 2.0, epsilon = 1e-8);
    assert!(x.value().abs() < 1e-2);
}

#[test]
fn test_iteration_cap() {
    let x = Param::shared(1000.0, "x");
    let y = Param::shared(1.0, "y");
    register(&[&x, &y]);
    let all = [x.clone(), y.clone()];

    // slow convergence from far away runs out of steps
    let config = SolverConfig::default().with_max_iterations(1);
    let mut system = System::new(config);
    system
        .prepare(equations(&["sq(x) * sq(x) + y - 1"], &all), &[])
        .unwrap();
    let err = system.solve(false).unwrap_err();
    assert_eq!(err.status(), SolveStatus::DidNotConverge);
}

#[test]
fn test_jacobian_skips_eliminated_rows() {
    let a = Param::shared(1.0, "a");
    let b = Param::shared(2.0, "b");
    let params = register(&[&a, &b]);
    let all = [a.clone(), b.clone()];

    let mut eqs = equations(&["a * b - 2", "a - 1"], &all);
    eqs.iter_mut().nth(1).unwrap().tag = 3;
    let jac = Jacobian::write(0, &params, &eqs, 1024).unwrap();
    assert_eq!(jac.m(), 1);
    assert_eq!(jac.equation_ids(), &[1]);
}
