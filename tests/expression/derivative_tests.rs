//! Tests for symbolic differentiation

use approx::assert_abs_diff_eq;
use geosolve_rs::expression::{Expr, ExprVector};
use geosolve_rs::parameters::{Param, ParamRef};

fn central_difference(e: &Expr, p: &ParamRef) -> f64 {
    let h = 1e-6;
    let v = p.value();
    p.set(v + h);
    let up = e.eval();
    p.set(v - h);
    let down = e.eval();
    p.set(v);
    (up - down) / (2.0 * h)
}

#[test]
fn test_derivatives_match_finite_differences() {
    let params: Vec<ParamRef> = [0.3, -1.2, 2.5, 0.7, 1.1]
        .iter()
        .enumerate()
        .map(|(i, v)| Param::shared(*v, &format!("p{}", i)))
        .collect();

    let texts = [
        "sq(p0) * p1 - p2 / p3",
        "sqrt(sq(p0 - p2) + sq(p1 - p3)) - p4",
        "sin(p0 * p1) + cos(p2) * p3",
        "-(p4 * p4) / (p0 + 2)",
    ];
    for text in texts {
        let e = Expr::parse_with_params(text, &params).unwrap();
        for p in &params {
            let d = e.derivative(p);
            assert_abs_diff_eq!(d.eval(), central_difference(&e, p), epsilon = 1e-5);
            assert_eq!(e.depends_on(p), text.contains(p.symbol()));
        }
    }
}

#[test]
fn test_vector_products() {
    let a = ExprVector::from_params(&Param::shared(1.0, "ax"), &Param::shared(2.0, "ay"));
    let b = ExprVector::from_params(&Param::shared(3.0, "bx"), &Param::shared(-1.0, "by"));

    assert_abs_diff_eq!(a.cross(&b).eval(), -7.0);
    assert_abs_diff_eq!(a.dot(&b).eval(), 1.0);
    assert_abs_diff_eq!(a.minus(&b).magnitude().eval(), 13.0_f64.sqrt());
    assert_abs_diff_eq!(
        b.with_magnitude(&Expr::constant(2.0)).magnitude().eval(),
        2.0,
        epsilon = 1e-12
    );
}
