//! Tests for expression parsing

use approx::assert_relative_eq;
use geosolve_rs::expression::{Equation, Expr, ExpressionError};
use geosolve_rs::parameters::Param;

#[test]
fn test_parse_distance_residual() {
    let params = vec![
        Param::shared(0.0, "x1"),
        Param::shared(0.0, "y1"),
        Param::shared(3.0, "x2"),
        Param::shared(4.0, "y2"),
    ];
    let e = Expr::parse_with_params("sqrt(sq(x1 - x2) + sq(y1 - y2)) - 10", &params).unwrap();
    assert_relative_eq!(e.eval(), -5.0);

    params[2].set(6.0);
    params[3].set(8.0);
    assert_relative_eq!(e.eval(), 0.0);

    let equation = Equation::new(e);
    let mut seen = Vec::new();
    equation.visit_params(|p| seen.push(p.symbol().to_string()));
    assert_eq!(seen, vec!["x1", "x2", "y1", "y2"]);
}

#[test]
fn test_precedence_and_unary_minus() {
    let x = Param::shared(2.0, "x");
    let resolve = |name: &str| (name == "x").then(|| x.clone());

    assert_relative_eq!(Expr::parse("1 + 2 * x", resolve).unwrap().eval(), 5.0);
    assert_relative_eq!(Expr::parse("(1 + 2) * x", resolve).unwrap().eval(), 6.0);
    assert_relative_eq!(Expr::parse("8 / 2 / x", resolve).unwrap().eval(), 2.0);
    assert_relative_eq!(Expr::parse("10 - 3 - x", resolve).unwrap().eval(), 5.0);
    assert_relative_eq!(Expr::parse("-x * 3", resolve).unwrap().eval(), -6.0);
    assert_relative_eq!(Expr::parse("--x", resolve).unwrap().eval(), 2.0);
    assert_relative_eq!(Expr::parse(".5 * x", resolve).unwrap().eval(), 1.0);
}

#[test]
fn test_display_reparses() {
    let params = vec![Param::shared(1.5, "a"), Param::shared(-0.5, "b")];
    let original = Expr::parse_with_params("cos(a) * sin(b) - sq(a / b) + -2", &params).unwrap();
    let text = original.to_string();
    let again = Expr::parse_with_params(&text, &params).unwrap();
    assert_relative_eq!(original.eval(), again.eval());
    assert_eq!(text, again.to_string());
}

#[test]
fn test_parse_errors() {
    let params = vec![Param::shared(1.0, "x")];
    assert_eq!(
        Expr::parse_with_params("x + y", &params).unwrap_err(),
        ExpressionError::UndefinedVariable {
            name: "y".to_string()
        }
    );
    assert_eq!(
        Expr::parse_with_params("tan(x)", &params).unwrap_err(),
        ExpressionError::UndefinedFunction {
            name: "tan".to_string()
        }
    );
    assert!(matches!(
        Expr::parse_with_params("x +", &params),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        Expr::parse_with_params("x )", &params),
        Err(ExpressionError::ParseError { .. })
    ));
}
