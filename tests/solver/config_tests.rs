//! Tests for solver configuration

use geosolve_rs::solver::{RankMethod, SolverConfig};
use geosolve_rs::SolverError;

#[test]
fn test_json_round_trip() {
    let config = SolverConfig::new()
        .with_max_iterations(25)
        .with_convergence_tolerance(1e-10)
        .with_dragged_scale(0.1);
    let json = config.to_json().unwrap();
    let back = SolverConfig::from_json(&json).unwrap();
    assert_eq!(back, config);
    assert_eq!(back.rank_method, RankMethod::GramSchmidt);
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = SolverConfig::from_json(r#"{ "rough_tolerance": 0.001 }"#).unwrap();
    assert_eq!(config.rough_tolerance, 0.001);
    assert_eq!(config.tolerance(true), 0.001);
    assert_eq!(config.tolerance(false), SolverConfig::default().convergence_tolerance);
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        SolverConfig::from_json("{ max_iterations: }"),
        Err(SolverError::Json(_))
    ));
}
