//! Tests for the constraint manager lifecycle

use geosolve_rs::constraints::{Constraint, ConstraintKind, ConstraintManager, ConstraintRecord};
use geosolve_rs::sketch::{Layer, Point, Segment};
use geosolve_rs::{SolveStatus, SolverError};

use crate::test_helpers::{ends, position, snapshot};

#[test]
fn test_batch_solves_once_at_the_end() {
    let mut layer = Layer::new("sketch");
    let s = layer.add(Segment::new(0.0, 0.0, 5.0, 3.0));
    let t = layer.add(Segment::new(6.0, 1.0, 7.0, 4.0));
    let mut manager = ConstraintManager::new(layer);

    let start = manager.layer().children(t)[0];
    let end = manager.layer().children(s)[1];
    let batch = vec![
        Constraint::new(manager.layer_mut(), ConstraintKind::Horizontal, &[s]).unwrap(),
        Constraint::new(manager.layer_mut(), ConstraintKind::Vertical, &[t]).unwrap(),
        Constraint::new(manager.layer_mut(), ConstraintKind::Coincident, &[end, start]).unwrap(),
    ];

    let ids = manager.add_constraints(batch).unwrap();
    assert_eq!(ids.len(), 3);
    assert!(!manager.spaces()[0].in_transaction());

    let ((_, y1), (x2, y2)) = ends(manager.layer(), s);
    let ((x3, y3), (x4, _)) = ends(manager.layer(), t);
    assert!((y1 - y2).abs() < 1e-6);
    assert!((x3 - x4).abs() < 1e-6);
    assert!((x2 - x3).hypot(y2 - y3) < 1e-6);
}

#[test]
fn test_failed_batch_locks_until_fixed() {
    let mut layer = Layer::new("sketch");
    let a = layer.add(Point::new(0.0, 0.0));
    let b = layer.add(Point::new(1.0, 1.0));
    let mut manager = ConstraintManager::new(layer);
    let before = snapshot(&manager);

    let batch = vec![
        Constraint::new(manager.layer_mut(), ConstraintKind::Coincident, &[a, b]).unwrap(),
        Constraint::new(manager.layer_mut(), ConstraintKind::Coincident, &[b, a]).unwrap(),
    ];
    let err = manager.add_constraints(batch).unwrap_err();
    assert_eq!(err.status(), SolveStatus::RedundantConstraint);
    assert!(manager.is_locked());
    assert_eq!(snapshot(&manager), before);

    assert!(matches!(manager.solve(false), Err(SolverError::SolveLocked)));
    assert!(matches!(
        manager.drag(a, 1.0, 0.0),
        Err(SolverError::SolveLocked)
    ));

    let second = manager.records().len();
    assert_eq!(second, 2);
    let victim = manager.spaces()[0].constraints()[1].id();
    manager.remove_constraints(&[victim]).unwrap();
    assert!(!manager.is_locked());
    assert_eq!(position(manager.layer(), a), position(manager.layer(), b));
}

#[test]
fn test_solve_fine_without_lock_is_noop() {
    let mut layer = Layer::new("sketch");
    let a = layer.add(Point::new(2.0, 3.0));
    let mut manager = ConstraintManager::new(layer);
    manager.solve_fine().unwrap();
    assert_eq!(position(manager.layer(), a), (2.0, 3.0));
    assert!(!manager.is_locked());
}

#[test]
fn test_records_survive_json() {
    let mut layer = Layer::new("sketch");
    let p = layer.add(Point::new(1.0, 3.0));
    let s = layer.add(Segment::new(0.0, 0.0, 4.0, 0.0));
    let mut manager = ConstraintManager::new(layer);

    manager.point_on_line(p, s).unwrap();
    let index = manager.add_space();
    let extra = Constraint::new(manager.layer_mut(), ConstraintKind::Horizontal, &[s]).unwrap();
    manager.add_to_space(index, extra).unwrap();

    let records = manager.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, ConstraintKind::PointOnLine.code());
    assert_eq!(records[0].space, Some(0));
    assert_eq!(records[1].space, Some(index));

    let json = serde_json::to_string_pretty(&records).unwrap();
    let parsed: Vec<ConstraintRecord> = serde_json::from_str(&json).unwrap();

    let mut layer = Layer::new("copy");
    layer.add(Point::new(1.0, 3.0));
    layer.add(Segment::new(0.0, 0.0, 4.0, 0.0));
    let mut copy = ConstraintManager::new(layer);
    copy.restore(&parsed).unwrap();
    assert_eq!(copy.spaces().len(), 2);
    assert_eq!(copy.records(), records);

    let unknown = ConstraintRecord {
        kind: 999,
        entities: vec![p],
        space: None,
    };
    assert!(matches!(
        copy.restore(&[unknown]),
        Err(SolverError::UnknownConstraintKind(999))
    ));
}

#[test]
fn test_space_lookup() {
    let manager = ConstraintManager::new(Layer::new("sketch"));
    assert!(manager.space(0).is_ok());
    assert!(matches!(manager.space(3), Err(SolverError::SpaceNotFound(3))));
    assert_eq!(manager.space(0).unwrap().dof(), geosolve_rs::constraints::UNKNOWN_DOF);
}
