//! Behavioural properties of constrained sketches

use approx::assert_abs_diff_eq;
use geosolve_rs::constraints::{ConstraintKind, ConstraintManager};
use geosolve_rs::sketch::{Circle, Layer, Point, Segment};
use geosolve_rs::{SolveStatus, SolverError};

use crate::test_helpers::{approx_eq, ends, length, position, snapshot};

#[test]
fn test_rectangle_has_non_negative_dof() {
    let mut layer = Layer::new("sketch");
    let s0 = layer.add(Segment::new(0.0, 0.0, 4.0, 0.2));
    let s1 = layer.add(Segment::new(4.1, 0.0, 4.0, 3.0));
    let s2 = layer.add(Segment::new(4.0, 3.1, 0.0, 3.0));
    let s3 = layer.add(Segment::new(0.1, 3.0, 0.0, 0.1));
    let sides = [s0, s1, s2, s3];
    let mut manager = ConstraintManager::new(layer);

    manager.start_transaction();
    for i in 0..4 {
        let end = manager.layer().children(sides[i])[1];
        let start = manager.layer().children(sides[(i + 1) % 4])[0];
        manager.coincide_points(end, start).unwrap();
    }
    manager.constrain(ConstraintKind::Horizontal, &[s0]).unwrap();
    manager.constrain(ConstraintKind::Vertical, &[s1]).unwrap();
    manager.constrain(ConstraintKind::Horizontal, &[s2]).unwrap();
    manager.constrain(ConstraintKind::Vertical, &[s3]).unwrap();
    manager.finish_transaction().unwrap();

    // four free coordinates remain: two x and two y values
    assert_eq!(manager.space(0).unwrap().dof(), 4);

    let ((ax, ay), (bx, by)) = ends(manager.layer(), s0);
    assert_abs_diff_eq!(ay, by, epsilon = 1e-6);
    let ((cx, _), (dx, _)) = ends(manager.layer(), s1);
    assert_abs_diff_eq!(cx, dx, epsilon = 1e-6);
    assert_abs_diff_eq!(bx, cx, epsilon = 1e-6);
    let (_, (ex, ey)) = ends(manager.layer(), s3);
    assert_abs_diff_eq!(ex, ax, epsilon = 1e-6);
    assert_abs_diff_eq!(ey, ay, epsilon = 1e-6);
}

#[test]
fn test_duplicate_coincident_is_redundant() {
    let mut layer = Layer::new("sketch");
    let a = layer.add(Point::new(0.0, 0.0));
    let b = layer.add(Point::new(1.0, 2.0));
    let mut manager = ConstraintManager::new(layer);

    manager.coincide_points(a, b).unwrap();
    let err = manager.coincide_points(a, b).unwrap_err();
    assert!(matches!(err, SolverError::AddConstraintFailed(_)));
    assert_eq!(err.status(), SolveStatus::RedundantConstraint);
    assert!(matches!(
        err.root_cause(),
        SolverError::RedundantConstraint { .. }
    ));

    // the rejected constraint is gone and the first still holds
    assert_eq!(manager.records().len(), 1);
    assert_eq!(position(manager.layer(), a), position(manager.layer(), b));
}

#[test]
fn test_horizontal_segment() {
    let mut layer = Layer::new("sketch");
    let s = layer.add(Segment::new(0.0, 0.0, 5.0, 3.0));
    let mut manager = ConstraintManager::new(layer);

    manager.constrain(ConstraintKind::Horizontal, &[s]).unwrap();
    let ((_, y1), (_, y2)) = ends(manager.layer(), s);
    assert!((y1 - y2).abs() < 1e-6);
}

#[test]
fn test_coincident_points() {
    let mut layer = Layer::new("sketch");
    let p1 = layer.add(Point::new(0.0, 0.0));
    let p2 = layer.add(Point::new(10.0, 10.0));
    let mut manager = ConstraintManager::new(layer);

    manager.coincide_points(p1, p2).unwrap();
    let (x1, y1) = position(manager.layer(), p1);
    let (x2, y2) = position(manager.layer(), p2);
    assert!((x1 - x2).hypot(y1 - y2) < 1e-6);

    // dragging either point carries the other along, the dragged one wins
    manager.drag(p2, 1.0, -2.0).unwrap();
    assert_eq!(position(manager.layer(), p2), (x2 + 1.0, y2 - 2.0));
    assert_eq!(position(manager.layer(), p1), position(manager.layer(), p2));

    manager.drag(p1, -3.0, 0.5).unwrap();
    manager.end_drag().unwrap();
    assert_eq!(position(manager.layer(), p1), (x2 - 2.0, y2 - 1.5));
    assert_eq!(position(manager.layer(), p1), position(manager.layer(), p2));
}

#[test]
fn test_add_then_remove_is_idempotent() {
    let build = || {
        let mut layer = Layer::new("sketch");
        let s = layer.add(Segment::new(0.0, 0.0, 5.0, 3.0));
        let t = layer.add(Segment::new(1.0, 1.0, 2.0, 5.0));
        let c = layer.add(Circle::new(7.0, 7.0, 1.5));
        (ConstraintManager::new(layer), s, t, c)
    };

    let (mut reference, s, _, _) = build();
    reference.constrain(ConstraintKind::Horizontal, &[s]).unwrap();

    // inside a batch the add and the remove cancel out entirely
    let (mut batched, s, t, _) = build();
    batched.constrain(ConstraintKind::Horizontal, &[s]).unwrap();
    batched.start_transaction();
    let id = batched.constrain(ConstraintKind::Perpendicular, &[s, t]).unwrap();
    batched.remove_constraints(&[id]).unwrap();
    batched.finish_transaction().unwrap();
    assert_eq!(snapshot(&batched), snapshot(&reference));

    // solved in between, geometry the constraint never touched ends where it
    // would have without it
    let (mut solved, s, t, c) = build();
    solved.constrain(ConstraintKind::Horizontal, &[s]).unwrap();
    let id = solved.constrain(ConstraintKind::Vertical, &[t]).unwrap();
    solved.remove_constraints(&[id]).unwrap();
    solved.solve(false).unwrap();
    assert_eq!(ends(solved.layer(), s), ends(reference.layer(), s));
    let radius = |m: &ConstraintManager| m.layer().get(c).unwrap().as_circle().unwrap().radius();
    assert_eq!(radius(&solved), radius(&reference));
    assert_eq!(solved.records().len(), 1);
}

#[test]
fn test_equal_length_drag() {
    let mut layer = Layer::new("sketch");
    let s1 = layer.add(Segment::new(0.0, 0.0, 4.0, 0.0));
    let s2 = layer.add(Segment::new(0.0, 2.0, 3.0, 2.0));
    let handle = layer.children(s1)[1];
    let mut manager = ConstraintManager::new(layer);

    manager.constrain(ConstraintKind::EqualLength, &[s1, s2]).unwrap();
    assert_abs_diff_eq!(length(manager.layer(), s1), length(manager.layer(), s2), epsilon = 1e-6);

    let (hx, hy) = position(manager.layer(), handle);
    let target = (hx + 1.0, hy + 0.5);
    manager.drag(handle, 1.0, 0.5).unwrap();
    manager.end_drag().unwrap();

    assert!((length(manager.layer(), s1) - length(manager.layer(), s2)).abs() < 1e-6);
    let (x, y) = position(manager.layer(), handle);
    assert!(approx_eq(x, target.0, 1e-2), "x = {}, wanted {}", x, target.0);
    assert!(approx_eq(y, target.1, 1e-2), "y = {}, wanted {}", y, target.1);
}

#[test]
fn test_identical_rows_are_singular() {
    let mut layer = Layer::new("sketch");
    let s1 = layer.add(Segment::new(0.0, 0.0, 4.0, 0.0));
    let s2 = layer.add(Segment::new(0.0, 2.0, 3.0, 2.0));
    let mut manager = ConstraintManager::new(layer);

    manager.constrain(ConstraintKind::EqualLength, &[s1, s2]).unwrap();
    let before = snapshot(&manager);
    let err = manager
        .constrain(ConstraintKind::EqualLength, &[s1, s2])
        .unwrap_err();
    assert_eq!(err.status(), SolveStatus::SingularJacobian);
    assert_eq!(snapshot(&manager), before);
}

#[test]
fn test_too_many_unknowns_rejects_constraint() {
    let mut layer = Layer::new("sketch");
    let s1 = layer.add(Segment::new(0.0, 0.0, 4.0, 0.0));
    let s2 = layer.add(Segment::new(0.0, 2.0, 3.0, 2.0));
    let config = geosolve_rs::SolverConfig::default().with_max_unknowns(4);
    let mut manager = ConstraintManager::with_config(layer, config);

    let err = manager
        .constrain(ConstraintKind::Parallel, &[s1, s2])
        .unwrap_err();
    assert_eq!(err.status(), SolveStatus::TooManyUnknowns);
    assert!(manager.records().is_empty());
}

#[test]
fn test_symmetric_and_tangent() {
    let mut layer = Layer::new("sketch");
    let a = layer.add(Point::new(-2.0, 1.0));
    let b = layer.add(Point::new(3.0, 2.0));
    let mirror = layer.add(Segment::new(0.0, -1.0, 0.2, 5.0));
    let line = layer.add(Segment::new(-3.0, 2.5, 3.0, 2.5));
    let circle = layer.add(Circle::new(0.0, 0.0, 2.0));
    let mut manager = ConstraintManager::new(layer);

    manager
        .constrain(ConstraintKind::Symmetric, &[a, b, mirror])
        .unwrap();
    manager
        .constrain(ConstraintKind::Tangent, &[line, circle])
        .unwrap();

    // the mirror bisects ab at a right angle
    let (ax, ay) = position(manager.layer(), a);
    let (bx, by) = position(manager.layer(), b);
    let ((lax, lay), (lbx, lby)) = ends(manager.layer(), mirror);
    let (ex, ey) = (lbx - lax, lby - lay);
    assert_abs_diff_eq!((bx - ax) * ex + (by - ay) * ey, 0.0, epsilon = 1e-6);
    let side = |px: f64, py: f64| ex * (py - lay) - ey * (px - lax);
    assert_abs_diff_eq!(side(ax, ay) + side(bx, by), 0.0, epsilon = 1e-6);

    // the circle touches the line
    let ((x0, y0), (x1, y1)) = ends(manager.layer(), line);
    let c = manager.layer().get(circle).unwrap().as_circle().unwrap();
    let (cx, cy) = c.c.position();
    let distance = ((x1 - x0) * (y0 - cy) - (x0 - cx) * (y1 - y0)).abs() / (x1 - x0).hypot(y1 - y0);
    assert_abs_diff_eq!(distance, c.radius(), epsilon = 1e-6);
}
