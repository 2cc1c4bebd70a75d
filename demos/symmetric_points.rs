//! Example of mirror symmetry, tangency and conflict handling.
//!
//! Two points are mirrored across a slanted segment, a line is made tangent
//! to a circle, and a contradictory constraint is rejected with the sketch
//! left as it was.

use geosolve_rs::constraints::{ConstraintKind, ConstraintManager};
use geosolve_rs::sketch::{Circle, Layer, Point, Segment};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Symmetric points");
    println!("================\n");

    let mut layer = Layer::new("sketch");
    let a = layer.add(Point::new(-2.0, 1.0));
    let b = layer.add(Point::new(3.0, 2.0));
    let mirror = layer.add(Segment::new(0.0, -1.0, 1.0, 5.0));
    let line = layer.add(Segment::new(-4.0, 3.0, 4.0, 3.5));
    let circle = layer.add(Circle::new(0.0, 0.0, 2.0));
    let mut manager = ConstraintManager::new(layer);

    manager.constrain(ConstraintKind::Symmetric, &[a, b, mirror])?;
    manager.constrain(ConstraintKind::Tangent, &[line, circle])?;

    for id in [a, b, mirror, line, circle] {
        if let Some(entity) = manager.layer().get(id) {
            println!("{}: {}", id, entity);
        }
    }

    // The same tangency twice leaves the Jacobian rank deficient
    match manager.constrain(ConstraintKind::Tangent, &[line, circle]) {
        Ok(_) => println!("\nUnexpectedly accepted a duplicate tangent"),
        Err(err) => println!("\nRejected duplicate: {} (status {:?})", err, err.status()),
    }

    println!("\nConstraints kept:");
    for record in manager.records() {
        println!("  {}", serde_json::to_string(&record)?);
    }

    Ok(())
}
