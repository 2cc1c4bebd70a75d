//! Example of dragging a constrained rectangle.
//!
//! Builds a rectangle from four segments held together by coincident,
//! horizontal and vertical constraints, then drags one corner the way a
//! pointer would: a rough solve per frame and a precise solve on release.
//!
//! Run with `RUST_LOG=geosolve_rs=debug` to see the solver phases.

use geosolve_rs::constraints::{ConstraintKind, ConstraintManager};
use geosolve_rs::sketch::{EntityId, Layer, Segment};
use tracing_subscriber::EnvFilter;

fn print_rectangle(manager: &ConstraintManager, sides: &[EntityId]) {
    for side in sides {
        println!("  {}", manager.layer().get(*side).map(|e| e.to_string()).unwrap_or_default());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Drag a rectangle");
    println!("================\n");

    // Slightly crooked on purpose, the constraints square it up
    let mut layer = Layer::new("sketch");
    let sides = [
        layer.add(Segment::new(0.0, 0.0, 4.0, 0.3)),
        layer.add(Segment::new(4.2, 0.1, 4.0, 3.0)),
        layer.add(Segment::new(3.9, 3.2, 0.0, 3.0)),
        layer.add(Segment::new(0.1, 2.9, -0.2, 0.1)),
    ];
    let mut manager = ConstraintManager::new(layer);

    manager.start_transaction();
    for i in 0..4 {
        let end = manager.layer().children(sides[i])[1];
        let start = manager.layer().children(sides[(i + 1) % 4])[0];
        manager.coincide_points(end, start)?;
    }
    for (i, side) in sides.iter().enumerate() {
        let kind = if i % 2 == 0 {
            ConstraintKind::Horizontal
        } else {
            ConstraintKind::Vertical
        };
        manager.constrain(kind, &[*side])?;
    }
    manager.finish_transaction()?;

    println!("After solving:");
    print_rectangle(&manager, &sides);
    println!("Degrees of freedom: {}\n", manager.space(0)?.dof());

    // Drag the top right corner in ten frames
    let corner = manager.layer().children(sides[1])[1];
    for _ in 0..10 {
        manager.drag(corner, 0.2, 0.1)?;
    }
    manager.end_drag()?;

    println!("After dragging the top right corner by (2, 1):");
    print_rectangle(&manager, &sides);

    Ok(())
}
