//! Tests for the ordered id list

use geosolve_rs::expression::{Equation, Expr};
use geosolve_rs::parameters::{IdList, Param, ParamRef, UNASSIGNED_ID};
use geosolve_rs::SolverError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

#[test]
fn test_ids_distinct_and_increasing_with_removals() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut list: IdList<ParamRef> = IdList::new();
    let mut seen = HashSet::new();
    let mut last = 0;

    for i in 0..300 {
        let id = list.add_and_assign_id(Param::anonymous(i as f64)).unwrap();
        assert!(seen.insert(id), "id {} issued twice while present", id);
        assert!(id > 0);
        if id <= last {
            // only possible after the largest id was removed
            assert!(list.iter().all(|p| p.id() <= id));
        }
        last = id;

        if rng.gen_bool(0.3) {
            let victim = list.iter().nth(rng.gen_range(0..list.len())).unwrap().id();
            list.remove_by_id(victim).unwrap();
            seen.remove(&victim);
        }

        // the list stays sorted
        let ids: Vec<i64> = list.iter().map(|p| p.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    for id in -5..(list.max_id() + 5) {
        match list.find_by_id(id) {
            Some(p) => assert_eq!(p.id(), id),
            None => assert!(!seen.contains(&id)),
        }
    }
}

#[test]
fn test_equations_and_params_share_the_list_type() {
    let x = Param::shared(1.0, "x");
    let mut params = IdList::new();
    params.add_and_assign_id(x.clone()).unwrap();

    let mut equations = IdList::new();
    let first = equations
        .add_and_assign_id(Equation::new(Expr::from_param(&x) - Expr::constant(1.0)))
        .unwrap();
    let second = equations
        .add_and_assign_id(Equation::new(Expr::from_param(&x).square()))
        .unwrap();
    assert_eq!((first, second), (1, 2));
    assert_eq!(equations.find_by_id(2).unwrap().residual(), 1.0);

    let duplicate = Param::anonymous(0.0);
    let mut alias = duplicate.clone();
    geosolve_rs::parameters::IdEntity::set_id(&mut alias, x.id());
    assert!(matches!(params.add(duplicate), Err(SolverError::DuplicateId(1))));
}

#[test]
fn test_detach_forgets_membership() {
    let mut params = IdList::new();
    let x = Param::shared(0.5, "x");
    params.add_and_assign_id(x.clone()).unwrap();
    assert!(params.has(&x));

    x.detach();
    assert_eq!(x.id(), UNASSIGNED_ID);
    assert!(!params.has(&x));
}
