//! Integration tests for parameter sets.

use approx::assert_relative_eq;
use spinfit::parameters::{Bounds, ParamKey, Parameter, ParameterError, ParameterSet};

fn sensor_groups(n: usize) -> ParameterSet {
    let mut set = ParameterSet::new(3);
    for i in 0..n {
        set.push_group(vec![
            Parameter::with_bounds(0.3 * i as f64, -2.0, 2.0).unwrap(),
            Parameter::with_bounds(1.0, 0.2, 10.0).unwrap(),
            Parameter::new(2.0 + i as f64),
        ])
        .unwrap();
    }
    set
}

#[test]
fn test_internal_round_trip_preserves_values() {
    let set = sensor_groups(3);
    let internal = set.to_internal().unwrap();
    assert_eq!(internal.len(), 9);

    let mut back = set.clone();
    back.update_from_internal(&internal.to_vec()).unwrap();
    for (a, b) in set.free_keys().iter().zip(back.free_keys().iter()) {
        assert_relative_eq!(
            set.value(*a).unwrap(),
            back.value(*b).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_linked_role_follows_first_dataset() {
    let mut set = sensor_groups(3);
    set.tie_role(1).unwrap();
    assert_eq!(set.n_free(), 7);

    let mut internal = set.to_internal().unwrap();
    // beta of dataset 0 is the second free value
    internal[1] = 0.5;
    set.update_from_internal(&internal.to_vec()).unwrap();

    let beta0 = set.value(ParamKey::new(1, 0)).unwrap();
    assert!(Bounds::new(0.2, 10.0).unwrap().is_within_bounds(beta0));
    for dataset in 1..3 {
        assert_eq!(set.value(ParamKey::new(1, dataset)).unwrap(), beta0);
    }
}

#[test]
fn test_fixed_role_is_never_written() {
    let mut set = sensor_groups(2);
    set.fix_role(2).unwrap();
    assert_eq!(set.n_free(), 4);

    let values = vec![0.0; 4];
    set.update_from_internal(&values).unwrap();
    assert_eq!(set.value(ParamKey::new(2, 0)).unwrap(), 2.0);
    assert_eq!(set.value(ParamKey::new(2, 1)).unwrap(), 3.0);
}

#[test]
fn test_link_errors() {
    let mut set = sensor_groups(3);
    set.tie_role(0).unwrap();

    assert!(matches!(
        set.link(ParamKey::new(0, 0), ParamKey::new(0, 0)),
        Err(ParameterError::SelfLink { .. })
    ));
    assert!(matches!(
        set.link(ParamKey::new(1, 0), ParamKey::new(0, 1)),
        Err(ParameterError::ChainedLink { .. })
    ));
    assert!(matches!(
        set.link(ParamKey::new(0, 5), ParamKey::new(0, 0)),
        Err(ParameterError::ParameterNotFound { .. })
    ));
}

#[test]
fn test_json_round_trip_keeps_links() {
    let mut set = sensor_groups(2);
    set.tie_role(1).unwrap();
    set.fix_role(2).unwrap();

    let json = set.to_json().unwrap();
    let back = ParameterSet::from_json(&json).unwrap();
    assert_eq!(back, set);
    assert_eq!(back.free_keys(), set.free_keys());
}
