//! Joint fits: one solve over every dataset with linked or fixed roles.

use crate::test_helpers::{assert_rows_close, di_rows, i_sense_rows, sweep};
use ndarray::Array1;
use spinfit::{di_fit_simultaneous, i_sense_fit_simultaneous, FitMode, FitOptions};

#[test]
fn test_sensor_transitions_with_shared_width_and_slope() {
    let x = sweep();
    let truth = [
        [0.0, 1.0, 2.0, 0.05, 1.0],
        [0.3, 1.0, 2.0, 0.05, 1.0],
        [0.6, 1.0, 2.0, 0.05, 1.0],
    ];
    let z = i_sense_rows(&x, &truth);

    let options = FitOptions::new().with_constrain(["beta", "i1"]);
    let table = i_sense_fit_simultaneous(
        &x,
        &z,
        &[0.0, 0.3, 0.6],
        &[1.0, 1.0, 1.0],
        (-2.0, 2.0),
        &options,
    )
    .unwrap();

    assert_eq!(table.mode(), FitMode::Joint);
    assert_eq!(table.columns(), &["x0", "beta", "i0", "i1", "i2"]);

    let beta = table.column("beta").unwrap();
    let i1 = table.column("i1").unwrap();
    for i in 1..3 {
        assert_eq!(beta[i], beta[0]);
        assert_eq!(i1[i], i1[0]);
    }

    assert_rows_close(&table, &truth, 1e-5);
}

#[test]
fn test_shared_role_with_different_amplitudes() {
    let x = sweep();
    let truth = [
        [-0.5, 0.8, 1.5, 0.02, 2.0],
        [0.4, 0.8, 2.5, 0.07, 3.0],
    ];
    let z = i_sense_rows(&x, &truth);

    let options = FitOptions::new().with_constrain(["beta"]);
    let table =
        i_sense_fit_simultaneous(&x, &z, &[-0.3, 0.2], &[1.0, 1.0], (-2.0, 2.0), &options).unwrap();

    assert_rows_close(&table, &truth, 1e-5);
}

#[test]
fn test_joint_fit_inside_span_windows() {
    let x = sweep();
    let truth = [
        [-0.2, 1.2, 2.0, 0.05, 1.0],
        [0.5, 1.2, 1.8, 0.05, 1.2],
    ];
    let z = i_sense_rows(&x, &truth);

    let options = FitOptions::new().with_constrain(["beta"]).with_span(3.0);
    let table =
        i_sense_fit_simultaneous(&x, &z, &[-0.2, 0.5], &[1.0, 1.0], (-2.0, 2.0), &options).unwrap();

    assert_rows_close(&table, &truth, 1e-5);
}

#[test]
fn test_weak_localization_with_fixed_asymmetry() {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let truth = [
        [0.0, 1.5, 0.1, 0.002, 0.0],
        [1.0, 1.5, 0.12, -0.003, 0.0],
    ];
    let z = di_rows(&x, &truth);

    let options = FitOptions::new().with_fix(["delta"]);
    let table =
        di_fit_simultaneous(&x, &z, &[0.2, 0.8], &[1.0, 1.0], (-3.0, 3.0), &options).unwrap();

    // Fixed at the initial guess of zero, untouched by the solver
    assert_eq!(table.column("delta").unwrap().to_vec(), vec![0.0, 0.0]);
    assert_rows_close(&table, &truth, 1e-5);
}

#[test]
fn test_fixed_role_keeps_initial_guess_under_misfit() {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let truth = [
        [0.0, 1.5, 0.1, 0.002, 0.4],
        [0.5, 1.5, 0.1, 0.002, 0.4],
    ];
    let z = di_rows(&x, &truth);

    let options = FitOptions::new().with_fix(["delta"]);
    let table =
        di_fit_simultaneous(&x, &z, &[0.0, 0.5], &[1.0, 1.0], (-3.0, 3.0), &options).unwrap();

    assert_eq!(table.get(0, "delta"), Some(0.0));
    assert_eq!(table.get(1, "delta"), Some(0.0));
}

#[test]
fn test_weak_localization_with_shared_width() {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let truth = [
        [-1.0, 2.0, 0.08, 0.001, 0.3],
        [0.0, 2.0, 0.1, 0.0, -0.2],
        [1.0, 2.0, 0.12, -0.001, 0.1],
    ];
    let z = di_rows(&x, &truth);

    let options = FitOptions::new().with_constrain(["beta"]);
    let table = di_fit_simultaneous(
        &x,
        &z,
        &[-1.0, 0.0, 1.0],
        &[1.5, 1.5, 1.5],
        (-3.0, 3.0),
        &options,
    )
    .unwrap();

    assert_rows_close(&table, &truth, 1e-5);
}

#[test]
fn test_one_dimensional_z_is_a_single_dataset() {
    let x = sweep();
    let truth = [[0.1, 1.0, 2.0, 0.05, 1.0]];
    let z = i_sense_rows(&x, &truth).row(0).to_owned();

    let options = FitOptions::new().with_constrain(["beta"]);
    let table = i_sense_fit_simultaneous(&x, &z, &[0.0], &[1.0], (-2.0, 2.0), &options).unwrap();

    assert_eq!(table.len(), 1);
    assert_rows_close(&table, &truth, 1e-5);
}
