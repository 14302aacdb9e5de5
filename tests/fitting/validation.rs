//! Input validation and fit-window selection.

use crate::test_helpers::{i_sense_rows, sweep};
use ndarray::{Array1, Array2, Array3};
use spinfit::parameters::ParameterError;
use spinfit::window::{select_windows, Window};
use spinfit::{di_fit_simultaneous, i_sense_fit_simultaneous, FitError, FitOptions};

fn three_rows() -> (Array1<f64>, Array2<f64>) {
    let x = sweep();
    let z = i_sense_rows(
        &x,
        &[
            [0.0, 1.0, 2.0, 0.05, 1.0],
            [0.3, 1.0, 2.0, 0.05, 1.0],
            [0.6, 1.0, 2.0, 0.05, 1.0],
        ],
    );
    (x, z)
}

#[test]
fn test_three_dimensional_z_is_rejected() {
    let x = sweep();
    let z = Array3::<f64>::zeros((2, 3, 100));

    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.0], &[1.0, 1.0], (-2.0, 2.0), &FitOptions::new())
        .unwrap_err();
    assert!(matches!(err, FitError::Shape(_)));
}

#[test]
fn test_x_row_count_must_be_one_or_n() {
    let (_, z) = three_rows();
    let x = Array2::<f64>::zeros((2, 100));

    let err = i_sense_fit_simultaneous(
        &x,
        &z,
        &[0.0, 0.3, 0.6],
        &[1.0; 3],
        (-2.0, 2.0),
        &FitOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, FitError::Shape(_)));
}

#[test]
fn test_x_sample_count_must_match() {
    let (_, z) = three_rows();
    let x = Array1::linspace(-5.0, 5.0, 99);

    let err = i_sense_fit_simultaneous(
        &x,
        &z,
        &[0.0, 0.3, 0.6],
        &[1.0; 3],
        (-2.0, 2.0),
        &FitOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, FitError::Shape(_)));
}

#[test]
fn test_guess_lengths_must_match_datasets() {
    let (x, z) = three_rows();

    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3], &[1.0; 3], (-2.0, 2.0), &FitOptions::new())
        .unwrap_err();
    assert!(matches!(err, FitError::DimensionMismatch(_)));

    let err = i_sense_fit_simultaneous(
        &x,
        &z,
        &[0.0, 0.3, 0.6],
        &[1.0; 4],
        (-2.0, 2.0),
        &FitOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, FitError::DimensionMismatch(_)));
}

#[test]
fn test_fix_is_rejected_for_sensor_model() {
    let (x, z) = three_rows();
    let options = FitOptions::new().with_fix(["beta"]);

    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
        .unwrap_err();
    assert!(matches!(err, FitError::InvalidInput(_)));
}

#[test]
fn test_unknown_roles_are_rejected() {
    let (x, z) = three_rows();

    let options = FitOptions::new().with_constrain(["width"]);
    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
        .unwrap_err();
    assert!(matches!(
        err,
        FitError::Parameter(ParameterError::UnknownRole { ref name }) if name == "width"
    ));

    // i0 belongs to the sensor model, not the weak-localization peak
    let options = FitOptions::new().with_fix(["i0"]);
    let err = di_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
        .unwrap_err();
    assert!(matches!(err, FitError::Parameter(_)));
}

#[test]
fn test_inverted_location_bounds_are_rejected() {
    let (x, z) = three_rows();

    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (2.0, -2.0), &FitOptions::new())
        .unwrap_err();
    assert!(matches!(err, FitError::Parameter(_)));
}

#[test]
fn test_bad_spans_are_rejected() {
    let (x, z) = three_rows();

    for span in [0.0, -1.0, f64::INFINITY] {
        let options = FitOptions::new().with_span(span);
        let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
            .unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)), "span {}", span);
    }

    // Narrower than the sample spacing: a single-sample window
    let options = FitOptions::new().with_span(0.01);
    let err = i_sense_fit_simultaneous(&x, &z, &[0.0, 0.3, 0.6], &[1.0; 3], (-2.0, 2.0), &options)
        .unwrap_err();
    assert!(matches!(err, FitError::InvalidInput(ref msg) if msg.contains("fewer than")));
}

#[test]
fn test_window_length_scales_with_span() {
    let x = sweep().insert_axis(ndarray::Axis(0));
    let spacing = 10.0 / 99.0;

    for span in [0.5, 1.0, 2.0] {
        let windows = select_windows(&x, &[0.0], Some(span)).unwrap();
        let intervals = (windows[0].high - windows[0].low) as f64;
        assert!(
            (intervals - 2.0 * span / spacing).abs() <= 1.0,
            "span {}: {} intervals",
            span,
            intervals
        );
    }
}

#[test]
fn test_window_defaults_to_full_row() {
    let x = sweep().insert_axis(ndarray::Axis(0));
    let windows = select_windows(&x, &[0.0], None).unwrap();
    assert_eq!(windows, vec![Window { low: 0, high: 99 }]);
}

#[test]
fn test_window_near_edge_saturates() {
    let x = sweep().insert_axis(ndarray::Axis(0));
    let windows = select_windows(&x, &[4.8], Some(1.0)).unwrap();
    assert_eq!(windows[0].high, 99);
    assert!(windows[0].low < windows[0].high);
}
