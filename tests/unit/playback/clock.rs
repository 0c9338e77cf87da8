use super::*;

#[test]
fn advances_monotonically() {
    let mut clock = Clock::new();
    assert_eq!(clock.now(), 0.0);
    clock.advance_to(0.5).unwrap();
    clock.advance_to(0.5).unwrap();
    clock.advance_to(2.0).unwrap();
    assert_eq!(clock.now(), 2.0);
}

#[test]
fn regression_is_rejected_without_moving() {
    let mut clock = Clock::new();
    clock.advance_to(3.0).unwrap();
    let err = clock.advance_to(1.0).unwrap_err();
    assert!(matches!(
        err,
        KeylineError::ClockRegression { now, requested } if now == 3.0 && requested == 1.0
    ));
    assert_eq!(clock.now(), 3.0);
}

#[test]
fn invalid_times_are_evaluation_errors() {
    let mut clock = Clock::new();
    for t in [-0.5, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            clock.advance_to(t),
            Err(KeylineError::Evaluation(_))
        ));
    }
    assert_eq!(clock.now(), 0.0);
}

#[test]
fn reset_returns_to_zero() {
    let mut clock = Clock::new();
    clock.advance_to(9.0).unwrap();
    clock.reset();
    assert_eq!(clock, Clock::new());
}
