use super::*;
use crate::{animation::ease::KeySpline, foundation::core::Color};

fn pulse() -> Animation {
    Animation::new(
        vec![
            AnimValue::Number(0.8),
            AnimValue::Number(1.0),
            AnimValue::Number(0.8),
        ],
        3.0,
    )
}

#[test]
fn defaults_play_once_linearly() {
    let anim = pulse();
    assert_eq!(anim.repeat, Repeat::Count(1.0));
    assert_eq!(anim.begin, 0.0);
    assert_eq!(anim.easing, Easing::Linear);
    assert!(anim.validate().is_ok());
    assert_eq!(anim.value_kind(), Some(ValueKind::Number));
}

#[test]
fn rejects_single_keyframe() {
    let anim = Animation::new(vec![AnimValue::Number(1.0)], 1.0);
    assert!(matches!(
        anim.validate(),
        Err(KeylineError::MalformedDocument(_))
    ));
}

#[test]
fn rejects_mixed_kinds() {
    let anim = Animation::new(
        vec![AnimValue::Number(0.5), AnimValue::Color(Color::WHITE)],
        1.0,
    );
    assert!(anim.validate().is_err());
}

#[test]
fn rejects_non_positive_duration() {
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut anim = pulse();
        anim.duration = d;
        assert!(anim.validate().is_err(), "duration {d}");
    }
}

#[test]
fn rejects_bad_repeat_count() {
    assert!(pulse().with_repeat(Repeat::Count(0.0)).validate().is_err());
    assert!(pulse().with_repeat(Repeat::Count(2.5)).validate().is_ok());
    assert!(pulse().with_repeat(Repeat::Indefinite).validate().is_ok());
}

#[test]
fn key_times_must_match_keyframes() {
    assert!(pulse().with_key_times(vec![0.0, 0.2, 1.0]).validate().is_ok());
    assert!(pulse().with_key_times(vec![0.0, 1.0]).validate().is_err());
    assert!(pulse().with_key_times(vec![0.0, 0.7, 0.5]).validate().is_err());
    assert!(pulse().with_key_times(vec![0.1, 0.5, 1.0]).validate().is_err());
    assert!(pulse().with_key_times(vec![0.0, 0.5, 0.9]).validate().is_err());
}

#[test]
fn discrete_key_times_may_end_before_one() {
    let anim = pulse()
        .with_easing(Easing::Discrete)
        .with_key_times(vec![0.0, 0.5, 0.9]);
    assert!(anim.validate().is_ok());
}

#[test]
fn spline_count_is_checked_against_segments() {
    let s = KeySpline::new(0.42, 0.0, 0.58, 1.0).unwrap();
    assert!(
        pulse()
            .with_easing(Easing::Spline(vec![s, s]))
            .validate()
            .is_ok()
    );
    assert!(
        pulse()
            .with_easing(Easing::Spline(vec![s, s, s]))
            .validate()
            .is_err()
    );
}

#[test]
fn phases_follow_begin_and_repeat() {
    let anim = pulse().with_begin(1.0).with_repeat(Repeat::Count(2.0));
    assert_eq!(anim.phase_at(0.5), Phase::Pending);
    assert_eq!(anim.phase_at(1.0), Phase::Active);
    assert_eq!(anim.phase_at(6.9), Phase::Active);
    assert_eq!(anim.phase_at(7.0), Phase::Finished);
    assert_eq!(anim.active_end(), Some(7.0));

    let forever = pulse().with_repeat(Repeat::Indefinite);
    assert_eq!(forever.phase_at(1e9), Phase::Active);
    assert_eq!(forever.active_end(), None);
}
