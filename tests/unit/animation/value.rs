use super::*;
use crate::foundation::core::Point;

fn path(d: &str) -> AnimValue {
    AnimValue::Path(BezPath::from_svg(d).unwrap())
}

#[test]
fn attribute_kinds() {
    assert_eq!(ValueKind::for_attribute("d"), ValueKind::Path);
    assert_eq!(ValueKind::for_attribute("points"), ValueKind::Path);
    assert_eq!(ValueKind::for_attribute("fill"), ValueKind::Color);
    assert_eq!(ValueKind::for_attribute("stop-color"), ValueKind::Color);
    assert_eq!(ValueKind::for_attribute("opacity"), ValueKind::Number);
    assert_eq!(ValueKind::for_attribute("r"), ValueKind::Number);
}

#[test]
fn numbers_interpolate_linearly() {
    let v = AnimValue::interpolate(&AnimValue::Number(2.0), &AnimValue::Number(6.0), 0.25).unwrap();
    assert_eq!(v, AnimValue::Number(3.0));
}

#[test]
fn color_midpoint_alpha_is_mean() {
    let white = AnimValue::Color(Color::WHITE);
    let clear_white = AnimValue::Color(Color::WHITE.with_alpha(0.0));
    let mid = AnimValue::interpolate(&white, &clear_white, 0.5).unwrap();
    let c = mid.as_color().unwrap();
    assert_eq!(c.a, 0.5);
    assert_eq!((c.r, c.g, c.b), (1.0, 1.0, 1.0));
}

#[test]
fn colors_interpolate_without_gamma() {
    let a = AnimValue::Color(Color::rgba(0.0, 0.0, 0.0, 1.0));
    let b = AnimValue::Color(Color::rgba(1.0, 0.5, 0.25, 1.0));
    let c = AnimValue::interpolate(&a, &b, 0.5).unwrap().as_color().unwrap();
    assert_eq!(c, Color::rgba(0.5, 0.25, 0.125, 1.0));
}

#[test]
fn paths_interpolate_pairwise() {
    let a = path("M0,0 L10,0 C10,10 20,10 20,0 Z");
    let b = path("M0,10 L10,20 C10,30 20,30 20,20 Z");
    let mid = AnimValue::interpolate(&a, &b, 0.5).unwrap();
    let els = mid.as_path().unwrap().elements().to_vec();
    assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 5.0)));
    assert_eq!(els[1], PathEl::LineTo(Point::new(10.0, 10.0)));
    assert_eq!(
        els[2],
        PathEl::CurveTo(
            Point::new(10.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 10.0)
        )
    );
    assert_eq!(els[3], PathEl::ClosePath);
}

#[test]
fn mismatched_path_structure_is_rejected() {
    let a = path("M0,0 L10,0 L10,10");
    let b = path("M0,0 C1,1 2,2 10,0 L10,10");
    let err = AnimValue::interpolate(&a, &b, 0.5).unwrap_err();
    assert!(matches!(err, KeylineError::IncompatiblePath(_)));

    let c = path("M0,0 L10,0");
    let err = AnimValue::interpolate(&a, &c, 0.5).unwrap_err();
    assert!(matches!(err, KeylineError::IncompatiblePath(_)));
}

#[test]
fn mixed_kinds_are_an_evaluation_error() {
    let err =
        AnimValue::interpolate(&AnimValue::Number(1.0), &AnimValue::Color(Color::WHITE), 0.5)
            .unwrap_err();
    assert!(matches!(err, KeylineError::Evaluation(_)));
}
