use super::*;
use crate::foundation::core::{Color, PathEl};

#[test]
fn numbers_accept_px_and_reject_garbage() {
    assert_eq!(parse_number(" 12.5px ").unwrap(), 12.5);
    assert_eq!(parse_number("-3").unwrap(), -3.0);
    assert!(parse_number("12pt").is_err());
    assert!(parse_number("NaN").is_err());
}

#[test]
fn number_lists_split_on_signs() {
    assert_eq!(parse_number_list("1,2 3").unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(parse_number_list("10-5").unwrap(), vec![10.0, -5.0]);
    assert_eq!(parse_number_list("1e-2 4").unwrap(), vec![0.01, 4.0]);
    assert!(parse_number_list("").unwrap().is_empty());
}

#[test]
fn clock_values() {
    assert_eq!(parse_clock_value("3s").unwrap(), 3.0);
    assert_eq!(parse_clock_value("250ms").unwrap(), 0.25);
    assert_eq!(parse_clock_value("0.5min").unwrap(), 30.0);
    assert_eq!(parse_clock_value("1h").unwrap(), 3600.0);
    assert_eq!(parse_clock_value("2.5").unwrap(), 2.5);
    assert_eq!(parse_clock_value("01:30").unwrap(), 90.0);
    assert_eq!(parse_clock_value("1:00:02.5").unwrap(), 3602.5);
    assert!(parse_clock_value("indefinite").is_err());
    assert!(parse_clock_value("-1s").is_err());
    assert!(parse_clock_value("").is_err());
}

#[test]
fn url_refs_and_paints() {
    assert_eq!(parse_url_ref("url(#glow)"), Some("glow"));
    assert_eq!(parse_url_ref("url('#glow') red"), Some("glow"));
    assert_eq!(parse_url_ref("url(glow)"), None);

    assert_eq!(parse_paint("none").unwrap(), Paint::None);
    assert_eq!(
        parse_paint("url(#g1)").unwrap(),
        Paint::Resource("g1".to_string())
    );
    assert_eq!(parse_paint("#000").unwrap(), Paint::Color(Color::BLACK));
    assert!(parse_paint("url(#)").is_err());
}

#[test]
fn transforms_compose_left_to_right() {
    let t = parse_transform("translate(10, 20) scale(2)").unwrap();
    assert_eq!(t * Point::new(1.0, 1.0), Point::new(12.0, 22.0));

    let t = parse_transform("matrix(1 0 0 1 5 6)").unwrap();
    assert_eq!(t, Affine::translate((5.0, 6.0)));

    let t = parse_transform("rotate(90 10 10)").unwrap();
    let p = t * Point::new(20.0, 10.0);
    assert!((p.x - 10.0).abs() < 1e-9 && (p.y - 20.0).abs() < 1e-9);

    assert!(parse_transform("translate(1, 2").is_err());
    assert!(parse_transform("wobble(3)").is_err());
}

#[test]
fn view_box() {
    let r = parse_view_box("0 0 200 100").unwrap();
    assert_eq!(r, Rect::new(0.0, 0.0, 200.0, 100.0));
    assert!(parse_view_box("0 0 200").is_err());
}

#[test]
fn points_build_polylines() {
    let p = parse_points("0,0 10,0 10,10", true).unwrap();
    let els = p.elements();
    assert_eq!(els.len(), 4);
    assert!(matches!(els[0], PathEl::MoveTo(_)));
    assert!(matches!(els[3], PathEl::ClosePath));
    assert!(parse_points("0,0 10", false).is_err());
}

#[test]
fn style_declarations() {
    let decls: Vec<_> = parse_style("fill: red; stroke-width:2;;bogus").collect();
    assert_eq!(decls, vec![("fill", "red"), ("stroke-width", "2")]);
}

#[test]
fn typed_attributes() {
    assert_eq!(parse_attribute("r", "40").unwrap(), AttrValue::Number(40.0));
    assert_eq!(
        parse_attribute("font-family", "Inter, sans-serif").unwrap(),
        AttrValue::Keyword("Inter, sans-serif".to_string())
    );
    assert_eq!(
        parse_attribute("filter", "url(#glow)").unwrap(),
        AttrValue::Reference("glow".to_string())
    );
    // Clipping and masking are not resolved, so their references stay opaque.
    assert_eq!(
        parse_attribute("clip-path", "url(#c)").unwrap(),
        AttrValue::Keyword("url(#c)".to_string())
    );
    assert_eq!(
        parse_attribute("mask", "url(#m)").unwrap(),
        AttrValue::Keyword("url(#m)".to_string())
    );
    assert_eq!(
        parse_attribute("stop-color", "white").unwrap(),
        AttrValue::Color(Color::WHITE)
    );
    assert!(matches!(
        parse_attribute("d", "M0 0 L10 10").unwrap(),
        AttrValue::Path(_)
    ));
    assert!(parse_attribute("fill", "nonsense").is_err());
}
