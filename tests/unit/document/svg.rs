use super::*;
use crate::{
    animation::{anim::Repeat, value::AnimValue},
    scene::model::Paint,
};

const BADGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     width="200" height="100" viewBox="0 0 200 100">
  <defs>
    <linearGradient id="base" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="#ffffff"/>
      <stop offset="100%" style="stop-color: #000000; stop-opacity: 0.5"/>
    </linearGradient>
    <linearGradient id="derived" xlink:href="#base" x2="0"/>
    <radialGradient id="halo" gradientUnits="userSpaceOnUse" cx="50" cy="50" r="40">
      <stop offset="0" stop-color="white"/>
      <stop offset="1" stop-color="white" stop-opacity="0"/>
    </radialGradient>
    <filter id="glow">
      <feGaussianBlur stdDeviation="3" result="blur"/>
      <feMerge>
        <feMergeNode in="blur"/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>
  </defs>
  <g transform="translate(10 0)" fill="url(#base)" opacity="0.5" filter="url(#glow)">
    <circle id="dot" cx="50" cy="50" r="20">
      <animate attributeName="r" values="20;25;20" dur="2s" repeatCount="indefinite"/>
    </circle>
    <rect x="0" y="0" width="10" height="10" fill="none" opacity="0.5"/>
  </g>
  <path id="curve" d="M0 80 L50 60 L100 70" stroke="#4af" fill="none"/>
  <text id="label" x="100" y="90" font-size="12">Key <tspan>line</tspan></text>
  <animate href="#curve" attributeName="d" values="M0 80 L50 60 L100 70;M0 70 L50 80 L100 60" dur="4s" begin="1s"/>
</svg>"##;

#[test]
fn loads_shapes_in_paint_order() {
    let scene = load(BADGE).unwrap();
    let kinds: Vec<_> = scene.shapes.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ShapeKind::Circle,
            ShapeKind::Rect,
            ShapeKind::Path,
            ShapeKind::Text
        ]
    );
    assert_eq!(scene.canvas.width, 200.0);
    assert_eq!(scene.canvas.height, 100.0);
    assert!(scene.canvas.view_box.is_some());
    for (i, s) in scene.shapes.iter().enumerate() {
        assert_eq!(s.id, ShapeId(i as u32));
    }
}

#[test]
fn group_state_flows_into_children() {
    let scene = load(BADGE).unwrap();
    let dot = scene.shape_by_name("dot").unwrap();
    assert_eq!(dot.transform, Affine::translate((10.0, 0.0)));
    assert_eq!(
        dot.attribute("fill"),
        Some(&AttrValue::Paint(Paint::Resource("base".to_string())))
    );
    assert_eq!(dot.attribute("opacity"), Some(&AttrValue::Number(0.5)));
    assert_eq!(
        dot.attribute("filter"),
        Some(&AttrValue::Reference("glow".to_string()))
    );

    // Own values override inherited ones; group opacity multiplies.
    let rect = &scene.shapes[1];
    assert_eq!(rect.attribute("fill"), Some(&AttrValue::Paint(Paint::None)));
    assert_eq!(rect.attribute("opacity"), Some(&AttrValue::Number(0.25)));
}

#[test]
fn inheritance_can_be_disabled() {
    let opts = LoadOptions {
        inherit_presentation: false,
        ..LoadOptions::default()
    };
    let scene = load_with(BADGE, &opts).unwrap();
    let dot = scene.shape_by_name("dot").unwrap();
    assert!(dot.attribute("fill").is_none());
    // Opacity and filter are compositing, not inheritance.
    assert_eq!(dot.attribute("opacity"), Some(&AttrValue::Number(0.5)));
}

#[test]
fn bindings_include_href_targets() {
    let scene = load(BADGE).unwrap();
    let dot = scene.shape_by_name("dot").unwrap();
    let r = scene.animations(dot.id, "r");
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].repeat, Repeat::Indefinite);

    let curve = scene.shape_by_name("curve").unwrap();
    let d = scene.animations(curve.id, "d");
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].begin, 1.0);
    assert!(matches!(d[0].keyframes[0], AnimValue::Path(_)));
    assert_eq!(scene.animation_count(), 2);
}

#[test]
fn text_content_is_collapsed() {
    let scene = load(BADGE).unwrap();
    let label = scene.shape_by_name("label").unwrap();
    assert_eq!(label.text.as_deref(), Some("Key line"));
    assert_eq!(label.attribute("font-size"), Some(&AttrValue::Number(12.0)));
}

#[test]
fn gradients_resolve_units_stops_and_href() {
    let scene = load(BADGE).unwrap();
    let base = scene.resource("base").and_then(Resource::as_gradient).unwrap();
    assert_eq!(base.stops.len(), 2);
    assert_eq!(base.stops[1].offset, 1.0);
    assert_eq!(base.stops[1].opacity, 0.5);
    assert_eq!(base.stops[1].color, Color::BLACK);

    let derived = scene.resource("derived").and_then(Resource::as_gradient).unwrap();
    assert_eq!(derived.stops, base.stops);
    assert_eq!(
        derived.geometry,
        GradientGeometry::Linear {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 1.0
        }
    );

    let halo = scene.resource("halo").and_then(Resource::as_gradient).unwrap();
    assert_eq!(halo.units, GradientUnits::UserSpaceOnUse);
    assert_eq!(
        halo.geometry,
        GradientGeometry::Radial {
            cx: 50.0,
            cy: 50.0,
            r: 40.0,
            fx: 50.0,
            fy: 50.0
        }
    );
}

#[test]
fn filters_keep_primitive_order() {
    let scene = load(BADGE).unwrap();
    let glow = scene.resource("glow").and_then(Resource::as_filter).unwrap();
    assert_eq!(glow.primitives.len(), 2);
    assert!(matches!(
        &glow.primitives[0],
        FilterPrimitive::GaussianBlur { std_dev_x, std_dev_y, .. } if *std_dev_x == 3.0 && *std_dev_y == 3.0
    ));
    assert_eq!(
        glow.primitives[1],
        FilterPrimitive::Merge {
            inputs: vec!["blur".to_string(), "SourceGraphic".to_string()],
            result: None
        }
    );
}

fn assert_malformed(doc: &str) {
    match load(doc) {
        Err(KeylineError::MalformedDocument(_)) => {}
        other => panic!("expected MalformedDocument, got {other:?}"),
    }
}

#[test]
fn undefined_gradient_is_malformed() {
    assert_malformed(
        r##"<svg xmlns="http://www.w3.org/2000/svg"><circle r="4" fill="url(#missing)"/></svg>"##,
    );
}

#[test]
fn structural_failures_are_malformed() {
    assert_malformed("<svg");
    assert_malformed(r#"<html xmlns="http://www.w3.org/1999/xhtml"/>"#);
    // One keyframe.
    assert_malformed(
        r#"<svg><circle r="4"><animate attributeName="r" values="4" dur="1s"/></circle></svg>"#,
    );
    // Zero duration.
    assert_malformed(
        r#"<svg><circle r="4"><animate attributeName="r" values="4;5" dur="0s"/></circle></svg>"#,
    );
    // Color keyframe in an opacity animation.
    assert_malformed(
        r#"<svg><circle r="4"><animate attributeName="opacity" values="1;red" dur="1s"/></circle></svg>"#,
    );
    // Unknown href target.
    assert_malformed(
        r##"<svg><circle r="4"/><animate href="#nope" attributeName="r" values="1;2" dur="1s"/></svg>"##,
    );
    // Duplicate resource id.
    assert_malformed(
        r#"<svg><filter id="f"/><filter id="f"/></svg>"#,
    );
    // Gradient href cycle.
    assert_malformed(
        r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink">
             <linearGradient id="a" xlink:href="#b"/>
             <linearGradient id="b" xlink:href="#a"/>
           </svg>"##,
    );
}

#[test]
fn unknown_elements_follow_options() {
    let doc = r#"<svg><image width="4" height="4"/><circle r="1"/></svg>"#;
    let scene = load(doc).unwrap();
    assert_eq!(scene.shapes.len(), 1);

    let strict = LoadOptions {
        unknown_elements: UnknownElements::Reject,
        ..LoadOptions::default()
    };
    assert!(matches!(
        load_with(doc, &strict),
        Err(KeylineError::MalformedDocument(_))
    ));
}

#[test]
fn clip_paths_and_masks_are_tolerated() {
    let doc = r##"<svg xmlns="http://www.w3.org/2000/svg">
      <clipPath id="c"><rect width="4" height="4"/></clipPath>
      <mask id="m"><rect width="4" height="4" fill="white"/></mask>
      <circle r="4" clip-path="url(#c)" mask="url(#m)"/>
    </svg>"##;
    let scene = load(doc).unwrap();
    assert_eq!(scene.shapes.len(), 1);
    assert_eq!(
        scene.shapes[0].attribute("clip-path"),
        Some(&AttrValue::Keyword("url(#c)".to_string()))
    );
    assert!(scene.resources.is_empty());
    assert!(crate::compose::compositor::compose_frame(&scene, 0.0).is_ok());
}

#[test]
fn canvas_falls_back_to_view_box_then_default() {
    let scene = load(r#"<svg viewBox="0 0 64 32" width="100%"/>"#).unwrap();
    assert_eq!((scene.canvas.width, scene.canvas.height), (64.0, 32.0));

    let scene = load("<svg/>").unwrap();
    assert_eq!((scene.canvas.width, scene.canvas.height), (300.0, 150.0));
    assert!(scene.shapes.is_empty());
}

#[test]
fn polygon_points_close() {
    let scene = load(r#"<svg><polygon points="0,0 10,0 10,10"/></svg>"#).unwrap();
    let Some(AttrValue::Path(p)) = scene.shapes[0].attribute("points") else {
        panic!("points should be a path");
    };
    assert!(matches!(
        p.elements().last(),
        Some(crate::foundation::core::PathEl::ClosePath)
    ));
}
