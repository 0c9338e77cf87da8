use super::*;
use crate::{
    animation::anim::Repeat,
    scene::resource::{Filter, Gradient, GradientGeometry, GradientStop, GradientUnits},
};

fn gradient() -> Resource {
    Resource::Gradient(Gradient {
        geometry: GradientGeometry::Linear {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 0.0,
        },
        units: GradientUnits::ObjectBoundingBox,
        transform: Affine::IDENTITY,
        spread: Default::default(),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color::WHITE,
                opacity: 1.0,
            },
            GradientStop {
                offset: 1.0,
                color: Color::WHITE,
                opacity: 0.0,
            },
        ],
    })
}

fn circle(id: u32, fill: AttrValue) -> Shape {
    Shape {
        id: ShapeId(id),
        name: Some(format!("ring{id}")),
        kind: ShapeKind::Circle,
        transform: Affine::IDENTITY,
        text: None,
        attributes: BTreeMap::from([
            ("cx".to_string(), AttrValue::Number(50.0)),
            ("cy".to_string(), AttrValue::Number(50.0)),
            ("r".to_string(), AttrValue::Number(10.0)),
            ("fill".to_string(), fill),
        ]),
    }
}

fn basic_scene() -> Scene {
    let pulse = Animation::new(
        vec![
            AnimValue::Number(0.8),
            AnimValue::Number(1.0),
            AnimValue::Number(0.8),
        ],
        3.0,
    )
    .with_repeat(Repeat::Indefinite);
    Scene {
        canvas: Canvas {
            width: 100.0,
            height: 100.0,
            view_box: None,
        },
        shapes: vec![
            circle(0, AttrValue::Paint(Paint::Resource("glow".to_string()))),
            circle(1, AttrValue::Paint(Paint::Color(Color::BLACK))),
        ],
        resources: BTreeMap::from([
            ("glow".to_string(), gradient()),
            ("blur".to_string(), Resource::Filter(Filter::default())),
        ]),
        bindings: BTreeMap::from([(BindingKey::new(ShapeId(1), "opacity"), vec![pulse])]),
    }
}

#[test]
fn valid_scene_passes() {
    let scene = basic_scene();
    assert!(scene.validate().is_ok());
    assert_eq!(scene.animation_count(), 1);
    assert_eq!(scene.animations(ShapeId(1), "opacity").len(), 1);
    assert!(scene.animations(ShapeId(0), "opacity").is_empty());
    assert_eq!(scene.shape_by_name("ring1").map(|s| s.id), Some(ShapeId(1)));
}

#[test]
fn dangling_resource_is_malformed() {
    let mut scene = basic_scene();
    scene.shapes[0]
        .attributes
        .insert("fill".to_string(), AttrValue::Paint(Paint::Resource("nope".to_string())));
    assert!(matches!(
        scene.validate(),
        Err(KeylineError::MalformedDocument(_))
    ));
}

#[test]
fn resource_kind_must_fit_attribute() {
    let mut scene = basic_scene();
    scene.shapes[0]
        .attributes
        .insert("filter".to_string(), AttrValue::Reference("glow".to_string()));
    assert!(scene.validate().is_err());

    let mut scene = basic_scene();
    scene.shapes[0]
        .attributes
        .insert("filter".to_string(), AttrValue::Reference("blur".to_string()));
    assert!(scene.validate().is_ok());
}

#[test]
fn animation_kind_must_fit_attribute() {
    let mut scene = basic_scene();
    scene.bindings.insert(
        BindingKey::new(ShapeId(0), "opacity"),
        vec![Animation::new(
            vec![AnimValue::Color(Color::WHITE), AnimValue::Color(Color::BLACK)],
            1.0,
        )],
    );
    assert!(scene.validate().is_err());
}

#[test]
fn binding_to_missing_shape_is_malformed() {
    let mut scene = basic_scene();
    let anims = scene.bindings.values().next().unwrap().clone();
    scene.bindings.insert(BindingKey::new(ShapeId(9), "opacity"), anims);
    assert!(scene.validate().is_err());
}

#[test]
fn bindings_for_stays_within_one_shape() {
    let mut scene = basic_scene();
    let anims = scene.bindings.values().next().unwrap().clone();
    scene
        .bindings
        .insert(BindingKey::new(ShapeId(0), "r"), anims.clone());
    scene
        .bindings
        .insert(BindingKey::new(ShapeId(0), "cx"), anims);

    let attrs: Vec<_> = scene
        .bindings_for(ShapeId(0))
        .map(|(k, _)| k.attribute.as_str())
        .collect();
    assert_eq!(attrs, vec!["cx", "r"]);
    assert_eq!(scene.bindings_for(ShapeId(1)).count(), 1);
}

#[test]
fn animated_color_on_paint_stays_paint() {
    let base = AttrValue::Paint(Paint::Color(Color::BLACK));
    let v = AttrValue::from_animated(AnimValue::Color(Color::WHITE), Some(&base));
    assert_eq!(v, AttrValue::Paint(Paint::Color(Color::WHITE)));
    let v = AttrValue::from_animated(AnimValue::Color(Color::WHITE), None);
    assert_eq!(v, AttrValue::Color(Color::WHITE));
}

#[test]
fn json_roundtrip_keeps_bindings() {
    let scene = basic_scene();
    let s = serde_json::to_string_pretty(&scene).unwrap();
    let de: Scene = serde_json::from_str(&s).unwrap();
    assert_eq!(de, scene);
}
