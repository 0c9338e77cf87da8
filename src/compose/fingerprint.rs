use crate::{
    compose::draw::{DrawItem, DrawList},
    foundation::{
        core::{Affine, BezPath, Color, PathEl, Point},
        math::Fnv1a64,
    },
    scene::{
        model::{AttrValue, Paint, ShapeKind},
        resource::{FilterPrimitive, GradientGeometry, GradientUnits, Resource, SpreadMethod},
    },
};

/// 128-bit content hash of a [`DrawList`], built from two independently seeded FNV-1a
/// streams. Equal draw lists always hash equal; hosts use it to skip re-rasterizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DrawFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Fingerprint of the visual content of `list`. The frame time is not included, so two
/// frames that look the same hash the same.
pub fn fingerprint_draw_list(list: &DrawList) -> DrawFingerprint {
    let mut w = PairWriter::new();

    w.f64(list.canvas.width);
    w.f64(list.canvas.height);
    match list.canvas.view_box {
        Some(vb) => {
            w.u8(1);
            for v in [vb.x0, vb.y0, vb.x1, vb.y1] {
                w.f64(v);
            }
        }
        None => w.u8(0),
    }

    w.u64(list.items.len() as u64);
    for item in &list.items {
        write_item(&mut w, item);
    }

    let (hi, lo) = w.finish();
    DrawFingerprint { hi, lo }
}

fn write_item(w: &mut PairWriter, item: &DrawItem) {
    w.u64(u64::from(item.shape.0));
    w.opt_str(item.name.as_deref());
    w.u8(match item.kind {
        ShapeKind::Circle => 0,
        ShapeKind::Ellipse => 1,
        ShapeKind::Rect => 2,
        ShapeKind::Line => 3,
        ShapeKind::Polyline => 4,
        ShapeKind::Polygon => 5,
        ShapeKind::Path => 6,
        ShapeKind::Text => 7,
    });
    w.affine(item.transform);
    w.opt_str(item.text.as_deref());

    w.u64(item.attributes.len() as u64);
    for (name, value) in &item.attributes {
        w.str(name);
        write_attr(w, value);
    }

    w.u64(item.resources.len() as u64);
    for r in &item.resources {
        w.str(&r.attribute);
        w.str(&r.id);
        write_resource(w, &r.resource);
    }
}

fn write_attr(w: &mut PairWriter, value: &AttrValue) {
    match value {
        AttrValue::Number(v) => {
            w.u8(0);
            w.f64(*v);
        }
        AttrValue::Color(c) => {
            w.u8(1);
            w.color(*c);
        }
        AttrValue::Path(p) => {
            w.u8(2);
            w.path(p);
        }
        AttrValue::Paint(Paint::None) => w.u8(3),
        AttrValue::Paint(Paint::Color(c)) => {
            w.u8(4);
            w.color(*c);
        }
        AttrValue::Paint(Paint::Resource(id)) => {
            w.u8(5);
            w.str(id);
        }
        AttrValue::Reference(id) => {
            w.u8(6);
            w.str(id);
        }
        AttrValue::Keyword(k) => {
            w.u8(7);
            w.str(k);
        }
    }
}

fn write_resource(w: &mut PairWriter, resource: &Resource) {
    match resource {
        Resource::Gradient(g) => {
            w.u8(0);
            match g.geometry {
                GradientGeometry::Linear { x1, y1, x2, y2 } => {
                    w.u8(0);
                    for v in [x1, y1, x2, y2] {
                        w.f64(v);
                    }
                }
                GradientGeometry::Radial { cx, cy, r, fx, fy } => {
                    w.u8(1);
                    for v in [cx, cy, r, fx, fy] {
                        w.f64(v);
                    }
                }
            }
            w.u8(match g.units {
                GradientUnits::ObjectBoundingBox => 0,
                GradientUnits::UserSpaceOnUse => 1,
            });
            w.affine(g.transform);
            w.u8(match g.spread {
                SpreadMethod::Pad => 0,
                SpreadMethod::Reflect => 1,
                SpreadMethod::Repeat => 2,
            });
            w.u64(g.stops.len() as u64);
            for s in &g.stops {
                w.f64(s.offset);
                w.color(s.color);
                w.f64(s.opacity);
            }
        }
        Resource::Filter(f) => {
            w.u8(1);
            w.u64(f.primitives.len() as u64);
            for p in &f.primitives {
                write_primitive(w, p);
            }
        }
    }
}

fn write_primitive(w: &mut PairWriter, p: &FilterPrimitive) {
    match p {
        FilterPrimitive::GaussianBlur {
            std_dev_x,
            std_dev_y,
            input,
            result,
        } => {
            w.u8(0);
            w.f64(*std_dev_x);
            w.f64(*std_dev_y);
            w.opt_str(input.as_deref());
            w.opt_str(result.as_deref());
        }
        FilterPrimitive::Offset {
            dx,
            dy,
            input,
            result,
        } => {
            w.u8(1);
            w.f64(*dx);
            w.f64(*dy);
            w.opt_str(input.as_deref());
            w.opt_str(result.as_deref());
        }
        FilterPrimitive::Flood {
            color,
            opacity,
            result,
        } => {
            w.u8(2);
            w.color(*color);
            w.f64(*opacity);
            w.opt_str(result.as_deref());
        }
        FilterPrimitive::Merge { inputs, result } => {
            w.u8(3);
            w.u64(inputs.len() as u64);
            for i in inputs {
                w.str(i);
            }
            w.opt_str(result.as_deref());
        }
    }
}

struct PairWriter {
    a: Fnv1a64,
    b: Fnv1a64,
}

impl PairWriter {
    fn new() -> Self {
        Self {
            a: Fnv1a64::new_default(),
            b: Fnv1a64::new(Fnv1a64::ALT_BASIS),
        }
    }

    fn u8(&mut self, v: u8) {
        self.a.write_u8(v);
        self.b.write_u8(v);
    }

    fn u64(&mut self, v: u64) {
        self.a.write_u64(v);
        self.b.write_u64(v);
    }

    fn f64(&mut self, v: f64) {
        self.u64(v.to_bits());
    }

    fn str(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.a.write_bytes(s.as_bytes());
        self.b.write_bytes(s.as_bytes());
    }

    fn opt_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.u8(1);
                self.str(s);
            }
            None => self.u8(0),
        }
    }

    fn color(&mut self, c: Color) {
        for v in [c.r, c.g, c.b, c.a] {
            self.f64(v);
        }
    }

    fn point(&mut self, p: Point) {
        self.f64(p.x);
        self.f64(p.y);
    }

    fn affine(&mut self, t: Affine) {
        for c in t.as_coeffs() {
            self.f64(c);
        }
    }

    fn path(&mut self, p: &BezPath) {
        self.u64(p.elements().len() as u64);
        for el in p.elements() {
            match *el {
                PathEl::MoveTo(p0) => {
                    self.u8(0);
                    self.point(p0);
                }
                PathEl::LineTo(p0) => {
                    self.u8(1);
                    self.point(p0);
                }
                PathEl::QuadTo(p0, p1) => {
                    self.u8(2);
                    self.point(p0);
                    self.point(p1);
                }
                PathEl::CurveTo(p0, p1, p2) => {
                    self.u8(3);
                    self.point(p0);
                    self.point(p1);
                    self.point(p2);
                }
                PathEl::ClosePath => self.u8(4),
            }
        }
    }

    fn finish(self) -> (u64, u64) {
        (self.a.finish(), self.b.finish())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fingerprint.rs"]
mod tests;
