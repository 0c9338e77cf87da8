use anyhow::{Context, bail};

use crate::{
    document::color::parse_color,
    foundation::core::{Affine, BezPath, Point, Rect},
    scene::model::{AttrValue, Paint},
};

/// Attributes whose value is a paint server (`none | <color> | url(#id)`).
const PAINT_ATTRS: &[&str] = &["fill", "stroke"];
/// Attributes whose value is a plain color.
const COLOR_ATTRS: &[&str] = &["stop-color", "flood-color", "lighting-color", "color"];
/// Attributes whose value is a bare `url(#id)` reference.
const REFERENCE_ATTRS: &[&str] = &["filter"];

/// Presentation attributes that SVG inherits from enclosing groups.
pub(crate) const INHERITED_ATTRS: &[&str] = &[
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-dasharray",
    "stroke-dashoffset",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "text-anchor",
    "dominant-baseline",
    "letter-spacing",
    "visibility",
    "color",
];

pub(crate) fn parse_number(s: &str) -> anyhow::Result<f64> {
    let t = s.trim();
    let t = t.strip_suffix("px").unwrap_or(t).trim_end();
    let v: f64 = t
        .parse()
        .with_context(|| format!("invalid number \"{s}\""))?;
    if !v.is_finite() {
        bail!("number \"{s}\" is not finite");
    }
    Ok(v)
}

/// Comma/whitespace separated numbers; a sign also starts a new number (`10-5`).
pub(crate) fn parse_number_list(s: &str) -> anyhow::Result<Vec<f64>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        let sep = b == b',' || b.is_ascii_whitespace();
        let sign_break = (b == b'-' || b == b'+')
            && start.is_some()
            && !matches!(bytes[i - 1], b'e' | b'E');
        if (sep || sign_break)
            && let Some(st) = start.take()
        {
            out.push(parse_number(&s[st..i])?);
        }
        if !sep && start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push(parse_number(&s[st..])?);
    }
    Ok(out)
}

/// SMIL clock value: `hh:mm:ss(.f)`, `mm:ss(.f)` or a timecount with an optional
/// `h`, `min`, `s` or `ms` metric. Returns seconds.
pub(crate) fn parse_clock_value(s: &str) -> anyhow::Result<f64> {
    let t = s.trim();
    if t.is_empty() {
        bail!("empty clock value");
    }

    let seconds = if t.contains(':') {
        let parts: Vec<&str> = t.split(':').collect();
        let field = |p: &str| -> anyhow::Result<f64> {
            p.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .with_context(|| format!("invalid clock value \"{s}\""))
        };
        match parts.as_slice() {
            [h, m, sec] => field(h)? * 3600.0 + field(m)? * 60.0 + field(sec)?,
            [m, sec] => field(m)? * 60.0 + field(sec)?,
            _ => bail!("invalid clock value \"{s}\""),
        }
    } else {
        let (num, scale, divisor) = if let Some(n) = t.strip_suffix("ms") {
            (n, 1.0, 1000.0)
        } else if let Some(n) = t.strip_suffix("min") {
            (n, 60.0, 1.0)
        } else if let Some(n) = t.strip_suffix('h') {
            (n, 3600.0, 1.0)
        } else if let Some(n) = t.strip_suffix('s') {
            (n, 1.0, 1.0)
        } else {
            (t, 1.0, 1.0)
        };
        let v: f64 = num
            .trim_end()
            .parse()
            .with_context(|| format!("invalid clock value \"{s}\""))?;
        v * scale / divisor
    };

    if !seconds.is_finite() || seconds < 0.0 {
        bail!("clock value \"{s}\" must be a finite, non-negative time");
    }
    Ok(seconds)
}

/// `url(#id)`, with optional quotes and a trailing fallback paint.
pub(crate) fn parse_url_ref(s: &str) -> Option<&str> {
    let rest = s.trim().strip_prefix("url(")?;
    let end = rest.find(')')?;
    let inner = rest[..end].trim().trim_matches(|c| c == '"' || c == '\'');
    let id = inner.strip_prefix('#')?;
    (!id.is_empty()).then_some(id)
}

pub(crate) fn parse_paint(s: &str) -> anyhow::Result<Paint> {
    let t = s.trim();
    if t == "none" {
        return Ok(Paint::None);
    }
    if t.starts_with("url(") {
        let id = parse_url_ref(t).with_context(|| format!("invalid paint reference \"{s}\""))?;
        return Ok(Paint::Resource(id.to_string()));
    }
    parse_color(t)
        .map(Paint::Color)
        .map_err(anyhow::Error::msg)
}

pub(crate) fn parse_view_box(s: &str) -> anyhow::Result<Rect> {
    let v = parse_number_list(s)?;
    let [x, y, w, h] = v.as_slice() else {
        bail!("viewBox needs 4 numbers, got \"{s}\"");
    };
    if *w < 0.0 || *h < 0.0 {
        bail!("viewBox \"{s}\" has a negative size");
    }
    Ok(Rect::new(*x, *y, x + w, y + h))
}

/// SVG transform list, applied left to right as written.
pub(crate) fn parse_transform(s: &str) -> anyhow::Result<Affine> {
    let mut acc = Affine::IDENTITY;
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .with_context(|| format!("invalid transform \"{s}\""))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .with_context(|| format!("unterminated transform \"{s}\""))?;
        let name = rest[..open].trim();
        let args = parse_number_list(&rest[open + 1..close])?;
        acc *= transform_op(name, &args).with_context(|| format!("in transform \"{s}\""))?;
        rest = rest[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }
    Ok(acc)
}

fn transform_op(name: &str, args: &[f64]) -> anyhow::Result<Affine> {
    Ok(match (name, args) {
        ("matrix", [a, b, c, d, e, f]) => Affine::new([*a, *b, *c, *d, *e, *f]),
        ("translate", [tx]) => Affine::translate((*tx, 0.0)),
        ("translate", [tx, ty]) => Affine::translate((*tx, *ty)),
        ("scale", [s]) => Affine::scale(*s),
        ("scale", [sx, sy]) => Affine::scale_non_uniform(*sx, *sy),
        ("rotate", [deg]) => Affine::rotate(deg.to_radians()),
        ("rotate", [deg, cx, cy]) => Affine::rotate_about(deg.to_radians(), Point::new(*cx, *cy)),
        ("skewX", [deg]) => Affine::skew(deg.to_radians().tan(), 0.0),
        ("skewY", [deg]) => Affine::skew(0.0, deg.to_radians().tan()),
        _ => bail!("unsupported {name}() with {} argument(s)", args.len()),
    })
}

/// `points` of a polyline/polygon as an open or closed path.
pub(crate) fn parse_points(s: &str, close: bool) -> anyhow::Result<BezPath> {
    let v = parse_number_list(s)?;
    if v.len() % 2 != 0 || v.len() < 4 {
        bail!("points needs an even count of at least 4 numbers, got {}", v.len());
    }
    let mut path = BezPath::new();
    for (i, xy) in v.chunks_exact(2).enumerate() {
        let p = Point::new(xy[0], xy[1]);
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    if close {
        path.close_path();
    }
    Ok(path)
}

pub(crate) fn parse_path_data(s: &str) -> anyhow::Result<BezPath> {
    BezPath::from_svg(s).map_err(|e| anyhow::anyhow!("invalid path data: {e}"))
}

/// `name: value; ...` declarations of a `style` attribute.
pub(crate) fn parse_style(s: &str) -> impl Iterator<Item = (&str, &str)> {
    s.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let name = name.trim();
        let value = value.trim();
        (!name.is_empty() && !value.is_empty()).then_some((name, value))
    })
}

/// Typed value of a presentation or geometry attribute. `points` is handled by the
/// loader since it depends on the element.
pub(crate) fn parse_attribute(name: &str, value: &str) -> anyhow::Result<AttrValue> {
    let value = value.trim();
    if PAINT_ATTRS.contains(&name) {
        if matches!(value, "inherit" | "currentColor") {
            return Ok(AttrValue::Keyword(value.to_string()));
        }
        return parse_paint(value)
            .map(AttrValue::Paint)
            .with_context(|| format!("attribute '{name}'"));
    }
    if COLOR_ATTRS.contains(&name) {
        if matches!(value, "inherit" | "currentColor") {
            return Ok(AttrValue::Keyword(value.to_string()));
        }
        return parse_color(value)
            .map(AttrValue::Color)
            .map_err(|e| anyhow::anyhow!("attribute '{name}': {e}"));
    }
    if REFERENCE_ATTRS.contains(&name) {
        if value.starts_with("url(") {
            let id = parse_url_ref(value)
                .with_context(|| format!("attribute '{name}': invalid reference \"{value}\""))?;
            return Ok(AttrValue::Reference(id.to_string()));
        }
        return Ok(AttrValue::Keyword(value.to_string()));
    }
    if name == "d" {
        return parse_path_data(value)
            .map(AttrValue::Path)
            .with_context(|| format!("attribute '{name}'"));
    }
    Ok(match parse_number(value) {
        Ok(v) => AttrValue::Number(v),
        Err(_) => AttrValue::Keyword(value.to_string()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/document/attr.rs"]
mod tests;
