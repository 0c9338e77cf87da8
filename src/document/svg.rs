use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, bail};
use roxmltree::Node;

use crate::{
    animation::anim::Animation,
    document::{
        attr::{
            INHERITED_ATTRS, parse_attribute, parse_number, parse_number_list, parse_points,
            parse_style, parse_transform, parse_view_box,
        },
        color::parse_color,
        options::{LoadOptions, UnknownElements},
        smil::{AnimateTarget, parse_animate},
    },
    foundation::{
        core::{Affine, Canvas, Color, ShapeId},
        error::{KeylineError, KeylineResult},
    },
    scene::{
        model::{AttrValue, BindingKey, Scene, Shape, ShapeKind},
        resource::{
            Filter, FilterPrimitive, Gradient, GradientGeometry, GradientStop, GradientUnits,
            Resource, SpreadMethod,
        },
    },
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Longest gradient `href` chain followed before giving up.
const MAX_HREF_DEPTH: usize = 16;

/// Attributes consumed structurally instead of being stored on the shape.
const STRUCTURAL_ATTRS: &[&str] = &["id", "class", "style", "transform", "href", "points"];

/// Parse an SVG document with default [`LoadOptions`].
pub fn load(document: &str) -> KeylineResult<Scene> {
    load_with(document, &LoadOptions::default())
}

/// Parse an SVG document with embedded `<animate>` elements into a validated [`Scene`].
///
/// Every failure is reported as [`KeylineError::MalformedDocument`]; no partial scene is
/// ever returned.
#[tracing::instrument(skip(document, opts), fields(bytes = document.len()))]
pub fn load_with(document: &str, opts: &LoadOptions) -> KeylineResult<Scene> {
    let scene = build_scene(document, opts)
        .map_err(|e| KeylineError::malformed(format!("{e:#}")))?;
    scene.validate()?;
    tracing::debug!(
        shapes = scene.shapes.len(),
        resources = scene.resources.len(),
        bindings = scene.bindings.len(),
        animations = scene.animation_count(),
        "loaded scene"
    );
    Ok(scene)
}

fn build_scene(document: &str, opts: &LoadOptions) -> anyhow::Result<Scene> {
    let doc = roxmltree::Document::parse(document).context("document is not well-formed XML")?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        bail!("root element is <{}>, expected <svg>", root.tag_name().name());
    }

    let canvas = parse_canvas(root)?;
    let mut loader = Loader {
        opts,
        extent: (canvas.width, canvas.height),
        shapes: Vec::new(),
        resources: BTreeMap::new(),
        bindings: BTreeMap::new(),
        deferred: Vec::new(),
    };
    loader.collect_resources(root)?;

    let root_state = GroupState::root().enter(root, opts)?;
    loader.walk_children(root, &root_state)?;
    loader.resolve_deferred()?;

    Ok(Scene {
        canvas,
        shapes: loader.shapes,
        resources: loader.resources,
        bindings: loader.bindings,
    })
}

fn parse_canvas(root: Node<'_, '_>) -> anyhow::Result<Canvas> {
    let view_box = root
        .attribute("viewBox")
        .map(parse_view_box)
        .transpose()
        .context("invalid viewBox")?;
    // Percentages and missing sizes fall back to the viewBox, then to the SVG default 300x150.
    let dim = |name: &str, fallback: f64| -> anyhow::Result<f64> {
        match root.attribute(name).map(str::trim) {
            Some(v) if !v.ends_with('%') => {
                parse_number(v).with_context(|| format!("invalid root {name}"))
            }
            _ => Ok(fallback),
        }
    };
    Ok(Canvas {
        width: dim("width", view_box.map_or(300.0, |vb| vb.width()))?,
        height: dim("height", view_box.map_or(150.0, |vb| vb.height()))?,
        view_box,
    })
}

/// Presentation state accumulated down the group hierarchy.
#[derive(Clone, Debug)]
struct GroupState {
    transform: Affine,
    inherited: BTreeMap<String, AttrValue>,
    opacity: f64,
    filter: Option<AttrValue>,
}

impl GroupState {
    fn root() -> Self {
        Self {
            transform: Affine::IDENTITY,
            inherited: BTreeMap::new(),
            opacity: 1.0,
            filter: None,
        }
    }

    /// State for the children of `node` (the root `<svg>` or a `<g>`).
    fn enter(&self, node: Node<'_, '_>, opts: &LoadOptions) -> anyhow::Result<Self> {
        let mut next = self.clone();
        if node.tag_name().name() != "svg"
            && let Some(t) = node.attribute("transform")
        {
            next.transform = self.transform * parse_transform(t)?;
        }
        for (name, value) in own_attributes(node) {
            if opts.inherit_presentation && INHERITED_ATTRS.contains(&name) {
                next.inherited
                    .insert(name.to_string(), parse_attribute(name, value)?);
            }
            match name {
                "opacity" => next.opacity *= parse_number(value)?,
                "filter" => {
                    let f = parse_attribute(name, value)?;
                    if f.resource_ref().is_some() {
                        next.filter = Some(f);
                    }
                }
                _ => {}
            }
        }
        Ok(next)
    }
}

/// Attributes in the null namespace followed by `style` declarations, which override them.
fn own_attributes<'a>(node: Node<'a, '_>) -> Vec<(&'a str, &'a str)> {
    let mut out: Vec<(&str, &str)> = node
        .attributes()
        .filter(|a| a.namespace().is_none())
        .map(|a| (a.name(), a.value()))
        .filter(|(name, _)| *name != "style")
        .collect();
    if let Some(style) = node.attribute("style") {
        out.extend(parse_style(style));
    }
    out
}

fn href<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute("href")
        .or_else(|| node.attribute((XLINK_NS, "href")))
        .and_then(|h| h.trim().strip_prefix('#'))
}

fn is_foreign(node: Node<'_, '_>) -> bool {
    node.tag_name().namespace().is_some_and(|ns| ns != SVG_NS)
}

struct Loader<'a, 'input> {
    opts: &'a LoadOptions,
    /// Canvas size, resolving user-space percentages.
    extent: (f64, f64),
    shapes: Vec<Shape>,
    resources: BTreeMap<String, Resource>,
    bindings: BTreeMap<BindingKey, Vec<Animation>>,
    /// `<animate href="#id">` elements, resolved once every shape is known.
    deferred: Vec<Node<'a, 'input>>,
}

impl<'a, 'input> Loader<'a, 'input> {
    fn walk_children(&mut self, node: Node<'a, 'input>, state: &GroupState) -> anyhow::Result<()> {
        for child in node.children().filter(Node::is_element) {
            if is_foreign(child) {
                continue;
            }
            let tag = child.tag_name().name();
            if let Some(kind) = ShapeKind::from_tag(tag) {
                self.shape(child, kind, state)?;
                continue;
            }
            match tag {
                "g" | "a" => {
                    let inner = state.enter(child, self.opts)?;
                    self.walk_children(child, &inner)?;
                }
                "animate" | "animateColor" if href(child).is_some() => self.deferred.push(child),
                "animate" | "animateColor" => {
                    tracing::warn!(
                        parent = node.tag_name().name(),
                        "<animate> on a non-shape element ignored"
                    );
                }
                // Collected up front.
                "defs" | "linearGradient" | "radialGradient" | "filter" => {}
                "title" | "desc" | "metadata" => {}
                other => self.unknown(other)?,
            }
        }
        Ok(())
    }

    fn unknown(&self, tag: &str) -> anyhow::Result<()> {
        match self.opts.unknown_elements {
            UnknownElements::Ignore => {
                tracing::warn!(element = tag, "unsupported element ignored");
                Ok(())
            }
            UnknownElements::Reject => bail!("unsupported element <{tag}>"),
        }
    }

    fn shape(
        &mut self,
        node: Node<'a, 'input>,
        kind: ShapeKind,
        state: &GroupState,
    ) -> anyhow::Result<()> {
        let id = ShapeId(u32::try_from(self.shapes.len()).context("too many shapes")?);
        let name = node.attribute("id").map(str::to_string);
        let label = match &name {
            Some(n) => format!("<{}> '{n}'", node.tag_name().name()),
            None => format!("<{}> #{}", node.tag_name().name(), id.0),
        };

        let mut attributes = state.inherited.clone();
        for (attr, value) in own_attributes(node) {
            if STRUCTURAL_ATTRS.contains(&attr) {
                continue;
            }
            let parsed = parse_attribute(attr, value).with_context(|| label.clone())?;
            attributes.insert(attr.to_string(), parsed);
        }
        if let Some(points) = node.attribute("points") {
            let path = parse_points(points, kind == ShapeKind::Polygon)
                .with_context(|| format!("{label}: invalid points"))?;
            attributes.insert("points".to_string(), AttrValue::Path(path));
        }
        if state.opacity != 1.0 {
            let own = attributes
                .get("opacity")
                .and_then(AttrValue::as_number)
                .unwrap_or(1.0);
            attributes.insert("opacity".to_string(), AttrValue::Number(own * state.opacity));
        }
        if let Some(filter) = &state.filter {
            attributes
                .entry("filter".to_string())
                .or_insert_with(|| filter.clone());
        }

        let transform = match node.attribute("transform") {
            Some(t) => state.transform * parse_transform(t).with_context(|| label.clone())?,
            None => state.transform,
        };
        let text = (kind == ShapeKind::Text).then(|| collect_text(node));

        for child in node.children().filter(Node::is_element) {
            if is_foreign(child) {
                continue;
            }
            match child.tag_name().name() {
                "animate" | "animateColor" if href(child).is_some() => self.deferred.push(child),
                "animate" | "animateColor" => {
                    let target = AnimateTarget {
                        base: &attributes,
                        closed_points: kind == ShapeKind::Polygon,
                    };
                    let parsed = parse_animate(child, &target).with_context(|| label.clone())?;
                    self.bindings
                        .entry(BindingKey::new(id, parsed.attribute))
                        .or_default()
                        .push(parsed.animation);
                }
                "tspan" | "title" | "desc" => {}
                other => self.unknown(other)?,
            }
        }

        self.shapes.push(Shape {
            id,
            name,
            kind,
            transform,
            text,
            attributes,
        });
        Ok(())
    }

    fn resolve_deferred(&mut self) -> anyhow::Result<()> {
        for node in std::mem::take(&mut self.deferred) {
            let target_id = href(node).unwrap_or_default();
            let shape = self
                .shapes
                .iter()
                .find(|s| s.name.as_deref() == Some(target_id))
                .with_context(|| format!("<animate> targets unknown shape '#{target_id}'"))?;
            let target = AnimateTarget {
                base: &shape.attributes,
                closed_points: shape.kind == ShapeKind::Polygon,
            };
            let parsed = parse_animate(node, &target)
                .with_context(|| format!("<animate> targeting '#{target_id}'"))?;
            let key = BindingKey::new(shape.id, parsed.attribute);
            self.bindings.entry(key).or_default().push(parsed.animation);
        }
        Ok(())
    }

    fn collect_resources(&mut self, root: Node<'a, 'input>) -> anyhow::Result<()> {
        let mut defs: BTreeMap<&str, Node<'a, 'input>> = BTreeMap::new();
        for node in root.descendants().filter(Node::is_element) {
            if is_foreign(node) {
                continue;
            }
            let tag = node.tag_name().name();
            if !matches!(tag, "linearGradient" | "radialGradient" | "filter") {
                continue;
            }
            let Some(id) = node.attribute("id") else {
                tracing::warn!(element = tag, "resource without id ignored");
                continue;
            };
            if defs.insert(id, node).is_some() {
                bail!("duplicate resource id '{id}'");
            }
        }

        for (id, node) in &defs {
            let resource = if node.tag_name().name() == "filter" {
                Resource::Filter(self.filter(*node).with_context(|| format!("filter '{id}'"))?)
            } else {
                Resource::Gradient(
                    self.gradient(*node, &defs)
                        .with_context(|| format!("gradient '{id}'"))?,
                )
            };
            self.resources.insert((*id).to_string(), resource);
        }
        Ok(())
    }

    fn gradient(
        &self,
        node: Node<'a, 'input>,
        defs: &BTreeMap<&str, Node<'a, 'input>>,
    ) -> anyhow::Result<Gradient> {
        let chain = href_chain(node, defs)?;
        let lookup = |name: &str| chain.iter().find_map(|n| n.attribute(name));

        let units = match lookup("gradientUnits").map(str::trim) {
            None | Some("objectBoundingBox") => GradientUnits::ObjectBoundingBox,
            Some("userSpaceOnUse") => GradientUnits::UserSpaceOnUse,
            Some(other) => bail!("unknown gradientUnits \"{other}\""),
        };
        let spread = match lookup("spreadMethod").map(str::trim) {
            None | Some("pad") => SpreadMethod::Pad,
            Some("reflect") => SpreadMethod::Reflect,
            Some("repeat") => SpreadMethod::Repeat,
            Some(other) => bail!("unknown spreadMethod \"{other}\""),
        };
        let transform = lookup("gradientTransform")
            .map(parse_transform)
            .transpose()?
            .unwrap_or(Affine::IDENTITY);

        let coord = |name: &str, default: &str, extent: f64| -> anyhow::Result<f64> {
            let raw = lookup(name).unwrap_or(default).trim();
            match raw.strip_suffix('%') {
                Some(pct) => {
                    let frac = parse_number(pct)? / 100.0;
                    Ok(match units {
                        GradientUnits::ObjectBoundingBox => frac,
                        GradientUnits::UserSpaceOnUse => frac * extent,
                    })
                }
                None => parse_number(raw).with_context(|| format!("invalid {name}")),
            }
        };
        let (w, h) = self.extent;

        let geometry = if node.tag_name().name() == "linearGradient" {
            GradientGeometry::Linear {
                x1: coord("x1", "0%", w)?,
                y1: coord("y1", "0%", h)?,
                x2: coord("x2", "100%", w)?,
                y2: coord("y2", "0%", h)?,
            }
        } else {
            let diag = (w * w + h * h).sqrt() / std::f64::consts::SQRT_2;
            let cx = coord("cx", "50%", w)?;
            let cy = coord("cy", "50%", h)?;
            let r = coord("r", "50%", diag)?;
            if r < 0.0 {
                bail!("radial gradient radius is negative");
            }
            let fx = match lookup("fx") {
                Some(_) => coord("fx", "50%", w)?,
                None => cx,
            };
            let fy = match lookup("fy") {
                Some(_) => coord("fy", "50%", h)?,
                None => cy,
            };
            GradientGeometry::Radial { cx, cy, r, fx, fy }
        };

        let stop_source = chain
            .iter()
            .find(|n| n.children().any(|c| c.has_tag_name("stop")));
        let stops = match stop_source {
            Some(n) => parse_stops(*n)?,
            None => Vec::new(),
        };

        Ok(Gradient {
            geometry,
            units,
            transform,
            spread,
            stops,
        })
    }

    fn filter(&self, node: Node<'a, 'input>) -> anyhow::Result<Filter> {
        let mut primitives = Vec::new();
        for child in node.children().filter(Node::is_element) {
            if is_foreign(child) {
                continue;
            }
            let input = child.attribute("in").map(str::to_string);
            let result = child.attribute("result").map(str::to_string);
            let primitive = match child.tag_name().name() {
                "feGaussianBlur" => {
                    let sd = parse_number_list(child.attribute("stdDeviation").unwrap_or("0"))
                        .context("invalid stdDeviation")?;
                    let (std_dev_x, std_dev_y) = match sd.as_slice() {
                        [s] => (*s, *s),
                        [x, y] => (*x, *y),
                        _ => bail!("stdDeviation needs 1 or 2 numbers"),
                    };
                    if std_dev_x < 0.0 || std_dev_y < 0.0 {
                        bail!("stdDeviation must not be negative");
                    }
                    FilterPrimitive::GaussianBlur {
                        std_dev_x,
                        std_dev_y,
                        input,
                        result,
                    }
                }
                "feOffset" => FilterPrimitive::Offset {
                    dx: child.attribute("dx").map(parse_number).transpose()?.unwrap_or(0.0),
                    dy: child.attribute("dy").map(parse_number).transpose()?.unwrap_or(0.0),
                    input,
                    result,
                },
                "feFlood" => {
                    let props: BTreeMap<&str, &str> = own_attributes(child).into_iter().collect();
                    let color = match props.get("flood-color") {
                        Some(c) => parse_color(c).map_err(anyhow::Error::msg)?,
                        None => Color::BLACK,
                    };
                    let opacity = props
                        .get("flood-opacity")
                        .map(|o| parse_number(o))
                        .transpose()?
                        .unwrap_or(1.0);
                    FilterPrimitive::Flood {
                        color,
                        opacity,
                        result,
                    }
                }
                "feMerge" => FilterPrimitive::Merge {
                    inputs: child
                        .children()
                        .filter(|n| n.is_element() && n.tag_name().name() == "feMergeNode")
                        .map(|n| n.attribute("in").unwrap_or("SourceGraphic").to_string())
                        .collect(),
                    result,
                },
                other => {
                    self.unknown(other)?;
                    continue;
                }
            };
            primitives.push(primitive);
        }
        Ok(Filter { primitives })
    }
}

/// `node` followed by the gradients it inherits from through `href`.
fn href_chain<'a, 'input>(
    node: Node<'a, 'input>,
    defs: &BTreeMap<&str, Node<'a, 'input>>,
) -> anyhow::Result<Vec<Node<'a, 'input>>> {
    let mut chain = vec![node];
    let mut seen = BTreeSet::new();
    let mut current = node;
    while let Some(target) = href(current) {
        if !seen.insert(target) || chain.len() > MAX_HREF_DEPTH {
            bail!("gradient href chain through '{target}' does not terminate");
        }
        let next = *defs
            .get(target)
            .with_context(|| format!("href to undefined gradient '{target}'"))?;
        if next.tag_name().name() == "filter" {
            bail!("gradient href points at filter '{target}'");
        }
        chain.push(next);
        current = next;
    }
    Ok(chain)
}

fn parse_stops(node: Node<'_, '_>) -> anyhow::Result<Vec<GradientStop>> {
    let mut stops: Vec<GradientStop> = Vec::new();
    for stop in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "stop")
    {
        let props: BTreeMap<&str, &str> = own_attributes(stop).into_iter().collect();
        let raw = props.get("offset").copied().unwrap_or("0").trim();
        let offset = match raw.strip_suffix('%') {
            Some(pct) => parse_number(pct)? / 100.0,
            None => parse_number(raw)?,
        };
        // Offsets are clamped to [0, 1] and never decrease.
        let floor = stops.last().map_or(0.0, |s| s.offset);
        let offset = offset.clamp(0.0, 1.0).max(floor);
        let color = match props.get("stop-color") {
            Some(c) => parse_color(c).map_err(anyhow::Error::msg)?,
            None => Color::BLACK,
        };
        let opacity = props
            .get("stop-opacity")
            .map(|o| parse_number(o))
            .transpose()?
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);
        stops.push(GradientStop {
            offset,
            color,
            opacity,
        });
    }
    Ok(stops)
}

fn collect_text(node: Node<'_, '_>) -> String {
    let raw: Vec<&str> = node
        .descendants()
        .filter(|n| n.is_text())
        .filter(|n| {
            n.parent_element()
                .is_some_and(|p| matches!(p.tag_name().name(), "text" | "tspan"))
        })
        .filter_map(|n| n.text())
        .collect();
    raw.concat().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/document/svg.rs"]
mod tests;
