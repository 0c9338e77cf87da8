use std::collections::BTreeMap;

use anyhow::{Context, bail};

use crate::{
    animation::{
        anim::{Animation, Repeat},
        ease::{Easing, KeySpline},
        value::{AnimValue, ValueKind},
    },
    document::{
        attr::{parse_clock_value, parse_number, parse_number_list, parse_path_data, parse_points},
        color::parse_color,
    },
    scene::model::AttrValue,
};

/// Context of the element an `<animate>` belongs to.
pub(crate) struct AnimateTarget<'a> {
    /// Base attributes of the target shape, used by `to`/`by` animations.
    pub base: &'a BTreeMap<String, AttrValue>,
    /// `points` closes into a polygon.
    pub closed_points: bool,
}

/// One parsed `<animate>`: the attribute it drives and its timing.
#[derive(Debug)]
pub(crate) struct ParsedAnimate {
    pub attribute: String,
    pub animation: Animation,
}

pub(crate) fn parse_animate(
    node: roxmltree::Node<'_, '_>,
    target: &AnimateTarget<'_>,
) -> anyhow::Result<ParsedAnimate> {
    let attribute = node
        .attribute("attributeName")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .context("<animate> without attributeName")?
        .to_string();
    let kind = ValueKind::for_attribute(&attribute);
    let parse_value = |s: &str| parse_anim_value(kind, s, target.closed_points);

    let keyframes = keyframes(node, &attribute, kind, target, &parse_value)?;

    let dur = node.attribute("dur").context("<animate> without dur")?.trim();
    if dur == "indefinite" || dur == "media" {
        bail!("dur=\"{dur}\" is not a finite duration");
    }
    let duration = parse_clock_value(dur).context("invalid dur")?;

    let begin = match node.attribute("begin") {
        Some(b) => parse_offset(b)?,
        None => 0.0,
    };

    let repeat = repeat_policy(
        node.attribute("repeatCount"),
        node.attribute("repeatDur"),
        duration,
    )?;

    let easing = easing(node)?;

    let mut animation = Animation::new(keyframes, duration)
        .with_begin(begin)
        .with_repeat(repeat)
        .with_easing(easing);
    if let Some(kt) = node.attribute("keyTimes") {
        let key_times = split_semicolons(kt)
            .map(parse_number)
            .collect::<anyhow::Result<Vec<_>>>()
            .context("invalid keyTimes")?;
        animation = animation.with_key_times(key_times);
    }

    warn_ignored(node, &attribute);
    Ok(ParsedAnimate {
        attribute,
        animation,
    })
}

fn keyframes(
    node: roxmltree::Node<'_, '_>,
    attribute: &str,
    kind: ValueKind,
    target: &AnimateTarget<'_>,
    parse_value: &dyn Fn(&str) -> anyhow::Result<AnimValue>,
) -> anyhow::Result<Vec<AnimValue>> {
    if let Some(values) = node.attribute("values") {
        return split_semicolons(values)
            .enumerate()
            .map(|(i, v)| parse_value(v).with_context(|| format!("values[{i}]")))
            .collect();
    }

    let from = node.attribute("from").map(parse_value).transpose()?;
    let to = node.attribute("to").map(parse_value).transpose()?;
    let by = node.attribute("by").map(parse_value).transpose()?;

    let start = match from {
        Some(v) => v,
        None if to.is_some() || by.is_some() => target
            .base
            .get(attribute)
            .and_then(AttrValue::as_anim_value)
            .filter(|v| v.kind() == kind)
            .with_context(|| {
                format!("to/by animation of '{attribute}' needs a {} base value", kind.as_str())
            })?,
        None => bail!("<animate> of '{attribute}' has no values, from, to or by"),
    };

    let end = match (to, by) {
        (Some(to), _) => to,
        (None, Some(by)) => add_values(&start, &by)?,
        (None, None) => bail!("<animate> of '{attribute}' has from but neither to nor by"),
    };
    Ok(vec![start, end])
}

fn add_values(a: &AnimValue, b: &AnimValue) -> anyhow::Result<AnimValue> {
    Ok(match (a, b) {
        (AnimValue::Number(x), AnimValue::Number(y)) => AnimValue::Number(x + y),
        (AnimValue::Color(x), AnimValue::Color(y)) => AnimValue::Color(x.sum(*y).clamped()),
        _ => bail!("by is only supported for numbers and colors"),
    })
}

fn parse_anim_value(kind: ValueKind, s: &str, closed_points: bool) -> anyhow::Result<AnimValue> {
    Ok(match kind {
        ValueKind::Number => AnimValue::Number(parse_number(s)?),
        ValueKind::Color => {
            let c = parse_color(s).map_err(anyhow::Error::msg)?;
            AnimValue::Color(c)
        }
        ValueKind::Path if looks_like_points(s) => AnimValue::Path(parse_points(s, closed_points)?),
        ValueKind::Path => AnimValue::Path(parse_path_data(s)?),
    })
}

// `points` values start with a number; path data starts with a command letter.
fn looks_like_points(s: &str) -> bool {
    s.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

fn split_semicolons(s: &str) -> impl Iterator<Item = &str> {
    let trimmed = s.trim().trim_end_matches(';');
    trimmed.split(';').map(str::trim)
}

/// `begin` as a plain signed offset. Event, sync-base and list values are rejected.
fn parse_offset(s: &str) -> anyhow::Result<f64> {
    let t = s.trim();
    if t.contains(';') {
        bail!("begin lists are not supported (\"{t}\")");
    }
    let (sign, rest) = match t.as_bytes().first() {
        Some(b'-') => (-1.0, &t[1..]),
        Some(b'+') => (1.0, &t[1..]),
        _ => (1.0, t),
    };
    let v = parse_clock_value(rest)
        .with_context(|| format!("begin must be a plain clock offset, got \"{t}\""))?;
    Ok(sign * v)
}

fn repeat_policy(
    repeat_count: Option<&str>,
    repeat_dur: Option<&str>,
    duration: f64,
) -> anyhow::Result<Repeat> {
    let count = repeat_count
        .map(|c| match c.trim() {
            "indefinite" => Ok(Repeat::Indefinite),
            other => parse_number(other)
                .map(Repeat::Count)
                .context("invalid repeatCount"),
        })
        .transpose()?;
    let by_dur = repeat_dur
        .map(|d| match d.trim() {
            "indefinite" => Ok(Repeat::Indefinite),
            other => parse_clock_value(other)
                .map(|secs| Repeat::Count(secs / duration))
                .context("invalid repeatDur"),
        })
        .transpose()?;

    // When both are given the shorter one wins.
    Ok(match (count, by_dur) {
        (None, None) => Repeat::default(),
        (Some(r), None) | (None, Some(r)) => r,
        (Some(Repeat::Count(a)), Some(Repeat::Count(b))) => Repeat::Count(a.min(b)),
        (Some(Repeat::Count(n)), Some(Repeat::Indefinite))
        | (Some(Repeat::Indefinite), Some(Repeat::Count(n))) => Repeat::Count(n),
        (Some(Repeat::Indefinite), Some(Repeat::Indefinite)) => Repeat::Indefinite,
    })
}

/// Segment counts are checked later by `Animation::validate`.
fn easing(node: roxmltree::Node<'_, '_>) -> anyhow::Result<Easing> {
    let mode = node.attribute("calcMode").map(str::trim).unwrap_or("linear");
    Ok(match mode {
        "linear" => Easing::Linear,
        "discrete" => Easing::Discrete,
        "paced" => {
            tracing::warn!("calcMode=\"paced\" is not supported; using linear");
            Easing::Linear
        }
        "spline" => {
            let raw = node
                .attribute("keySplines")
                .context("calcMode=\"spline\" requires keySplines")?;
            let splines = split_semicolons(raw)
                .map(|s| {
                    let v = parse_number_list(s)?;
                    let [x1, y1, x2, y2] = v.as_slice() else {
                        bail!("keySpline needs 4 numbers, got \"{s}\"");
                    };
                    Ok(KeySpline::new(*x1, *y1, *x2, *y2)?)
                })
                .collect::<anyhow::Result<Vec<_>>>()
                .context("invalid keySplines")?;
            Easing::Spline(splines)
        }
        other => bail!("unknown calcMode \"{other}\""),
    })
}

fn warn_ignored(node: roxmltree::Node<'_, '_>, attribute: &str) {
    if node.attribute("fill") == Some("remove") {
        tracing::warn!(attribute, "fill=\"remove\" ignored; finished animations hold");
    }
    if node.attribute("additive") == Some("sum") {
        tracing::warn!(attribute, "additive=\"sum\" ignored");
    }
    if node.attribute("accumulate") == Some("sum") {
        tracing::warn!(attribute, "accumulate=\"sum\" ignored");
    }
    let spline_mode = node.attribute("calcMode") == Some("spline");
    if !spline_mode && node.attribute("keySplines").is_some() {
        tracing::warn!(attribute, "keySplines ignored without calcMode=\"spline\"");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/smil.rs"]
mod tests;
