use crate::foundation::core::Color;

/// Parse an SVG/CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
/// `hsl()`, `hsla()` or a named color.
pub(crate) fn parse_color(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_args(args);
    }
    if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
        return parse_hsl_args(args);
    }
    named_color(&lower).ok_or_else(|| format!("unknown color \"{s}\""))
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(s: &str) -> Result<Color, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        hex_byte(c).map(|v| v * 17)
    }

    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color \"#{s}\""));
    }
    let (r, g, b, a) = match s.len() {
        3 | 4 => {
            let a = if s.len() == 4 { hex_nibble(&s[3..4])? } else { 255 };
            (
                hex_nibble(&s[0..1])?,
                hex_nibble(&s[1..2])?,
                hex_nibble(&s[2..3])?,
                a,
            )
        }
        6 | 8 => {
            let a = if s.len() == 8 { hex_byte(&s[6..8])? } else { 255 };
            (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, a)
        }
        _ => {
            return Err(format!(
                "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA, got \"#{s}\""
            ));
        }
    };
    Ok(Color::from_rgba8(r, g, b, a))
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect()
}

// Channel as 0..255 number or percentage, normalized to [0, 1].
fn channel(part: &str) -> Result<f64, String> {
    if let Some(pct) = part.strip_suffix('%') {
        let v: f64 = pct.parse().map_err(|_| format!("invalid percentage \"{part}\""))?;
        return Ok((v / 100.0).clamp(0.0, 1.0));
    }
    let v: f64 = part
        .parse()
        .map_err(|_| format!("invalid color channel \"{part}\""))?;
    Ok((v / 255.0).clamp(0.0, 1.0))
}

fn alpha(part: &str) -> Result<f64, String> {
    if let Some(pct) = part.strip_suffix('%') {
        let v: f64 = pct.parse().map_err(|_| format!("invalid percentage \"{part}\""))?;
        return Ok((v / 100.0).clamp(0.0, 1.0));
    }
    let v: f64 = part.parse().map_err(|_| format!("invalid alpha \"{part}\""))?;
    Ok(v.clamp(0.0, 1.0))
}

fn parse_rgb_args(args: &str) -> Result<Color, String> {
    match split_args(args).as_slice() {
        [r, g, b] => Ok(Color::rgba(channel(r)?, channel(g)?, channel(b)?, 1.0)),
        [r, g, b, a] => Ok(Color::rgba(channel(r)?, channel(g)?, channel(b)?, alpha(a)?)),
        _ => Err(format!("rgb() expects 3 or 4 components, got \"{args}\"")),
    }
}

fn parse_hsl_args(args: &str) -> Result<Color, String> {
    let parts = split_args(args);
    let (h, s, l, a) = match parts.as_slice() {
        [h, s, l] => (*h, *s, *l, None),
        [h, s, l, a] => (*h, *s, *l, Some(*a)),
        _ => return Err(format!("hsl() expects 3 or 4 components, got \"{args}\"")),
    };
    let h: f64 = h
        .trim_end_matches("deg")
        .parse()
        .map_err(|_| format!("invalid hue \"{h}\""))?;
    let pct = |p: &str| -> Result<f64, String> {
        let v: f64 = p
            .trim_end_matches('%')
            .parse()
            .map_err(|_| format!("invalid percentage \"{p}\""))?;
        Ok(v / 100.0)
    };
    let a = a.map(alpha).transpose()?.unwrap_or(1.0);
    Ok(hsla_to_rgba(h, pct(s)?, pct(l)?, a))
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l, l, l, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Color::rgba(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
        a,
    )
}

fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "gold" => (255, 215, 0),
        "pink" => (255, 192, 203),
        "crimson" => (220, 20, 60),
        "coral" => (255, 127, 80),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "turquoise" => (64, 224, 208),
        "skyblue" => (135, 206, 235),
        "steelblue" => (70, 130, 180),
        "royalblue" => (65, 105, 225),
        "dodgerblue" => (30, 144, 255),
        "deepskyblue" => (0, 191, 255),
        "midnightblue" => (25, 25, 112),
        "limegreen" => (50, 205, 50),
        "seagreen" => (46, 139, 87),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "whitesmoke" => (245, 245, 245),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}

#[cfg(test)]
#[path = "../../tests/unit/document/color.rs"]
mod tests;
