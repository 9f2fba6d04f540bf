//! Declarative line layer styles and their per-frame resolution.
//!
//! Property names follow the Mapbox GL style conventions (`line-width`,
//! `line-dasharray`, ...). Numeric properties are constants or zoom stop
//! functions; dash arrays are piecewise constant over zoom and cross-fade
//! between integer zooms.

use std::fmt;

use foundation::Color;
use foundation::math::Vec2;
use foundation::time::Time;
use serde::Deserialize;

use crate::symbology::{DashPattern, ResolvedLineStyle, TranslateAnchor};

/// Default cross-fade duration for piecewise-constant properties.
pub const DEFAULT_FADE_DURATION_MS: f64 = 300.0;

#[derive(Debug)]
pub enum StyleError {
    Parse(serde_json::Error),
    DuplicateLayer(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::Parse(err) => write!(f, "style parse error: {err}"),
            StyleError::DuplicateLayer(id) => write!(f, "duplicate layer id {id:?}"),
        }
    }
}

impl std::error::Error for StyleError {}

/// Zoom stop function with exponential interpolation between stops.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoomFunction {
    #[serde(default = "default_base")]
    pub base: f32,
    pub stops: Vec<(f32, f32)>,
}

fn default_base() -> f32 {
    1.0
}

impl ZoomFunction {
    pub fn evaluate(&self, zoom: f32) -> f32 {
        let Some(&(first_z, first_v)) = self.stops.first() else {
            return 0.0;
        };
        if zoom <= first_z {
            return first_v;
        }
        for pair in self.stops.windows(2) {
            let (z0, v0) = pair[0];
            let (z1, v1) = pair[1];
            if zoom <= z1 {
                let t = interpolation_factor(self.base, zoom - z0, z1 - z0);
                return v0 + (v1 - v0) * t;
            }
        }
        self.stops.last().map_or(first_v, |&(_, v)| v)
    }
}

fn interpolation_factor(base: f32, progress: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return 0.0;
    }
    if (base - 1.0).abs() < f32::EPSILON {
        progress / range
    } else {
        (base.powf(progress) - 1.0) / (base.powf(range) - 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Constant(f32),
    Function(ZoomFunction),
}

impl NumberValue {
    pub fn evaluate(&self, zoom: f32) -> f32 {
        match self {
            NumberValue::Constant(v) => *v,
            NumberValue::Function(f) => f.evaluate(zoom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    Hex(String),
    Rgba([f32; 4]),
}

/// `#rgb`, `#rrggbb`, `#rrggbbaa` or an `[r, g, b, a]` array in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawColor")]
pub struct StyleColor(pub Color);

impl TryFrom<RawColor> for StyleColor {
    type Error = String;

    fn try_from(raw: RawColor) -> Result<Self, Self::Error> {
        match raw {
            RawColor::Rgba(rgba) => Ok(StyleColor(Color(rgba))),
            RawColor::Hex(s) => parse_hex_color(&s)
                .map(StyleColor)
                .ok_or_else(|| format!("invalid color {s:?}")),
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
    match hex.len() {
        3 => {
            let r = channel(0, 1)?;
            let g = channel(1, 1)?;
            let b = channel(2, 1)?;
            Some(Color::from_rgba8(r * 17, g * 17, b * 17, 255))
        }
        6 | 8 => {
            let a = if hex.len() == 8 { channel(6, 2)? } else { 255 };
            Some(Color::from_rgba8(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, a))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashFunction {
    pub stops: Vec<(f32, Vec<f32>)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DashArrayValue {
    Constant(Vec<f32>),
    Function(DashFunction),
}

impl DashArrayValue {
    /// Value of the last stop at or below `zoom`; the first stop below range.
    pub fn evaluate(&self, zoom: f32) -> Vec<f32> {
        match self {
            DashArrayValue::Constant(v) => v.clone(),
            DashArrayValue::Function(f) => f
                .stops
                .iter()
                .rev()
                .find(|(z, _)| *z <= zoom)
                .or_else(|| f.stops.first())
                .map(|(_, v)| v.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinePaint {
    #[serde(rename = "line-width", default = "default_width")]
    pub width: NumberValue,
    #[serde(rename = "line-offset", default = "zero")]
    pub offset: NumberValue,
    #[serde(rename = "line-blur", default = "zero")]
    pub blur: NumberValue,
    #[serde(rename = "line-opacity", default = "one")]
    pub opacity: NumberValue,
    #[serde(rename = "line-color", default = "default_color")]
    pub color: StyleColor,
    #[serde(rename = "line-translate", default)]
    pub translate: [f32; 2],
    #[serde(rename = "line-translate-anchor", default)]
    pub translate_anchor: TranslateAnchor,
    #[serde(rename = "line-dasharray", default)]
    pub dasharray: Option<DashArrayValue>,
}

fn default_width() -> NumberValue {
    NumberValue::Constant(1.0)
}

fn zero() -> NumberValue {
    NumberValue::Constant(0.0)
}

fn one() -> NumberValue {
    NumberValue::Constant(1.0)
}

fn default_color() -> StyleColor {
    StyleColor(Color::BLACK)
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            width: default_width(),
            offset: zero(),
            blur: zero(),
            opacity: one(),
            color: default_color(),
            translate: [0.0, 0.0],
            translate_anchor: TranslateAnchor::Map,
            dasharray: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineLayerStyle {
    pub id: String,
    #[serde(default)]
    pub minzoom: Option<f32>,
    #[serde(default)]
    pub maxzoom: Option<f32>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub paint: LinePaint,
}

/// Which zoom the dash keyframe being faded out was evaluated at, and how far
/// the fade has progressed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Crossfade {
    pub from_zoom: f32,
    pub from_scale: f32,
    pub t: f32,
}

/// Tracks integer zoom crossings to drive dash cross-fades.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomHistory {
    fade_duration_s: f64,
    last_zoom: Option<f32>,
    last_floor_zoom: f32,
    last_integer_zoom: f32,
    /// `None` until the first crossing; the fade counts as finished.
    last_integer_zoom_time: Option<Time>,
}

impl ZoomHistory {
    pub fn new(fade_duration_s: f64) -> Self {
        Self {
            fade_duration_s,
            last_zoom: None,
            last_floor_zoom: 0.0,
            last_integer_zoom: 0.0,
            last_integer_zoom_time: None,
        }
    }

    /// Records the frame's zoom. Returns `true` if it changed.
    pub fn update(&mut self, zoom: f32, now: Time) -> bool {
        let floor = zoom.floor();
        let Some(last_zoom) = self.last_zoom else {
            self.last_zoom = Some(zoom);
            self.last_floor_zoom = floor;
            self.last_integer_zoom = floor;
            return true;
        };

        if self.last_floor_zoom > floor {
            self.last_integer_zoom = floor + 1.0;
            self.last_integer_zoom_time = Some(now);
        } else if self.last_floor_zoom < floor {
            self.last_integer_zoom = floor;
            self.last_integer_zoom_time = Some(now);
        }

        if zoom != last_zoom {
            self.last_zoom = Some(zoom);
            self.last_floor_zoom = floor;
            return true;
        }
        false
    }

    fn progress(&self, now: Time) -> f32 {
        match self.last_integer_zoom_time {
            None => 1.0,
            Some(_) if self.fade_duration_s <= 0.0 => 1.0,
            Some(since) => (now.since(since) / self.fade_duration_s).min(1.0) as f32,
        }
    }

    pub fn crossfade(&self, zoom: f32, now: Time) -> Crossfade {
        let fraction = zoom - zoom.floor();
        let progress = self.progress(now);
        if zoom > self.last_integer_zoom {
            Crossfade {
                from_zoom: zoom.floor() - 1.0,
                from_scale: 2.0,
                t: fraction + (1.0 - fraction) * progress,
            }
        } else {
            Crossfade {
                from_zoom: zoom.floor() + 1.0,
                from_scale: 0.5,
                t: 1.0 - (1.0 - progress) * fraction,
            }
        }
    }
}

impl Default for ZoomHistory {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_DURATION_MS / 1000.0)
    }
}

impl LineLayerStyle {
    pub fn is_visible_at(&self, zoom: f32) -> bool {
        self.visibility == Visibility::Visible
            && self.minzoom.is_none_or(|min| zoom >= min)
            && self.maxzoom.is_none_or(|max| zoom < max)
    }

    /// Evaluates every paint property at `zoom`.
    pub fn resolve(&self, zoom: f32, history: &ZoomHistory, now: Time) -> ResolvedLineStyle {
        let paint = &self.paint;
        let dash_pattern = paint.dasharray.as_ref().map(|dashes| {
            let fade = history.crossfade(zoom, now);
            let to_zoom = zoom.floor();
            DashPattern {
                from_stops: dashes.evaluate(fade.from_zoom),
                to_stops: dashes.evaluate(to_zoom),
                from_scale: fade.from_scale,
                to_scale: 1.0,
                from_zoom: to_zoom,
                to_zoom,
                t: fade.t,
            }
        });

        ResolvedLineStyle {
            width: paint.width.evaluate(zoom).max(0.0),
            offset: paint.offset.evaluate(zoom),
            blur: paint.blur.evaluate(zoom).max(0.0),
            opacity: paint.opacity.evaluate(zoom).clamp(0.0, 1.0),
            color: paint.color.0,
            translate: Vec2::from(paint.translate),
            translate_anchor: paint.translate_anchor,
            dash_pattern,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transition {
    #[serde(default = "default_fade_ms")]
    pub duration: f64,
}

fn default_fade_ms() -> f64 {
    DEFAULT_FADE_DURATION_MS
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration: DEFAULT_FADE_DURATION_MS,
        }
    }
}

/// A style document holding line layers in draw order (bottom first).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineStyleDocument {
    #[serde(default)]
    pub transition: Transition,
    pub layers: Vec<LineLayerStyle>,
}

impl LineStyleDocument {
    pub fn from_json(payload: &str) -> Result<Self, StyleError> {
        let doc: LineStyleDocument = serde_json::from_str(payload).map_err(StyleError::Parse)?;
        let mut seen = std::collections::BTreeSet::new();
        for layer in &doc.layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(StyleError::DuplicateLayer(layer.id.clone()));
            }
        }
        Ok(doc)
    }

    pub fn zoom_history(&self) -> ZoomHistory {
        ZoomHistory::new(self.transition.duration / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DashArrayValue, LineLayerStyle, LineStyleDocument, NumberValue, StyleError, ZoomFunction,
        ZoomHistory, parse_hex_color,
    };
    use crate::symbology::TranslateAnchor;
    use foundation::Color;
    use foundation::math::Vec2;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    const ROADS: &str = r##"{
        "transition": { "duration": 500 },
        "layers": [
            {
                "id": "road",
                "minzoom": 5,
                "paint": {
                    "line-width": { "stops": [[10, 1], [14, 5]] },
                    "line-color": "#ff0000",
                    "line-opacity": 0.5,
                    "line-translate": [2, 0],
                    "line-translate-anchor": "viewport"
                }
            },
            {
                "id": "ferry",
                "visibility": "none",
                "paint": {
                    "line-dasharray": { "stops": [[8, [4, 2]], [12, [2, 1]]] },
                    "line-color": [0, 0, 1, 1]
                }
            }
        ]
    }"##;

    #[test]
    fn parses_document() {
        let doc = LineStyleDocument::from_json(ROADS).expect("parse");
        assert_eq!(doc.layers.len(), 2);
        assert_eq!(doc.transition.duration, 500.0);
        let road = &doc.layers[0];
        assert_eq!(road.paint.color.0, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(road.paint.translate_anchor, TranslateAnchor::Viewport);
        assert!(road.is_visible_at(6.0));
        assert!(!road.is_visible_at(4.0));
        assert!(!doc.layers[1].is_visible_at(10.0));
    }

    #[test]
    fn resolves_numeric_properties() {
        let doc = LineStyleDocument::from_json(ROADS).expect("parse");
        let road = &doc.layers[0];
        let resolved = road.resolve(12.0, &ZoomHistory::default(), Time(0.0));
        assert_eq!(resolved.width, 3.0);
        assert_eq!(resolved.opacity, 0.5);
        assert_eq!(resolved.offset, 0.0);
        assert_eq!(resolved.translate, Vec2::new(2.0, 0.0));
        assert_eq!(resolved.dash_pattern, None);
    }

    #[test]
    fn zoom_function_clamps_and_interpolates() {
        let f = ZoomFunction {
            base: 1.0,
            stops: vec![(10.0, 1.0), (14.0, 5.0)],
        };
        assert_eq!(f.evaluate(5.0), 1.0);
        assert_eq!(f.evaluate(11.0), 2.0);
        assert_eq!(f.evaluate(20.0), 5.0);

        let exp = ZoomFunction {
            base: 2.0,
            stops: vec![(0.0, 0.0), (2.0, 3.0)],
        };
        // (2^1 - 1) / (2^2 - 1) = 1/3
        assert!((exp.evaluate(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(NumberValue::Constant(4.0).evaluate(99.0), 4.0);
    }

    #[test]
    fn dasharray_is_piecewise_constant() {
        let dashes = DashArrayValue::Function(super::DashFunction {
            stops: vec![(8.0, vec![4.0, 2.0]), (12.0, vec![2.0, 1.0])],
        });
        assert_eq!(dashes.evaluate(3.0), vec![4.0, 2.0]);
        assert_eq!(dashes.evaluate(11.9), vec![4.0, 2.0]);
        assert_eq!(dashes.evaluate(12.0), vec![2.0, 1.0]);
    }

    #[test]
    fn settled_zoom_in_crossfade() {
        let doc = LineStyleDocument::from_json(ROADS).expect("parse");
        let ferry = &doc.layers[1];
        let mut history = doc.zoom_history();
        history.update(12.5, Time(0.0));

        let resolved = ferry.resolve(12.5, &history, Time(0.0));
        let pattern = resolved.dash_pattern.expect("dashes");
        // Never crossed an integer zoom, so the fade is complete.
        assert_eq!(pattern.from_stops, vec![4.0, 2.0]);
        assert_eq!(pattern.to_stops, vec![2.0, 1.0]);
        assert_eq!(pattern.from_scale, 2.0);
        assert_eq!(pattern.to_scale, 1.0);
        assert_eq!(pattern.from_zoom, 12.0);
        assert_eq!(pattern.t, 1.0);
    }

    #[test]
    fn crossfade_progresses_after_crossing() {
        let mut history = ZoomHistory::new(0.5);
        history.update(11.5, Time(0.0));
        history.update(12.5, Time(1.0));

        let start = history.crossfade(12.5, Time(1.0));
        assert_eq!(start.from_zoom, 11.0);
        assert_eq!(start.t, 0.5);
        let halfway = history.crossfade(12.5, Time(1.25));
        assert_eq!(halfway.t, 0.75);
        let done = history.crossfade(12.5, Time(5.0));
        assert_eq!(done.t, 1.0);
    }

    #[test]
    fn zooming_out_fades_from_above() {
        let mut history = ZoomHistory::new(0.5);
        history.update(12.5, Time(0.0));
        history.update(11.5, Time(1.0));

        let fade = history.crossfade(11.5, Time(1.0));
        assert_eq!(fade.from_zoom, 12.0);
        assert_eq!(fade.from_scale, 0.5);
        assert_eq!(fade.t, 0.5);
    }

    #[test]
    fn parses_hex_variants() {
        assert_eq!(parse_hex_color("#fff"), Some(Color::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(parse_hex_color("#00ff0000"), Some(Color::new(0.0, 1.0, 0.0, 0.0)));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn rejects_bad_documents() {
        let bad_color = r#"{"layers":[{"id":"a","paint":{"line-color":"blue"}}]}"#;
        assert!(matches!(
            LineStyleDocument::from_json(bad_color),
            Err(StyleError::Parse(_))
        ));

        let duplicate = r#"{"layers":[{"id":"a"},{"id":"a"}]}"#;
        assert!(matches!(
            LineStyleDocument::from_json(duplicate),
            Err(StyleError::DuplicateLayer(id)) if id == "a"
        ));
    }

    #[test]
    fn defaults_fill_missing_paint() {
        let layer: LineLayerStyle = serde_json::from_str(r#"{"id":"plain"}"#).expect("parse");
        let resolved = layer.resolve(3.0, &ZoomHistory::default(), Time(0.0));
        assert_eq!(resolved.width, 1.0);
        assert_eq!(resolved.opacity, 1.0);
        assert_eq!(resolved.color, Color::BLACK);
    }
}
