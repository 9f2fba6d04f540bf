use foundation::Color;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Frame of reference for `line-translate`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslateAnchor {
    /// Offset rotates with the map.
    #[default]
    Map,
    /// Offset stays fixed relative to the screen.
    Viewport,
}

/// Two zoom keyframes of a dash array, cross-faded by `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    /// Dash array of the keyframe being faded out. Also the atlas key.
    pub from_stops: Vec<f32>,
    pub to_stops: Vec<f32>,
    pub from_scale: f32,
    pub to_scale: f32,
    pub from_zoom: f32,
    pub to_zoom: f32,
    /// Fade fraction in `[0, 1]`.
    pub t: f32,
}

impl DashPattern {
    /// A pattern with no transition in flight.
    pub fn settled(stops: Vec<f32>, zoom: f32) -> Self {
        Self {
            from_stops: stops.clone(),
            to_stops: stops,
            from_scale: 1.0,
            to_scale: 1.0,
            from_zoom: zoom,
            to_zoom: zoom,
            t: 1.0,
        }
    }
}

/// Line paint properties evaluated for the current zoom.
///
/// Produced once per frame by the style resolver; read-only to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLineStyle {
    pub width: f32,
    pub offset: f32,
    pub blur: f32,
    pub opacity: f32,
    pub color: Color,
    pub translate: Vec2,
    pub translate_anchor: TranslateAnchor,
    pub dash_pattern: Option<DashPattern>,
}

impl ResolvedLineStyle {
    pub fn has_dashes(&self) -> bool {
        self.dash_pattern
            .as_ref()
            .is_some_and(|p| !p.from_stops.is_empty())
    }
}

impl Default for ResolvedLineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            offset: 0.0,
            blur: 0.0,
            opacity: 1.0,
            color: Color::BLACK,
            translate: Vec2::ZERO,
            translate_anchor: TranslateAnchor::Map,
            dash_pattern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DashPattern, ResolvedLineStyle};

    #[test]
    fn dashes_require_from_stops() {
        let mut style = ResolvedLineStyle::default();
        assert!(!style.has_dashes());

        style.dash_pattern = Some(DashPattern::settled(Vec::new(), 10.0));
        assert!(!style.has_dashes());

        style.dash_pattern = Some(DashPattern::settled(vec![2.0, 1.0], 10.0));
        assert!(style.has_dashes());
    }
}
