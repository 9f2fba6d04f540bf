use std::fmt;

use foundation::TileId;
use runtime::TransformState;
use tracing::debug;

use crate::line::atlas::LinePatternAtlas;
use crate::line::dash::DashParams;
use crate::symbology::ResolvedLineStyle;

/// Placement of an image pattern inside the sprite atlas.
///
/// Reserved: image-filled lines need a sprite position lookup that the
/// renderer does not have yet.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImagePatternParams {
    pub size: [f32; 2],
    pub top_left: [f32; 2],
    pub bottom_right: [f32; 2],
    pub fade: f32,
}

/// How one (tile, layer) line draw is rendered. Exactly one per draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawStrategy {
    Plain,
    Dashed(DashParams),
    Patterned(ImagePatternParams),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyKind {
    Plain,
    Dashed,
    Patterned,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Plain => "plain",
            StrategyKind::Dashed => "dashed",
            StrategyKind::Patterned => "patterned",
        }
    }
}

impl DrawStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            DrawStrategy::Plain => StrategyKind::Plain,
            DrawStrategy::Dashed(_) => StrategyKind::Dashed,
            DrawStrategy::Patterned(_) => StrategyKind::Patterned,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineDrawError {
    /// The atlas has no row for a dash array a visible layer uses.
    MissingPattern { dasharray: Vec<f32> },
    /// Image-patterned lines are recognized but cannot be drawn yet.
    ImagePatternUnsupported,
}

impl fmt::Display for LineDrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineDrawError::MissingPattern { dasharray } => {
                write!(f, "dash pattern {dasharray:?} is not in the line atlas")
            }
            LineDrawError::ImagePatternUnsupported => {
                write!(f, "image-patterned lines are not supported yet")
            }
        }
    }
}

impl std::error::Error for LineDrawError {}

/// Sprite lookup for `line-pattern`. Not wired up, so never matches.
fn image_pattern(_style: &ResolvedLineStyle) -> Option<ImagePatternParams> {
    None
}

/// Chooses the draw strategy, in priority order dashed, patterned, plain.
///
/// Dashed is chosen iff the style carries non-empty `from_stops`, whatever
/// else it sets. Touches no GPU state.
pub fn select_strategy(
    style: &ResolvedLineStyle,
    atlas: &dyn LinePatternAtlas,
    tile: TileId,
    transform: &TransformState,
) -> Result<DrawStrategy, LineDrawError> {
    let strategy = match &style.dash_pattern {
        Some(pattern) if !pattern.from_stops.is_empty() => {
            let placement = atlas.lookup(&pattern.from_stops).ok_or_else(|| {
                LineDrawError::MissingPattern {
                    dasharray: pattern.from_stops.clone(),
                }
            })?;
            DrawStrategy::Dashed(DashParams::compute(pattern, placement, tile, transform))
        }
        _ => match image_pattern(style) {
            Some(params) => DrawStrategy::Patterned(params),
            None => DrawStrategy::Plain,
        },
    };
    debug!(tile = %tile, strategy = strategy.kind().name(), "line strategy selected");
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::{DrawStrategy, LineDrawError, StrategyKind, select_strategy};
    use crate::line::atlas::{PatternPlacement, StaticPatternAtlas};
    use crate::symbology::{DashPattern, ResolvedLineStyle};
    use foundation::{Color, TileId};
    use gpu::TextureHandle;
    use runtime::TransformState;

    fn atlas() -> StaticPatternAtlas {
        let mut atlas = StaticPatternAtlas::new(TextureHandle(1));
        atlas.insert(
            &[3.0, 1.0],
            PatternPlacement {
                tex_y: 0.5,
                width: 4.0,
                height: 0.25,
            },
        );
        atlas
    }

    fn select(style: &ResolvedLineStyle) -> Result<DrawStrategy, LineDrawError> {
        select_strategy(
            style,
            &atlas(),
            TileId::new(5, 1, 1),
            &TransformState::new(5.0, 1.0, 256, 256),
        )
    }

    #[test]
    fn plain_without_dashes() {
        let strategy = select(&ResolvedLineStyle::default()).expect("strategy");
        assert_eq!(strategy, DrawStrategy::Plain);
    }

    #[test]
    fn dashed_iff_from_stops_non_empty() {
        let mut style = ResolvedLineStyle {
            width: 12.0,
            blur: 3.0,
            opacity: 0.2,
            color: Color::new(0.1, 0.2, 0.3, 0.4),
            ..ResolvedLineStyle::default()
        };
        style.dash_pattern = Some(DashPattern::settled(vec![3.0, 1.0], 5.0));
        assert_eq!(select(&style).expect("strategy").kind(), StrategyKind::Dashed);

        let mut empty_from = DashPattern::settled(vec![3.0, 1.0], 5.0);
        empty_from.from_stops.clear();
        style.dash_pattern = Some(empty_from);
        assert_eq!(select(&style).expect("strategy").kind(), StrategyKind::Plain);
    }

    #[test]
    fn missing_pattern_is_reported() {
        let style = ResolvedLineStyle {
            dash_pattern: Some(DashPattern::settled(vec![9.0, 9.0], 5.0)),
            ..ResolvedLineStyle::default()
        };
        assert_eq!(
            select(&style),
            Err(LineDrawError::MissingPattern {
                dasharray: vec![9.0, 9.0]
            })
        );
    }

    #[test]
    fn patterned_is_never_selected_today() {
        for dashes in [None, Some(vec![3.0, 1.0])] {
            let style = ResolvedLineStyle {
                dash_pattern: dashes.map(|d| DashPattern::settled(d, 5.0)),
                ..ResolvedLineStyle::default()
            };
            assert_ne!(select(&style).expect("strategy").kind(), StrategyKind::Patterned);
        }
    }
}
