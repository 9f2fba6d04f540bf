use foundation::TileId;
use runtime::TransformState;

use crate::line::atlas::PatternPlacement;
use crate::symbology::DashPattern;

/// Tile units per pixel at the tile's own zoom: 4096-unit extents drawn
/// 512 pixels wide.
pub const TILE_UNITS_PER_PIXEL: f32 = 8.0;

/// Extrapolates a dash keyframe's scale from the zoom it was evaluated at to
/// `zoom`, keeping the on-screen repeat length constant.
pub fn keyframe_scale(scale: f32, keyframe_zoom: f32, zoom: f32) -> f32 {
    scale * (zoom - keyframe_zoom).exp2()
}

/// Anti-aliasing softness for an SDF dash sampled at `scale`.
///
/// Inversely proportional to the on-screen texel density of the pattern.
pub fn dash_gamma(scale: f32, pattern_width: f32, pixel_ratio: f32) -> f32 {
    512.0 / (scale * pattern_width * 256.0 * pixel_ratio)
}

/// Uniform values for one dashed draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DashParams {
    pub placement: PatternPlacement,
    pub tile_pixel_ratio: f32,
    pub scale_a: f32,
    pub scale_b: f32,
    pub gamma: f32,
    pub fade: f32,
}

impl DashParams {
    pub fn compute(
        pattern: &DashPattern,
        placement: PatternPlacement,
        tile: TileId,
        transform: &TransformState,
    ) -> Self {
        let tile_pixel_ratio = transform.scale / tile.world_tiles() / TILE_UNITS_PER_PIXEL;

        let scale_a = keyframe_scale(pattern.from_scale, pattern.from_zoom, transform.zoom);
        let scale_b = keyframe_scale(pattern.to_scale, pattern.to_zoom, transform.zoom);
        let gamma_a = dash_gamma(scale_a, placement.width, transform.pixel_ratio);
        let gamma_b = dash_gamma(scale_b, placement.width, transform.pixel_ratio);

        Self {
            placement,
            tile_pixel_ratio,
            scale_a,
            scale_b,
            gamma: (gamma_a + gamma_b) / 2.0,
            fade: pattern.t,
        }
    }

    pub fn pattern_scale_a(&self) -> [f32; 2] {
        [
            self.tile_pixel_ratio / self.placement.width / self.scale_a,
            self.placement.height,
        ]
    }

    pub fn pattern_scale_b(&self) -> [f32; 2] {
        [
            self.tile_pixel_ratio / self.placement.width / self.scale_b,
            self.placement.height,
        ]
    }

    /// Both keyframes read the row of `from_stops`; the atlas packs a single
    /// row per transition.
    pub fn tex_y_a(&self) -> f32 {
        self.placement.tex_y
    }

    pub fn tex_y_b(&self) -> f32 {
        self.placement.tex_y
    }
}
