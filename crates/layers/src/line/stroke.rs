use crate::symbology::ResolvedLineStyle;

/// Largest stroke radius, in pixels. A point-join sprite for a maximal
/// stroke is 64 device pixels wide on a 2x display.
pub const MAX_STROKE_RADIUS: f32 = 16.0;

/// Anti-aliased stroke band around the line centerline.
///
/// Recomputed for every draw call; it depends on the live pixel ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeGeometry {
    pub antialiasing: f32,
    pub inset: f32,
    pub outset: f32,
    /// Style blur plus one antialiasing pixel.
    pub blur: f32,
    /// Opacity-premultiplied RGBA.
    pub color: [f32; 4],
}

impl StrokeGeometry {
    pub fn compute(style: &ResolvedLineStyle, pixel_ratio: f32) -> Self {
        let antialiasing = 1.0 / pixel_ratio;
        let half_width = style.width / 2.0;
        let half_aa = antialiasing / 2.0;

        let outset = (style.offset + half_width + half_aa).clamp(0.0, MAX_STROKE_RADIUS);
        // Strokes thinner than the antialiasing band would otherwise end up
        // with inset past outset.
        let inset = ((style.offset - half_width - half_aa).max(-1.0) + 1.0)
            .min(MAX_STROKE_RADIUS)
            .min(outset);

        Self {
            antialiasing,
            inset,
            outset,
            blur: style.blur + antialiasing,
            color: style.color.premultiplied(style.opacity),
        }
    }

    /// `(outset, inset)`, the order the line shaders expect.
    pub fn line_width(&self) -> [f32; 2] {
        [self.outset, self.inset]
    }
}
