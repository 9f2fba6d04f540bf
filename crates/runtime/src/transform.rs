/// Read-only view of the map transform for the frame being drawn.
///
/// Projection math lives with the camera; the renderer only needs these
/// derived scalars.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    pub zoom: f32,
    /// Device pixels per CSS pixel. Always > 0.
    pub pixel_ratio: f32,
    pub framebuffer_width: u32,
    pub framebuffer_height: u32,
    /// World scale, `2^zoom`.
    pub scale: f32,
    /// Map bearing in radians.
    pub angle: f32,
}

impl TransformState {
    pub fn new(
        zoom: f32,
        pixel_ratio: f32,
        framebuffer_width: u32,
        framebuffer_height: u32,
    ) -> Self {
        Self {
            zoom,
            pixel_ratio,
            framebuffer_width,
            framebuffer_height,
            scale: zoom.exp2(),
            angle: 0.0,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Half the framebuffer size, used to convert clip space to point-sprite
    /// pixel coordinates.
    pub fn half_framebuffer(&self) -> [f32; 2] {
        [
            self.framebuffer_width as f32 * 0.5,
            self.framebuffer_height as f32 * 0.5,
        ]
    }
}
