/// Straight (non-premultiplied) RGBA color with channels in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        ])
    }

    /// Scales every channel, alpha included, by `opacity`.
    ///
    /// One-way: the result cannot be turned back into the source color once
    /// `opacity` is 0, and applying it twice only matches applying it once
    /// when `opacity` is 1.
    pub fn premultiplied(self, opacity: f32) -> [f32; 4] {
        let [r, g, b, a] = self.0;
        [r * opacity, g * opacity, b * opacity, a * opacity]
    }
}
