#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Counter-clockwise rotation by `angle_rad`.
    pub fn rotate(self, angle_rad: f32) -> Self {
        let (sin_a, cos_a) = angle_rad.sin_cos();
        Self::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

#[cfg(test)]
mod tests {
    use super::Vec2;

    #[test]
    fn from_pair() {
        assert_eq!(Vec2::from([1.0, -2.0]), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotate(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_detection() {
        assert!(Vec2::ZERO.is_zero());
        assert!(!Vec2::new(0.0, -1.0).is_zero());
        assert_eq!(Vec2::new(2.0, 3.0).scale(0.5), Vec2::new(1.0, 1.5));
    }
}
