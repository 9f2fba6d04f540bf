/// Column-major 4x4 matrix, laid out the way GPU uniforms expect it.
///
/// Element `(row, col)` lives at index `col * 4 + row`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    /// Scale along x/y/z, applied before `self` (i.e. `self * S`).
    pub fn scale(&self, x: f32, y: f32, z: f32) -> Self {
        let mut out = self.0;
        for row in 0..4 {
            out[row] *= x;
            out[4 + row] *= y;
            out[8 + row] *= z;
        }
        Self(out)
    }

    /// Translation applied before `self` (i.e. `self * T`).
    pub fn translate(&self, x: f32, y: f32, z: f32) -> Self {
        let a = &self.0;
        let mut out = *a;
        for row in 0..4 {
            out[12 + row] = a[row] * x + a[4 + row] * y + a[8 + row] * z + a[12 + row];
        }
        Self(out)
    }

    /// Transforms the point `(x, y, z, 1)`.
    pub fn transform_point(&self, x: f32, y: f32, z: f32) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = self.get(row, 0) * x
                + self.get(row, 1) * y
                + self.get(row, 2) * z
                + self.get(row, 3);
        }
        out
    }
}
