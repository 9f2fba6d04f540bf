use std::collections::BTreeMap;

use foundation::math::{StableF32, stable_key};
use gpu::{GraphicsContext, TextureHandle};
use serde::{Deserialize, Serialize};

/// Texture unit the line atlas is bound to while dashed lines draw.
pub const LINE_ATLAS_TEXTURE_UNIT: u32 = 0;

/// Where a dash pattern's signed-distance row lives in the line atlas.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPlacement {
    /// Normalized Y of the pattern row.
    pub tex_y: f32,
    /// Pattern repeat length.
    pub width: f32,
    /// Normalized row height.
    pub height: f32,
}

/// Read-only view of the dash pattern atlas for one frame.
///
/// Packing happens ahead of the frame; every dash array a visible layer
/// uses is expected to be present.
pub trait LinePatternAtlas {
    fn lookup(&self, dasharray: &[f32]) -> Option<PatternPlacement>;

    fn bind(&self, ctx: &mut dyn GraphicsContext);
}

/// Atlas whose placements were packed up front.
#[derive(Debug, Clone)]
pub struct StaticPatternAtlas {
    texture: TextureHandle,
    placements: BTreeMap<Vec<StableF32>, PatternPlacement>,
}

impl StaticPatternAtlas {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            placements: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, dasharray: &[f32], placement: PatternPlacement) {
        self.placements.insert(stable_key(dasharray), placement);
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

impl LinePatternAtlas for StaticPatternAtlas {
    fn lookup(&self, dasharray: &[f32]) -> Option<PatternPlacement> {
        self.placements.get(&stable_key(dasharray)).copied()
    }

    fn bind(&self, ctx: &mut dyn GraphicsContext) {
        ctx.bind_texture(LINE_ATLAS_TEXTURE_UNIT, self.texture);
    }
}

#[cfg(test)]
mod tests {
    use super::{LINE_ATLAS_TEXTURE_UNIT, LinePatternAtlas, PatternPlacement, StaticPatternAtlas};
    use gpu::{DeviceCaps, GpuCommand, RecordingContext, TextureHandle};

    #[test]
    fn looks_up_by_dasharray() {
        let mut atlas = StaticPatternAtlas::new(TextureHandle(9));
        let placement = PatternPlacement {
            tex_y: 0.5,
            width: 6.0,
            height: 0.125,
        };
        atlas.insert(&[4.0, 2.0], placement);

        assert_eq!(atlas.lookup(&[4.0, 2.0]), Some(placement));
        assert_eq!(atlas.lookup(&[2.0, 4.0]), None);
        assert_eq!(atlas.len(), 1);
    }

    #[test]
    fn bind_uses_atlas_unit() {
        let atlas = StaticPatternAtlas::new(TextureHandle(9));
        let mut ctx = RecordingContext::new(DeviceCaps::default());
        atlas.bind(&mut ctx);
        assert_eq!(
            ctx.commands(),
            &[GpuCommand::BindTexture {
                unit: LINE_ATLAS_TEXTURE_UNIT,
                texture: TextureHandle(9)
            }]
        );
    }
}
