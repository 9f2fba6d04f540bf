use foundation::time::Time;

/// Compositing pass of the multi-pass renderer.
///
/// Every frame runs all passes in [`RenderPass::ORDER`]. Layers that need
/// blending (anti-aliased lines among them) only draw in the translucent pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPass {
    Opaque,
    Translucent,
}

impl RenderPass {
    pub const ORDER: [RenderPass; 2] = [RenderPass::Opaque, RenderPass::Translucent];

    pub fn name(self) -> &'static str {
        match self {
            RenderPass::Opaque => "opaque",
            RenderPass::Translucent => "translucent",
        }
    }
}

/// Depth-ordering slot assigned to one style layer for the frame.
///
/// Draws of the layer use the depth range `[depth_near, 1.0]`, so layers
/// higher in the stack get a smaller near value and win the depth test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stratum {
    pub index: u32,
    pub depth_near: f32,
}

impl Stratum {
    /// Stratum for the layer at `index` (0 = bottom) out of `layer_count`.
    pub fn for_layer(index: u32, layer_count: u32) -> Self {
        let epsilon = 1.0 / (layer_count as f32 + 1.0);
        Self {
            index,
            depth_near: 1.0 - (index as f32 + 1.0) * epsilon,
        }
    }

    pub fn depth_range(&self) -> (f32, f32) {
        (self.depth_near, 1.0)
    }
}

/// Deterministic frame metadata.
///
/// Frame time drives cross-fades (dash pattern transitions) and must be
/// recorded alongside the frame so replays produce identical draw streams.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, time: Time) -> Self {
        Self { index, time }
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderPass, Stratum};

    #[test]
    fn opaque_runs_before_translucent() {
        assert_eq!(
            RenderPass::ORDER,
            [RenderPass::Opaque, RenderPass::Translucent]
        );
        assert!(RenderPass::Opaque < RenderPass::Translucent);
    }

    #[test]
    fn higher_strata_sit_nearer() {
        let bottom = Stratum::for_layer(0, 3);
        let top = Stratum::for_layer(2, 3);
        assert_eq!(bottom.depth_range(), (0.75, 1.0));
        assert_eq!(top.depth_range(), (0.25, 1.0));
        assert!(top.depth_near < bottom.depth_near);
    }

    #[test]
    fn pass_names() {
        let names: Vec<_> = RenderPass::ORDER.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["opaque", "translucent"]);
    }
}
