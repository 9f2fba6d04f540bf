#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;

    /// Whether the layer draws anything at `zoom`.
    fn is_visible_at(&self, zoom: f32) -> bool;
}
