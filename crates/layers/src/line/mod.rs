//! Line layer rendering: stroke geometry, dash interpolation, strategy
//! selection and the per-tile draw orchestration.

pub mod atlas;
pub mod bucket;
pub mod dash;
pub mod joins;
pub mod renderer;
pub mod strategy;
pub mod stroke;

pub use atlas::*;
pub use bucket::*;
pub use dash::*;
pub use joins::*;
pub use renderer::*;
pub use strategy::*;
pub use stroke::*;
