pub mod context;
pub mod recorder;
pub mod shaders;

pub use context::*;
pub use recorder::*;
pub use shaders::*;
