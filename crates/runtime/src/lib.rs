pub mod frame;
pub mod metrics;
pub mod transform;

pub use frame::*;
pub use metrics::*;
pub use transform::*;
