pub mod layer;
pub mod line;
pub mod painter;
pub mod style;
pub mod symbology;

pub use layer::*;
pub use painter::*;
pub use style::*;
pub use symbology::*;
