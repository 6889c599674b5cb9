pub mod circuit;
pub mod protection;
pub mod rotation;

pub use circuit::*;
pub use protection::*;
pub use rotation::*;
