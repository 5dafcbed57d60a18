pub mod adapter;
pub mod layer;
pub mod rename;

pub use adapter::*;
pub use layer::*;
pub use rename::*;
