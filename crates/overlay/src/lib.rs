pub mod metadata;
pub mod presentation;
pub mod resolver;
pub mod selection;

pub use metadata::*;
pub use presentation::*;
pub use resolver::*;
pub use selection::*;
