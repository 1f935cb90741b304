// Loader implementations
pub mod loader_trait;
pub mod csv_loader;

pub use loader_trait::*;
pub use csv_loader::*;
