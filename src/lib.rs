pub mod engine;
pub mod loader;
pub mod cli;
pub mod utils;

pub use engine::*;
pub use loader::*;
pub use cli::*;
pub use utils::*;
