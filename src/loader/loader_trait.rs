use async_trait::async_trait;
use std::path::Path;

use crate::utils::error::LoaderError;
use crate::utils::types::Table;

/// Trait for turning a file on disk into an in-memory table.
///
/// The engine never touches storage itself; it consumes the ordered
/// row sequence a loader produces.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Load the file at `path` into a table.
    async fn load(&self, path: &Path) -> Result<Table, LoaderError>;
}
