//! Runtime store configuration.

use crate::errors::StoreError;

/// Configuration for chunk storage and retrieval.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Expected embedding dimensionality. `None` locks to the first
    /// inserted vector's size.
    pub embedding_dim: Option<usize>,
    /// Maximum number of concurrent embedding calls during batch add.
    pub embed_concurrency: usize,
}

impl StoreConfig {
    /// Creates a sane default config (dimension inferred, concurrency 4).
    pub fn new_default() -> Self {
        Self {
            embedding_dim: None,
            embed_concurrency: 4,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.embed_concurrency == 0 {
            return Err(StoreError::Config("embed_concurrency must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new_default()
    }
}
