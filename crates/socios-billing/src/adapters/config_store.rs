//! In-memory key/value config store.

use crate::error::Result;
use crate::ports::ConfigStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory config store.
///
/// Stands in for the club's external key/value configuration service.
#[derive(Default)]
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value at construction time.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values
            .get_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
