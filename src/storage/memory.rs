use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SimError;
use crate::storage::KeyValueStore;

/// 메모리 기반 저장소 구현
#[derive(Default)]
pub struct InMemoryStore {
    entries: HashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            entries: HashMap::new(),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SimError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn put(&mut self, key: &str, value: Value) -> Result<(), SimError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<bool, SimError> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, SimError> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
