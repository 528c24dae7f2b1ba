//! 키-값 저장소 ("로컬 스토리지")
//!
//! 사용자별 JSON 블롭을 키 단위로 저장한다.

pub mod file_store;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::SimError;

pub use file_store::FileStore;
pub use memory::InMemoryStore;

/// 저장소 인터페이스
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 키로 JSON 값 조회
    async fn get(&self, key: &str) -> Result<Option<Value>, SimError>;

    /// 키에 JSON 값 저장 (덮어쓰기)
    async fn put(&mut self, key: &str, value: Value) -> Result<(), SimError>;

    /// 키 삭제. 존재했으면 true
    async fn remove(&mut self, key: &str) -> Result<bool, SimError>;

    /// 저장된 전체 키 (정렬)
    async fn keys(&self) -> Result<Vec<String>, SimError>;
}

/// 서비스 간 공유되는 저장소 핸들
pub type SharedStore = Arc<RwLock<dyn KeyValueStore>>;

/// 설정에 따라 저장소 생성
pub fn open(config: &StorageConfig) -> Result<SharedStore, SimError> {
    let store: SharedStore = match config.backend {
        StorageBackend::Memory => Arc::new(RwLock::new(InMemoryStore::new())),
        StorageBackend::File => Arc::new(RwLock::new(FileStore::open(&config.data_dir)?)),
    };
    Ok(store)
}

/// 타입 지정 조회
pub async fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, SimError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// 타입 지정 저장
pub async fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), SimError> {
    let json = serde_json::to_value(value)?;
    store.put(key, json).await
}

/// 저장소 키
pub mod keys {
    use super::Uuid;

    pub const USERS: &str = "users";

    pub fn portfolio(user_id: &Uuid) -> String {
        format!("portfolio:{}", user_id)
    }

    pub fn watchlist(user_id: &Uuid) -> String {
        format!("watchlist:{}", user_id)
    }

    pub fn alerts(user_id: &Uuid) -> String {
        format!("alerts:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Blob {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let mut store = InMemoryStore::new();
        let blob = Blob { name: "AAPL".to_string(), count: 3 };

        save(&mut store, "blob", &blob).await.unwrap();
        let loaded: Option<Blob> = load(&store, "blob").await.unwrap();
        assert_eq!(loaded, Some(blob));

        let missing: Option<Blob> = load(&store, "missing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_remove_and_keys() {
        let mut store = InMemoryStore::new();
        store.put("users", serde_json::json!([])).await.unwrap();
        store.put("alerts:1", serde_json::json!([])).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["alerts:1".to_string(), "users".to_string()]);
        assert!(store.remove("users").await.unwrap());
        assert!(!store.remove("users").await.unwrap());
        assert_eq!(store.keys().await.unwrap(), vec!["alerts:1".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_blob_is_serialization_error() {
        let mut store = InMemoryStore::new();
        store.put("blob", serde_json::json!({"name": 1})).await.unwrap();

        let result: Result<Option<Blob>, SimError> = load(&store, "blob").await;
        assert!(matches!(result, Err(SimError::SerializationError(_))));
    }
}
