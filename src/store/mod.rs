mod file;
mod memory;
mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;
use crate::models::chat::Message;

pub const TOKEN_KEY: &str = "token";
pub const MESSAGES_KEY: &str = "messages";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("redis store error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
    #[error("unsupported store type: {0}")]
    Unsupported(String),
}

/// Flat string key-value persistence, one value per key.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    async fn load_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.get_item(TOKEN_KEY).await?.filter(|t| !t.is_empty()))
    }

    async fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.set_item(TOKEN_KEY, token).await
    }

    async fn load_messages(&self) -> Result<Vec<Message>, StoreError> {
        match self.get_item(MESSAGES_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn save_messages(&self, messages: &[Message]) -> Result<(), StoreError> {
        let json = serde_json::to_string(messages)?;
        self.set_item(MESSAGES_KEY, &json).await
    }
}

pub async fn create_store(args: &Args) -> Result<Arc<dyn LocalStore>, StoreError> {
    match args.store_type.to_lowercase().as_str() {
        "file" => {
            info!("Local store: files under {}", args.store_path);
            Ok(Arc::new(FileStore::new(&args.store_path).await?))
        }
        "redis" => {
            info!("Local store: redis at {} (prefix {})", args.store_redis_url, args.store_redis_prefix);
            Ok(Arc::new(RedisStore::new(&args.store_redis_url, &args.store_redis_prefix)?))
        }
        "memory" => {
            info!("Local store: in-memory, nothing survives a restart");
            Ok(Arc::new(MemoryStore::default()))
        }
        other => Err(StoreError::Unsupported(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn typed_helpers_handle_missing_values() {
        let store = MemoryStore::default();
        assert_eq!(store.load_token().await.unwrap(), None);
        assert!(store.load_messages().await.unwrap().is_empty());

        store.set_item(TOKEN_KEY, "").await.unwrap();
        store.set_item(MESSAGES_KEY, "").await.unwrap();
        assert_eq!(store.load_token().await.unwrap(), None);
        assert!(store.load_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_are_stored_as_a_json_array() {
        let store = MemoryStore::default();
        let msg = Message::new("hello", Some(1));
        store.save_messages(&[msg.clone()]).await.unwrap();

        let raw = store.get_item(MESSAGES_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert_eq!(store.load_messages().await.unwrap(), vec![msg]);
    }

    #[tokio::test]
    async fn corrupt_messages_surface_as_json_error() {
        let store = MemoryStore::default();
        store.set_item(MESSAGES_KEY, "{not json").await.unwrap();
        assert!(matches!(store.load_messages().await, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn unknown_store_type_is_rejected() {
        let args = Args::try_parse_from(["pucci-chat", "--store-type", "sqlite"]).unwrap();
        assert!(matches!(create_store(&args).await, Err(StoreError::Unsupported(t)) if t == "sqlite"));
    }
}
