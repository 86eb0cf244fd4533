// src/services/repository.rs
use crate::errors::AdError;
use crate::models::{GeneratedAdRecord, ProductDescriptor};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage capability for the uploaded product and the ad history.
///
/// Single-user key-value semantics: last write wins, no cross-key transactions.
#[async_trait]
pub trait AdRepository: Send + Sync {
    async fn append(&self, record: &GeneratedAdRecord) -> Result<(), AdError>;

    /// Records in insertion order.
    async fn list(&self) -> Result<Vec<GeneratedAdRecord>, AdError>;

    /// Returns `false` when no record has that id.
    async fn remove(&self, id: &str) -> Result<bool, AdError>;

    /// Replaces the current product wholesale.
    async fn save_product(&self, product: &ProductDescriptor) -> Result<(), AdError>;

    async fn product(&self) -> Result<Option<ProductDescriptor>, AdError>;
}

#[derive(Default)]
pub struct MemoryRepository {
    ads: RwLock<Vec<GeneratedAdRecord>>,
    product: RwLock<Option<ProductDescriptor>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdRepository for MemoryRepository {
    async fn append(&self, record: &GeneratedAdRecord) -> Result<(), AdError> {
        self.ads.write().await.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GeneratedAdRecord>, AdError> {
        Ok(self.ads.read().await.clone())
    }

    async fn remove(&self, id: &str) -> Result<bool, AdError> {
        let mut ads = self.ads.write().await;
        let before = ads.len();
        ads.retain(|ad| ad.id != id);
        Ok(ads.len() != before)
    }

    async fn save_product(&self, product: &ProductDescriptor) -> Result<(), AdError> {
        *self.product.write().await = Some(product.clone());
        Ok(())
    }

    async fn product(&self) -> Result<Option<ProductDescriptor>, AdError> {
        Ok(self.product.read().await.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{ImageReference, Provider};
    use chrono::Utc;

    pub(crate) fn product(name: &str) -> ProductDescriptor {
        ProductDescriptor {
            name: name.to_string(),
            size: 2048,
            content_type: "image/jpeg".to_string(),
            url: "data:image/jpeg;base64,AAAA".to_string(),
            uploaded_at: Utc::now(),
        }
    }

    pub(crate) fn record(id: &str) -> GeneratedAdRecord {
        GeneratedAdRecord {
            id: id.to_string(),
            image_url: ImageReference::png_base64("AAAA"),
            prompt: "a mug".to_string(),
            style: "modern".to_string(),
            mood: "calm".to_string(),
            created_at: Utc::now(),
            originating_product: product("mug.jpg"),
            provider: Provider::Stability,
        }
    }

    #[tokio::test]
    async fn test_append_list_remove() {
        let repo = MemoryRepository::new();
        repo.append(&record("a")).await.unwrap();
        repo.append(&record("b")).await.unwrap();
        repo.append(&record("c")).await.unwrap();

        assert!(repo.remove("b").await.unwrap());
        assert!(!repo.remove("b").await.unwrap());

        let ids: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_product_is_overwritten() {
        let repo = MemoryRepository::new();
        assert!(repo.product().await.unwrap().is_none());

        repo.save_product(&product("first.png")).await.unwrap();
        repo.save_product(&product("second.png")).await.unwrap();

        assert_eq!(repo.product().await.unwrap().unwrap().name, "second.png");
    }
}
