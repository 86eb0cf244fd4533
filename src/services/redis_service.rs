// src/services/redis_service.rs
use crate::errors::AdError;
use crate::models::{GeneratedAdRecord, ProductDescriptor};
use crate::services::repository::AdRepository;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::Connection};

const DEFAULT_NAMESPACE: &str = "adcraft";
const ADS_KEY: &str = "generatedAds";
const PRODUCT_KEY: &str = "uploadedProduct";

/// Keeps the ad history as a Redis list of JSON records and the product as a JSON string.
pub struct RedisRepository {
    client: Client,
    namespace: String,
}

impl RedisRepository {
    pub async fn new(redis_url: &str) -> Result<Self, AdError> {
        let client = Client::open(redis_url)?;

        // Test connection
        let mut conn = client.get_async_connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;

        Ok(Self {
            client,
            namespace: DEFAULT_NAMESPACE.to_string(),
        })
    }

    /// Prefix for both keys; `adcraft` unless overridden.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn ads_key(&self) -> String {
        format!("{}:{}", self.namespace, ADS_KEY)
    }

    fn product_key(&self) -> String {
        format!("{}:{}", self.namespace, PRODUCT_KEY)
    }

    async fn connection(&self) -> Result<Connection, AdError> {
        Ok(self.client.get_async_connection().await?)
    }
}

/// LREM needs the exact stored value, so look it up by the record id.
/// Entries that no longer parse are skipped rather than failing the delete.
fn find_stored(values: Vec<String>, id: &str) -> Option<String> {
    values.into_iter().find(|value| {
        serde_json::from_str::<GeneratedAdRecord>(value).is_ok_and(|record| record.id == id)
    })
}

#[async_trait]
impl AdRepository for RedisRepository {
    async fn append(&self, record: &GeneratedAdRecord) -> Result<(), AdError> {
        let value = serde_json::to_string(record)?;
        self.connection()
            .await?
            .rpush::<_, _, ()>(self.ads_key(), value)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GeneratedAdRecord>, AdError> {
        let values: Vec<String> = self
            .connection()
            .await?
            .lrange(self.ads_key(), 0, -1)
            .await?;
        values
            .iter()
            .map(|value| serde_json::from_str(value).map_err(AdError::from))
            .collect()
    }

    async fn remove(&self, id: &str) -> Result<bool, AdError> {
        let mut conn = self.connection().await?;
        let values: Vec<String> = conn.lrange(self.ads_key(), 0, -1).await?;

        match find_stored(values, id) {
            Some(value) => {
                let removed: i64 = conn.lrem(self.ads_key(), 1, value).await?;
                Ok(removed > 0)
            }
            None => Ok(false),
        }
    }

    async fn save_product(&self, product: &ProductDescriptor) -> Result<(), AdError> {
        let value = serde_json::to_string(product)?;
        self.connection()
            .await?
            .set::<_, _, ()>(self.product_key(), value)
            .await?;
        Ok(())
    }

    async fn product(&self) -> Result<Option<ProductDescriptor>, AdError> {
        let value: Option<String> = self.connection().await?.get(self.product_key()).await?;
        value
            .map(|v| serde_json::from_str(&v).map_err(AdError::from))
            .transpose()
    }
}
