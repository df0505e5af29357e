//! Redis-backed click registry.

use super::service::{ClickRegistry, RegistryError, RegistryResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

/// Click registry shared across processes through Redis.
///
/// Each source IP maps to a Redis set of tokens. `SADD` reports whether the
/// member was added, which makes it the atomic compare-and-insert the
/// pipeline needs without any client-side locking.
pub struct RedisClickRegistry {
    client: ConnectionManager,
    ttl_seconds: Option<u64>,
    key_prefix: String,
}

impl RedisClickRegistry {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - optional expiry refreshed on every new token for an IP;
    ///   `None` keeps entries until they are removed externally
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: Option<u64>) -> RegistryResult<Self> {
        info!("Connecting click registry to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            RegistryError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RegistryError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| RegistryError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Click registry connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            key_prefix: "clicks:ip:".to_string(),
        })
    }

    fn build_key(&self, ip: &str) -> String {
        format!("{}{}", self.key_prefix, ip)
    }
}

#[async_trait]
impl ClickRegistry for RedisClickRegistry {
    async fn check_and_record(&self, ip: &str, token: &str) -> RegistryResult<bool> {
        let key = self.build_key(ip);
        let mut conn = self.client.clone();

        let added: i64 = conn
            .sadd(&key, token)
            .await
            .map_err(|e| RegistryError::OperationError(format!("SADD failed: {}", e)))?;

        if added > 0
            && let Some(ttl) = self.ttl_seconds
        {
            // Expiry failure only affects eviction, never the dedup decision.
            if let Err(e) = conn.expire::<_, ()>(&key, ttl as i64).await {
                debug!("Redis EXPIRE failed for {}: {}", key, e);
            }
        }

        Ok(added > 0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
