use crate::domain::rate_limit::RateLimitStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::Script;

pub type RedisPool = Pool;

/// GET, then either start the window, reject at the limit, or INCR. Runs as one
/// server-side step so concurrent requests from one identity cannot interleave.
const HIT_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    redis.call('SET', KEYS[1], 1, 'EX', ARGV[2])
    return 1
end
if tonumber(current) >= tonumber(ARGV[1]) then
    return 0
end
redis.call('INCR', KEYS[1])
return 1
"#;

pub fn create_pool(redis_url: &str) -> Result<RedisPool> {
    Config::from_url(redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .context("Failed to create Redis pool")
}

/// Round-trip a PING so startup fails fast on a bad `REDIS_URL`.
pub async fn ping(pool: &RedisPool) -> Result<()> {
    let mut conn = pool.get().await.context("Failed to get Redis connection")?;
    let pong: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .context("Redis PING failed")?;
    if pong != "PONG" {
        anyhow::bail!("Unexpected PING reply: {}", pong);
    }
    Ok(())
}

#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: RedisPool,
    script: Script,
}

impl RedisRateLimitStore {
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            script: Script::new(HIT_SCRIPT),
        }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to get Redis connection")?;

        let admitted: i64 = self
            .script
            .key(key)
            .arg(max_requests)
            .arg(window_seconds.max(1))
            .invoke_async(&mut conn)
            .await
            .context("Rate limit script failed")?;

        Ok(admitted == 1)
    }
}
