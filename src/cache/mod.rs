use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Read-through cache for the hot read paths: the open-project listing, the
/// skill catalogue, and public user profiles. Mutating handlers invalidate
/// the keys they touch; nothing here is a correctness guarantee.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with optional TTL (in seconds)
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(serialized);

        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }

        cmd.query_async(&mut self.connection.clone()).await
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete multiple keys matching a pattern
    pub async fn delete_pattern(&self, pattern: &str) -> redis::RedisResult<()> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection.clone())
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL")
                .arg(&keys)
                .query_async(&mut self.connection.clone())
                .await?;
        }

        Ok(())
    }
}

/// Cache key generators
pub mod keys {
    /// The open-project listing.
    pub fn open_projects() -> String {
        "projects:open".to_string()
    }

    /// A single project detail page.
    pub fn project(id: &str) -> String {
        format!("project:{id}")
    }

    /// A public user profile (skills + rating aggregate).
    pub fn profile(user_id: &str) -> String {
        format!("profile:{user_id}")
    }

    /// The full skill catalogue.
    pub fn skills() -> String {
        "skills:all".to_string()
    }

    /// Every cached profile, for writes that touch an unknown set of users
    /// (a catalogue deletion cascades through everyone holding the skill).
    pub fn profile_pattern() -> String {
        "profile:*".to_string()
    }

    /// Every cached project detail, for the same catalogue-wide writes.
    pub fn project_pattern() -> String {
        "project:*".to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn patterns_cover_their_single_key_builders() {
            let id = "4f9b7c1a-1111-2222-3333-444455556666";
            assert!(profile(id).starts_with(profile_pattern().trim_end_matches('*')));
            assert!(project(id).starts_with(project_pattern().trim_end_matches('*')));
        }
    }
}

/// Cache configuration
pub struct CacheConfig {
    pub project_list_ttl: Duration,
    pub project_ttl: Duration,
    pub profile_ttl: Duration,
    pub skills_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            project_list_ttl: Duration::from_secs(120), // 2 minutes
            project_ttl: Duration::from_secs(300),      // 5 minutes
            profile_ttl: Duration::from_secs(600),      // 10 minutes
            skills_ttl: Duration::from_secs(1800),      // 30 minutes
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            project_list_ttl: parse_duration_secs("CACHE_TTL_PROJECTS", 120),
            project_ttl: parse_duration_secs("CACHE_TTL_PROJECT_DETAIL", 300),
            profile_ttl: parse_duration_secs("CACHE_TTL_PROFILES", 600),
            skills_ttl: parse_duration_secs("CACHE_TTL_SKILLS", 1800),
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}
