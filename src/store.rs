//! Key-value storage for sessions and voter sets.

use axum::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::{
    collections::{HashMap, HashSet},
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::{error::ReviewlyError, session::SessionData};

/// Storage behind sessions and the once-per-user vote policy.
#[async_trait]
pub(crate) trait KeyStore: Send + Sync {
    async fn set_session(
        &self,
        key: &str,
        data: SessionData,
        ttl_secs: usize,
    ) -> Result<(), ReviewlyError>;

    async fn get_session(&self, key: &str) -> Result<Option<SessionData>, ReviewlyError>;

    /// Removing a missing key is not an error.
    async fn del(&self, key: &str) -> Result<(), ReviewlyError>;

    /// Add `member` to the set at `key`, returning whether it was not already there.
    async fn add_member(&self, key: &str, member: i32) -> Result<bool, ReviewlyError>;
}

/// Redis-backed store.
pub(crate) struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub(crate) async fn connect(url: &str) -> Result<Self, ReviewlyError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(RedisStore { manager })
    }
}

#[async_trait]
impl KeyStore for RedisStore {
    async fn set_session(
        &self,
        key: &str,
        data: SessionData,
        ttl_secs: usize,
    ) -> Result<(), ReviewlyError> {
        let _: () = self.manager.clone().set_ex(key, data, ttl_secs).await?;
        Ok(())
    }

    async fn get_session(&self, key: &str) -> Result<Option<SessionData>, ReviewlyError> {
        Ok(self.manager.clone().get(key).await?)
    }

    async fn del(&self, key: &str) -> Result<(), ReviewlyError> {
        let _: () = self.manager.clone().del(key).await?;
        Ok(())
    }

    async fn add_member(&self, key: &str, member: i32) -> Result<bool, ReviewlyError> {
        let added: i32 = self.manager.clone().sadd(key, member).await?;
        Ok(added == 1)
    }
}

/// In-process store for development and tests. Entries honor their TTL but are lost on restart.
#[derive(Default)]
pub(crate) struct MemoryStore {
    sessions: Mutex<HashMap<String, (SessionData, Instant)>>,
    sets: Mutex<HashMap<String, HashSet<i32>>>,
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn set_session(
        &self,
        key: &str,
        data: SessionData,
        ttl_secs: usize,
    ) -> Result<(), ReviewlyError> {
        let expires = Instant::now() + Duration::from_secs(ttl_secs as u64);
        self.sessions
            .lock()
            .await
            .insert(key.to_owned(), (data, expires));
        Ok(())
    }

    async fn get_session(&self, key: &str) -> Result<Option<SessionData>, ReviewlyError> {
        let mut sessions = self.sessions.lock().await;
        if let Some((data, expires)) = sessions.get(key).copied() {
            if expires > Instant::now() {
                return Ok(Some(data));
            }
            sessions.remove(key);
        }
        Ok(None)
    }

    async fn del(&self, key: &str) -> Result<(), ReviewlyError> {
        self.sessions.lock().await.remove(key);
        self.sets.lock().await.remove(key);
        Ok(())
    }

    async fn add_member(&self, key: &str, member: i32) -> Result<bool, ReviewlyError> {
        Ok(self
            .sets
            .lock()
            .await
            .entry(key.to_owned())
            .or_default()
            .insert(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: SessionData = SessionData {
        user_id: 1,
        remember: false,
    };

    #[tokio::test]
    async fn memory_sessions_round_trip_and_delete() {
        let store = MemoryStore::default();
        store.set_session("session:a", DATA, 60).await.unwrap();
        assert_eq!(store.get_session("session:a").await.unwrap(), Some(DATA));

        store.del("session:a").await.unwrap();
        assert_eq!(store.get_session("session:a").await.unwrap(), None);
        // deleting twice is fine
        store.del("session:a").await.unwrap();
    }

    #[tokio::test]
    async fn memory_sessions_expire() {
        let store = MemoryStore::default();
        store.set_session("session:b", DATA, 0).await.unwrap();
        assert_eq!(store.get_session("session:b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_membership_is_reported_once() {
        let store = MemoryStore::default();
        assert!(store.add_member("votes:1", 5).await.unwrap());
        assert!(!store.add_member("votes:1", 5).await.unwrap());
        assert!(store.add_member("votes:1", 6).await.unwrap());
        assert!(store.add_member("votes:2", 5).await.unwrap());
    }
}
