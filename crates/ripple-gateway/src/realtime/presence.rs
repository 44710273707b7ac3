//! User online/offline status.
//!
//! A user is online while they hold at least one live connection. Status
//! changes are persisted through [`StatusStore`] and pushed to the user's
//! followers as `user_status_update`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use tokio::sync::Mutex;

use ripple_core::error::Result;
use ripple_core::protocol::event::UserStatusUpdate;
use ripple_core::protocol::{Envelope, Event};

use crate::clock::unix_now;
use crate::realtime::{DeliveryReport, Hub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatus {
    pub is_online: bool,
    /// Unix seconds of the last status change.
    pub last_activity: i64,
}

/// Where online flags are persisted.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn set_online(&self, user: &str) -> Result<()>;
    async fn set_offline(&self, user: &str) -> Result<()>;
    async fn status(&self, user: &str) -> Result<Option<UserStatus>>;
}

/// Who should hear about a user's status changes.
#[async_trait]
pub trait FollowerDirectory: Send + Sync {
    async fn followers_of(&self, user: &str) -> Result<Vec<String>>;
}

#[derive(Default)]
pub struct MemoryStatusStore {
    map: DashMap<String, UserStatus>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, user: &str, is_online: bool) {
        self.map.insert(
            user.to_string(),
            UserStatus {
                is_online,
                last_activity: unix_now(),
            },
        );
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn set_online(&self, user: &str) -> Result<()> {
        self.put(user, true);
        Ok(())
    }

    async fn set_offline(&self, user: &str) -> Result<()> {
        self.put(user, false);
        Ok(())
    }

    async fn status(&self, user: &str) -> Result<Option<UserStatus>> {
        Ok(self.map.get(user).map(|s| *s.value()))
    }
}

/// following -> {followers}
#[derive(Default)]
pub struct MemoryFollowers {
    map: DashMap<String, DashSet<String>>,
}

impl MemoryFollowers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow(&self, follower: &str, following: &str) {
        self.map
            .entry(following.to_string())
            .or_insert_with(DashSet::new)
            .insert(follower.to_string());
    }

    pub fn unfollow(&self, follower: &str, following: &str) {
        if let Some(set) = self.map.get(following) {
            set.remove(follower);
            if set.is_empty() {
                drop(set);
                self.map.remove(following);
            }
        }
    }
}

#[async_trait]
impl FollowerDirectory for MemoryFollowers {
    async fn followers_of(&self, user: &str) -> Result<Vec<String>> {
        let mut out: Vec<String> = self
            .map
            .get(user)
            .map(|set| set.iter().map(|f| f.key().to_string()).collect())
            .unwrap_or_default();
        out.sort();
        Ok(out)
    }
}

/// Flips a user's online flag and tells their followers.
///
/// Transport hooks for one user run one at a time, so an offline write can
/// never land after a newer connection already marked the user online.
pub struct StatusService {
    store: Arc<dyn StatusStore>,
    followers: Arc<dyn FollowerDirectory>,
    hub: Arc<Hub>,
    transitions: DashMap<String, Arc<Mutex<()>>>,
}

impl StatusService {
    pub fn new(store: Arc<dyn StatusStore>, followers: Arc<dyn FollowerDirectory>, hub: Arc<Hub>) -> Self {
        Self {
            store,
            followers,
            hub,
            transitions: DashMap::new(),
        }
    }

    pub async fn set_online(&self, user: &str) -> Result<DeliveryReport> {
        self.store.set_online(user).await?;
        self.announce(user, true).await
    }

    pub async fn set_offline(&self, user: &str) -> Result<DeliveryReport> {
        self.store.set_offline(user).await?;
        let report = self.announce(user, false).await?;
        tracing::info!(user, "user is offline");
        Ok(report)
    }

    /// Stored online flag; unknown users are offline.
    pub async fn is_online(&self, user: &str) -> Result<bool> {
        Ok(self.store.status(user).await?.is_some_and(|s| s.is_online))
    }

    /// Called by the transport after a connection registered.
    pub async fn connected(&self, user: &str) {
        let gate = self.gate(user);
        let guard = gate.lock().await;
        if let Err(e) = self.set_online(user).await {
            tracing::warn!(user, error = %e, "failed to mark user online");
        }
        drop(guard);
        self.release(user, gate);
    }

    /// Called by the transport after a connection was torn down. Only the
    /// last connection of a user flips them offline.
    pub async fn disconnected(&self, user: &str) {
        let gate = self.gate(user);
        let guard = gate.lock().await;
        // checked under the gate: a newer connection may have registered meanwhile
        if !self.hub.has_live_connection(user) {
            if let Err(e) = self.set_offline(user).await {
                tracing::warn!(user, error = %e, "failed to mark user offline");
            }
        }
        drop(guard);
        self.release(user, gate);
    }

    fn gate(&self, user: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.transitions.entry(user.to_string()).or_insert_with(Default::default).value())
    }

    /// Forget the user's gate once nobody else holds or waits on it.
    fn release(&self, user: &str, gate: Arc<Mutex<()>>) {
        drop(gate);
        self.transitions.remove_if(user, |_, g| Arc::strong_count(g) == 1);
    }

    async fn announce(&self, user: &str, is_online: bool) -> Result<DeliveryReport> {
        let followers = self.followers.followers_of(user).await?;
        if followers.is_empty() {
            return Ok(DeliveryReport::default());
        }
        let ev = Event::UserStatusUpdate(UserStatusUpdate {
            user_id: user.to_string(),
            is_online,
            timestamp: unix_now(),
        });
        let env = Envelope::try_from(&ev)?;
        Ok(self.hub.deliver_to_users(&followers, &env))
    }
}
