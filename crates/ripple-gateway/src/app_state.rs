//! Shared application state (the composition root).
//!
//! Owns the one `Hub` of the process and hands it, by reference, to the
//! transport, the presence service, and every event producer.

use std::sync::Arc;

use crate::auth::{IdentityResolver, StaticTickets};
use crate::config::GatewayConfig;
use crate::realtime::{FollowerDirectory, Hub, MemoryFollowers, MemoryStatusStore, StatusService, StatusStore};
use crate::services::Notifier;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    hub: Arc<Hub>,
    identity: Arc<dyn IdentityResolver>,
    status: Arc<StatusService>,
    notifier: Notifier,
}

impl AppState {
    /// Build state with the in-process status store, follower directory, and
    /// the ticket table from `auth.tickets`.
    pub fn new(cfg: GatewayConfig) -> Self {
        let identity = Arc::new(StaticTickets::new(cfg.auth.tickets.clone()));
        Self::with_parts(
            cfg,
            identity,
            Arc::new(MemoryStatusStore::new()),
            Arc::new(MemoryFollowers::new()),
        )
    }

    pub fn with_parts(
        cfg: GatewayConfig,
        identity: Arc<dyn IdentityResolver>,
        store: Arc<dyn StatusStore>,
        followers: Arc<dyn FollowerDirectory>,
    ) -> Self {
        let hub = Arc::new(Hub::new());
        let status = Arc::new(StatusService::new(store, followers, Arc::clone(&hub)));
        let notifier = Notifier::new(Arc::clone(&hub));

        tracing::debug!(
            tickets = cfg.auth.tickets.len(),
            queue = cfg.gateway.outbound_queue,
            "app state ready"
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                hub,
                identity,
                status,
                notifier,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn hub(&self) -> Arc<Hub> {
        Arc::clone(&self.inner.hub)
    }

    pub fn identity(&self) -> &dyn IdentityResolver {
        self.inner.identity.as_ref()
    }

    pub fn status(&self) -> Arc<StatusService> {
        Arc::clone(&self.inner.status)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}
