//! High-level client for the squares board.

use crate::session::{Role, Session};
use squares_core::DEFAULT_MAX_SELECTIONS;
use squares_store::{MemoryStore, RemoteStore};
use std::sync::Arc;

/// Configuration shared by every session a client opens.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Per-participant cap used while the store has no valid setting.
    pub default_max_selections: u32,
    /// Capacity of each session's event channel.
    pub event_capacity: usize,
    /// Seed for axis generation. `None` draws from entropy.
    pub axis_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_max_selections: DEFAULT_MAX_SELECTIONS,
            event_capacity: 100,
            axis_seed: None,
        }
    }
}

/// Builder for client configuration.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn default_max_selections(mut self, max: u32) -> Self {
        self.config.default_max_selections = max;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn axis_seed(mut self, seed: u64) -> Self {
        self.config.axis_seed = Some(seed);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point: one shared store, any number of sessions.
///
/// # Example
///
/// ```rust
/// use squares_sdk::{Client, ClientConfig};
///
/// # tokio_test::block_on(async {
/// let client = Client::in_memory(ClientConfig::default());
/// let mut alice = client.participant_session();
/// alice.enter("alice", "#86efac", "#0f172a").unwrap();
///
/// alice.toggle_claim("2-3".parse().unwrap()).await.unwrap();
/// alice.commit_pending().await.unwrap();
/// # });
/// ```
pub struct Client<S: RemoteStore> {
    config: ClientConfig,
    store: Arc<S>,
}

impl Client<MemoryStore> {
    /// Create a client over a fresh in-memory store.
    pub fn in_memory(config: ClientConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}

impl<S: RemoteStore> Client<S> {
    pub fn new(store: Arc<S>, config: ClientConfig) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open a session with the given role.
    pub fn open_session(&self, role: Role) -> Session<S> {
        Session::new(Arc::clone(&self.store), role, &self.config)
    }

    pub fn participant_session(&self) -> Session<S> {
        self.open_session(Role::Participant)
    }

    pub fn admin_session(&self) -> Session<S> {
        self.open_session(Role::Admin)
    }
}

/// Convenience functions for quickly setting up players.
pub mod quick {
    use super::*;
    use crate::error::Result;
    use rand::thread_rng;
    use squares_core::{random_color, DEFAULT_TEXT_COLOR};

    /// Open one participant session per name, each already entered with a
    /// random fill color.
    pub fn create_players<S: RemoteStore>(client: &Client<S>, names: &[&str]) -> Result<Vec<Session<S>>> {
        let mut rng = thread_rng();
        names
            .iter()
            .map(|name| {
                let mut session = client.participant_session();
                session.enter(name, &random_color(&mut rng), DEFAULT_TEXT_COLOR)?;
                Ok(session)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfigBuilder::new()
            .default_max_selections(5)
            .event_capacity(8)
            .axis_seed(42)
            .build();

        assert_eq!(config.default_max_selections, 5);
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.axis_seed, Some(42));
    }

    #[test]
    fn test_sessions_share_store() {
        let client = Client::in_memory(ClientConfig::default());
        let a = client.participant_session();
        let b = client.admin_session();

        assert!(Arc::ptr_eq(a.store(), b.store()));
        assert_ne!(a.id(), b.id());
        assert!(b.is_admin());
    }

    #[test]
    fn test_quick_players() {
        let client = Client::in_memory(ClientConfig::default());
        let players = quick::create_players(&client, &["alice", "bob"]).unwrap();

        assert_eq!(players.len(), 2);
        assert_eq!(players[0].participant().map(|p| p.name.as_str()), Some("Alice"));
        assert_eq!(players[1].participant().map(|p| p.name.as_str()), Some("Bob"));
    }
}
