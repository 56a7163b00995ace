//! In-process round store.
//!
//! Rounds live behind their own async mutex so a slow judge call on one
//! round never blocks another. The map lock is only held for the lookup.
//! With a TTL configured, rounds idle longer than the TTL read as missing
//! and are removed by [`RoundStore::prune_expired`].

use autoguess_common::GameError;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::round::Round;

/// Opaque round identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundId(Uuid);

impl RoundId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RoundId {
    type Err = GameError;

    /// Anything that is not a UUID cannot name a round.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| GameError::RoundNotFound(s.to_string()))
    }
}

struct StoredRound {
    round: Round,
    last_touched: Instant,
}

impl StoredRound {
    fn is_expired(&self, ttl: Option<Duration>, now: Instant) -> bool {
        ttl.is_some_and(|ttl| now.duration_since(self.last_touched) >= ttl)
    }
}

/// Exclusive access to one round. Guesses on the same round queue behind it.
pub struct RoundLease {
    guard: OwnedMutexGuard<StoredRound>,
}

impl Deref for RoundLease {
    type Target = Round;

    fn deref(&self) -> &Round {
        &self.guard.round
    }
}

impl DerefMut for RoundLease {
    fn deref_mut(&mut self) -> &mut Round {
        &mut self.guard.round
    }
}

pub struct RoundStore {
    rounds: RwLock<HashMap<RoundId, Arc<Mutex<StoredRound>>>>,
    ttl: Option<Duration>,
}

impl RoundStore {
    /// Store that never expires rounds.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            rounds: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Insert a round under a fresh identifier.
    pub async fn create(&self, round: Round) -> RoundId {
        let entry = Arc::new(Mutex::new(StoredRound {
            round,
            last_touched: Instant::now(),
        }));

        let mut rounds = self.rounds.write().await;
        let mut id = RoundId::generate();
        while rounds.contains_key(&id) {
            id = RoundId::generate();
        }
        rounds.insert(id, entry);
        id
    }

    /// Lock a round for read-modify-write.
    ///
    /// Waits for any in-flight guess on the same round to finish first.
    pub async fn checkout(&self, id: &str) -> Result<RoundLease, GameError> {
        let key: RoundId = id.parse()?;

        let entry = {
            let rounds = self.rounds.read().await;
            rounds.get(&key).cloned()
        }
        .ok_or_else(|| GameError::RoundNotFound(id.to_string()))?;

        let mut guard = entry.lock_owned().await;
        let now = Instant::now();
        if guard.is_expired(self.ttl, now) {
            debug!("Round {} expired", key);
            return Err(GameError::RoundNotFound(id.to_string()));
        }
        guard.last_touched = now;

        Ok(RoundLease { guard })
    }

    /// Snapshot of a round, for inspection.
    pub async fn get(&self, id: &str) -> Result<Round, GameError> {
        let lease = self.checkout(id).await?;
        Ok(Round::clone(&lease))
    }

    /// Entries in the map, including expired rounds the sweeper has not
    /// removed yet.
    pub async fn len(&self) -> usize {
        self.rounds.read().await.len()
    }

    /// Rounds that can still be played. Rounds checked out right now count
    /// as live.
    pub async fn active_len(&self) -> usize {
        let now = Instant::now();
        let rounds = self.rounds.read().await;
        rounds
            .values()
            .filter(|entry| match entry.try_lock() {
                Ok(stored) => !stored.is_expired(self.ttl, now),
                Err(_) => true,
            })
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.rounds.read().await.is_empty()
    }

    /// Drop rounds idle past the TTL. Rounds currently checked out are busy,
    /// hence not idle, and are kept. Returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }

        let ttl = self.ttl;
        let now = Instant::now();
        let mut rounds = self.rounds.write().await;
        let before = rounds.len();
        rounds.retain(|_, entry| match entry.try_lock() {
            Ok(stored) => !stored.is_expired(ttl, now),
            Err(_) => true,
        });
        before - rounds.len()
    }

    /// Periodically prune expired rounds. No-op task when no TTL is set.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> Option<JoinHandle<()>> {
        let ttl = self.ttl?;
        info!(
            "Round expiry enabled: ttl {}s, sweep every {}s",
            ttl.as_secs(),
            interval.as_secs()
        );

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.prune_expired().await;
                if removed > 0 {
                    info!("Pruned {} expired rounds", removed);
                }
            }
        }))
    }
}

impl Default for RoundStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> Round {
        Round::new("cat", vec!["cats".to_string()], 3)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = RoundStore::new();
        let id = store.create(round()).await;

        let fetched = store.get(&id.to_string()).await.unwrap();
        assert_eq!(fetched.prefix(), "cat");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_identifiers_are_distinct() {
        let store = RoundStore::new();
        let a = store.create(round()).await;
        let b = store.create(round()).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_identifier() {
        let store = RoundStore::new();
        store.create(round()).await;

        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            store.get(&missing).await,
            Err(GameError::RoundNotFound(_))
        ));
        assert!(matches!(
            store.checkout("not-a-uuid").await,
            Err(GameError::RoundNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lease_mutations_persist() {
        let store = RoundStore::new();
        let id = store.create(round()).await.to_string();

        {
            let mut lease = store.checkout(&id).await.unwrap();
            lease.apply_verdict(crate::judge::Verdict::no_match());
        }

        assert_eq!(store.get(&id).await.unwrap().strikes(), 1);
    }

    #[tokio::test]
    async fn test_checkout_serializes_same_round() {
        let store = Arc::new(RoundStore::new());
        let id = store.create(round()).await.to_string();

        let lease = store.checkout(&id).await.unwrap();
        let waiter = {
            let store = Arc::clone(&store);
            let id = id.clone();
            tokio::spawn(async move { store.checkout(&id).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(lease);
        waiter.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_checkout_does_not_block_other_rounds() {
        let store = RoundStore::new();
        let a = store.create(round()).await.to_string();
        let b = store.create(round()).await.to_string();

        let _held = store.checkout(&a).await.unwrap();
        let other = tokio::time::timeout(Duration::from_millis(100), store.checkout(&b)).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_expired_round_is_not_found() {
        let store = RoundStore::with_ttl(Some(Duration::from_millis(50)));
        let id = store.create(round()).await.to_string();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(matches!(
            store.checkout(&id).await,
            Err(GameError::RoundNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let store = RoundStore::with_ttl(Some(Duration::from_millis(50)));
        store.create(round()).await;
        store.create(round()).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        let fresh = store.create(round()).await.to_string();

        assert_eq!(store.prune_expired().await, 2);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&fresh).await.is_ok());
    }

    #[tokio::test]
    async fn test_active_len_skips_expired() {
        let store = RoundStore::with_ttl(Some(Duration::from_millis(50)));
        store.create(round()).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        store.create(round()).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.active_len().await, 1);
    }

    #[tokio::test]
    async fn test_no_ttl_never_prunes() {
        let store = RoundStore::new();
        store.create(round()).await;
        assert_eq!(store.prune_expired().await, 0);
        assert!(Arc::new(store).spawn_sweeper(Duration::from_secs(1)).is_none());
    }
}
