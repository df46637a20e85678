use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        follows::{Follow, FollowWithFollowee},
        users::UserSummary,
    },
};

use super::FollowStore;

/// Process-local store backed by concurrent maps.
///
/// Edges are keyed by `(follower, followee)`, so the map entry API gives the
/// uniqueness guarantee without extra locking.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    // Map of user_id -> projection
    users: Arc<DashMap<Uuid, UserSummary>>,
    // Map of (follower_id, followee_id) -> edge
    follows: Arc<DashMap<(Uuid, Uuid), Follow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = UserSummary>,
    {
        let store = Self::new();
        for user in users {
            store.insert_user(user);
        }
        store
    }

    /// Reads a JSON array of `{ id, name, photoUrl }` records.
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let users: Vec<UserSummary> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse seed file {}", path.display()))?;
        Ok(Self::with_users(users))
    }

    pub fn insert_user(&self, user: UserSummary) {
        self.users.insert(user.id, user);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl FollowStore for InMemoryStore {
    async fn find_user_summary(&self, user_id: Uuid) -> AppResult<Option<UserSummary>> {
        Ok(self.users.get(&user_id).map(|user| user.value().clone()))
    }

    async fn list_follows(&self, follower_id: Uuid) -> AppResult<Vec<FollowWithFollowee>> {
        let mut edges: Vec<Follow> = self
            .follows
            .iter()
            .filter(|entry| entry.key().0 == follower_id)
            .map(|entry| entry.value().clone())
            .collect();
        edges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        // Edges whose followee vanished are skipped, as the SQL join would.
        Ok(edges
            .into_iter()
            .filter_map(|edge| {
                self.users.get(&edge.followee).map(|user| FollowWithFollowee {
                    id: edge.id,
                    followee: user.value().clone(),
                })
            })
            .collect())
    }

    async fn find_follow(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> AppResult<Option<Follow>> {
        Ok(self
            .follows
            .get(&(follower_id, followee_id))
            .map(|edge| edge.value().clone()))
    }

    async fn insert_follow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<Follow> {
        // Both ends must be known users, matching the foreign keys on `follows`.
        if !self.users.contains_key(&follower_id) || !self.users.contains_key(&followee_id) {
            return Err(AppError::NotFound(anyhow!(
                "Follower {} or followee {} does not exist",
                follower_id,
                followee_id
            )));
        }

        match self.follows.entry((follower_id, followee_id)) {
            Entry::Occupied(_) => Err(AppError::Conflict(anyhow!(
                "User with id {} is already following user with id {}",
                follower_id,
                followee_id
            ))),
            Entry::Vacant(slot) => {
                let follow = Follow::new(follower_id, followee_id);
                slot.insert(follow.clone());
                Ok(follow)
            }
        }
    }

    async fn delete_follow(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> AppResult<Option<Follow>> {
        Ok(self
            .follows
            .remove(&(follower_id, followee_id))
            .map(|(_, edge)| edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn user(name: &str) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            photo_url: Some(format!("{}.png", name.to_lowercase())),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_edges() {
        let alice = user("Alice");
        let bob = user("Bob");
        let store = InMemoryStore::with_users([alice.clone(), bob.clone()]);

        store.insert_follow(alice.id, bob.id).await.unwrap();
        let err = store.insert_follow(alice.id, bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_follower_or_followee() {
        let bob = user("Bob");
        let store = InMemoryStore::with_users([bob.clone()]);
        let stranger = Uuid::new_v4();

        let err = store.insert_follow(stranger, bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = store.insert_follow(bob.id, stranger).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.find_follow(stranger, bob.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_inserts_create_one_edge() {
        let alice = user("Alice");
        let bob = user("Bob");
        let store = InMemoryStore::with_users([alice.clone(), bob.clone()]);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let (alice_id, bob_id) = (alice.id, bob.id);
                tokio::spawn(async move { store.insert_follow(alice_id, bob_id).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.list_follows(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_removed_edge_once() {
        let alice = user("Alice");
        let bob = user("Bob");
        let store = InMemoryStore::with_users([alice.clone(), bob.clone()]);
        let created = store.insert_follow(alice.id, bob.id).await.unwrap();

        let removed = store.delete_follow(alice.id, bob.id).await.unwrap();
        assert_eq!(removed, Some(created));
        assert_eq!(store.delete_follow(alice.id, bob.id).await.unwrap(), None);
    }

    #[test]
    fn loads_users_from_seed_file() {
        let bob = user("Bob");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"{}","name":"Bob","photoUrl":"bob.png"}}]"#,
            bob.id
        )
        .unwrap();

        let store = InMemoryStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.user_count(), 1);
        let loaded = store.users.get(&bob.id).unwrap().value().clone();
        assert_eq!(loaded, bob);
    }
}
