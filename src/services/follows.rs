//! Follow-edge operations.
//!
//! Every operation resolves the target user first and fails with
//! `NotFound` when it does not exist. After that the POST/DELETE style
//! operations are strict about the edge's current state, while
//! [`upsert_follow`] is idempotent in both directions.

use anyhow::anyhow;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        follows::{FollowAction, FollowWithFollowee, UpsertOutcome},
        users::UserSummary,
    },
    store::FollowStore,
};

async fn find_user(store: &dyn FollowStore, user_id: Uuid) -> AppResult<UserSummary> {
    store
        .find_user_summary(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("No user with the id of {}", user_id)))
}

/// Outgoing edges of `user_id`, each with the followee's projection.
pub async fn list_follows(
    store: &dyn FollowStore,
    user_id: Uuid,
) -> AppResult<Vec<FollowWithFollowee>> {
    find_user(store, user_id).await?;
    store.list_follows(user_id).await
}

/// Makes `follower_id` follow `followee_id` and returns the followee.
///
/// A second call for the same pair fails with `Conflict`, whether the
/// duplicate is seen here or by the store's own uniqueness check.
pub async fn create_follow(
    store: &dyn FollowStore,
    follower_id: Uuid,
    followee_id: Uuid,
) -> AppResult<UserSummary> {
    let followee = find_user(store, followee_id).await?;

    if store.find_follow(follower_id, followee_id).await?.is_some() {
        return Err(AppError::Conflict(anyhow!(
            "User with id {} is already following user with id {}",
            follower_id,
            followee_id
        )));
    }

    let follow = store.insert_follow(follower_id, followee_id).await?;
    tracing::info!(follow_id = %follow.id, %follower_id, %followee_id, "follow created");

    Ok(followee)
}

/// Removes the edge and returns the former followee. Fails with `NotFound`
/// if there was no edge.
pub async fn delete_follow(
    store: &dyn FollowStore,
    follower_id: Uuid,
    followee_id: Uuid,
) -> AppResult<UserSummary> {
    let followee = find_user(store, followee_id).await?;

    let removed = store
        .delete_follow(follower_id, followee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Follow does not exist")))?;
    tracing::info!(follow_id = %removed.id, %follower_id, %followee_id, "follow deleted");

    Ok(followee)
}

pub async fn upsert_follow(
    store: &dyn FollowStore,
    follower_id: Uuid,
    followee_id: Uuid,
    action: FollowAction,
) -> AppResult<UpsertOutcome> {
    find_user(store, followee_id).await?;

    match action {
        FollowAction::Unfollow => {
            let removed = store.delete_follow(follower_id, followee_id).await?;
            if let Some(follow) = &removed {
                tracing::info!(follow_id = %follow.id, %follower_id, %followee_id, "follow deleted");
            }
            Ok(UpsertOutcome::Removed(removed))
        }
        FollowAction::Follow => {
            if let Some(existing) = store.find_follow(follower_id, followee_id).await? {
                return Ok(UpsertOutcome::Existing(existing));
            }

            match store.insert_follow(follower_id, followee_id).await {
                Ok(follow) => {
                    tracing::info!(follow_id = %follow.id, %follower_id, %followee_id, "follow created");
                    Ok(UpsertOutcome::Created(follow))
                }
                // Lost a race with a concurrent follow; hand back the winner.
                Err(AppError::Conflict(e)) => store
                    .find_follow(follower_id, followee_id)
                    .await?
                    .map(UpsertOutcome::Existing)
                    .ok_or(AppError::Conflict(e)),
                Err(e) => Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        alice: UserSummary,
        bob: UserSummary,
        carol: UserSummary,
    }

    fn user(name: &str, photo: Option<&str>) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            photo_url: photo.map(str::to_string),
        }
    }

    fn fixture() -> Fixture {
        let alice = user("Alice", None);
        let bob = user("Bob", Some("bob.png"));
        let carol = user("Carol", Some("carol.png"));
        let store = InMemoryStore::with_users([alice.clone(), bob.clone(), carol.clone()]);
        Fixture {
            store,
            alice,
            bob,
            carol,
        }
    }

    #[tokio::test]
    async fn list_requires_existing_user() {
        let f = fixture();
        let err = list_follows(&f.store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_only_returns_callers_edges() {
        let f = fixture();
        create_follow(&f.store, f.alice.id, f.bob.id).await.unwrap();
        create_follow(&f.store, f.carol.id, f.alice.id).await.unwrap();
        create_follow(&f.store, f.carol.id, f.bob.id).await.unwrap();

        let follows = list_follows(&f.store, f.alice.id).await.unwrap();
        assert_eq!(follows.len(), 1);
        assert_eq!(follows[0].followee, f.bob);

        let follows = list_follows(&f.store, f.carol.id).await.unwrap();
        let mut names: Vec<_> = follows.iter().map(|e| e.followee.name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn create_returns_followee_and_rejects_duplicates() {
        let f = fixture();
        let followee = create_follow(&f.store, f.alice.id, f.bob.id).await.unwrap();
        assert_eq!(followee.name, "Bob");
        assert_eq!(followee.photo_url.as_deref(), Some("bob.png"));

        let err = create_follow(&f.store, f.alice.id, f.bob.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_target_is_not_found_everywhere() {
        let f = fixture();
        let ghost = Uuid::new_v4();

        assert!(matches!(
            create_follow(&f.store, f.alice.id, ghost).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete_follow(&f.store, f.alice.id, ghost).await,
            Err(AppError::NotFound(_))
        ));
        for action in [FollowAction::Follow, FollowAction::Unfollow] {
            assert!(matches!(
                upsert_follow(&f.store, f.alice.id, ghost, action).await,
                Err(AppError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn delete_then_list_excludes_followee() {
        let f = fixture();
        create_follow(&f.store, f.alice.id, f.bob.id).await.unwrap();
        assert_eq!(list_follows(&f.store, f.alice.id).await.unwrap().len(), 1);

        let removed = delete_follow(&f.store, f.alice.id, f.bob.id).await.unwrap();
        assert_eq!(removed, f.bob);
        assert!(list_follows(&f.store, f.alice.id).await.unwrap().is_empty());

        let err = delete_follow(&f.store, f.alice.id, f.bob.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e.to_string() == "Follow does not exist"));
    }

    #[tokio::test]
    async fn upsert_follow_is_idempotent() {
        let f = fixture();
        let first = upsert_follow(&f.store, f.alice.id, f.bob.id, FollowAction::Follow)
            .await
            .unwrap();
        let created = match first {
            UpsertOutcome::Created(follow) => follow,
            other => panic!("expected a new edge, got {:?}", other),
        };
        assert_eq!(created.follower, f.alice.id);
        assert_eq!(created.followee, f.bob.id);

        let second = upsert_follow(&f.store, f.alice.id, f.bob.id, FollowAction::Follow)
            .await
            .unwrap();
        assert_eq!(second, UpsertOutcome::Existing(created));
        assert_eq!(list_follows(&f.store, f.alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_unfollow_tolerates_missing_edge() {
        let f = fixture();
        let outcome = upsert_follow(&f.store, f.alice.id, f.bob.id, FollowAction::Unfollow)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Removed(None));

        let created = f.store.insert_follow(f.alice.id, f.bob.id).await.unwrap();
        let outcome = upsert_follow(&f.store, f.alice.id, f.bob.id, FollowAction::Unfollow)
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Removed(Some(created)));
        assert!(list_follows(&f.store, f.alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_follow_is_allowed() {
        let f = fixture();
        let followee = create_follow(&f.store, f.alice.id, f.alice.id)
            .await
            .unwrap();
        assert_eq!(followee, f.alice);
    }
}
