use std::sync::Arc;

use tracing::{error, warn};

use crate::database::manager::DatabaseError;
use crate::database::ports::{BabyRepository, ForumRepository, JournalRepository};
use crate::error::ApiError;

/// Rows guarded by ownership checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Baby,
    Post,
    Reply,
    JournalEntry,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Entity::Baby => "Baby",
            Entity::Post => "Post",
            Entity::Reply => "Reply",
            Entity::JournalEntry => "Journal entry",
        }
    }
}

/// Row-level ownership checks. Every check hits the store; nothing is cached.
pub struct OwnershipGuard {
    babies: Arc<dyn BabyRepository>,
    forum: Arc<dyn ForumRepository>,
    journal: Arc<dyn JournalRepository>,
}

impl OwnershipGuard {
    pub fn new(
        babies: Arc<dyn BabyRepository>,
        forum: Arc<dyn ForumRepository>,
        journal: Arc<dyn JournalRepository>,
    ) -> Self {
        Self { babies, forum, journal }
    }

    /// `false` when the store errors
    pub async fn belongs_to_user(&self, entity: Entity, id: i32, user_id: i32) -> bool {
        let result = match entity {
            Entity::Baby => self.babies.belongs_to_user(id, user_id).await,
            Entity::Post => self.forum.post_belongs_to_user(id, user_id).await,
            Entity::Reply => self.forum.reply_belongs_to_user(id, user_id).await,
            Entity::JournalEntry => self.journal.belongs_to_user(id, user_id).await,
        };
        match result {
            Ok(owned) => owned,
            Err(e) => {
                error!("Ownership check for {} {} failed: {}", entity.name(), id, e);
                false
            }
        }
    }

    pub async fn baby_belongs_to_user(&self, baby_id: i32, user_id: i32) -> bool {
        self.belongs_to_user(Entity::Baby, baby_id, user_id).await
    }

    pub async fn post_belongs_to_user(&self, post_id: i32, user_id: i32) -> bool {
        self.belongs_to_user(Entity::Post, post_id, user_id).await
    }

    pub async fn reply_belongs_to_user(&self, reply_id: i32, user_id: i32) -> bool {
        self.belongs_to_user(Entity::Reply, reply_id, user_id).await
    }

    pub async fn journal_entry_belongs_to_user(&self, entry_id: i32, user_id: i32) -> bool {
        self.belongs_to_user(Entity::JournalEntry, entry_id, user_id).await
    }

    /// 403 unless the user owns the row; 404 when the row does not exist at all
    pub async fn authorize(&self, entity: Entity, id: i32, user_id: i32) -> Result<(), ApiError> {
        if self.belongs_to_user(entity, id, user_id).await {
            return Ok(());
        }

        match self.exists(entity, id).await {
            Ok(false) => Err(ApiError::not_found(format!("{} not found", entity.name()))),
            Ok(true) => {
                warn!("User {} denied access to {} {}", user_id, entity.name(), id);
                Err(ApiError::forbidden(format!(
                    "You do not have access to this {}",
                    entity.name().to_lowercase()
                )))
            }
            Err(e) => {
                error!("Existence check for {} {} failed: {}", entity.name(), id, e);
                Err(ApiError::forbidden(format!(
                    "You do not have access to this {}",
                    entity.name().to_lowercase()
                )))
            }
        }
    }

    pub async fn authorize_baby(&self, baby_id: i32, user_id: i32) -> Result<(), ApiError> {
        self.authorize(Entity::Baby, baby_id, user_id).await
    }

    pub async fn authorize_post(&self, post_id: i32, user_id: i32) -> Result<(), ApiError> {
        self.authorize(Entity::Post, post_id, user_id).await
    }

    pub async fn authorize_reply(&self, reply_id: i32, user_id: i32) -> Result<(), ApiError> {
        self.authorize(Entity::Reply, reply_id, user_id).await
    }

    pub async fn authorize_journal_entry(&self, entry_id: i32, user_id: i32) -> Result<(), ApiError> {
        self.authorize(Entity::JournalEntry, entry_id, user_id).await
    }

    async fn exists(&self, entity: Entity, id: i32) -> Result<bool, DatabaseError> {
        match entity {
            Entity::Baby => self.babies.exists(id).await,
            Entity::Post => self.forum.post_exists(id).await,
            Entity::Reply => self.forum.reply_exists(id).await,
            Entity::JournalEntry => self.journal.exists(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn guard(store: &Arc<MemoryStore>) -> OwnershipGuard {
        OwnershipGuard::new(store.clone(), store.clone(), store.clone())
    }

    #[tokio::test]
    async fn owner_passes_and_stranger_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let owner = store.seed_user("owner@example.com", "parent");
        let stranger = store.seed_user("stranger@example.com", "parent");
        let baby = store.seed_baby(owner.user_id, "Ada");

        let guard = guard(&store);
        assert!(guard.baby_belongs_to_user(baby.baby_id, owner.user_id).await);
        assert!(!guard.baby_belongs_to_user(baby.baby_id, stranger.user_id).await);
        assert!(guard.authorize_baby(baby.baby_id, owner.user_id).await.is_ok());
        assert!(matches!(
            guard.authorize_baby(baby.baby_id, stranger.user_id).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let owner = store.seed_user("owner@example.com", "parent");
        assert_eq!(
            guard(&store).authorize_baby(999, owner.user_id).await,
            Err(ApiError::not_found("Baby not found"))
        );
    }

    #[tokio::test]
    async fn store_error_fails_closed() {
        let store = Arc::new(MemoryStore::new());
        let owner = store.seed_user("owner@example.com", "parent");
        let baby = store.seed_baby(owner.user_id, "Ada");
        store.fail_queries(true);

        let guard = guard(&store);
        assert!(!guard.baby_belongs_to_user(baby.baby_id, owner.user_id).await);
        assert!(!guard.post_belongs_to_user(1, owner.user_id).await);
        assert!(!guard.reply_belongs_to_user(1, owner.user_id).await);
        assert!(!guard.journal_entry_belongs_to_user(1, owner.user_id).await);
        assert!(matches!(
            guard.authorize_baby(baby.baby_id, owner.user_id).await,
            Err(ApiError::Forbidden(_))
        ));
    }
}
