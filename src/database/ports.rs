//! Repository ports used by handlers and services.
//!
//! Handlers only see these traits. The PostgreSQL adapters live in
//! `database::postgres`; tests plug in the in-memory store from `testing`.
//! Every method maps adapter failures into [`DatabaseError`].

use async_trait::async_trait;
use chrono::NaiveDate;

use super::manager::DatabaseError;
use super::models::*;

#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Correlates a token's `email` claim with a `users` row
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<i32>, DatabaseError>;
    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DatabaseError>;
    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError>;
    async fn update_user(&self, user_id: i32, input: UserUpdate) -> Result<Option<User>, DatabaseError>;
    /// Deletes the user together with owned babies, posts, replies, journal entries and exports
    async fn delete_user(&self, user_id: i32) -> Result<bool, DatabaseError>;
    async fn list_doctors(&self) -> Result<Vec<User>, DatabaseError>;
    async fn get_profile_image(&self, user_id: i32) -> Result<Option<ProfileImage>, DatabaseError>;
    async fn upsert_profile_image(&self, user_id: i32, image_url: String) -> Result<ProfileImage, DatabaseError>;
}

#[async_trait]
pub trait BabyRepository: Send + Sync {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Baby>, DatabaseError>;
    async fn get(&self, baby_id: i32) -> Result<Option<Baby>, DatabaseError>;
    async fn exists(&self, baby_id: i32) -> Result<bool, DatabaseError>;
    /// `user_baby` join lookup
    async fn belongs_to_user(&self, baby_id: i32, user_id: i32) -> Result<bool, DatabaseError>;
    /// Inserts the baby and its `user_baby` link atomically
    async fn create_for_user(&self, user_id: i32, input: BabyInput) -> Result<Baby, DatabaseError>;
    async fn update(&self, baby_id: i32, input: BabyInput) -> Result<Option<Baby>, DatabaseError>;
    /// Deletes the baby, its care logs, shared documents and join rows atomically
    async fn delete(&self, baby_id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait FeedingRepository: Send + Sync {
    /// Newest first
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<FeedingSchedule>, DatabaseError>;
    async fn create(&self, baby_id: i32, input: FeedingInput) -> Result<FeedingSchedule, DatabaseError>;
    async fn update(&self, baby_id: i32, id: i32, input: FeedingInput) -> Result<Option<FeedingSchedule>, DatabaseError>;
    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait GrowthRepository: Send + Sync {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Growth>, DatabaseError>;
    async fn create(&self, baby_id: i32, input: GrowthInput) -> Result<Growth, DatabaseError>;
    async fn update(&self, baby_id: i32, id: i32, input: GrowthInput) -> Result<Option<Growth>, DatabaseError>;
    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait MilestoneRepository: Send + Sync {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Milestone>, DatabaseError>;
    async fn create(&self, baby_id: i32, input: MilestoneInput) -> Result<Milestone, DatabaseError>;
    async fn update(&self, baby_id: i32, id: i32, input: MilestoneInput) -> Result<Option<Milestone>, DatabaseError>;
    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait StoolRepository: Send + Sync {
    /// Ordered by `timestamp DESC`; the range applies to the timestamp's date
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<StoolEntry>, DatabaseError>;
    async fn create(&self, baby_id: i32, input: StoolInput) -> Result<StoolEntry, DatabaseError>;
    async fn update(&self, baby_id: i32, id: i32, input: StoolInput) -> Result<Option<StoolEntry>, DatabaseError>;
    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ReminderRepository: Send + Sync {
    async fn list(&self, baby_id: i32) -> Result<Vec<Reminder>, DatabaseError>;
    async fn create(&self, baby_id: i32, input: ReminderInput) -> Result<Reminder, DatabaseError>;
    async fn update(&self, baby_id: i32, id: i32, input: ReminderInput) -> Result<Option<Reminder>, DatabaseError>;
    /// Returns the ids that actually existed for this baby and were removed, ascending
    async fn delete_many(&self, baby_id: i32, ids: Vec<i32>) -> Result<Vec<i32>, DatabaseError>;
    /// Reminders of every baby linked to the user, dated within `[from, to]`
    async fn upcoming(&self, user_id: i32, from: NaiveDate, to: NaiveDate) -> Result<Vec<Reminder>, DatabaseError>;
}

#[async_trait]
pub trait ForumRepository: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<ForumPostSummary>, DatabaseError>;
    async fn get_post(&self, post_id: i32) -> Result<Option<ForumPost>, DatabaseError>;
    async fn list_replies(&self, post_id: i32) -> Result<Vec<ForumReply>, DatabaseError>;
    async fn create_post(&self, user_id: i32, input: PostInput) -> Result<ForumPost, DatabaseError>;
    async fn update_post(&self, post_id: i32, input: PostInput) -> Result<Option<ForumPost>, DatabaseError>;
    /// Deletes the post and its replies atomically
    async fn delete_post(&self, post_id: i32) -> Result<bool, DatabaseError>;
    async fn post_exists(&self, post_id: i32) -> Result<bool, DatabaseError>;
    async fn post_belongs_to_user(&self, post_id: i32, user_id: i32) -> Result<bool, DatabaseError>;
    async fn create_reply(&self, post_id: i32, user_id: i32, input: ReplyInput) -> Result<ForumReply, DatabaseError>;
    async fn update_reply(&self, reply_id: i32, input: ReplyInput) -> Result<Option<ForumReply>, DatabaseError>;
    async fn delete_reply(&self, reply_id: i32) -> Result<bool, DatabaseError>;
    async fn reply_exists(&self, reply_id: i32) -> Result<bool, DatabaseError>;
    async fn reply_belongs_to_user(&self, reply_id: i32, user_id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait JournalRepository: Send + Sync {
    async fn list(&self, user_id: i32) -> Result<Vec<JournalEntry>, DatabaseError>;
    async fn get(&self, entry_id: i32) -> Result<Option<JournalEntry>, DatabaseError>;
    async fn create(&self, user_id: i32, input: JournalInput) -> Result<JournalEntry, DatabaseError>;
    async fn update(&self, entry_id: i32, input: JournalInput) -> Result<Option<JournalEntry>, DatabaseError>;
    async fn delete(&self, entry_id: i32) -> Result<bool, DatabaseError>;
    async fn exists(&self, entry_id: i32) -> Result<bool, DatabaseError>;
    async fn belongs_to_user(&self, entry_id: i32, user_id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list_for_baby(&self, baby_id: i32) -> Result<Vec<SharedDocument>, DatabaseError>;
    /// Stores the document and links the doctor to the baby (`doctor_baby`) atomically
    async fn share(&self, baby_id: i32, shared_by: i32, input: NewSharedDocument) -> Result<SharedDocument, DatabaseError>;
    async fn delete(&self, baby_id: i32, document_id: i32) -> Result<bool, DatabaseError>;
    /// Documents shared with the doctor for babies linked through `doctor_baby`
    async fn list_for_doctor(&self, doctor_id: i32) -> Result<Vec<SharedDocument>, DatabaseError>;
}

#[async_trait]
pub trait ExportRepository: Send + Sync {
    async fn record_export(&self, user_id: i32, file_name: &str, format: &str) -> Result<ExportRecord, DatabaseError>;
    async fn list_exports(&self, user_id: i32) -> Result<Vec<ExportRecord>, DatabaseError>;
}

#[async_trait]
pub trait LookupRepository: Send + Sync {
    async fn active_coupons(&self, today: NaiveDate) -> Result<Vec<Coupon>, DatabaseError>;
    async fn quiz_questions(&self, limit: i64) -> Result<Vec<QuizQuestion>, DatabaseError>;
    async fn tips(&self, filter: TipFilter) -> Result<Vec<CuratedTip>, DatabaseError>;
}

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn list(&self, filter: ProviderFilter) -> Result<Vec<ChildProvider>, DatabaseError>;
    async fn exists(&self, provider_id: i32) -> Result<bool, DatabaseError>;
    async fn favorites(&self, user_id: i32) -> Result<Vec<FavoriteProvider>, DatabaseError>;
    /// Adds the favorite when absent, removes it when present; returns the new state
    async fn toggle_favorite(&self, user_id: i32, provider_id: i32) -> Result<bool, DatabaseError>;
    /// Drops every favorite of a deleted user; returns how many rows went
    async fn clear_favorites(&self, user_id: i32) -> Result<u64, DatabaseError>;
}
