use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{ForumPost, ForumPostSummary, ForumReply, PostInput, ReplyInput};
use crate::database::ports::ForumRepository;
use crate::database::transaction::with_transaction;

const POST_COLUMNS: &str = "post_id, user_id, title, content, category, created_at, updated_at";

const AUTHOR_NAME: &str = "COALESCE(NULLIF(TRIM(u.first_name || ' ' || u.last_name), ''), 'Unknown')";

pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Re-reads a reply joined with its author, used after insert/update
    fn reply_select(filter: &str) -> String {
        format!(
            "SELECT r.reply_id, r.post_id, r.user_id, r.content, r.created_at, r.updated_at, \
             {} AS author_name FROM forumreply r LEFT JOIN users u ON u.user_id = r.user_id WHERE {}",
            AUTHOR_NAME, filter
        )
    }
}

#[async_trait]
impl ForumRepository for PgForumRepository {
    async fn list_posts(&self) -> Result<Vec<ForumPostSummary>, DatabaseError> {
        let sql = format!(
            "SELECT p.post_id, p.user_id, p.title, p.content, p.category, p.created_at, p.updated_at, \
             {} AS author_name, \
             (SELECT COUNT(*) FROM forumreply r WHERE r.post_id = p.post_id) AS reply_count \
             FROM forumpost p LEFT JOIN users u ON u.user_id = p.user_id \
             ORDER BY p.created_at DESC, p.post_id DESC",
            AUTHOR_NAME
        );
        let posts = sqlx::query_as::<_, ForumPostSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn get_post(&self, post_id: i32) -> Result<Option<ForumPost>, DatabaseError> {
        let sql = format!("SELECT {} FROM forumpost WHERE post_id = $1", POST_COLUMNS);
        let post = sqlx::query_as::<_, ForumPost>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_replies(&self, post_id: i32) -> Result<Vec<ForumReply>, DatabaseError> {
        let sql = format!(
            "{} ORDER BY r.created_at ASC, r.reply_id ASC",
            Self::reply_select("r.post_id = $1")
        );
        let replies = sqlx::query_as::<_, ForumReply>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(replies)
    }

    async fn create_post(&self, user_id: i32, input: PostInput) -> Result<ForumPost, DatabaseError> {
        let sql = format!(
            "INSERT INTO forumpost (user_id, title, content, category, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {}",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, ForumPost>(&sql)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    async fn update_post(&self, post_id: i32, input: PostInput) -> Result<Option<ForumPost>, DatabaseError> {
        let sql = format!(
            "UPDATE forumpost SET title = $1, content = $2, category = $3, updated_at = NOW() \
             WHERE post_id = $4 RETURNING {}",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, ForumPost>(&sql)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: i32) -> Result<bool, DatabaseError> {
        with_transaction(&self.pool, "delete_post", move |conn| {
            Box::pin(async move {
                sqlx::query("DELETE FROM forumreply WHERE post_id = $1")
                    .bind(post_id)
                    .execute(&mut *conn)
                    .await?;
                let deleted = sqlx::query("DELETE FROM forumpost WHERE post_id = $1")
                    .bind(post_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                Ok(deleted > 0)
            })
        })
        .await
    }

    async fn post_exists(&self, post_id: i32) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM forumpost WHERE post_id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn post_belongs_to_user(&self, post_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM forumpost WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }

    async fn create_reply(&self, post_id: i32, user_id: i32, input: ReplyInput) -> Result<ForumReply, DatabaseError> {
        let sql = format!(
            "WITH r AS (INSERT INTO forumreply (post_id, user_id, content, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING *) \
             SELECT r.reply_id, r.post_id, r.user_id, r.content, r.created_at, r.updated_at, \
             {} AS author_name FROM r LEFT JOIN users u ON u.user_id = r.user_id",
            AUTHOR_NAME
        );
        let reply = sqlx::query_as::<_, ForumReply>(&sql)
            .bind(post_id)
            .bind(user_id)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(reply)
    }

    async fn update_reply(&self, reply_id: i32, input: ReplyInput) -> Result<Option<ForumReply>, DatabaseError> {
        let sql = format!(
            "WITH r AS (UPDATE forumreply SET content = $1, updated_at = NOW() \
             WHERE reply_id = $2 RETURNING *) \
             SELECT r.reply_id, r.post_id, r.user_id, r.content, r.created_at, r.updated_at, \
             {} AS author_name FROM r LEFT JOIN users u ON u.user_id = r.user_id",
            AUTHOR_NAME
        );
        let reply = sqlx::query_as::<_, ForumReply>(&sql)
            .bind(&input.content)
            .bind(reply_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reply)
    }

    async fn delete_reply(&self, reply_id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM forumreply WHERE reply_id = $1")
            .bind(reply_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reply_exists(&self, reply_id: i32) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM forumreply WHERE reply_id = $1)")
            .bind(reply_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn reply_belongs_to_user(&self, reply_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM forumreply WHERE reply_id = $1 AND user_id = $2)",
        )
        .bind(reply_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }
}
