use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use super::manager::DatabaseError;

/// Run `body` inside a transaction on a single pooled connection.
///
/// Commits when the body returns `Ok`, rolls back on `Err`. The connection goes
/// back to the pool when the transaction is dropped, on every path; an
/// unfinished transaction is rolled back by sqlx on drop.
///
/// ```ignore
/// with_transaction(&pool, "delete_post", move |conn| {
///     Box::pin(async move {
///         sqlx::query("DELETE FROM forumreply WHERE post_id = $1")
///             .bind(post_id)
///             .execute(&mut *conn)
///             .await?;
///         Ok(())
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<T, F>(
    pool: &PgPool,
    label: &'static str,
    body: F,
) -> Result<T, DatabaseError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, DatabaseError>> + Send,
{
    let mut tx = pool.begin().await?;

    match body(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            tracing::debug!("Transaction '{}' committed", label);
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Transaction '{}' rollback failed: {}", label, rollback_err);
            }
            tracing::warn!("Transaction '{}' rolled back: {}", label, err);
            Err(err)
        }
    }
}
