use chrono::Utc;
use sqlx::types::Json;
use sqlx::Result;
use uuid::Uuid;

use crate::model::{EmailNotification, NewNotification, NotificationStatus};
use crate::Pool;

/// Return the send log, newest first.
#[tracing::instrument(skip(db))]
pub async fn select_all(db: &Pool) -> Result<Vec<EmailNotification>> {
    sqlx::query_as(
        r#"
        SELECT id, article_id, recipients, subject, sent_at, status
        FROM email_notifications
        ORDER BY sent_at DESC, id DESC
        "#,
    )
    .fetch_all(db)
    .await
}

/// The `limit` newest entries of the send log.
#[tracing::instrument(skip(db))]
pub async fn select_recent(db: &Pool, limit: u64) -> Result<Vec<EmailNotification>> {
    sqlx::query_as(
        r#"
        SELECT id, article_id, recipients, subject, sent_at, status
        FROM email_notifications
        ORDER BY sent_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit as i64)
    .fetch_all(db)
    .await
}

/// Record the outcome of a send action. Recipients are serialized to a JSON
/// string for storage. The row is a log entry and is never updated.
#[tracing::instrument(skip(db))]
pub async fn insert_notification(
    db: &Pool,
    new_notification: &NewNotification,
    status: NotificationStatus,
) -> Result<EmailNotification> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO email_notifications (id, article_id, recipients, subject, sent_at, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_notification.article_id)
    .bind(Json(&new_notification.recipients))
    .bind(&new_notification.subject)
    .bind(Utc::now())
    .bind(status)
    .execute(db)
    .await?;

    sqlx::query_as(
        r#"
        SELECT id, article_id, recipients, subject, sent_at, status
        FROM email_notifications
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_one(db)
    .await
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    fn send_request(subject: &str) -> NewNotification {
        NewNotification {
            article_id: "a01".to_owned(),
            recipients: vec!["desk@example.com".to_owned(), "chief@example.com".to_owned()],
            subject: subject.to_owned(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn recorded_send_round_trips_recipients(pool: SqlitePool) -> Result<()> {
        let created =
            insert_notification(&pool, &send_request("Weekly digest"), NotificationStatus::Sent)
                .await?;

        assert_eq!(created.status, NotificationStatus::Sent);
        assert_eq!(
            created.recipients.0,
            vec!["desk@example.com", "chief@example.com"]
        );

        let all = select_all(&pool).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].subject, "Weekly digest");

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn log_is_newest_first_and_cappable(pool: SqlitePool) -> Result<()> {
        for n in 0..4 {
            insert_notification(&pool, &send_request(&format!("n{n}")), NotificationStatus::Sent)
                .await?;
        }

        let all = select_all(&pool).await?;
        assert_eq!(all.len(), 4);

        let recent = select_recent(&pool, 2).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].subject, all[0].subject);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn failed_outcome_is_recorded_as_failed(pool: SqlitePool) -> Result<()> {
        let created =
            insert_notification(&pool, &send_request("Bounced"), NotificationStatus::Failed)
                .await?;

        assert_eq!(created.status, NotificationStatus::Failed);

        Ok(())
    }
}
