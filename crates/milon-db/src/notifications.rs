use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::{QueryBuilder, Sqlite};

use milon_data::{
    Insert,
    Notification,
    NotificationFilter,
    Query,
    Retrieve,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

const SELECT_NOTIFICATION: &str = r#"
    SELECT
        id,
        member_id,
        kind,
        message,
        created_at,
        read,
        priority,
        due_date
    FROM notifications
    WHERE 1
    "#;

#[async_trait]
impl Query<Notification> for Connection {
    type Filter = NotificationFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Notification>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(SELECT_NOTIFICATION);

        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(kind) = filter.kind {
            qry.push(" AND kind = ").push_bind(kind);
        }
        if filter.unread_only {
            qry.push(" AND read = 0 ");
        }
        if let Some(created_on) = filter.created_on {
            qry.push(" AND DATE(created_at) = ").push_bind(created_on);
        }

        let notifications: Vec<Notification> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(notifications)
    }
}

#[async_trait]
impl Retrieve<Notification> for Connection {
    type Key = u32;
    async fn retrieve(&self, notification_id: Self::Key) -> Result<Notification> {
        let mut conn = self.lock().await;
        let notification: Option<Notification> =
            QueryBuilder::new(SELECT_NOTIFICATION)
                .push(" AND id = ")
                .push_bind(notification_id)
                .build_query_as()
                .fetch_optional(&mut *conn)
                .await?;
        notification.ok_or_else(|| QueryError::NotFound.into())
    }
}

#[async_trait]
impl Insert<Notification> for Connection {
    async fn insert(&self, notification: Notification) -> Result<Notification> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO notifications (
                    member_id,
                    kind,
                    message,
                    created_at,
                    read,
                    priority,
                    due_date
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(notification.member_id)
                .push_bind(notification.kind)
                .push_bind(&notification.message)
                .push_bind(notification.created_at)
                .push_bind(notification.read)
                .push_bind(notification.priority)
                .push_bind(notification.due_date);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

impl Connection {
    /// All unread notifications, most urgent first: priority
    /// high before medium before normal, newest first within
    /// the same priority.
    pub async fn list_unread(&self) -> Result<Vec<Notification>> {
        let mut conn = self.lock().await;
        let notifications: Vec<Notification> =
            QueryBuilder::new(SELECT_NOTIFICATION)
                .push(
                    r#" AND read = 0
                    ORDER BY
                        CASE priority
                            WHEN 'high' THEN 1
                            WHEN 'medium' THEN 2
                            ELSE 3
                        END,
                        created_at DESC
                    "#,
                )
                .build_query_as()
                .fetch_all(&mut *conn)
                .await?;
        Ok(notifications)
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, notification_id: u32) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new(
            "UPDATE notifications SET read = 1 WHERE id = ")
            .push_bind(notification_id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Delete read notifications older than the given number of
    /// days. Unread notifications are kept regardless of age.
    pub async fn delete_read_older_than(&self, days: u32) -> Result<u64> {
        let cutoff: NaiveDate =
            chrono::Local::now().date_naive() - Duration::days(days as i64);
        let mut conn = self.lock().await;
        let result = QueryBuilder::<Sqlite>::new(
            "DELETE FROM notifications WHERE read = 1 AND DATE(created_at) < ")
            .push_bind(cutoff)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    use milon_data::{Member, NotificationKind, Priority};

    async fn test_member(db: &Connection) -> Member {
        db.insert(Member {
            name: "Test Member".to_string(),
            ..Default::default()
        }).await.unwrap()
    }

    fn at_noon(date: &str) -> chrono::NaiveDateTime {
        date.parse::<NaiveDate>().unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_notification_insert_and_query() {
        let db = Connection::open_test().await;
        let m = test_member(&db).await;

        let n = db.insert(Notification {
            member_id: m.id,
            kind: NotificationKind::Overdue,
            message: "Payment overdue by 3 days".to_string(),
            created_at: at_noon("2024-04-02"),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 30),
            ..Default::default()
        }).await.unwrap();

        assert!(n.id > 0);
        assert_eq!(n.kind, NotificationKind::Overdue);
        assert_eq!(n.priority, Priority::High);
        assert!(!n.read);
        assert_eq!(n.due_date, NaiveDate::from_ymd_opt(2024, 3, 30));

        // Filter on the creation day
        let same_day: Vec<Notification> = db.query(&NotificationFilter {
            member_id: Some(m.id),
            unread_only: true,
            created_on: "2024-04-02".parse().ok(),
            ..Default::default()
        }).await.unwrap();
        assert_eq!(same_day.len(), 1);

        let other_day: Vec<Notification> = db.query(&NotificationFilter {
            member_id: Some(m.id),
            created_on: "2024-04-03".parse().ok(),
            ..Default::default()
        }).await.unwrap();
        assert!(other_day.is_empty());
    }

    #[tokio::test]
    async fn test_list_unread_ordering() {
        let db = Connection::open_test().await;
        let m = test_member(&db).await;

        for (kind, priority, created_at) in [
            (NotificationKind::DueSoon, Priority::Medium, "2024-04-03"),
            (NotificationKind::Overdue, Priority::High, "2024-04-01"),
            (NotificationKind::Overdue, Priority::High, "2024-04-02"),
        ] {
            db.insert(Notification {
                member_id: m.id,
                kind,
                message: kind.to_string(),
                created_at: at_noon(created_at),
                priority,
                ..Default::default()
            }).await.unwrap();
        }

        let unread = db.list_unread().await.unwrap();
        assert_eq!(unread.len(), 3);
        // High priority first, newest first within the priority
        assert_eq!(unread[0].priority, Priority::High);
        assert_eq!(unread[0].created_at, at_noon("2024-04-02"));
        assert_eq!(unread[1].created_at, at_noon("2024-04-01"));
        assert_eq!(unread[2].priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let db = Connection::open_test().await;
        let m = test_member(&db).await;

        let n = db.insert(Notification {
            member_id: m.id,
            message: "No payments on file".to_string(),
            created_at: at_noon("2024-04-02"),
            priority: Priority::High,
            ..Default::default()
        }).await.unwrap();

        db.mark_read(n.id).await.unwrap();
        let n: Notification = db.retrieve(n.id).await.unwrap();
        assert!(n.read);
        assert!(db.list_unread().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_read_older_than() {
        let db = Connection::open_test().await;
        let m = test_member(&db).await;

        // One stale read, one stale unread
        let stale_read = db.insert(Notification {
            member_id: m.id,
            message: "old and handled".to_string(),
            created_at: at_noon("2001-01-01"),
            ..Default::default()
        }).await.unwrap();
        db.mark_read(stale_read.id).await.unwrap();

        db.insert(Notification {
            member_id: m.id,
            message: "old but never handled".to_string(),
            created_at: at_noon("2001-01-01"),
            ..Default::default()
        }).await.unwrap();

        let deleted = db.delete_read_older_than(30).await.unwrap();
        assert_eq!(deleted, 1);

        // The unread one survives any retention window
        let unread = db.list_unread().await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "old but never handled");
    }
}
