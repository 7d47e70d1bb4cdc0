use chrono::NaiveDateTime;

use milon_data::{
    Insert,
    Member,
    MemberFilter,
    Notification,
    NotificationFilter,
    NotificationKind,
    Payment,
    PaymentFilter,
    Plan,
    Priority,
    Query,
    Retrieve,
};
use milon_db::Connection;

use crate::standing::{member_standing, MemberStanding};
use crate::status::MembershipStatus;
use crate::StoreUnavailable;

/// Reminder content for a standing that warrants one.
/// Current members get none.
fn reminder_for(standing: &MemberStanding) -> Option<Notification> {
    let (kind, priority, message) = match standing.status {
        MembershipStatus::Current => return None,
        MembershipStatus::Overdue { days_overdue } => {
            let last_payment = standing.last_payment?;
            (
                NotificationKind::Overdue,
                Priority::High,
                format!(
                    "Payment overdue by {} days. Last payment: {}",
                    days_overdue, last_payment
                ),
            )
        }
        MembershipStatus::DueSoon { days_remaining } => (
            NotificationKind::DueSoon,
            Priority::Medium,
            format!("Membership payment due in {} days", days_remaining),
        ),
        MembershipStatus::NoPayments => (
            NotificationKind::NoPayments,
            Priority::High,
            "No payments on file".to_string(),
        ),
    };

    Some(Notification {
        member_id: standing.member.id,
        kind,
        message,
        priority,
        due_date: standing.due_date,
        ..Default::default()
    })
}

/// Scan all active members and create reminder notifications
/// for everyone who is overdue, due soon or has never paid.
/// At most one reminder per member per calendar day: a member
/// with any unread reminder created today is skipped, even if
/// their classification changed since. Returns the number of
/// notifications created.
pub async fn generate_notifications<DB>(
    db: &DB,
    now: NaiveDateTime,
) -> Result<usize, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<Payment, Filter = PaymentFilter>
        + Query<Notification, Filter = NotificationFilter>
        + Retrieve<Plan, Key = u32>
        + Insert<Notification>,
{
    let today = now.date();
    let members: Vec<Member> = db.query(&MemberFilter {
        active: Some(true),
        ..Default::default()
    }).await?;

    let mut created = 0;
    for member in members {
        let standing = member_standing(db, member, today).await?;
        let notification = match reminder_for(&standing) {
            Some(notification) => notification,
            None => continue,
        };

        let todays: Vec<Notification> = db.query(&NotificationFilter {
            member_id: Some(notification.member_id),
            unread_only: true,
            created_on: Some(today),
            ..Default::default()
        }).await?;
        if !todays.is_empty() {
            continue;
        }

        db.insert(Notification {
            created_at: now,
            ..notification
        }).await?;
        created += 1;
    }

    log::debug!("notification scan created {} reminders", created);
    Ok(created)
}

/// Drop read notifications older than the retention window.
/// Unread ones are never deleted, regardless of age.
pub async fn purge_read_notifications(
    db: &Connection,
    retention_days: u32,
) -> Result<u64, StoreUnavailable> {
    let deleted = db.delete_read_older_than(retention_days).await?;
    log::debug!("purged {} read notifications", deleted);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at_noon(s: &str) -> NaiveDateTime {
        date(s).and_hms_opt(12, 0, 0).unwrap()
    }

    async fn seed_member(
        db: &Connection,
        name: &str,
        last_payment: Option<&str>,
    ) -> Member {
        let member = db.insert(Member {
            name: name.to_string(),
            active: true,
            ..Default::default()
        }).await.unwrap();
        if let Some(paid_on) = last_payment {
            db.insert(Payment {
                member_id: member.id,
                amount: 5000.0,
                date: date(paid_on),
                period: paid_on[..7].to_string(),
                ..Default::default()
            }).await.unwrap();
        }
        member
    }

    #[tokio::test]
    async fn test_generates_reminders_by_status() {
        let db = Connection::open_test().await;
        // Default duration 30: overdue by 15, due in 2, current, never paid
        let overdue = seed_member(&db, "Overdue", Some("2024-03-01")).await;
        let due_soon = seed_member(&db, "Due Soon", Some("2024-03-18")).await;
        seed_member(&db, "Current", Some("2024-04-10")).await;
        let unpaid = seed_member(&db, "Unpaid", None).await;

        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 3);

        let unread = db.list_unread().await.unwrap();
        assert_eq!(unread.len(), 3);

        let for_member = |id: u32| {
            unread.iter().find(|n| n.member_id == id).unwrap().clone()
        };

        let n = for_member(overdue.id);
        assert_eq!(n.kind, NotificationKind::Overdue);
        assert_eq!(n.priority, Priority::High);
        assert!(n.message.contains("15 days"));
        assert!(n.message.contains("2024-03-01"));
        assert_eq!(n.due_date, Some(date("2024-03-31")));

        let n = for_member(due_soon.id);
        assert_eq!(n.kind, NotificationKind::DueSoon);
        assert_eq!(n.priority, Priority::Medium);
        assert!(n.message.contains("2 days"));

        let n = for_member(unpaid.id);
        assert_eq!(n.kind, NotificationKind::NoPayments);
        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.due_date, None);
    }

    #[tokio::test]
    async fn test_second_scan_same_day_creates_nothing() {
        let db = Connection::open_test().await;
        seed_member(&db, "Unpaid", None).await;

        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 1);

        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 0);
        assert_eq!(db.list_unread().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_next_day_scan_reminds_again() {
        let db = Connection::open_test().await;
        seed_member(&db, "Unpaid", None).await;

        generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        let created =
            generate_notifications(&db, at_noon("2024-04-16")).await.unwrap();
        assert_eq!(created, 1);
        assert_eq!(db.list_unread().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_status_flip_same_day_stays_deduplicated() {
        let db = Connection::open_test().await;
        let member = seed_member(&db, "Late Payer", None).await;

        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 1);

        // The member pays an old back period; their classification
        // flips from no-payments to overdue within the same day.
        db.insert(Payment {
            member_id: member.id,
            amount: 5000.0,
            date: date("2024-03-01"),
            period: "2024-03".to_string(),
            ..Default::default()
        }).await.unwrap();

        // One reminder per member per day, so still nothing new.
        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 0);
        assert_eq!(db.list_unread().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_members_are_not_scanned() {
        let db = Connection::open_test().await;
        db.insert(Member {
            name: "Former Member".to_string(),
            active: false,
            ..Default::default()
        }).await.unwrap();

        let created =
            generate_notifications(&db, at_noon("2024-04-15")).await.unwrap();
        assert_eq!(created, 0);
    }

    #[tokio::test]
    async fn test_purge_keeps_unread() {
        let db = Connection::open_test().await;
        let member = seed_member(&db, "Unpaid", None).await;

        db.insert(Notification {
            member_id: member.id,
            message: "stale".to_string(),
            created_at: at_noon("2001-01-01"),
            read: true,
            ..Default::default()
        }).await.unwrap();
        db.insert(Notification {
            member_id: member.id,
            message: "still open".to_string(),
            created_at: at_noon("2001-01-01"),
            ..Default::default()
        }).await.unwrap();

        let deleted = purge_read_notifications(&db, 30).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(db.list_unread().await.unwrap().len(), 1);
    }
}
