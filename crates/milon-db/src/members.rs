use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use milon_data::{
    Delete,
    Insert,
    Member,
    MemberFilter,
    Query,
    Retrieve,
    Update,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                name,
                phone,
                notes,
                enrollment_date,
                active,
                plan_id
            FROM members
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = filter.name.clone() {
            qry.push(" AND name LIKE ").push_bind(format!("%{}%", name));
        }
        if let Some(plan_id) = filter.plan_id {
            qry.push(" AND plan_id = ").push_bind(plan_id);
        }
        if let Some(active) = filter.active {
            qry.push(" AND active = ").push_bind(active);
        }
        if let Some(enrolled_after) = filter.enrolled_after {
            qry.push(" AND enrollment_date >= ").push_bind(enrolled_after);
        }
        if let Some(enrolled_before) = filter.enrolled_before {
            qry.push(" AND enrollment_date <= ").push_bind(enrolled_before);
        }

        let members: Vec<Member> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for Connection {
    type Key = u32;
    async fn retrieve(&self, member_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            id: Some(member_id),
            ..Default::default()
        };
        let member = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for Connection {
    async fn insert(&self, member: Member) -> Result<Member> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO members (
                    name,
                    phone,
                    notes,
                    enrollment_date,
                    active,
                    plan_id
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&member.name)
                .push_bind(&member.phone)
                .push_bind(&member.notes)
                .push_bind(member.enrollment_date)
                .push_bind(member.active)
                .push_bind(member.plan_id);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Member> for Connection {
    /// Update member
    async fn update(&self, member: Member) -> Result<Member> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE members SET")
                .push(" name = ")
                .push_bind(&member.name)
                .push(", phone = ")
                .push_bind(&member.phone)
                .push(", notes = ")
                .push_bind(&member.notes)
                .push(", enrollment_date = ")
                .push_bind(member.enrollment_date)
                .push(", active = ")
                .push_bind(member.active)
                .push(", plan_id = ")
                .push_bind(member.plan_id)
                .push(" WHERE id = ")
                .push_bind(member.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(member.id).await
    }
}

#[async_trait]
impl Delete<Member> for Connection {
    /// Delete member
    async fn delete(&self, member: Member) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM members WHERE id = ")
            .push_bind(member.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    use milon_data::{Payment, Plan};

    #[tokio::test]
    async fn test_member_insert() {
        let db = Connection::open_test().await;
        let today: NaiveDate = chrono::Local::now().date_naive();
        let member = Member {
            name: "Test Member".to_string(),
            phone: "+54 11 5555 0000".to_string(),
            notes: "prefers the morning shift".to_string(),
            enrollment_date: today,
            active: true,
            ..Member::default()
        };
        let member = db.insert(member).await.unwrap();

        assert!(member.id > 0);
        assert_eq!(member.name, "Test Member");
        assert_eq!(member.phone, "+54 11 5555 0000");
        assert_eq!(member.notes, "prefers the morning shift");
        assert_eq!(member.enrollment_date, today);
        assert!(member.active);
        assert_eq!(member.plan_id, None);
    }

    #[tokio::test]
    async fn test_member_update() {
        let db = Connection::open_test().await;
        let plan = db.insert(Plan {
            name: "Monthly".to_string(),
            price: 5000.0,
            duration_days: 30,
            ..Default::default()
        }).await.unwrap();

        let member = Member {
            name: "Test Member".to_string(),
            ..Member::default()
        };
        let mut member = db.insert(member).await.unwrap();
        member.name = "Test Member Updated".to_string();
        member.phone = "+54 11 5555 0001".to_string();
        member.enrollment_date = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        member.active = false;
        member.plan_id = Some(plan.id);
        member.notes = "moved away".to_string();

        let member = db.update(member).await.unwrap();
        assert_eq!(member.name, "Test Member Updated");
        assert_eq!(member.phone, "+54 11 5555 0001");
        assert_eq!(
            member.enrollment_date,
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()
        );
        assert!(!member.active);
        assert_eq!(member.plan_id, Some(plan.id));
        assert_eq!(member.notes, "moved away");
    }

    #[tokio::test]
    async fn test_member_filter_active() {
        let db = Connection::open_test().await;
        db.insert(Member {
            name: "Active Member".to_string(),
            active: true,
            ..Default::default()
        }).await.unwrap();
        db.insert(Member {
            name: "Former Member".to_string(),
            active: false,
            ..Default::default()
        }).await.unwrap();

        let filter = MemberFilter {
            active: Some(true),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Active Member");
    }

    #[tokio::test]
    async fn test_member_query_name_like() {
        let db = Connection::open_test().await;
        db.insert(Member {
            name: "Test Member".to_string(),
            ..Default::default()
        }).await.unwrap();

        let filter = MemberFilter {
            name: Some("tEsT MeMber".to_string()),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 1);

        let filter = MemberFilter {
            name: Some("f3st MeMber".to_string()),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 0);
    }

    #[tokio::test]
    async fn test_member_filter_enrollment_range() {
        let db = Connection::open_test().await;
        db.insert(Member {
            name: "January Member".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            ..Default::default()
        }).await.unwrap();
        db.insert(Member {
            name: "March Member".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ..Default::default()
        }).await.unwrap();

        let filter = MemberFilter {
            enrolled_after: NaiveDate::from_ymd_opt(2024, 1, 1),
            enrolled_before: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "January Member");
    }

    #[tokio::test]
    async fn test_member_delete() {
        let db = Connection::open_test().await;
        let member = db.insert(Member {
            name: "Test Member".to_string(),
            ..Member::default()
        }).await.unwrap();

        db.delete(member).await.unwrap();

        let members: Vec<Member> =
            db.query(&MemberFilter::default()).await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_member_get_related_payments() {
        let db = Connection::open_test().await;

        let m = db.insert(Member {
            name: "Test Member".to_string(),
            ..Default::default()
        }).await.unwrap();

        db.insert(Payment {
            member_id: m.id,
            amount: 5000.0,
            period: "2024-01".to_string(),
            ..Default::default()
        }).await.unwrap();
        db.insert(Payment {
            member_id: m.id,
            amount: 5000.0,
            period: "2024-02".to_string(),
            ..Default::default()
        }).await.unwrap();

        let payments = m.get_payments(&db).await.unwrap();
        assert_eq!(payments.len(), 2);
    }

    #[tokio::test]
    async fn test_member_get_last_payment() {
        let db = Connection::open_test().await;

        let m = db.insert(Member {
            name: "Test Member".to_string(),
            ..Default::default()
        }).await.unwrap();
        assert!(m.get_last_payment(&db).await.unwrap().is_none());

        db.insert(Payment {
            member_id: m.id,
            amount: 5000.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            period: "2024-01".to_string(),
            ..Default::default()
        }).await.unwrap();
        db.insert(Payment {
            member_id: m.id,
            amount: 5000.0,
            date: NaiveDate::from_ymd_opt(2024, 2, 12).unwrap(),
            period: "2024-02".to_string(),
            ..Default::default()
        }).await.unwrap();

        let last = m.get_last_payment(&db).await.unwrap().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 2, 12).unwrap());
    }
}
