use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use milon_data::{
    Delete,
    Insert,
    Payment,
    PaymentFilter,
    Query,
    Retrieve,
    Update,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Payment> for Connection {
    type Filter = PaymentFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Payment>> {
        let mut conn = self.lock().await;
        // Legacy rows may carry an empty method, those count as cash.
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                member_id,
                ROUND(amount, 10) AS amount,
                date,
                period,
                COALESCE(NULLIF(method, ''), 'cash') AS method,
                notes
            FROM payments
            WHERE 1
            "#,
        );

        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(date) = filter.date {
            qry.push(" AND date = ").push_bind(date);
        }
        if let Some(date_from) = filter.date_from {
            qry.push(" AND date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            qry.push(" AND date <= ").push_bind(date_to);
        }
        if let Some(period) = filter.period.clone() {
            qry.push(" AND period = ").push_bind(period);
        }
        if let Some(method) = filter.method {
            qry.push(" AND method = ").push_bind(method);
        }
        qry.push(" ORDER BY date DESC ");

        let payments: Vec<Payment> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(payments)
    }
}

#[async_trait]
impl Retrieve<Payment> for Connection {
    type Key = u32;
    async fn retrieve(&self, payment_id: Self::Key) -> Result<Payment> {
        let mut conn = self.lock().await;
        let payment: Option<Payment> = QueryBuilder::new(
            r#"
            SELECT
                id,
                member_id,
                ROUND(amount, 10) AS amount,
                date,
                period,
                COALESCE(NULLIF(method, ''), 'cash') AS method,
                notes
            FROM payments
            WHERE id =
            "#,
        )
        .push_bind(payment_id)
        .build_query_as()
        .fetch_optional(&mut *conn)
        .await?;
        payment.ok_or_else(|| QueryError::NotFound.into())
    }
}

#[async_trait]
impl Insert<Payment> for Connection {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let insert: Id<u32> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO payments (
                    member_id,
                    amount,
                    date,
                    period,
                    method,
                    notes
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(payment.member_id)
                .push_bind(payment.amount)
                .push_bind(payment.date)
                .push_bind(&payment.period)
                .push_bind(payment.method)
                .push_bind(&payment.notes);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Payment> for Connection {
    /// Update payment
    async fn update(&self, payment: Payment) -> Result<Payment> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE payments SET")
                .push(" amount = ")
                .push_bind(payment.amount)
                .push(", date = ")
                .push_bind(payment.date)
                .push(", period = ")
                .push_bind(&payment.period)
                .push(", method = ")
                .push_bind(payment.method)
                .push(", notes = ")
                .push_bind(&payment.notes)
                .push(" WHERE id = ")
                .push_bind(payment.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(payment.id).await
    }
}

#[async_trait]
impl Delete<Payment> for Connection {
    /// Delete payment
    async fn delete(&self, payment: Payment) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM payments WHERE id = ")
            .push_bind(payment.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
