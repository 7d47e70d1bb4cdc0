use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    Payment,
    PaymentFilter,
    Plan,
    Query,
    Retrieve,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub plan_id: Option<u32>,
    pub active: Option<bool>,
    pub enrolled_after: Option<NaiveDate>,
    pub enrolled_before: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub enrollment_date: NaiveDate,
    pub active: bool,
    pub plan_id: Option<u32>,
}

impl Member {

    /// Get all payments recorded for the member.
    pub async fn get_payments<DB>(&self, db: &DB) -> Result<Vec<Payment>>
    where
        DB: Query<Payment, Filter=PaymentFilter>,
    {
        let payments = db.query(&PaymentFilter{
            member_id: Some(self.id),
            ..Default::default()
        }).await?;
        Ok(payments)
    }

    /// Get the most recent payment of the member, if any.
    pub async fn get_last_payment<DB>(&self, db: &DB) -> Result<Option<Payment>>
    where
        DB: Query<Payment, Filter=PaymentFilter>,
    {
        let payments = self.get_payments(db).await?;
        Ok(payments.into_iter().max_by_key(|p| p.date))
    }

    /// Get the assigned subscription plan, if the member has one.
    pub async fn get_plan<DB>(&self, db: &DB) -> Result<Option<Plan>>
    where
        DB: Retrieve<Plan, Key=u32>,
    {
        match self.plan_id {
            Some(plan_id) => Ok(Some(db.retrieve(plan_id).await?)),
            None => Ok(None),
        }
    }
}
