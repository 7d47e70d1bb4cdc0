use chrono::{Duration, NaiveDate};

use milon_data::{
    duration_or_default,
    Member,
    MemberFilter,
    Payment,
    PaymentFilter,
    Plan,
    Query,
    Retrieve,
};

use crate::status::{classify, MembershipStatus};
use crate::StoreUnavailable;

/// A member's resolved dues standing. Every consumer of the
/// classification (notification scan, reminder lists, reports)
/// goes through this, so the boundary rules live in one place.
#[derive(Debug, Clone)]
pub struct MemberStanding {
    pub member: Member,
    pub status: MembershipStatus,
    pub duration_days: u32,
    pub last_payment: Option<NaiveDate>,
    /// Day the current plan window closes, if the member
    /// ever paid.
    pub due_date: Option<NaiveDate>,
}

/// Resolve the standing of a single member.
pub async fn member_standing<DB>(
    db: &DB,
    member: Member,
    today: NaiveDate,
) -> Result<MemberStanding, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter> + Retrieve<Plan, Key = u32>,
{
    let plan = member.get_plan(db).await?;
    let duration_days = duration_or_default(plan.as_ref());
    let last_payment = member.get_last_payment(db).await?.map(|p| p.date);
    let status = classify(today, last_payment, duration_days);
    let due_date =
        last_payment.map(|date| date + Duration::days(duration_days as i64));

    Ok(MemberStanding {
        member,
        status,
        duration_days,
        last_payment,
        due_date,
    })
}

/// Resolve the standing of every active member.
pub async fn roster_standings<DB>(
    db: &DB,
    today: NaiveDate,
) -> Result<Vec<MemberStanding>, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<Payment, Filter = PaymentFilter>
        + Retrieve<Plan, Key = u32>,
{
    let members: Vec<Member> = db.query(&MemberFilter {
        active: Some(true),
        ..Default::default()
    }).await?;

    let mut standings = Vec::with_capacity(members.len());
    for member in members {
        standings.push(member_standing(db, member, today).await?);
    }
    Ok(standings)
}
