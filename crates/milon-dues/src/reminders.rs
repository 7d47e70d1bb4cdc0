use chrono::NaiveDate;
use serde::Serialize;

use milon_data::{
    Member,
    MemberFilter,
    Payment,
    PaymentFilter,
    Plan,
    Query,
    Retrieve,
};

use crate::standing::roster_standings;
use crate::status::MembershipStatus;
use crate::StoreUnavailable;

/// A renewal reminder row: an active member whose plan window
/// closes within the next few days. Transport (chat deep link,
/// email) is up to the caller; this only supplies the data and
/// the rendered message.
#[derive(Debug, Clone, Serialize)]
pub struct RenewalReminder {
    pub member_id: u32,
    pub name: String,
    pub phone: String,
    pub last_payment: NaiveDate,
    pub due_date: NaiveDate,
    pub days_remaining: i64,
}

impl RenewalReminder {
    /// The reminder text to send to the member.
    pub fn message(&self) -> String {
        format!(
            "Hi {}! Your membership payment is due in {} days (on {}). \
             See you at the gym!",
            self.name, self.days_remaining, self.due_date
        )
    }
}

/// A debtor row: a member who is overdue or has never paid.
#[derive(Debug, Clone, Serialize)]
pub struct DebtorRow {
    pub member_id: u32,
    pub name: String,
    pub phone: String,
    pub last_payment: Option<NaiveDate>,
    /// None for members without any payment history.
    pub days_overdue: Option<i64>,
}

/// Members whose membership runs out within `within_days` days.
/// Sorted soonest first.
pub async fn upcoming_renewals<DB>(
    db: &DB,
    today: NaiveDate,
    within_days: i64,
) -> Result<Vec<RenewalReminder>, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<Payment, Filter = PaymentFilter>
        + Retrieve<Plan, Key = u32>,
{
    let standings = roster_standings(db, today).await?;

    let mut reminders: Vec<RenewalReminder> = standings
        .into_iter()
        .filter_map(|standing| {
            let days_remaining = match standing.status {
                MembershipStatus::DueSoon { days_remaining }
                    if days_remaining <= within_days =>
                {
                    days_remaining
                }
                _ => return None,
            };
            // Due soon implies a payment history
            let last_payment = standing.last_payment?;
            let due_date = standing.due_date?;
            Some(RenewalReminder {
                member_id: standing.member.id,
                name: standing.member.name,
                phone: standing.member.phone,
                last_payment,
                due_date,
                days_remaining,
            })
        })
        .collect();

    reminders.sort_by_key(|r| r.days_remaining);
    Ok(reminders)
}

/// All debtors: overdue members first, most overdue on top,
/// members without any payment history after them.
pub async fn debtors<DB>(
    db: &DB,
    today: NaiveDate,
) -> Result<Vec<DebtorRow>, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<Payment, Filter = PaymentFilter>
        + Retrieve<Plan, Key = u32>,
{
    let standings = roster_standings(db, today).await?;

    let mut overdue = Vec::new();
    let mut never_paid = Vec::new();
    for standing in standings {
        let row = DebtorRow {
            member_id: standing.member.id,
            name: standing.member.name.clone(),
            phone: standing.member.phone.clone(),
            last_payment: standing.last_payment,
            days_overdue: match standing.status {
                MembershipStatus::Overdue { days_overdue } => Some(days_overdue),
                _ => None,
            },
        };
        match standing.status {
            MembershipStatus::Overdue { .. } => overdue.push(row),
            MembershipStatus::NoPayments => never_paid.push(row),
            _ => {}
        }
    }

    overdue.sort_by_key(|r| std::cmp::Reverse(r.days_overdue));
    overdue.extend(never_paid);
    Ok(overdue)
}
