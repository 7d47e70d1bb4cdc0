use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use milon_data::{
    Member,
    MemberFilter,
    Payment,
    PaymentFilter,
    PaymentMethod,
    Plan,
    PlanFilter,
    Query,
};

use crate::datetime::month_bounds;
use crate::StoreUnavailable;

/// Financial summary over a closed date interval.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PaymentStats {
    pub payment_count: usize,
    pub total_revenue: f64,
    pub average_payment: f64,
    pub distinct_paying_members: usize,
}

impl PaymentStats {
    fn from_payments(payments: &[Payment]) -> Self {
        let payment_count = payments.len();
        let total_revenue: f64 = payments.iter().map(|p| p.amount).sum();
        let average_payment = if payment_count > 0 {
            total_revenue / payment_count as f64
        } else {
            0.0
        };
        let distinct_paying_members = payments
            .iter()
            .map(|p| p.member_id)
            .collect::<HashSet<_>>()
            .len();

        Self {
            payment_count,
            total_revenue,
            average_payment,
            distinct_paying_members,
        }
    }
}

/// Count and revenue for a single payment method.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MethodStats {
    pub payment_count: usize,
    pub revenue: f64,
}

/// One month of a yearly breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub month: u32,
    pub stats: PaymentStats,
}

/// Aggregate payments with a date inside `[date_from, date_to]`,
/// both bounds inclusive. An empty interval yields zeros, never
/// an error.
pub async fn aggregate<DB>(
    db: &DB,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<PaymentStats, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter>,
{
    let payments: Vec<Payment> = db.query(&PaymentFilter {
        date_from: Some(date_from),
        date_to: Some(date_to),
        ..Default::default()
    }).await?;
    Ok(PaymentStats::from_payments(&payments))
}

/// Count and revenue per payment method over the interval.
/// Rows without a method count as cash (normalized by the
/// payment query itself).
pub async fn revenue_by_method<DB>(
    db: &DB,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<BTreeMap<PaymentMethod, MethodStats>, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter>,
{
    let payments: Vec<Payment> = db.query(&PaymentFilter {
        date_from: Some(date_from),
        date_to: Some(date_to),
        ..Default::default()
    }).await?;

    let mut methods: BTreeMap<PaymentMethod, MethodStats> = BTreeMap::new();
    for payment in payments {
        let entry = methods.entry(payment.method).or_default();
        entry.payment_count += 1;
        entry.revenue += payment.amount;
    }
    Ok(methods)
}

/// Member counts keyed by plan name; members without an
/// assigned plan land in the "no plan" bucket.
pub async fn members_by_plan<DB>(
    db: &DB,
) -> Result<BTreeMap<String, usize>, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<Plan, Filter = PlanFilter>,
{
    let plans: Vec<Plan> = db.query(&PlanFilter::default()).await?;
    let names: BTreeMap<u32, String> =
        plans.into_iter().map(|p| (p.id, p.name)).collect();

    let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for member in members {
        let bucket = member
            .plan_id
            .and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| "no plan".to_string());
        *buckets.entry(bucket).or_default() += 1;
    }
    Ok(buckets)
}

/// Members whose enrollment date falls inside the interval.
pub async fn new_members_in_period<DB>(
    db: &DB,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<usize, StoreUnavailable>
where
    DB: Query<Member, Filter = MemberFilter>,
{
    let members: Vec<Member> = db.query(&MemberFilter {
        enrolled_after: Some(date_from),
        enrolled_before: Some(date_to),
        ..Default::default()
    }).await?;
    Ok(members.len())
}

/// Distinct members with at least one payment in the interval.
pub async fn active_members_in_period<DB>(
    db: &DB,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<usize, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter>,
{
    let payments: Vec<Payment> = db.query(&PaymentFilter {
        date_from: Some(date_from),
        date_to: Some(date_to),
        ..Default::default()
    }).await?;
    let members: HashSet<u32> =
        payments.into_iter().map(|p| p.member_id).collect();
    Ok(members.len())
}

/// One aggregate per calendar month of the year. Summing the
/// twelve rows reproduces the whole-year aggregate.
pub async fn monthly_breakdown<DB>(
    db: &DB,
    year: i32,
) -> Result<Vec<MonthlyStats>, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter>,
{
    let mut breakdown = Vec::with_capacity(12);
    for month in 1..=12 {
        // Safe, the month is always in range here
        let (from, to) = month_bounds(year, month).unwrap();
        let stats = aggregate(db, from, to).await?;
        breakdown.push(MonthlyStats { month, stats });
    }
    Ok(breakdown)
}
