use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlanFilter {
    pub id: Option<u32>,
    pub name: Option<String>,
}

/// A subscription plan. A single payment covers
/// `duration_days` days of membership.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Plan {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub duration_days: u32,
}

impl Plan {
    /// Covered days assumed for members without an assigned plan.
    pub const DEFAULT_DURATION_DAYS: u32 = 30;
}

/// Resolve the covered duration for an optionally assigned plan.
/// Members without a plan (or with a plan that never got a
/// duration) are covered for the default 30 days.
pub fn duration_or_default(plan: Option<&Plan>) -> u32 {
    match plan {
        Some(plan) if plan.duration_days > 0 => plan.duration_days,
        _ => Plan::DEFAULT_DURATION_DAYS,
    }
}
