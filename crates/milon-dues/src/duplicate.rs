use milon_data::{Payment, PaymentFilter, Query};

use crate::StoreUnavailable;

/// Does the member already have a payment declared for the
/// given billing period? Exact, case-sensitive label match.
/// Advisory only: the payment entry flow warns on a duplicate
/// but records it if the operator confirms, since legitimate
/// duplicates exist (a back payment plus the current month
/// entered on the same day).
pub async fn has_payment_for_period<DB>(
    db: &DB,
    member_id: u32,
    period: &str,
) -> Result<bool, StoreUnavailable>
where
    DB: Query<Payment, Filter = PaymentFilter>,
{
    let payments: Vec<Payment> = db.query(&PaymentFilter {
        member_id: Some(member_id),
        period: Some(period.to_string()),
        ..Default::default()
    }).await?;
    Ok(!payments.is_empty())
}
