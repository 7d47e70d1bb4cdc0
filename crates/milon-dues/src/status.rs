use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days before the end of the plan window in which a
/// membership counts as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 5;

/// Where a membership stands relative to its plan window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    /// The last payment still covers the membership.
    Current,
    /// The plan window closes within the next few days.
    /// `days_remaining` is 0 on the final covered day.
    DueSoon { days_remaining: i64 },
    /// The plan window has closed. `days_overdue` counts the
    /// days since, starting at 1.
    Overdue { days_overdue: i64 },
    /// The member never paid.
    NoPayments,
}

impl MembershipStatus {
    /// Overdue or never paid: a debtor.
    pub fn is_debtor(&self) -> bool {
        matches!(
            self,
            MembershipStatus::Overdue { .. } | MembershipStatus::NoPayments
        )
    }
}

/// Classify a membership. The result depends only on the three
/// inputs; whole calendar days, so a payment made today has an
/// elapsed time of zero.
pub fn classify(
    today: NaiveDate,
    last_payment: Option<NaiveDate>,
    duration_days: u32,
) -> MembershipStatus {
    let last_payment = match last_payment {
        Some(date) => date,
        None => return MembershipStatus::NoPayments,
    };

    let duration = duration_days as i64;
    let elapsed = (today - last_payment).num_days();

    if elapsed > duration {
        MembershipStatus::Overdue {
            days_overdue: elapsed - duration,
        }
    } else if elapsed >= 0 && elapsed >= duration - DUE_SOON_WINDOW_DAYS {
        // The boundary day itself is still due soon, not overdue
        MembershipStatus::DueSoon {
            days_remaining: duration - elapsed,
        }
    } else {
        // Covers future-dated payments as well
        MembershipStatus::Current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn days_ago(today: NaiveDate, days: i64) -> Option<NaiveDate> {
        Some(today - chrono::Duration::days(days))
    }

    #[test]
    fn test_current_within_window() {
        let today = date("2024-04-15");
        assert_eq!(
            classify(today, days_ago(today, 25), 30),
            MembershipStatus::DueSoon { days_remaining: 5 }
        );
        assert_eq!(
            classify(today, days_ago(today, 24), 30),
            MembershipStatus::Current
        );
        assert_eq!(
            classify(today, days_ago(today, 0), 30),
            MembershipStatus::Current
        );
    }

    #[test]
    fn test_due_soon_window() {
        let today = date("2024-04-15");
        for elapsed in 25..=30 {
            let status = classify(today, days_ago(today, elapsed), 30);
            assert_eq!(
                status,
                MembershipStatus::DueSoon {
                    days_remaining: 30 - elapsed
                },
                "elapsed = {}",
                elapsed
            );
        }
    }

    #[test]
    fn test_boundary_day_is_due_soon_not_overdue() {
        let today = date("2024-04-15");
        assert_eq!(
            classify(today, days_ago(today, 30), 30),
            MembershipStatus::DueSoon { days_remaining: 0 }
        );
        assert_eq!(
            classify(today, days_ago(today, 31), 30),
            MembershipStatus::Overdue { days_overdue: 1 }
        );
    }

    #[test]
    fn test_overdue() {
        let today = date("2024-04-15");
        assert_eq!(
            classify(today, days_ago(today, 45), 30),
            MembershipStatus::Overdue { days_overdue: 15 }
        );
        for elapsed in 31..120 {
            let status = classify(today, days_ago(today, elapsed), 30);
            assert_eq!(
                status,
                MembershipStatus::Overdue {
                    days_overdue: elapsed - 30
                }
            );
        }
    }

    #[test]
    fn test_exhaustive_partition() {
        // Every elapsed value lands in exactly the expected class
        let today = date("2024-04-15");
        for duration in [7u32, 30, 90, 365] {
            let duration_i = duration as i64;
            for elapsed in 0..(duration_i + 40) {
                let status = classify(today, days_ago(today, elapsed), duration);
                let expected = if elapsed > duration_i {
                    MembershipStatus::Overdue {
                        days_overdue: elapsed - duration_i,
                    }
                } else if elapsed >= duration_i - 5 {
                    MembershipStatus::DueSoon {
                        days_remaining: duration_i - elapsed,
                    }
                } else {
                    MembershipStatus::Current
                };
                assert_eq!(status, expected, "duration={} elapsed={}", duration, elapsed);
            }
        }
    }

    #[test]
    fn test_due_soon_days_remaining_bounds() {
        let today = date("2024-04-15");
        for duration in [7u32, 30, 90] {
            for elapsed in 0..(duration as i64 + 40) {
                if let MembershipStatus::DueSoon { days_remaining } =
                    classify(today, days_ago(today, elapsed), duration)
                {
                    assert!((0..=5).contains(&days_remaining));
                }
            }
        }
    }

    #[test]
    fn test_no_payments() {
        let today = date("2024-04-15");
        for duration in [1u32, 30, 365] {
            assert_eq!(
                classify(today, None, duration),
                MembershipStatus::NoPayments
            );
        }
    }

    #[test]
    fn test_future_dated_payment_is_current() {
        let today = date("2024-04-15");
        assert_eq!(
            classify(today, Some(date("2024-05-01")), 30),
            MembershipStatus::Current
        );
        // Even with a short duration the member is not due yet
        assert_eq!(
            classify(today, Some(date("2024-04-16")), 3),
            MembershipStatus::Current
        );
    }

    #[test]
    fn test_is_debtor() {
        assert!(MembershipStatus::NoPayments.is_debtor());
        assert!(MembershipStatus::Overdue { days_overdue: 1 }.is_debtor());
        assert!(!MembershipStatus::Current.is_debtor());
        assert!(!MembershipStatus::DueSoon { days_remaining: 2 }.is_debtor());
    }
}
