use std::collections::BTreeMap;

use milon_data::{Member, Notification, Payment, PaymentMethod, Plan};
use milon_dues::reminders::{DebtorRow, RenewalReminder};
use milon_dues::stats::{MethodStats, MonthlyStats, PaymentStats};
use milon_dues::MembershipStatus;

macro_rules! next_attr {
    ($old:ident, $new:ident) => {
        if $old != $new {
            format!(" -> {}", $new)
        } else {
            "".to_string()
        }
    };
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

/// Human readable label for a membership status.
pub fn status_label(status: &MembershipStatus) -> String {
    match status {
        MembershipStatus::Current => "current".to_string(),
        MembershipStatus::DueSoon { days_remaining } => {
            format!("due in {} days", days_remaining)
        }
        MembershipStatus::Overdue { days_overdue } => {
            format!("overdue by {} days", days_overdue)
        }
        MembershipStatus::NoPayments => "no payments".to_string(),
    }
}

fn or_none<T: ToString>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "None".to_string(),
    }
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("Name:\t\t\t{}", self.name);
        println!("Phone:\t\t\t{}", self.phone);
        println!("Notes:\t\t\t{}", self.notes);
        println!("Enrolled:\t\t{}", self.enrollment_date);
        println!("Active:\t\t\t{}", self.active);
        println!("Plan:\t\t\t{}", or_none(&self.plan_id));
    }
}

impl PrintFormatted for (Member, Member) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let plan_old = or_none(&old.plan_id);
        let plan_new = or_none(&new.plan_id);

        let next_name = next_attr!(old, new, name);
        println!("Name:\t\t\t{}{}", old.name, next_name);
        let next_phone = next_attr!(old, new, phone);
        println!("Phone:\t\t\t{}{}", old.phone, next_phone);
        let next_notes = next_attr!(old, new, notes);
        println!("Notes:\t\t\t{}{}", old.notes, next_notes);
        let next_enrolled = next_attr!(old, new, enrollment_date);
        println!("Enrolled:\t\t{}{}", old.enrollment_date, next_enrolled);
        let next_active = next_attr!(old, new, active);
        println!("Active:\t\t\t{}{}", old.active, next_active);
        let next_plan = next_attr!(plan_old, plan_new);
        println!("Plan:\t\t\t{}{}", plan_old, next_plan);
    }
}

impl PrintFormatted for Vec<Member> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{:>4}\t{}",
            "ID", "Name", "Phone", "Enrolled", "Plan", "Inactive"
        );
        println!("{:-<100}", "-");

        for member in self {
            let inactive = if member.active { "" } else { "*" };
            println!(
                "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{:>4}\t{}",
                member.id,
                member.name,
                member.phone,
                member.enrollment_date.to_string(),
                or_none(&member.plan_id),
                inactive,
            );
        }
    }
}

impl PrintFormatted for Vec<Plan> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:>12}\t{:>8}",
            "ID", "Name", "Price", "Days"
        );
        println!("{:-<60}", "-");
        for plan in self {
            println!(
                "{:>4}\t{:<24}\t{:>12.2}\t{:>8}",
                plan.id, plan.name, plan.price, plan.duration_days
            );
        }
    }
}

impl PrintFormatted for Vec<Payment> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:>6}\t{:<12}\t{:<8}\t{:>12}\t{:<14}\t{}",
            "ID", "Member", "Date", "Period", "Amount", "Method", "Notes"
        );
        println!("{:-<100}", "-");
        for payment in self {
            println!(
                "{:>4}\t{:>6}\t{:<12}\t{:<8}\t{:>12.2}\t{:<14}\t{}",
                payment.id,
                payment.member_id,
                payment.date.to_string(),
                payment.period,
                payment.amount,
                payment.method.to_string(),
                payment.notes,
            );
        }
    }
}

impl PrintFormatted for Vec<Notification> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:>6}\t{:<12}\t{:<8}\t{:<20}\t{}",
            "ID", "Member", "Kind", "Priority", "Created", "Message"
        );
        println!("{:-<100}", "-");
        for notification in self {
            println!(
                "{:>4}\t{:>6}\t{:<12}\t{:<8}\t{:<20}\t{}",
                notification.id,
                notification.member_id,
                notification.kind.to_string(),
                notification.priority.to_string(),
                notification.created_at.format("%Y-%m-%d %H:%M").to_string(),
                notification.message,
            );
        }
    }
}

impl PrintFormatted for PaymentStats {
    fn print_formatted(&self) {
        println!("Payments:\t\t{}", self.payment_count);
        println!("Revenue:\t\t{:.2}", self.total_revenue);
        println!("Average payment:\t{:.2}", self.average_payment);
        println!("Paying members:\t\t{}", self.distinct_paying_members);
    }
}

impl PrintFormatted for BTreeMap<PaymentMethod, MethodStats> {
    fn print_formatted(&self) {
        for (method, stats) in self {
            println!(
                "{:<14}\t{:>6}\t{:>14.2}",
                method.to_string(),
                stats.payment_count,
                stats.revenue
            );
        }
    }
}

impl PrintFormatted for BTreeMap<String, usize> {
    fn print_formatted(&self) {
        for (bucket, count) in self {
            println!("{:<24}\t{:>6}", bucket, count);
        }
    }
}

impl PrintFormatted for Vec<MonthlyStats> {
    fn print_formatted(&self) {
        println!(
            "{:>5}\t{:>8}\t{:>14}\t{:>14}\t{:>8}",
            "Month", "Payments", "Revenue", "Average", "Members"
        );
        println!("{:-<60}", "-");
        for month in self {
            println!(
                "{:>5}\t{:>8}\t{:>14.2}\t{:>14.2}\t{:>8}",
                month.month,
                month.stats.payment_count,
                month.stats.total_revenue,
                month.stats.average_payment,
                month.stats.distinct_paying_members,
            );
        }
    }
}

impl PrintFormatted for Vec<RenewalReminder> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{:<12}\t{:>4}",
            "ID", "Name", "Phone", "Last Payment", "Due", "Days"
        );
        println!("{:-<100}", "-");
        for reminder in self {
            println!(
                "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{:<12}\t{:>4}",
                reminder.member_id,
                reminder.name,
                reminder.phone,
                reminder.last_payment.to_string(),
                reminder.due_date.to_string(),
                reminder.days_remaining,
            );
        }
    }
}

impl PrintFormatted for Vec<DebtorRow> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{}",
            "ID", "Name", "Phone", "Last Payment", "Days Overdue"
        );
        println!("{:-<100}", "-");
        for debtor in self {
            let days = match debtor.days_overdue {
                Some(days) => days.to_string(),
                None => "no payments".to_string(),
            };
            println!(
                "{:>4}\t{:<24}\t{:<18}\t{:<12}\t{}",
                debtor.member_id,
                debtor.name,
                debtor.phone,
                or_none(&debtor.last_payment),
                days,
            );
        }
    }
}
