use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};

use milon_db::Connection;
use milon_dues::datetime::{self, AlignStart};
use milon_dues::stats::{
    self,
    PaymentStats,
};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Report {
    /// Financial and membership summary for a period
    #[clap(name="period")]
    Period(PeriodReport),
    /// Month by month breakdown of a year
    #[clap(name="monthly")]
    Monthly(MonthlyReport),
}

impl Report {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Report::Period(cmd) => cmd.run(db).await,
            Report::Monthly(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct PeriodReport {
    /// First day of the period, defaults to the first of the
    /// current month
    #[clap(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the period (inclusive), defaults to today
    #[clap(long)]
    pub to: Option<NaiveDate>,
}

impl PeriodReport {
    /// Run the report. Aggregation failures degrade to a
    /// zeroed summary instead of aborting the host.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let today = datetime::today();
        let from = self.from.unwrap_or_else(|| today.align_start());
        let to = self.to.unwrap_or(today);

        // A broken ledger degrades to an empty report
        let summary = match stats::aggregate(db, from, to).await {
            Ok(summary) => summary,
            Err(err) => {
                log::warn!("payment aggregation failed: {}", err);
                println!();
                println!("Report {} .. {} (no data available)", from, to);
                PaymentStats::default().print_formatted();
                return Ok(());
            }
        };

        println!();
        println!("Report {} .. {}", from, to);
        println!("{:-<60}", "-");
        summary.print_formatted();

        let methods = stats::revenue_by_method(db, from, to).await?;
        if !methods.is_empty() {
            println!();
            println!("By payment method:");
            methods.print_formatted();
        }

        let new_members = stats::new_members_in_period(db, from, to).await?;
        let active_members =
            stats::active_members_in_period(db, from, to).await?;
        println!();
        println!("New members:\t\t{}", new_members);
        println!("Paying members:\t\t{}", active_members);

        let plans = stats::members_by_plan(db).await?;
        if !plans.is_empty() {
            println!();
            println!("Members by plan:");
            plans.print_formatted();
        }
        println!();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MonthlyReport {
    /// Defaults to the current year
    #[clap(short, long)]
    pub year: Option<i32>,
}

impl MonthlyReport {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let year = self.year.unwrap_or_else(|| datetime::today().year());
        let breakdown = stats::monthly_breakdown(db, year).await?;

        println!();
        println!("Monthly report {}", year);
        breakdown.print_formatted();

        let count: usize =
            breakdown.iter().map(|m| m.stats.payment_count).sum();
        let revenue: f64 =
            breakdown.iter().map(|m| m.stats.total_revenue).sum();
        println!("{:-<60}", "-");
        println!("{:>5}\t{:>8}\t{:>14.2}", "Total", count, revenue);
        println!();

        Ok(())
    }
}
