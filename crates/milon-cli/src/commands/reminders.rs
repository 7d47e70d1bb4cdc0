use anyhow::Result;
use clap::{Args, Subcommand};

use milon_db::Connection;
use milon_dues::datetime;
use milon_dues::reminders::{debtors, upcoming_renewals};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Reminders {
    /// Members whose membership runs out soon
    #[clap(name="upcoming")]
    Upcoming(UpcomingReminders),
    /// Members who are overdue or never paid
    #[clap(name="debtors")]
    Debtors(ListDebtors),
}

impl Reminders {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Reminders::Upcoming(cmd) => cmd.run(db).await,
            Reminders::Debtors(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpcomingReminders {
    /// How many days ahead to look
    #[clap(short, long, default_value_t = 5)]
    pub within: i64,
}

impl UpcomingReminders {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let reminders =
            upcoming_renewals(db, datetime::today(), self.within).await?;
        println!(
            "{} members due within {} days.",
            reminders.len(),
            self.within
        );
        reminders.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListDebtors {}

impl ListDebtors {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let rows = debtors(db, datetime::today()).await?;
        println!("{} debtors.", rows.len());
        rows.print_formatted();
        Ok(())
    }
}
