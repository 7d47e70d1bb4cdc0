use clap::{Parser, Subcommand};

use crate::commands::{
    Members,
    Notifications,
    Payments,
    Plans,
    Reminders,
    Report,
};

#[derive(Parser, Debug)]
#[clap(name = "milon", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// The gym database
    #[clap(long, env = "MILON_DB", default_value = "milon.sqlite3")]
    pub database: String,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage members
    #[clap(subcommand)]
    Members(Members),
    /// Manage subscription plans
    #[clap(subcommand)]
    Plans(Plans),
    /// Manage payments
    #[clap(subcommand)]
    Payments(Payments),
    /// Reminder notifications
    #[clap(subcommand)]
    Notifications(Notifications),
    /// Period reports
    #[clap(subcommand)]
    Report(Report),
    /// Renewal reminders and debtors
    #[clap(subcommand)]
    Reminders(Reminders),
}
