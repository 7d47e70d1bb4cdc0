use anyhow::Result;
use clap::{Args, Subcommand};

use milon_db::Connection;
use milon_dues::{datetime, generate_notifications, purge_read_notifications};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Notifications {
    /// Scan all members and create due reminders
    #[clap(name="scan")]
    Scan(ScanNotifications),
    /// List unread notifications
    #[clap(name="list")]
    List(ListNotifications),
    /// Mark a notification as read
    #[clap(name="read")]
    Read(ReadNotification),
    /// Delete old read notifications
    #[clap(name="purge")]
    Purge(PurgeNotifications),
}

impl Notifications {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Notifications::Scan(cmd) => cmd.run(db).await,
            Notifications::List(cmd) => cmd.run(db).await,
            Notifications::Read(cmd) => cmd.run(db).await,
            Notifications::Purge(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScanNotifications {}

impl ScanNotifications {
    /// Run the notification scan. A storage failure degrades
    /// to an empty scan instead of aborting the host.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let created = match generate_notifications(db, datetime::now()).await {
            Ok(created) => created,
            Err(err) => {
                log::warn!("notification scan failed: {}", err);
                println!("Notification scan unavailable.");
                0
            }
        };
        println!("{} notifications created.", created);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListNotifications {}

impl ListNotifications {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let notifications = db.list_unread().await?;
        println!("{} unread notifications.", notifications.len());
        notifications.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ReadNotification {
    #[clap(short, long)]
    pub id: u32,
}

impl ReadNotification {
    pub async fn run(self, db: &Connection) -> Result<()> {
        db.mark_read(self.id).await?;
        println!("Notification {} marked as read.", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PurgeNotifications {
    /// Retention window in days for read notifications
    #[clap(short, long, default_value_t = 30)]
    pub days: u32,
}

impl PurgeNotifications {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let deleted = purge_read_notifications(db, self.days).await?;
        println!("{} notifications deleted.", deleted);
        Ok(())
    }
}
