use anyhow::Result;

use milon_cli::cli::{Cli, Command};
use milon_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::init();

    let db = Connection::open(&cli.database).await?;
    match cli.command {
        Command::Members(cmd) => cmd.run(&db).await,
        Command::Plans(cmd) => cmd.run(&db).await,
        Command::Payments(cmd) => cmd.run(&db).await,
        Command::Notifications(cmd) => cmd.run(&db).await,
        Command::Report(cmd) => cmd.run(&db).await,
        Command::Reminders(cmd) => cmd.run(&db).await,
    }?;

    Ok(())
}
