use anyhow::Result;
use clap::{Parser, Subcommand};

use milon_db::{schema, Connection};

#[derive(Parser, Debug)]
#[clap(name = "milon-setup")]
struct Cli {
    #[clap(default_value = "milon.sqlite3")]
    pub database: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init,
}

/// Initialize the database
async fn db_init(filename: &str) -> Result<()> {
    let db = Connection::create(filename).await?;
    schema::install(&db).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Init => db_init(&cli.database).await?,
    }
    Ok(())
}
