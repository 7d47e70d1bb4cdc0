use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use inquire::Confirm;

use milon_data::{
    Delete,
    Insert,
    Member,
    MemberFilter,
    Plan,
    Query,
    Retrieve,
    Update,
};
use milon_db::Connection;
use milon_dues::{datetime, member_standing};

use crate::formatting::{status_label, PrintFormatted};

#[derive(Subcommand, Debug)]
pub enum Members {
    /// Show a member
    #[clap(name="show")]
    Show(ShowMember),
    /// List members
    #[clap(name="list")]
    List(ListMembers),
    /// Add a member
    #[clap(name="add")]
    Add(AddMember),
    /// Update a member
    #[clap(name="set")]
    Update(UpdateMember),
    /// Delete a member
    #[clap(name="delete")]
    Delete(DeleteMember),
}

impl Members {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Members::Show(cmd) => cmd.run(db).await,
            Members::List(cmd) => cmd.run(db).await,
            Members::Add(cmd) => cmd.run(db).await,
            Members::Update(cmd) => cmd.run(db).await,
            Members::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    #[clap(short, long)]
    pub id: u32,
}

impl ShowMember {
    /// Run the command and show a member with their standing
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        let standing =
            member_standing(db, member.clone(), datetime::today()).await?;

        println!();
        member.print_formatted();
        println!("Status:\t\t\t{}", status_label(&standing.status));
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    #[clap(short, long)]
    pub id: Option<u32>,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub plan: Option<u32>,
    /// Only list active members
    #[clap(short, long)]
    pub active: bool,
}

impl ListMembers {
    /// Run the command and list members
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = MemberFilter {
            id: self.id,
            name: self.name,
            plan_id: self.plan,
            active: self.active.then_some(true),
            ..Default::default()
        };

        let members: Vec<Member> = db.query(&filter).await?;
        println!("{} members.", members.len());
        members.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddMember {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub phone: Option<String>,
    #[clap(short = 'c', long)]
    pub notes: Option<String>,
    #[clap(long)]
    pub enrolled: Option<NaiveDate>,
    #[clap(long)]
    pub plan: Option<u32>,
}

impl AddMember {
    /// Run the command and add a member to the database
    pub async fn run(self, db: &Connection) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Member name must not be empty.");
        }
        // The plan has to exist before anyone subscribes to it
        if let Some(plan_id) = self.plan {
            let _: Plan = db
                .retrieve(plan_id)
                .await
                .map_err(|_| anyhow!("No plan with id {}.", plan_id))?;
        }

        let member = Member {
            name: self.name,
            phone: self.phone.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            enrollment_date: self.enrolled.unwrap_or_else(datetime::today),
            active: true,
            plan_id: self.plan,
            ..Default::default()
        };

        println!();
        member.print_formatted();
        println!();

        let confirm = Confirm::new("Add member?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let member = db.insert(member).await?;
        println!("Member added with id {}.", member.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateMember {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub phone: Option<String>,
    #[clap(short = 'c', long)]
    pub notes: Option<String>,
    #[clap(long)]
    pub enrolled: Option<NaiveDate>,
    #[clap(long)]
    pub plan: Option<u32>,
    /// Clear the assigned plan
    #[clap(long, conflicts_with = "plan")]
    pub no_plan: bool,
    #[clap(long, conflicts_with = "inactive")]
    pub active: bool,
    #[clap(long)]
    pub inactive: bool,
}

impl UpdateMember {
    /// Run command and update a member
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        let mut update = member.clone();

        if let Some(name) = self.name {
            if name.trim().is_empty() {
                bail!("Member name must not be empty.");
            }
            update.name = name;
        }
        if let Some(phone) = self.phone {
            update.phone = phone;
        }
        if let Some(notes) = self.notes {
            update.notes = notes;
        }
        if let Some(enrolled) = self.enrolled {
            update.enrollment_date = enrolled;
        }
        if let Some(plan_id) = self.plan {
            let _: Plan = db
                .retrieve(plan_id)
                .await
                .map_err(|_| anyhow!("No plan with id {}.", plan_id))?;
            update.plan_id = Some(plan_id);
        }
        if self.no_plan {
            update.plan_id = None;
        }
        if self.active {
            update.active = true;
        }
        if self.inactive {
            update.active = false;
        }

        println!();
        (member, update.clone()).print_formatted();
        println!();
        let confirm = Confirm::new("Update member?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        db.update(update).await?;
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteMember {
    #[clap(short, long)]
    pub id: u32,
}

impl DeleteMember {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        println!();
        member.print_formatted();
        println!();
        let confirm = Confirm::new("Delete member from database?")
            .with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(member).await?;
        Ok(())
    }
}
