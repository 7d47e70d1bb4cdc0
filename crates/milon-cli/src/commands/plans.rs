use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use inquire::Confirm;

use milon_data::{
    Delete,
    Insert,
    Member,
    MemberFilter,
    Plan,
    PlanFilter,
    Query,
    Retrieve,
    Update,
};
use milon_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Plans {
    /// List plans
    #[clap(name="list")]
    List(ListPlans),
    /// Add a plan
    #[clap(name="add")]
    Add(AddPlan),
    /// Update a plan
    #[clap(name="set")]
    Update(UpdatePlan),
    /// Delete a plan
    #[clap(name="delete")]
    Delete(DeletePlan),
}

impl Plans {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Plans::List(cmd) => cmd.run(db).await,
            Plans::Add(cmd) => cmd.run(db).await,
            Plans::Update(cmd) => cmd.run(db).await,
            Plans::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListPlans {
    #[clap(short, long)]
    pub name: Option<String>,
}

impl ListPlans {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = PlanFilter {
            name: self.name,
            ..Default::default()
        };
        let plans: Vec<Plan> = db.query(&filter).await?;
        println!("{} plans.", plans.len());
        plans.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddPlan {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub price: f64,
    #[clap(short, long)]
    pub duration_days: u32,
}

impl AddPlan {
    pub async fn run(self, db: &Connection) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Plan name must not be empty.");
        }
        if self.duration_days == 0 {
            bail!("Plan duration must be a positive number of days.");
        }
        if self.price <= 0.0 {
            bail!("Plan price must be positive.");
        }

        let plan = db.insert(Plan {
            name: self.name,
            price: self.price,
            duration_days: self.duration_days,
            ..Default::default()
        }).await?;
        println!("Plan added with id {}.", plan.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdatePlan {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub price: Option<f64>,
    #[clap(short, long)]
    pub duration_days: Option<u32>,
}

impl UpdatePlan {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let mut plan: Plan = db.retrieve(self.id).await?;

        if let Some(name) = self.name {
            if name.trim().is_empty() {
                bail!("Plan name must not be empty.");
            }
            plan.name = name;
        }
        if let Some(price) = self.price {
            if price <= 0.0 {
                bail!("Plan price must be positive.");
            }
            plan.price = price;
        }
        if let Some(duration_days) = self.duration_days {
            if duration_days == 0 {
                bail!("Plan duration must be a positive number of days.");
            }
            plan.duration_days = duration_days;
        }

        let plan = db.update(plan).await?;
        println!("Plan {} updated.", plan.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeletePlan {
    #[clap(short, long)]
    pub id: u32,
}

impl DeletePlan {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let plan: Plan = db.retrieve(self.id).await?;

        // Warn when members still subscribe to the plan
        let members: Vec<Member> = db.query(&MemberFilter {
            plan_id: Some(plan.id),
            ..Default::default()
        }).await?;
        let prompt = if members.is_empty() {
            format!("Delete plan '{}'?", plan.name)
        } else {
            format!(
                "{} members are on plan '{}'. Delete it anyway?",
                members.len(),
                plan.name
            )
        };

        let confirm = Confirm::new(&prompt).with_default(false);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(plan).await?;
        Ok(())
    }
}
