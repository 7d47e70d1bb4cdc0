use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use inquire::Confirm;

use milon_data::{
    Delete,
    Insert,
    Member,
    Payment,
    PaymentFilter,
    PaymentMethod,
    Query,
    Retrieve,
};
use milon_db::Connection;
use milon_dues::{datetime, has_payment_for_period};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Payments {
    /// List payments
    #[clap(name="list")]
    List(ListPayments),
    /// Record a payment
    #[clap(name="add")]
    Add(AddPayment),
    /// Delete a payment
    #[clap(name="delete")]
    Delete(DeletePayment),
}

impl Payments {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Payments::List(cmd) => cmd.run(db).await,
            Payments::Add(cmd) => cmd.run(db).await,
            Payments::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListPayments {
    #[clap(short, long)]
    pub member: Option<u32>,
    #[clap(long)]
    pub from: Option<NaiveDate>,
    #[clap(long)]
    pub to: Option<NaiveDate>,
    #[clap(short, long)]
    pub period: Option<String>,
}

impl ListPayments {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = PaymentFilter {
            member_id: self.member,
            date_from: self.from,
            date_to: self.to,
            period: self.period,
            ..Default::default()
        };
        let payments: Vec<Payment> = db.query(&filter).await?;
        println!("{} payments.", payments.len());
        payments.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddPayment {
    #[clap(short, long)]
    pub member: u32,
    #[clap(short, long)]
    pub amount: f64,
    /// Payment date, defaults to today
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Billing period the payment covers, defaults to the
    /// current month
    #[clap(short, long)]
    pub period: Option<String>,
    #[clap(long, default_value_t = PaymentMethod::Cash)]
    pub method: PaymentMethod,
    #[clap(short = 'c', long)]
    pub notes: Option<String>,
}

impl AddPayment {
    /// Run the command and record a payment
    pub async fn run(self, db: &Connection) -> Result<()> {
        if self.amount <= 0.0 {
            bail!("Payment amount must be positive.");
        }
        let member: Member = db
            .retrieve(self.member)
            .await
            .map_err(|_| anyhow!("No member with id {}.", self.member))?;

        let date = self.date.unwrap_or_else(datetime::today);
        let period = self
            .period
            .unwrap_or_else(|| datetime::period_label(date));

        // Advisory only: a second payment for the same period is
        // legitimate, the operator just has to confirm it.
        if has_payment_for_period(db, member.id, &period).await? {
            let prompt_msg = format!(
                "{} already has a payment for {}. Record another one?",
                member.name, period
            );
            let confirm = Confirm::new(&prompt_msg)
            .with_default(false);
            if !confirm.prompt()? {
                return Ok(());
            }
        }

        let payment = db.insert(Payment {
            member_id: member.id,
            amount: self.amount,
            date,
            period,
            method: self.method,
            notes: self.notes.unwrap_or_default(),
            ..Default::default()
        }).await?;
        println!(
            "Payment {} recorded for {} ({} / {}).",
            payment.id, member.name, payment.amount, payment.period
        );

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeletePayment {
    #[clap(short, long)]
    pub id: u32,
}

impl DeletePayment {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let payment: Payment = db.retrieve(self.id).await?;
        let prompt_msg = format!(
            "Delete payment {} ({} / {})?",
            payment.id, payment.amount, payment.period
        );
        let confirm = Confirm::new(&prompt_msg)
        .with_default(false);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(payment).await?;
        Ok(())
    }
}
