use chrono::{Datelike, Months, NaiveDate};

/// Today as a calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Now as a local timestamp.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// First day of the month the date falls in.
pub trait AlignStart {
    fn align_start(&self) -> Self;
}

impl AlignStart for NaiveDate {
    fn align_start(&self) -> Self {
        self.with_day(1).unwrap()
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = start
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    Some((start, end))
}

/// The YYYY-MM period label for a date.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
