use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// What a reminder notification is about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Overdue,
    DueSoon,
    NoPayments,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Overdue => "overdue",
            NotificationKind::DueSoon => "due-soon",
            NotificationKind::NoPayments => "no-payments",
        }
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::NoPayments
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Normal => "normal",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NotificationFilter {
    pub member_id: Option<u32>,
    pub kind: Option<NotificationKind>,
    pub unread_only: bool,
    /// Calendar date of `created_at`.
    pub created_on: Option<NaiveDate>,
}

/// A reminder record produced by the notification scan.
/// Only the read flag is ever mutated after creation.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub member_id: u32,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub read: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}
