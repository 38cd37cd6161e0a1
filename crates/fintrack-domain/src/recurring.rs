//! Automation rules that materialize transactions on a cadence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringRule {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category: String,
    pub frequency: Frequency,
    /// `None` marks a rule that can never be processed until repaired.
    #[serde(default)]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<DateTime<Utc>>,
}

impl RecurringRule {
    /// Creates a rule that is due immediately at `now`.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        category: impl Into<String>,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            amount,
            kind,
            category: category.into(),
            frequency,
            next_due_date: Some(now),
            last_processed: None,
        }
    }

    pub fn starting(mut self, next_due_date: DateTime<Utc>) -> Self {
        self.next_due_date = Some(next_due_date);
        self
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due_date.map(|due| due <= now).unwrap_or(false)
    }
}

impl Identifiable for RecurringRule {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserOwned for RecurringRule {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Amounted for RecurringRule {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for RecurringRule {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.title, self.frequency, self.category)
    }
}
