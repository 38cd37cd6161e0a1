//! Domain model for recorded income and expense entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub kind: EntryKind,
    /// Free-text, case-sensitive grouping key. Never a reference to a `Category` id.
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    /// Rule that materialized this entry, when it came from the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_rule_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            amount,
            kind,
            category: category.into(),
            date,
            notes: None,
            savings_goal_id: None,
            attachment: None,
            recurring_rule_id: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_goal(mut self, goal_id: Uuid) -> Self {
        self.savings_goal_id = Some(goal_id);
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Calendar day (UTC) the entry belongs to.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserOwned for Transaction {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} [{} / {}]", self.title, self.kind, self.category)
    }
}
