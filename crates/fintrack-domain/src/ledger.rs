//! Per-user snapshot of every ledger collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    budget::Budget, category::Category, goal::SavingsGoal, recurring::RecurringRule,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Complete set of a user's records as loaded from a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub user_id: String,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub recurring_rules: Vec<RecurringRule>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ledger {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
            budgets: Vec::new(),
            categories: Vec::new(),
            recurring_rules: Vec::new(),
            savings_goals: Vec::new(),
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.budgets.is_empty()
            && self.categories.is_empty()
            && self.recurring_rules.is_empty()
            && self.savings_goals.is_empty()
    }

    pub fn goal(&self, id: Uuid) -> Option<&SavingsGoal> {
        self.savings_goals.iter().find(|goal| goal.id == id)
    }

    pub fn rule(&self, id: Uuid) -> Option<&RecurringRule> {
        self.recurring_rules.iter().find(|rule| rule.id == id)
    }

    /// Transactions explicitly linked to the given goal.
    pub fn goal_transactions(&self, goal_id: Uuid) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |txn| txn.savings_goal_id == Some(goal_id))
    }

    fn schema_version_default() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}
