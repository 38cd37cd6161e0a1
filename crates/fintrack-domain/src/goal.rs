//! Savings goals funded by linked transactions and manual contributions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::Deserializer, Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: DateTime<Utc>,
    pub color: String,
    /// Running total of "add funds" contributions not tied to a transaction.
    #[serde(default)]
    pub manual_funds: f64,
}

impl SavingsGoal {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        target_amount: f64,
        deadline: DateTime<Utc>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline,
            color: color.into(),
            manual_funds: 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserOwned for SavingsGoal {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl NamedEntity for SavingsGoal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for SavingsGoal {
    fn amount(&self) -> f64 {
        self.current_amount
    }
}

impl Displayable for SavingsGoal {
    fn display_label(&self) -> String {
        format!(
            "{} ({:.2}/{:.2})",
            self.name, self.current_amount, self.target_amount
        )
    }
}

/// How goal totals relate to the transactions linked to them.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalFundingPolicy {
    /// Goals change only through funding operations; drift is reported.
    #[default]
    Incremental,
    /// Goal totals are rebuilt from linked transactions and manual funds on every refresh.
    RecomputeOnLoad,
}

impl GoalFundingPolicy {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "incremental" => Some(GoalFundingPolicy::Incremental),
            "recompute_on_load" | "recompute" => Some(GoalFundingPolicy::RecomputeOnLoad),
            _ => None,
        }
    }
}

impl fmt::Display for GoalFundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalFundingPolicy::Incremental => "incremental",
            GoalFundingPolicy::RecomputeOnLoad => "recompute_on_load",
        };
        f.pad(label)
    }
}

impl<'de> Deserialize<'de> for GoalFundingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(GoalFundingPolicy::from_label)
            .unwrap_or_default())
    }
}
