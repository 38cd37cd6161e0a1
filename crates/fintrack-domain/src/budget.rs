//! Monthly spending limits keyed by category name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Spending limit for one category.
///
/// `spent` as stored is only a cache and defaults to zero. Aggregation always
/// recomputes it from the current month's expense entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub spent: f64,
}

impl Budget {
    pub fn new(user_id: impl Into<String>, category: impl Into<String>, limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            category: category.into(),
            limit,
            spent: 0.0,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserOwned for Budget {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl NamedEntity for Budget {
    fn name(&self) -> &str {
        &self.category
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!("{} (limit {:.2})", self.category, self.limit)
    }
}
