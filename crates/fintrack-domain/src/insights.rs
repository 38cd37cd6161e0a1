//! Read-only view models produced by the aggregation engine.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{budget::Budget, transaction::Transaction};

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Summary {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// Month-over-month percentage change for income and expense.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthTrend {
    pub income_trend_pct: f64,
    pub expense_trend_pct: f64,
}

/// Longest trailing window a daily series will cover (about ten years).
pub const MAX_SERIES_WINDOW_DAYS: u32 = 3_660;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Critical,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => HealthStatus::Critical,
            40..=59 => HealthStatus::Fair,
            60..=79 => HealthStatus::Good,
            _ => HealthStatus::Excellent,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Critical => "Critical",
            HealthStatus::Fair => "Fair",
            HealthStatus::Good => "Good",
            HealthStatus::Excellent => "Excellent",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub score: u8,
    pub savings_rate_pct: f64,
    pub status: HealthStatus,
}

/// A budget with its recomputed spend and derived usage figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub percent_used: f64,
    pub over_limit: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BudgetOverview {
    pub total_budgeted: f64,
    pub total_spent: f64,
    pub total_remaining: f64,
    pub progress_pct: f64,
    pub days_remaining: u32,
    pub safe_daily_spend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub percent: f64,
    pub remaining: f64,
    pub days_left: i64,
    pub complete: bool,
}

/// Entries that share one calendar day, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub has_activity: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompoundProjection {
    pub months: u32,
    pub final_balance: f64,
    pub total_contributed: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanQuote {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// Every derived view for one user at one reference time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub health: HealthReport,
    pub trend: MonthTrend,
    pub daily: Vec<DailyPoint>,
    pub top_income: Vec<CategoryTotal>,
    pub top_expense: Vec<CategoryTotal>,
    pub budgets: Vec<BudgetUsage>,
    pub budget_overview: BudgetOverview,
    pub goals: Vec<GoalProgress>,
}
