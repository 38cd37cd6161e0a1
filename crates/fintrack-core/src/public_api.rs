//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Each function is a pure computation over plain data and a reference
//! timestamp, suitable for frontends that do not want the full service surface.

use chrono::{DateTime, Utc};

use fintrack_domain::{
    Budget, CategoryTotal, DailyPoint, EntryKind, MonthTrend, RecurringRule, SavingsGoal, Summary,
    Transaction,
};

use crate::{
    budget_service::BudgetService,
    goal_service::{FundingOutcome, GoalService},
    recurrence_service::{RecurrenceService, SchedulerOutcome},
    summary_service::SummaryService,
    trend_service::TrendService,
    CoreError,
};

/// Materializes every due occurrence; persistence is left to the caller.
pub fn api_process_due_rules(rules: &[RecurringRule], now: DateTime<Utc>) -> SchedulerOutcome {
    RecurrenceService::process_due_rules(rules, now)
}

pub fn api_summarize(transactions: &[Transaction]) -> Summary {
    SummaryService::summarize(transactions)
}

/// Budgets with `spent` recomputed for the calendar month containing `now`.
pub fn api_budgets_with_spent(
    budgets: &[Budget],
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Vec<Budget> {
    BudgetService::with_spent(budgets, transactions, now)
}

pub fn api_month_over_month_trend(transactions: &[Transaction], now: DateTime<Utc>) -> MonthTrend {
    TrendService::month_over_month(transactions, now)
}

pub fn api_daily_series(
    transactions: &[Transaction],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<DailyPoint> {
    TrendService::daily_series(transactions, now, window_days)
}

pub fn api_top_categories(
    transactions: &[Transaction],
    kind: EntryKind,
    n: usize,
) -> Vec<CategoryTotal> {
    TrendService::top_categories(transactions, kind, n)
}

pub fn api_health_score(summary: &Summary) -> u8 {
    SummaryService::health_score(summary)
}

pub fn api_savings_rate_pct(summary: &Summary) -> f64 {
    SummaryService::savings_rate_pct(summary)
}

/// Goal after adding `amount`; the caller persists it.
pub fn api_fund_goal(goal: &SavingsGoal, amount: f64) -> Result<FundingOutcome, CoreError> {
    GoalService::contribute(goal, amount)
}
