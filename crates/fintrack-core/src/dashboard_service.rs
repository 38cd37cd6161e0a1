//! One-pass composition of every view model for a ledger snapshot.

use chrono::{DateTime, Utc};

use fintrack_domain::{Dashboard, EntryKind, Ledger};

use crate::{
    budget_service::BudgetService,
    goal_service::GoalService,
    summary_service::SummaryService,
    trend_service::{TrendService, DEFAULT_DAILY_WINDOW, DEFAULT_TOP_CATEGORIES},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub daily_window_days: u32,
    pub top_categories: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            daily_window_days: DEFAULT_DAILY_WINDOW,
            top_categories: DEFAULT_TOP_CATEGORIES,
        }
    }
}

pub struct DashboardService;

impl DashboardService {
    pub fn build(ledger: &Ledger, now: DateTime<Utc>, options: DashboardOptions) -> Dashboard {
        let transactions = &ledger.transactions;
        let summary = SummaryService::summarize(transactions);
        let budgets = BudgetService::with_spent(&ledger.budgets, transactions, now);

        Dashboard {
            generated_at: now,
            summary,
            health: SummaryService::health_report(&summary),
            trend: TrendService::month_over_month(transactions, now),
            daily: TrendService::daily_series(transactions, now, options.daily_window_days),
            top_income: TrendService::top_categories(
                transactions,
                EntryKind::Income,
                options.top_categories,
            ),
            top_expense: TrendService::top_categories(
                transactions,
                EntryKind::Expense,
                options.top_categories,
            ),
            budget_overview: BudgetService::overview(&budgets, now),
            budgets: budgets.iter().map(BudgetService::usage).collect(),
            goals: ledger
                .savings_goals
                .iter()
                .map(|goal| GoalService::progress(goal, now))
                .collect(),
        }
    }
}
