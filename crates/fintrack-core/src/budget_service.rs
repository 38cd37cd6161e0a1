//! Budget spend rollups for the current calendar month.

use chrono::{DateTime, Datelike, Utc};

use fintrack_domain::{
    common::{days_in_month, same_month},
    Budget, BudgetOverview, BudgetUsage, Transaction,
};

pub struct BudgetService;

impl BudgetService {
    /// Returns copies of `budgets` with `spent` recomputed from this month's expenses.
    ///
    /// Matching is an exact, case-sensitive comparison on the category text.
    /// Duplicate budgets for one category each receive the full total.
    pub fn with_spent(
        budgets: &[Budget],
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Vec<Budget> {
        let reference = now.date_naive();
        budgets
            .iter()
            .map(|budget| {
                let spent = transactions
                    .iter()
                    .filter(|txn| {
                        txn.is_expense()
                            && txn.category == budget.category
                            && same_month(txn.day(), reference)
                    })
                    .map(|txn| txn.amount)
                    .sum();
                Budget {
                    spent,
                    ..budget.clone()
                }
            })
            .collect()
    }

    pub fn usage(budget: &Budget) -> BudgetUsage {
        let percent_used = if budget.limit > 0.0 {
            budget.spent / budget.limit * 100.0
        } else if budget.spent > 0.0 {
            100.0
        } else {
            0.0
        };
        BudgetUsage {
            budget: budget.clone(),
            percent_used,
            over_limit: budget.is_over_limit(),
        }
    }

    /// Month totals over budgets whose `spent` is already current.
    pub fn overview(budgets: &[Budget], now: DateTime<Utc>) -> BudgetOverview {
        let total_budgeted: f64 = budgets.iter().map(|budget| budget.limit).sum();
        let total_spent: f64 = budgets.iter().map(|budget| budget.spent).sum();
        let total_remaining = (total_budgeted - total_spent).max(0.0);
        let progress_pct = if total_budgeted > 0.0 {
            total_spent / total_budgeted * 100.0
        } else {
            0.0
        };

        let today = now.date_naive();
        let days_remaining = days_in_month(today.year(), today.month()) - today.day();
        let safe_daily_spend = if days_remaining > 0 {
            total_remaining / f64::from(days_remaining)
        } else {
            0.0
        };

        BudgetOverview {
            total_budgeted,
            total_spent,
            total_remaining,
            progress_pct,
            days_remaining,
            safe_daily_spend,
        }
    }
}
