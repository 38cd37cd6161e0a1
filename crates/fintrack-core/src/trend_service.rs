//! Month-over-month deltas, trailing daily series and category rankings.

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Duration, Utc};

use fintrack_domain::{
    common::{month_start, previous_month_start, same_month},
    CategoryTotal, DailyPoint, EntryKind, MonthTrend, Transaction, MAX_SERIES_WINDOW_DAYS,
};

use crate::summary_service::SummaryService;

pub const DEFAULT_DAILY_WINDOW: u32 = 30;
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

pub struct TrendService;

impl TrendService {
    /// Percentage change from `previous` to `current`.
    ///
    /// With no previous value the change is 100 when something new appeared
    /// and 0 otherwise.
    pub fn trend_pct(current: f64, previous: f64) -> f64 {
        if previous == 0.0 {
            return if current > previous { 100.0 } else { 0.0 };
        }
        (current - previous) / previous * 100.0
    }

    pub fn month_over_month(transactions: &[Transaction], now: DateTime<Utc>) -> MonthTrend {
        let reference = month_start(now.date_naive());
        let previous = previous_month_start(reference);

        let current = SummaryService::summarize(
            transactions
                .iter()
                .filter(|txn| same_month(txn.day(), reference)),
        );
        let prior = SummaryService::summarize(
            transactions
                .iter()
                .filter(|txn| same_month(txn.day(), previous)),
        );

        MonthTrend {
            income_trend_pct: Self::trend_pct(current.income, prior.income),
            expense_trend_pct: Self::trend_pct(current.expense, prior.expense),
        }
    }

    /// One zero-filled point per day, oldest first, ending on `now`'s day.
    ///
    /// Windows longer than [`MAX_SERIES_WINDOW_DAYS`] are cut to that length.
    /// A window reaching past the representable calendar yields no points.
    pub fn daily_series(
        transactions: &[Transaction],
        now: DateTime<Utc>,
        window_days: u32,
    ) -> Vec<DailyPoint> {
        let window_days = window_days.min(MAX_SERIES_WINDOW_DAYS);
        if window_days == 0 {
            return Vec::new();
        }
        let end = now.date_naive();
        let span = Duration::days(i64::from(window_days) - 1);
        let Some(start) = end.checked_sub_signed(span) else {
            return Vec::new();
        };
        let mut points: Vec<DailyPoint> = start
            .iter_days()
            .take(window_days as usize)
            .map(|date| DailyPoint {
                date,
                income: 0.0,
                expense: 0.0,
            })
            .collect();

        for txn in transactions {
            let offset = (txn.day() - start).num_days();
            if offset < 0 || offset >= i64::from(window_days) {
                continue;
            }
            let point = &mut points[offset as usize];
            match txn.kind {
                EntryKind::Income => point.income += txn.amount,
                EntryKind::Expense => point.expense += txn.amount,
            }
        }
        points
    }

    /// Largest `n` categories of the given kind; ties keep first-seen order.
    pub fn top_categories(
        transactions: &[Transaction],
        kind: EntryKind,
        n: usize,
    ) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for txn in transactions.iter().filter(|txn| txn.kind == kind) {
            match index.get(txn.category.as_str()) {
                Some(&slot) => totals[slot].total += txn.amount,
                None => {
                    index.insert(txn.category.as_str(), totals.len());
                    totals.push(CategoryTotal {
                        category: txn.category.clone(),
                        total: txn.amount,
                    });
                }
            }
        }
        totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        totals.truncate(n);
        totals
    }
}
