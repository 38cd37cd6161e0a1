//! Totals, savings rate and the bounded health score.

use fintrack_domain::{EntryKind, HealthReport, HealthStatus, Summary, Transaction};

pub struct SummaryService;

impl SummaryService {
    /// Sums amounts by entry kind. An empty slice yields all zeros.
    pub fn summarize<'a, I>(transactions: I) -> Summary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (income, expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                    EntryKind::Income => (income + txn.amount, expense),
                    EntryKind::Expense => (income, expense + txn.amount),
                });
        Summary::new(income, expense)
    }

    /// Heuristic score in `[0, 100]`.
    ///
    /// No data at all scores a neutral 50; spending without income scores 0.
    pub fn health_score(summary: &Summary) -> u8 {
        if summary.income == 0.0 && summary.expense == 0.0 {
            return 50;
        }
        if summary.income == 0.0 {
            return 0;
        }
        let savings_rate = (summary.income - summary.expense) / summary.income * 100.0;
        let mut score: f64 = 50.0;
        if savings_rate > 20.0 {
            score += 20.0;
        }
        if savings_rate > 40.0 {
            score += 10.0;
        }
        if summary.expense < summary.income {
            score += 20.0;
        }
        score.clamp(0.0, 100.0).floor() as u8
    }

    pub fn savings_rate_pct(summary: &Summary) -> f64 {
        if summary.income == 0.0 {
            return 0.0;
        }
        ((summary.income - summary.expense) / summary.income * 100.0).max(0.0)
    }

    pub fn health_report(summary: &Summary) -> HealthReport {
        let score = Self::health_score(summary);
        HealthReport {
            score,
            savings_rate_pct: Self::savings_rate_pct(summary),
            status: HealthStatus::from_score(score),
        }
    }
}
