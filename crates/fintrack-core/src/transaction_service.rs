//! History views: filtering, day grouping and the month calendar.

use chrono::{Datelike, Duration, NaiveDate};

use fintrack_domain::{
    common::days_in_month, CalendarCell, DayGroup, EntryKind, Transaction,
};

use crate::error::{CoreError, ValidationError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// `None` keeps both kinds.
    pub kind: Option<EntryKind>,
    /// Case-insensitive substring matched against title and category.
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                txn.title.to_lowercase().contains(&term)
                    || txn.category.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    pub fn filter(transactions: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .cloned()
            .collect()
    }

    /// Groups by calendar day, newest day first, keeping input order within a day.
    pub fn group_by_day(transactions: &[Transaction]) -> Vec<DayGroup> {
        let mut groups: Vec<DayGroup> = Vec::new();
        for txn in transactions {
            let day = txn.day();
            match groups.iter_mut().find(|group| group.date == day) {
                Some(group) => group.transactions.push(txn.clone()),
                None => groups.push(DayGroup {
                    date: day,
                    transactions: vec![txn.clone()],
                }),
            }
        }
        groups.sort_by(|a, b| b.date.cmp(&a.date));
        groups
    }

    /// Most recent `limit` entries, newest first.
    pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
        let mut sorted = transactions.to_vec();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(limit);
        sorted
    }

    pub fn month_calendar(
        transactions: &[Transaction],
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarCell>, CoreError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::OutOfRange {
            field: "month",
            value: f64::from(month),
        })?;
        let mut cells: Vec<CalendarCell> = (0..days_in_month(year, month))
            .map(|offset| CalendarCell {
                date: first + Duration::days(i64::from(offset)),
                income: 0.0,
                expense: 0.0,
                has_activity: false,
            })
            .collect();

        for txn in transactions {
            let day = txn.day();
            if day.year() != year || day.month() != month {
                continue;
            }
            let cell = &mut cells[day.day0() as usize];
            cell.has_activity = true;
            match txn.kind {
                EntryKind::Income => cell.income += txn.amount,
                EntryKind::Expense => cell.expense += txn.amount,
            }
        }
        Ok(cells)
    }
}
