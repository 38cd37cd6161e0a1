//! Shared traits, calendar utilities, and enums for ledger records.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{de::Deserializer, Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Exposes a stable identifier for records stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Associates a record with the single user that owns it.
pub trait UserOwned {
    fn user_id(&self) -> &str;
}

/// Provides read-only access to a record's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts a record into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Direction of money movement. The sign of an amount is never used for this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.pad(label)
    }
}

/// Cadence of a recurring rule.
///
/// Values outside the four known cadences are kept verbatim in
/// [`Frequency::Unrecognized`] so a single malformed record can be reported
/// without failing to load the rest of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Unrecognized(String),
}

impl Frequency {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "yearly" => Frequency::Yearly,
            _ => Frequency::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Unrecognized(_))
    }

    /// Advances `from` by exactly one period, keeping the time of day.
    ///
    /// Month and year steps clamp the day-of-month to the target month's
    /// length (Jan 31 + 1 month = Feb 28/29). Returns `None` for
    /// unrecognized cadences and when the next date is past the calendar's end.
    pub fn advance(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let date = from.date_naive();
        let next = match self {
            Frequency::Daily => date.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => date.checked_add_signed(Duration::weeks(1)),
            Frequency::Monthly => date.checked_add_months(Months::new(1)),
            Frequency::Yearly => date.checked_add_months(Months::new(12)),
            Frequency::Unrecognized(_) => None,
        }?;
        Some(next.and_time(from.time()).and_utc())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
            Frequency::Unrecognized(raw) => return f.pad(&format!("Unrecognized({raw})")),
        };
        f.pad(label)
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Frequency::from_label(&value))
    }
}

/// Shifts a date by whole calendar months, clamping the day to the target month.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month before the one containing `reference`.
///
/// Computed from the first of the reference month so a day-31 reference
/// never skips a shorter month.
pub fn previous_month_start(reference: NaiveDate) -> NaiveDate {
    shift_month(month_start(reference), -1)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_advance_clamps_to_short_month() {
        let jan_31 = Utc.with_ymd_and_hms(2025, 1, 31, 9, 30, 0).unwrap();
        let next = Frequency::Monthly.advance(jan_31).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 2, 28, 9, 30, 0).unwrap());

        let leap = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let next = Frequency::Monthly.advance(leap).unwrap();
        assert_eq!(next.date_naive(), date(2024, 2, 29));
    }

    #[test]
    fn yearly_advance_from_leap_day() {
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let next = Frequency::Yearly.advance(leap_day).unwrap();
        assert_eq!(next.date_naive(), date(2025, 2, 28));
    }

    #[test]
    fn daily_and_weekly_advance() {
        let start = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(
            Frequency::Daily.advance(start).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap()
        );
        assert_eq!(
            Frequency::Weekly.advance(start).unwrap().date_naive(),
            date(2026, 1, 7)
        );
    }

    #[test]
    fn advance_stops_at_the_end_of_the_calendar() {
        let last = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert!(Frequency::Daily.advance(last).is_none());
        assert!(Frequency::Weekly.advance(last).is_none());
        assert!(Frequency::Monthly.advance(last).is_none());
        assert!(Frequency::Yearly.advance(last).is_none());

        let day_before = last - Duration::days(1);
        assert_eq!(Frequency::Daily.advance(day_before), Some(last));
    }

    #[test]
    fn unrecognized_frequency_does_not_advance() {
        let freq = Frequency::from_label("fortnightly");
        assert_eq!(freq, Frequency::Unrecognized("fortnightly".into()));
        assert!(freq.advance(Utc::now()).is_none());
    }

    #[test]
    fn frequency_deserializes_leniently() {
        let known: Frequency = serde_json::from_str("\"Monthly\"").unwrap();
        assert_eq!(known, Frequency::Monthly);
        let unknown: Frequency = serde_json::from_str("\"hourly\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"hourly\"");
    }

    #[test]
    fn previous_month_start_handles_month_ends() {
        assert_eq!(previous_month_start(date(2025, 3, 31)), date(2025, 2, 1));
        assert_eq!(previous_month_start(date(2025, 1, 15)), date(2024, 12, 1));
    }

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(date(2025, 11, 30), 3), date(2026, 2, 28));
        assert_eq!(shift_month(date(2025, 1, 31), -2), date(2024, 11, 30));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
