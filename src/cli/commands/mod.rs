pub mod budget;
pub mod calc;
pub mod category;
pub mod config;
pub mod goal;
pub mod ledger;
pub mod rule;
pub mod system;
pub mod transaction;

use std::{collections::HashMap, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use fintrack_domain::{EntryKind, Frequency};

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(ledger::definitions());
    commands.extend(transaction::definitions());
    commands.extend(rule::definitions());
    commands.extend(budget::definitions());
    commands.extend(goal::definitions());
    commands.extend(category::definitions());
    commands.extend(calc::definitions());
    commands.extend(config::definitions());
    commands
}

/// Positional arguments plus `--name value` options.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub options: HashMap<&'a str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`, accepting only the option names in `known`.
    pub fn parse(args: &[&'a str], known: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            if !known.contains(&name) {
                return Err(invalid(format!("unknown option `--{name}`")));
            }
            let value = iter
                .next()
                .ok_or_else(|| invalid(format!("option `--{name}` needs a value")))?;
            parsed.options.insert(name, value);
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }
}

pub(crate) fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

/// First argument as a lowercase subcommand name.
pub(crate) fn split_subcommand<'a, 'b>(
    args: &'b [&'a str],
    usage: &str,
) -> Result<(String, &'b [&'a str]), CommandError> {
    match args.split_first() {
        Some((sub, rest)) => Ok((sub.to_lowercase(), rest)),
        None => Err(usage_error(usage)),
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    invalid(format!("usage: {}", usage.lines().next().unwrap_or(usage)))
}

pub(crate) fn parse_amount(label: &str, raw: &str) -> Result<f64, CommandError> {
    let cleaned = raw.trim().replace(['_', ','], "");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(format!("{label} must be a number, got `{raw}`"))),
    }
}

pub(crate) fn parse_number<T: FromStr>(label: &str, raw: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(format!("{label} must be a whole number, got `{raw}`")))
}

pub(crate) fn parse_kind(raw: &str) -> Result<EntryKind, CommandError> {
    EntryKind::parse(raw).ok_or_else(|| invalid(format!("expected income or expense, got `{raw}`")))
}

pub(crate) fn parse_frequency(raw: &str) -> Result<Frequency, CommandError> {
    let frequency = Frequency::from_label(raw);
    if frequency.is_recognized() {
        Ok(frequency)
    } else {
        Err(invalid(format!(
            "expected daily, weekly, monthly or yearly, got `{raw}`"
        )))
    }
}

/// `YYYY-MM-DD`, interpreted as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid(format!("expected a date like 2024-06-30, got `{raw}`")))
}

/// Full id or an unambiguous prefix of at least four characters.
pub(crate) fn resolve_id(
    raw: &str,
    candidates: impl IntoIterator<Item = Uuid>,
    what: &str,
) -> Result<Uuid, CommandError> {
    let needle = raw.trim().to_ascii_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(id);
    }
    if needle.len() < 4 {
        return Err(invalid(format!(
            "{what} id `{raw}` is too short, use at least 4 characters"
        )));
    }
    let matches: Vec<Uuid> = candidates
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(invalid(format!("no {what} matches `{raw}`"))),
        _ => Err(invalid(format!("`{raw}` matches several {what}s"))),
    }
}

pub(crate) fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_split_from_positional_arguments() {
        let args = ["expense", "12.5", "--date", "2024-06-01", "Food"];
        let parsed = ParsedArgs::parse(&args, &["date", "notes"]).unwrap();
        assert_eq!(parsed.positional, ["expense", "12.5", "Food"]);
        assert_eq!(parsed.option("date"), Some("2024-06-01"));
        assert!(ParsedArgs::parse(&["--goal"], &["goal"]).is_err());
        assert!(ParsedArgs::parse(&["--colour", "red"], &["color"]).is_err());
    }

    #[test]
    fn amounts_accept_grouping_and_reject_garbage() {
        assert_eq!(parse_amount("amount", "1,250.75").unwrap(), 1250.75);
        assert_eq!(parse_amount("amount", "2_000").unwrap(), 2000.0);
        assert!(parse_amount("amount", "ten").is_err());
        assert!(parse_amount("amount", "inf").is_err());
    }

    #[test]
    fn dates_are_midnight_utc() {
        let parsed = parse_date("2024-02-29").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn ids_resolve_by_unique_prefix() {
        let a = Uuid::parse_str("aaaa1111-0000-4000-8000-000000000000").unwrap();
        let b = Uuid::parse_str("aaaa2222-0000-4000-8000-000000000000").unwrap();
        assert_eq!(resolve_id("aaaa1", [a, b], "goal").unwrap(), a);
        assert!(resolve_id("aaaa", [a, b], "goal").is_err());
        assert!(resolve_id("bbbb", [a, b], "goal").is_err());
        assert!(resolve_id("aa", [a, b], "goal").is_err());
        assert_eq!(resolve_id(&b.to_string(), [a], "goal").unwrap(), b);
        assert_eq!(short_id(a), "aaaa1111");
    }
}
