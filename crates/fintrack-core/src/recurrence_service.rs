//! Materialization of due recurring rules into concrete transactions.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use fintrack_domain::{EntryKind, RecurringRule, Transaction};

use crate::{error::ValidationError, validation::validate_rule};

/// Upper bound on occurrences emitted for one rule in a single pass.
pub const MAX_CATCH_UP_OCCURRENCES: usize = 4096;

/// Result of one scheduler pass. Nothing here has been persisted yet.
#[derive(Debug, Clone, Default)]
pub struct SchedulerOutcome {
    pub materialized: Vec<Transaction>,
    /// Only rules whose due date advanced.
    pub updated_rules: Vec<RecurringRule>,
    pub issues: Vec<RuleIssue>,
}

impl SchedulerOutcome {
    pub fn count(&self) -> usize {
        self.materialized.len()
    }

    pub fn has_changes(&self) -> bool {
        !self.materialized.is_empty() || !self.updated_rules.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleIssue {
    pub rule_id: Uuid,
    pub problem: RuleProblem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleProblem {
    /// The rule was skipped entirely.
    Invalid(ValidationError),
    /// The rule advanced but is still overdue; the next pass resumes from there.
    CatchUpLimit { materialized: usize },
    /// The next occurrence falls past the last representable date; the rule
    /// is left without a due date.
    EndOfCalendar { materialized: usize },
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            RuleProblem::Invalid(err) => write!(f, "rule {} skipped: {}", self.rule_id, err),
            RuleProblem::CatchUpLimit { materialized } => write!(
                f,
                "rule {} stopped after {} occurrences and is still overdue",
                self.rule_id, materialized
            ),
            RuleProblem::EndOfCalendar { materialized } => write!(
                f,
                "rule {} stopped after {} occurrences: next due date is out of range",
                self.rule_id, materialized
            ),
        }
    }
}

/// An occurrence a rule will produce, without touching the rule.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingOccurrence {
    pub rule_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category: String,
    pub due: DateTime<Utc>,
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Materializes every due occurrence of every valid rule up to `now`.
    ///
    /// Pure: returns the transactions to create and the rules to update. Invalid
    /// rules are reported in `issues` and do not block the others.
    pub fn process_due_rules(rules: &[RecurringRule], now: DateTime<Utc>) -> SchedulerOutcome {
        let mut outcome = SchedulerOutcome::default();
        for rule in rules {
            if let Err(err) = validate_rule(rule) {
                warn!(rule_id = %rule.id, error = %err, "skipping recurring rule");
                outcome.issues.push(RuleIssue {
                    rule_id: rule.id,
                    problem: RuleProblem::Invalid(err),
                });
                continue;
            }
            if !rule.is_due(now) {
                continue;
            }

            let (materialized, updated, stopped) = Self::catch_up(rule, now);
            if let Some(problem) = stopped {
                warn!(rule_id = %rule.id, problem = ?problem, "recurring rule stopped early");
                outcome.issues.push(RuleIssue {
                    rule_id: rule.id,
                    problem,
                });
            }
            outcome.materialized.extend(materialized);
            outcome.updated_rules.push(updated);
        }
        outcome
    }

    /// Lists occurrences due on or before `now + horizon_days`, oldest first.
    pub fn peek_upcoming(
        rules: &[RecurringRule],
        now: DateTime<Utc>,
        horizon_days: u32,
    ) -> Vec<UpcomingOccurrence> {
        let horizon = now
            .checked_add_signed(Duration::days(i64::from(horizon_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut upcoming = Vec::new();
        for rule in rules.iter().filter(|rule| validate_rule(rule).is_ok()) {
            let mut cursor = rule.next_due_date;
            let mut emitted = 0usize;
            while let Some(due) = cursor.filter(|due| *due <= horizon) {
                if emitted >= MAX_CATCH_UP_OCCURRENCES {
                    break;
                }
                upcoming.push(UpcomingOccurrence {
                    rule_id: rule.id,
                    title: rule.title.clone(),
                    amount: rule.amount,
                    kind: rule.kind,
                    category: rule.category.clone(),
                    due,
                });
                emitted += 1;
                cursor = rule.frequency.advance(due);
            }
        }
        upcoming.sort_by_key(|occurrence| occurrence.due);
        upcoming
    }

    /// Deterministic id for the occurrence of `rule_id` due at `due`.
    pub fn occurrence_id(rule_id: Uuid, due: DateTime<Utc>) -> Uuid {
        Uuid::new_v5(&rule_id, due.to_rfc3339().as_bytes())
    }

    pub fn materialize(rule: &RecurringRule, due: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Self::occurrence_id(rule.id, due),
            user_id: rule.user_id.clone(),
            title: rule.title.clone(),
            amount: rule.amount,
            kind: rule.kind,
            category: rule.category.clone(),
            date: due,
            notes: Some(rule.title.clone()),
            savings_goal_id: None,
            attachment: None,
            recurring_rule_id: Some(rule.id),
        }
    }

    fn catch_up(
        rule: &RecurringRule,
        now: DateTime<Utc>,
    ) -> (Vec<Transaction>, RecurringRule, Option<RuleProblem>) {
        let mut updated = rule.clone();
        let mut materialized = Vec::new();

        while let Some(due) = updated.next_due_date.filter(|due| *due <= now) {
            if materialized.len() >= MAX_CATCH_UP_OCCURRENCES {
                let problem = RuleProblem::CatchUpLimit {
                    materialized: materialized.len(),
                };
                return (materialized, updated, Some(problem));
            }
            debug!(rule_id = %rule.id, due = %due, "materializing occurrence");
            materialized.push(Self::materialize(rule, due));
            updated.last_processed = Some(due);
            // Validated rules always have a recognised frequency, so `None`
            // only means the calendar ran out.
            updated.next_due_date = rule.frequency.advance(due);
            if updated.next_due_date.is_none() {
                let problem = RuleProblem::EndOfCalendar {
                    materialized: materialized.len(),
                };
                return (materialized, updated, Some(problem));
            }
        }
        (materialized, updated, None)
    }
}
