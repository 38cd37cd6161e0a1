//! Goal funding, progress and drift detection.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use fintrack_domain::{GoalProgress, Ledger, SavingsGoal};

use crate::{error::CoreError, validation::positive_amount};

const DRIFT_TOLERANCE: f64 = 1e-6;

/// A goal after one contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingOutcome {
    pub goal: SavingsGoal,
    pub previous_amount: f64,
    /// True only when this contribution crossed the target.
    pub completed_now: bool,
}

/// Difference between a goal's stored total and what its funding sources add up to.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDrift {
    pub goal_id: Uuid,
    pub name: String,
    pub recorded: f64,
    pub expected: f64,
}

impl fmt::Display for GoalDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "goal `{}` ({}) records {:.2} but linked funds total {:.2}",
            self.name, self.goal_id, self.recorded, self.expected
        )
    }
}

pub struct GoalService;

impl GoalService {
    /// Adds `amount` to the goal's current total.
    pub fn contribute(goal: &SavingsGoal, amount: f64) -> Result<FundingOutcome, CoreError> {
        positive_amount("amount", amount)?;
        let previous_amount = goal.current_amount;
        let mut updated = goal.clone();
        updated.current_amount += amount;
        Ok(FundingOutcome {
            completed_now: !goal.is_complete() && updated.is_complete(),
            goal: updated,
            previous_amount,
        })
    }

    /// A contribution that is not tied to any transaction.
    pub fn add_manual_funds(goal: &SavingsGoal, amount: f64) -> Result<FundingOutcome, CoreError> {
        let mut outcome = Self::contribute(goal, amount)?;
        outcome.goal.manual_funds += amount;
        Ok(outcome)
    }

    pub fn progress(goal: &SavingsGoal, now: DateTime<Utc>) -> GoalProgress {
        let percent = if goal.target_amount > 0.0 {
            (goal.current_amount / goal.target_amount * 100.0).min(100.0)
        } else {
            100.0
        };
        let seconds_left = (goal.deadline - now).num_seconds().max(0);
        GoalProgress {
            goal_id: goal.id,
            name: goal.name.clone(),
            current_amount: goal.current_amount,
            target_amount: goal.target_amount,
            percent,
            remaining: (goal.target_amount - goal.current_amount).max(0.0),
            days_left: (seconds_left + 86_399) / 86_400,
            complete: goal.is_complete(),
        }
    }

    /// Manual funds plus every transaction linked to the goal.
    pub fn expected_total(ledger: &Ledger, goal: &SavingsGoal) -> f64 {
        goal.manual_funds
            + ledger
                .goal_transactions(goal.id)
                .map(|txn| txn.amount)
                .sum::<f64>()
    }

    pub fn reconcile(ledger: &Ledger) -> Vec<GoalDrift> {
        ledger
            .savings_goals
            .iter()
            .filter_map(|goal| {
                let expected = Self::expected_total(ledger, goal);
                ((goal.current_amount - expected).abs() > DRIFT_TOLERANCE).then(|| GoalDrift {
                    goal_id: goal.id,
                    name: goal.name.clone(),
                    recorded: goal.current_amount,
                    expected,
                })
            })
            .collect()
    }

    /// Goals whose total differs from their funding sources, already corrected.
    pub fn recompute(ledger: &Ledger) -> Vec<SavingsGoal> {
        Self::reconcile(ledger)
            .into_iter()
            .filter_map(|drift| {
                ledger.goal(drift.goal_id).map(|goal| SavingsGoal {
                    current_amount: drift.expected,
                    ..goal.clone()
                })
            })
            .collect()
    }
}
