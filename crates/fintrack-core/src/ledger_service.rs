//! Session orchestration: load, schedule, persist, fund, reload.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use fintrack_domain::{Category, GoalFundingPolicy, Ledger, SavingsGoal, Transaction};

use crate::{
    category_service::CategoryService,
    error::CoreError,
    goal_service::{FundingOutcome, GoalService},
    recurrence_service::{RecurrenceService, RuleIssue},
    storage::{insert_unique, ledger_warnings, replace_existing, LedgerStore, RejectedRecord},
    validation::{validate_category, validate_transaction},
};

/// Fresh snapshot plus everything noteworthy that happened while producing it.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub ledger: Ledger,
    pub materialized: usize,
    /// Materialized occurrences that were already stored.
    pub duplicates_skipped: usize,
    pub recomputed_goals: usize,
    pub issues: Vec<RuleIssue>,
    pub rejected: Vec<RejectedRecord>,
    pub warnings: Vec<String>,
}

/// What happened when a transaction was recorded.
#[derive(Debug)]
pub struct RecordOutcome {
    pub transaction: Transaction,
    pub created_category: Option<Category>,
    pub funding: Option<FundingOutcome>,
    /// Set when the linked goal could not be funded. The transaction is kept.
    pub funding_error: Option<CoreError>,
}

pub struct LedgerService;

impl LedgerService {
    /// Runs the session-start flow for `user_id` against `store`.
    pub fn refresh(
        store: &dyn LedgerStore,
        user_id: &str,
        now: DateTime<Utc>,
        policy: GoalFundingPolicy,
    ) -> Result<SessionReport, CoreError> {
        let initial = store.load(user_id)?;
        let outcome = RecurrenceService::process_due_rules(&initial.ledger.recurring_rules, now);
        let mut changed = false;
        let mut duplicates_skipped = 0usize;

        if outcome.has_changes() {
            let mut inserted = 0usize;
            store.update(user_id, &mut |ledger| {
                let known: HashSet<Uuid> = ledger.transactions.iter().map(|txn| txn.id).collect();
                for txn in &outcome.materialized {
                    if known.contains(&txn.id) {
                        duplicates_skipped += 1;
                    } else {
                        ledger.transactions.push(txn.clone());
                        inserted += 1;
                    }
                }
                for rule in &outcome.updated_rules {
                    replace_existing(
                        &mut ledger.recurring_rules,
                        rule.clone(),
                        CoreError::RuleNotFound,
                    )?;
                }
                Ok(())
            })?;
            changed = true;
            if duplicates_skipped > 0 {
                warn!(
                    user = user_id,
                    duplicates_skipped, "materialized occurrences already stored"
                );
            }
            info!(
                user = user_id,
                inserted,
                rules = outcome.updated_rules.len(),
                "recurring rules processed"
            );
        }

        let mut report = if changed { store.load(user_id)? } else { initial };
        let mut warnings = Vec::new();
        let mut recomputed_goals = 0usize;

        match policy {
            GoalFundingPolicy::Incremental => {
                warnings.extend(
                    GoalService::reconcile(&report.ledger)
                        .iter()
                        .map(ToString::to_string),
                );
            }
            GoalFundingPolicy::RecomputeOnLoad => {
                let corrected = GoalService::recompute(&report.ledger);
                if !corrected.is_empty() {
                    recomputed_goals = corrected.len();
                    store.update(user_id, &mut |ledger| {
                        for goal in &corrected {
                            replace_existing(
                                &mut ledger.savings_goals,
                                goal.clone(),
                                CoreError::GoalNotFound,
                            )?;
                        }
                        Ok(())
                    })?;
                    info!(user = user_id, goals = recomputed_goals, "goal totals recomputed");
                    report = store.load(user_id)?;
                }
            }
        }

        for rejected in &report.rejected {
            warn!(
                user = user_id,
                collection = rejected.collection,
                position = rejected.position,
                error = %rejected.error,
                "rejected stored record"
            );
        }
        warnings.extend(ledger_warnings(&report.ledger));

        info!(
            user = user_id,
            transactions = report.ledger.transactions.len(),
            materialized = outcome.count(),
            issues = outcome.issues.len(),
            "ledger refreshed"
        );

        Ok(SessionReport {
            ledger: report.ledger,
            materialized: outcome.count(),
            duplicates_skipped,
            recomputed_goals,
            issues: outcome.issues,
            rejected: report.rejected,
            warnings,
        })
    }

    /// Stores a new transaction, creating its category and funding its goal as needed.
    ///
    /// The transaction and its category are written together, so a rejected
    /// transaction never leaves a new category behind. A missing goal does not
    /// undo the transaction; the error is returned in
    /// [`RecordOutcome::funding_error`].
    pub fn record_transaction(
        store: &dyn LedgerStore,
        transaction: Transaction,
    ) -> Result<RecordOutcome, CoreError> {
        validate_transaction(&transaction)?;
        let user_id = transaction.user_id.clone();

        let mut created_category = None;
        store.update(&user_id, &mut |ledger| {
            insert_unique(&mut ledger.transactions, transaction.clone())?;
            created_category = CategoryService::ensure(
                &ledger.categories,
                &user_id,
                &transaction.category,
                transaction.kind,
            );
            if let Some(category) = &created_category {
                validate_category(category)?;
                insert_unique(&mut ledger.categories, category.clone())?;
            }
            Ok(())
        })?;

        let mut funding = None;
        let mut funding_error = None;
        if let Some(goal_id) = transaction.savings_goal_id {
            match Self::fund_goal(store, &user_id, goal_id, transaction.amount) {
                Ok(outcome) => funding = Some(outcome),
                Err(err) => {
                    warn!(
                        user = %user_id,
                        transaction = %transaction.id,
                        goal = %goal_id,
                        error = %err,
                        "transaction recorded without goal funding"
                    );
                    funding_error = Some(err);
                }
            }
        }

        Ok(RecordOutcome {
            transaction,
            created_category,
            funding,
            funding_error,
        })
    }

    /// "Add funds" action not tied to any transaction.
    pub fn add_funds(
        store: &dyn LedgerStore,
        user_id: &str,
        goal_id: Uuid,
        amount: f64,
    ) -> Result<FundingOutcome, CoreError> {
        let goal = Self::find_goal(store, user_id, goal_id)?;
        let outcome = GoalService::add_manual_funds(&goal, amount)?;
        store.update_savings_goal(&outcome.goal)?;
        Ok(outcome)
    }

    fn fund_goal(
        store: &dyn LedgerStore,
        user_id: &str,
        goal_id: Uuid,
        amount: f64,
    ) -> Result<FundingOutcome, CoreError> {
        let goal = Self::find_goal(store, user_id, goal_id)?;
        let outcome = GoalService::contribute(&goal, amount)?;
        store.update_savings_goal(&outcome.goal)?;
        Ok(outcome)
    }

    fn find_goal(
        store: &dyn LedgerStore,
        user_id: &str,
        goal_id: Uuid,
    ) -> Result<SavingsGoal, CoreError> {
        store
            .list_savings_goals(user_id)?
            .into_iter()
            .find(|goal| goal.id == goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))
    }
}
