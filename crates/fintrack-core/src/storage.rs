use std::{
    collections::{HashMap, HashSet},
    sync::RwLock,
};

use uuid::Uuid;

use fintrack_domain::{
    Budget, Category, Identifiable, Ledger, RecurringRule, SavingsGoal, Transaction, UserOwned,
};

use crate::{
    error::{CoreError, ValidationError},
    validation::{
        validate_budget, validate_category, validate_goal, validate_rule, validate_transaction,
    },
};

/// A stored record that could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub collection: &'static str,
    pub position: usize,
    pub error: ValidationError,
}

/// Snapshot returned by [`LedgerStore::load`], minus anything that failed screening.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub rejected: Vec<RejectedRecord>,
}

impl LoadReport {
    /// Removes records that fail [`screen_record`], remembering where they were.
    pub fn screen(ledger: Ledger) -> Self {
        let user = ledger.user_id.clone();
        let mut rejected = Vec::new();
        let ledger = Ledger {
            transactions: retain_screened(ledger.transactions, &user, &mut rejected),
            budgets: retain_screened(ledger.budgets, &user, &mut rejected),
            categories: retain_screened(ledger.categories, &user, &mut rejected),
            recurring_rules: retain_screened(ledger.recurring_rules, &user, &mut rejected),
            savings_goals: retain_screened(ledger.savings_goals, &user, &mut rejected),
            ..ledger
        };
        Self { ledger, rejected }
    }
}

/// Per-collection checks run when records are loaded.
pub trait ScreenedRecord: UserOwned {
    const COLLECTION: &'static str;

    fn check(&self) -> Result<(), ValidationError>;
}

impl ScreenedRecord for Transaction {
    const COLLECTION: &'static str = "transactions";

    fn check(&self) -> Result<(), ValidationError> {
        validate_transaction(self)
    }
}

impl ScreenedRecord for Budget {
    const COLLECTION: &'static str = "budgets";

    fn check(&self) -> Result<(), ValidationError> {
        validate_budget(self)
    }
}

impl ScreenedRecord for Category {
    const COLLECTION: &'static str = "categories";

    fn check(&self) -> Result<(), ValidationError> {
        validate_category(self)
    }
}

impl ScreenedRecord for RecurringRule {
    const COLLECTION: &'static str = "recurring_rules";

    // Rule problems are reported by the scheduler on every pass instead.
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl ScreenedRecord for SavingsGoal {
    const COLLECTION: &'static str = "savings_goals";

    fn check(&self) -> Result<(), ValidationError> {
        validate_goal(self)
    }
}

/// Ownership check followed by the record's own validation.
pub fn screen_record<T: ScreenedRecord>(user_id: &str, record: &T) -> Result<(), ValidationError> {
    if record.user_id() != user_id {
        return Err(ValidationError::ForeignRecord {
            expected: user_id.to_string(),
            found: record.user_id().to_string(),
        });
    }
    record.check()
}

fn retain_screened<T: ScreenedRecord>(
    records: Vec<T>,
    user_id: &str,
    rejected: &mut Vec<RejectedRecord>,
) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match screen_record(user_id, &record) {
            Ok(()) => Some(record),
            Err(error) => {
                rejected.push(RejectedRecord {
                    collection: T::COLLECTION,
                    position,
                    error,
                });
                None
            }
        })
        .collect()
}

/// Per-user persistence of ledger collections.
///
/// Implementors provide `load` and `save`; the record-level CRUD contract is
/// built on top of them. Implementations that can preserve rejected records
/// across writes should override `update`.
pub trait LedgerStore: Send + Sync {
    /// Loads the user's ledger. A user with no data gets an empty ledger.
    fn load(&self, user_id: &str) -> Result<LoadReport, CoreError>;

    fn save(&self, ledger: &Ledger) -> Result<(), CoreError>;

    /// Applies `change` to the user's ledger and persists it if the change succeeds.
    fn update(
        &self,
        user_id: &str,
        change: &mut dyn FnMut(&mut Ledger) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let mut ledger = self.load(user_id)?.ledger;
        change(&mut ledger)?;
        self.save(&ledger)
    }

    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.load(user_id)?.ledger.transactions)
    }

    fn create_transaction(&self, txn: &Transaction) -> Result<(), CoreError> {
        validate_transaction(txn)?;
        self.update(&txn.user_id, &mut |ledger| {
            insert_unique(&mut ledger.transactions, txn.clone())
        })
    }

    /// Replaces the stored transaction with the same id.
    ///
    /// Goal totals are left alone: amounts already credited to a linked goal
    /// stay as they are until the next recompute.
    fn update_transaction(&self, txn: &Transaction) -> Result<(), CoreError> {
        validate_transaction(txn)?;
        self.update(&txn.user_id, &mut |ledger| {
            replace_existing(
                &mut ledger.transactions,
                txn.clone(),
                CoreError::TransactionNotFound,
            )
        })
    }

    fn delete_transaction(&self, user_id: &str, id: Uuid) -> Result<Transaction, CoreError> {
        let mut removed = None;
        self.update(user_id, &mut |ledger| {
            removed = Some(remove_existing(
                &mut ledger.transactions,
                id,
                CoreError::TransactionNotFound,
            )?);
            Ok(())
        })?;
        removed.ok_or(CoreError::TransactionNotFound(id))
    }

    fn list_recurring_rules(&self, user_id: &str) -> Result<Vec<RecurringRule>, CoreError> {
        Ok(self.load(user_id)?.ledger.recurring_rules)
    }

    fn create_recurring_rule(&self, rule: &RecurringRule) -> Result<(), CoreError> {
        validate_rule(rule)?;
        self.update(&rule.user_id, &mut |ledger| {
            insert_unique(&mut ledger.recurring_rules, rule.clone())
        })
    }

    fn update_recurring_rule(&self, rule: &RecurringRule) -> Result<(), CoreError> {
        validate_rule(rule)?;
        self.update(&rule.user_id, &mut |ledger| {
            replace_existing(
                &mut ledger.recurring_rules,
                rule.clone(),
                CoreError::RuleNotFound,
            )
        })
    }

    fn delete_recurring_rule(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.update(user_id, &mut |ledger| {
            remove_existing(&mut ledger.recurring_rules, id, CoreError::RuleNotFound).map(drop)
        })
    }

    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>, CoreError> {
        Ok(self.load(user_id)?.ledger.budgets)
    }

    /// Replaces the budget with the same id, or adds it.
    fn upsert_budget(&self, budget: &Budget) -> Result<(), CoreError> {
        validate_budget(budget)?;
        self.update(&budget.user_id, &mut |ledger| {
            match ledger.budgets.iter_mut().find(|item| item.id == budget.id) {
                Some(slot) => *slot = budget.clone(),
                None => ledger.budgets.push(budget.clone()),
            }
            Ok(())
        })
    }

    fn delete_budget(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.update(user_id, &mut |ledger| {
            remove_existing(&mut ledger.budgets, id, CoreError::BudgetNotFound).map(drop)
        })
    }

    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, CoreError> {
        Ok(self.load(user_id)?.ledger.categories)
    }

    fn create_category(&self, category: &Category) -> Result<(), CoreError> {
        validate_category(category)?;
        self.update(&category.user_id, &mut |ledger| {
            insert_unique(&mut ledger.categories, category.clone())
        })
    }

    /// Removes a category. Transactions keep their category name.
    fn delete_category(&self, user_id: &str, id: Uuid) -> Result<Category, CoreError> {
        let mut removed = None;
        self.update(user_id, &mut |ledger| {
            removed = Some(remove_existing(
                &mut ledger.categories,
                id,
                CoreError::CategoryNotFound,
            )?);
            Ok(())
        })?;
        removed.ok_or(CoreError::CategoryNotFound(id))
    }

    fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>, CoreError> {
        Ok(self.load(user_id)?.ledger.savings_goals)
    }

    fn create_savings_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError> {
        validate_goal(goal)?;
        self.update(&goal.user_id, &mut |ledger| {
            insert_unique(&mut ledger.savings_goals, goal.clone())
        })
    }

    fn update_savings_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError> {
        validate_goal(goal)?;
        self.update(&goal.user_id, &mut |ledger| {
            replace_existing(
                &mut ledger.savings_goals,
                goal.clone(),
                CoreError::GoalNotFound,
            )
        })
    }

    fn delete_savings_goal(&self, user_id: &str, id: Uuid) -> Result<(), CoreError> {
        self.update(user_id, &mut |ledger| {
            remove_existing(&mut ledger.savings_goals, id, CoreError::GoalNotFound).map(drop)
        })
    }
}

pub fn insert_unique<T>(items: &mut Vec<T>, item: T) -> Result<(), CoreError>
where
    T: Identifiable + ScreenedRecord,
{
    let id = item.id();
    if items.iter().any(|existing| existing.id() == id) {
        return Err(CoreError::Duplicate {
            collection: T::COLLECTION,
            id,
        });
    }
    items.push(item);
    Ok(())
}

pub fn replace_existing<T: Identifiable>(
    items: &mut [T],
    item: T,
    not_found: fn(Uuid) -> CoreError,
) -> Result<(), CoreError> {
    let id = item.id();
    let slot = items
        .iter_mut()
        .find(|existing| existing.id() == id)
        .ok_or_else(|| not_found(id))?;
    *slot = item;
    Ok(())
}

pub fn remove_existing<T: Identifiable>(
    items: &mut Vec<T>,
    id: Uuid,
    not_found: fn(Uuid) -> CoreError,
) -> Result<T, CoreError> {
    let position = items
        .iter()
        .position(|existing| existing.id() == id)
        .ok_or_else(|| not_found(id))?;
    Ok(items.remove(position))
}

/// Detects dangling references and other anomalies within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let goal_ids: HashSet<_> = ledger.savings_goals.iter().map(|goal| goal.id).collect();
    let mut warnings = Vec::new();

    for txn in &ledger.transactions {
        if let Some(goal_id) = txn.savings_goal_id {
            if !goal_ids.contains(&goal_id) {
                warnings.push(format!(
                    "transaction {} references unknown savings goal {}",
                    txn.id, goal_id
                ));
            }
        }
    }

    let mut budget_counts: HashMap<&str, usize> = HashMap::new();
    for budget in &ledger.budgets {
        *budget_counts.entry(budget.category.as_str()).or_default() += 1;
    }
    let mut duplicated: Vec<_> = budget_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();
    duplicated.sort();
    for (category, count) in duplicated {
        warnings.push(format!("{count} budgets share category `{category}`"));
    }

    for rule in &ledger.recurring_rules {
        if rule.next_due_date.is_none() {
            warnings.push(format!("recurring rule {} has no next due date", rule.id));
        }
    }
    warnings
}

/// Process-local store, used for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledgers: RwLock<HashMap<String, Ledger>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        let store = Self::default();
        if let Ok(mut ledgers) = store.ledgers.write() {
            ledgers.insert(ledger.user_id.clone(), ledger);
        }
        store
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("ledger store lock poisoned".into())
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self, user_id: &str) -> Result<LoadReport, CoreError> {
        let ledgers = self.ledgers.read().map_err(poisoned)?;
        let ledger = ledgers
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Ledger::new(user_id));
        Ok(LoadReport::screen(ledger))
    }

    fn save(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let mut ledgers = self.ledgers.write().map_err(poisoned)?;
        ledgers.insert(ledger.user_id.clone(), ledger.clone());
        Ok(())
    }

    fn update(
        &self,
        user_id: &str,
        change: &mut dyn FnMut(&mut Ledger) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let mut ledgers = self.ledgers.write().map_err(poisoned)?;
        let mut working = ledgers
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Ledger::new(user_id));
        change(&mut working)?;
        ledgers.insert(user_id.to_string(), working);
        Ok(())
    }
}
