//! Structural checks applied to records before they are used or persisted.

use fintrack_domain::{Budget, Category, RecurringRule, SavingsGoal, Transaction};

use crate::error::ValidationError;

/// Requires a finite, strictly positive amount.
pub fn positive_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::OutOfRange { field, value });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveAmount { field, value });
    }
    Ok(())
}

/// Requires a finite amount that is zero or greater.
pub fn non_negative_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(())
}

fn required_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn validate_transaction(txn: &Transaction) -> Result<(), ValidationError> {
    required_text("user_id", &txn.user_id)?;
    positive_amount("amount", txn.amount)?;
    required_text("category", &txn.category)
}

/// Checks everything the scheduler needs before a rule can be advanced.
pub fn validate_rule(rule: &RecurringRule) -> Result<(), ValidationError> {
    required_text("user_id", &rule.user_id)?;
    positive_amount("amount", rule.amount)?;
    required_text("title", &rule.title)?;
    required_text("category", &rule.category)?;
    if !rule.frequency.is_recognized() {
        return Err(ValidationError::UnknownFrequency(
            rule.frequency.as_str().to_string(),
        ));
    }
    if rule.next_due_date.is_none() {
        return Err(ValidationError::MissingDueDate);
    }
    Ok(())
}

pub fn validate_budget(budget: &Budget) -> Result<(), ValidationError> {
    required_text("user_id", &budget.user_id)?;
    required_text("category", &budget.category)?;
    non_negative_amount("limit", budget.limit)
}

pub fn validate_category(category: &Category) -> Result<(), ValidationError> {
    required_text("user_id", &category.user_id)?;
    required_text("name", &category.name)
}

pub fn validate_goal(goal: &SavingsGoal) -> Result<(), ValidationError> {
    required_text("user_id", &goal.user_id)?;
    required_text("name", &goal.name)?;
    positive_amount("target_amount", goal.target_amount)?;
    non_negative_amount("current_amount", goal.current_amount)?;
    non_negative_amount("manual_funds", goal.manual_funds)
}
