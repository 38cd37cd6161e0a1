use thiserror::Error;
use uuid::Uuid;

/// A record that is structurally unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number within range (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("unknown entry type `{0}`")]
    UnknownKind(String),
    #[error("rule has no next due date")]
    MissingDueDate,
    #[error("record belongs to user `{found}`, expected `{expected}`")]
    ForeignRecord { expected: String, found: String },
    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Recurring rule not found: {0}")]
    RuleNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Savings goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Duplicate {collection} record: {id}")]
    Duplicate { collection: &'static str, id: Uuid },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::TransactionNotFound(_)
                | CoreError::RuleNotFound(_)
                | CoreError::BudgetNotFound(_)
                | CoreError::CategoryNotFound(_)
                | CoreError::GoalNotFound(_)
        )
    }
}
