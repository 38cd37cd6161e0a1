//! fintrack-domain
//!
//! Pure ledger records (Transaction, Budget, Category, RecurringRule, SavingsGoal)
//! and the view models derived from them. No I/O, no storage, no terminal output.

pub mod budget;
pub mod category;
pub mod common;
pub mod goal;
pub mod insights;
pub mod ledger;
pub mod recurring;
pub mod transaction;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use goal::*;
pub use insights::*;
pub use ledger::*;
pub use recurring::*;
pub use transaction::*;
