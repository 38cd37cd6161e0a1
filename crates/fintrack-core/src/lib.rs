//! fintrack-core
//!
//! Recurring-rule scheduler, aggregation engine and goal funding.
//! Depends on fintrack-domain. No CLI, no terminal I/O, no filesystem access.

pub mod budget_service;
pub mod calculator_service;
pub mod category_service;
pub mod dashboard_service;
pub mod error;
pub mod format;
pub mod goal_service;
pub mod ledger_service;
pub mod public_api;
pub mod recurrence_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;
pub mod trend_service;
pub mod validation;

pub use budget_service::*;
pub use calculator_service::*;
pub use category_service::*;
pub use dashboard_service::*;
pub use error::{CoreError, ValidationError};
pub use goal_service::*;
pub use ledger_service::*;
pub use recurrence_service::*;
pub use storage::{ledger_warnings, LedgerStore, LoadReport, MemoryLedgerStore, RejectedRecord};
pub use summary_service::*;
pub use transaction_service::*;
pub use trend_service::*;

#[cfg(test)]
mod tests;
