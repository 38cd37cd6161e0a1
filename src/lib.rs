#![doc(test(attr(deny(warnings))))]

//! fintrack ties the ledger crates together: tracing setup, build metadata
//! and the `fintrack_cli` command shell that drives session refreshes,
//! recurring-rule materialization and the dashboard views.

pub mod cli;
pub mod config;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
