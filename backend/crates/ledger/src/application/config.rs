//! Application Configuration
//!
//! Configuration for the Ledger application layer.

use crate::domain::value_object::amount::Amount;

/// Ledger application configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// One-time bonus credited to a referrer (minor units)
    pub referral_bonus: Amount,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            referral_bonus: Amount::ZERO,
        }
    }
}

impl LedgerConfig {
    pub fn new(referral_bonus: Amount) -> Self {
        Self { referral_bonus }
    }

    /// Development defaults (500 minor units per referral)
    pub fn development() -> Self {
        Self {
            referral_bonus: Amount::from_db(500),
        }
    }
}
