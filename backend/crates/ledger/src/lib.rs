//! Ledger Backend Module
//!
//! The single authority for balance changes. Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Invariants
//! - A balance never goes negative
//! - A task reward is credited at most once per (user, task)
//! - A withdrawal debit and its pending record commit together or not at all
//! - A referral bonus is granted at most once per (referrer, referred)
//!
//! Every mutation is check-then-act executed as one database transaction
//! (conditional UPDATE / `ON CONFLICT DO NOTHING`), so concurrent requests
//! for the same user serialize at the users row.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::LedgerConfig;
pub use application::grant_referral::ReferralBonusService;
pub use domain::value_object::amount::Amount;
pub use error::{LedgerError, LedgerResult};
pub use infra::postgres::PgLedgerRepository;
pub use presentation::router::{
    admin_ledger_router, ledger_router, withdrawal_resolution_router,
};
