//! Application Layer
//!
//! Use cases and application services.

pub mod complete_task;
pub mod config;
pub mod grant_referral;
pub mod manage_tasks;
pub mod queries;
pub mod request_withdrawal;
pub mod resolve_withdrawal;

// Re-exports
pub use complete_task::CompleteTaskUseCase;
pub use config::LedgerConfig;
pub use grant_referral::ReferralBonusService;
pub use manage_tasks::{CreateTaskInput, CreateTaskUseCase, UpdateTaskInput, UpdateTaskUseCase};
pub use queries::{ListReferralsUseCase, ListTasksUseCase, ListWithdrawalsUseCase};
pub use request_withdrawal::RequestWithdrawalUseCase;
pub use resolve_withdrawal::ResolveWithdrawalUseCase;
