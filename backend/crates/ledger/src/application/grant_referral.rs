//! Referral Bonus Service
//!
//! Implements the auth crate's `ReferralBonusGranter` port: registration
//! calls into this service after a referred user is persisted. The grant is
//! keyed on the (referrer, referred) pair and credits the configured bonus.

use std::sync::Arc;

use auth::domain::repository::ReferralBonusGranter;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;

use crate::application::config::LedgerConfig;
use crate::domain::entity::referral::Referral;
use crate::domain::repository::BalanceLedger;
use crate::error::{LedgerError, LedgerResult};

/// Ledger-backed referral bonus granter
#[derive(Clone)]
pub struct ReferralBonusService<L>
where
    L: BalanceLedger + Clone + Send + Sync + 'static,
{
    ledger: Arc<L>,
    config: Arc<LedgerConfig>,
}

impl<L> ReferralBonusService<L>
where
    L: BalanceLedger + Clone + Send + Sync + 'static,
{
    pub fn new(ledger: Arc<L>, config: Arc<LedgerConfig>) -> Self {
        Self { ledger, config }
    }

    /// Grant the configured bonus to `referrer_id` for referring
    /// `referred_id`. Returns the referrer's new balance.
    pub async fn grant_bonus(
        &self,
        referrer_id: &UserId,
        referred_id: &UserId,
    ) -> LedgerResult<i64> {
        if referrer_id.as_uuid() == referred_id.as_uuid() {
            return Err(LedgerError::SelfReferral);
        }

        let referral = Referral::new(*referrer_id, *referred_id, self.config.referral_bonus);
        let new_balance = self.ledger.grant_referral_bonus(&referral).await?;

        tracing::info!(
            referrer_id = %referrer_id,
            referred_id = %referred_id,
            bonus = referral.bonus.as_i64(),
            new_balance,
            "Referral bonus granted"
        );

        Ok(new_balance)
    }
}

impl<L> ReferralBonusGranter for ReferralBonusService<L>
where
    L: BalanceLedger + Clone + Send + Sync + 'static,
{
    async fn grant(&self, referrer_id: &UserId, referred_id: &UserId) -> AppResult<i64> {
        self.grant_bonus(referrer_id, referred_id)
            .await
            .map_err(|e| AppError::new(e.kind(), e.to_string()))
    }
}
