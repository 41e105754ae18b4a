//! Referral Entity
//!
//! One row per (referrer, referred) pair; the unique pair is the
//! granted-once guard.

use chrono::{DateTime, Utc};
use kernel::id::{ReferralId, UserId};

use crate::domain::value_object::amount::Amount;

/// Referral bonus record
#[derive(Debug, Clone)]
pub struct Referral {
    pub referral_id: ReferralId,
    /// User whose code was used
    pub referrer_id: UserId,
    /// User who registered with the code
    pub referred_id: UserId,
    /// Bonus credited to the referrer
    pub bonus: Amount,
    pub granted_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(referrer_id: UserId, referred_id: UserId, bonus: Amount) -> Self {
        Self {
            referral_id: ReferralId::new(),
            referrer_id,
            referred_id,
            bonus,
            granted_at: Utc::now(),
        }
    }
}
