//! Value Objects

pub mod public_id;
pub mod referral_code;
pub mod user_name;
pub mod user_password;
pub mod user_role;
pub mod user_status;
