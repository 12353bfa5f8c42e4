pub mod investment;
pub mod readiness;
