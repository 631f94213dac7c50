// HTTP middleware
pub mod staff_auth;

pub use staff_auth::*;
