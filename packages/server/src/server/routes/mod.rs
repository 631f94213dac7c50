// HTTP routes
pub mod checkout;
pub mod health;
pub mod onboarding;
pub mod register;
pub mod staff;
pub mod webhooks;

pub use checkout::*;
pub use health::*;
pub use onboarding::*;
pub use register::*;
pub use staff::*;
pub use webhooks::*;
