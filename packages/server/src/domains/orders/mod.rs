//! Order lifecycle: checkout, free registration, webhook confirmation and
//! refunds, all running through one explicit state machine.

pub mod checkout;
pub mod data;
pub mod fee;
pub mod free_registration;
pub mod models;
pub mod service;

pub use checkout::{create_payment_intent, CreatePaymentIntentInput, PaymentIntentResult};
pub use free_registration::{
    create_free_registration, CreateFreeRegistrationInput, FreeRegistrationResult,
};
pub use models::order::{NewOrder, Order, OrderStatus};
pub use service::{CreateOrderInput, OrderService};
