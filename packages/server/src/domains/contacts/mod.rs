pub mod models;

pub use models::contact::{Contact, ContactType, NewContact};
