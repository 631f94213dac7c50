pub mod models;

pub use models::event::{Event, EventStatus, SiteSettings, TicketType, TicketingType};
