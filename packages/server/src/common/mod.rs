// Common types shared across domains and the HTTP layer

pub mod actors;
pub mod errors;

pub use actors::{ActorType, EntityType};
pub use errors::ServiceError;

/// Shorthand used by every service method.
pub type ServiceResult<T> = Result<T, ServiceError>;
