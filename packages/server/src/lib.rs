// Chamber Commerce Platform - Server Core
//
// Backend for event ticketing, membership lifecycle and the audit trail.
// Architecture follows domain-driven design: services in domains/*, shared
// infrastructure behind traits in kernel/, HTTP surface in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
