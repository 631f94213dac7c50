// Domain modules, one per business area
pub mod audit;
pub mod contacts;
pub mod events;
pub mod members;
pub mod orders;
