//! Domain layer: entities and the business rules that govern them.
//!
//! Everything here is storage-agnostic; persistence goes through the traits
//! in [`ports`].

pub mod currency;
pub mod payment;
pub mod ports;
pub mod user;
pub mod validation;
