//! Application layer: the [`engine::PaymentEngine`] orchestrates domain
//! rules against the storage ports and is the single entry point for every
//! payment operation.

pub mod engine;
