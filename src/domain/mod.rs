//! Domain aggregates of the return preparation pipeline.

pub mod admin;
pub mod board;
pub mod client;
pub mod client_event;
pub mod product;
pub mod progress;
pub mod stage;
pub mod types;
