//! Database models of the portal schema.

pub mod admin;
pub mod client;
pub mod client_event;
pub mod config;
pub mod product;
