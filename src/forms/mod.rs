//! Form payloads submitted by the HTML pages.

pub mod board;
pub mod client;
pub mod main;
pub mod products;
