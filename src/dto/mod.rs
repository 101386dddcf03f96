//! DTOs that bridge services with templates and the JSON API.

pub mod api;
pub mod attention;
pub mod client;
pub mod main;
pub mod products;
