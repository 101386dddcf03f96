pub mod api;
pub mod attention;
pub mod board;
pub mod client;
pub mod main;
pub mod products;
