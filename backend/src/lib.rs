// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod retention;
pub mod routes;
pub mod sanitize;
pub mod secret;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
pub use sanitize::{sanitize_markup, sanitize_text, sanitize_value};
