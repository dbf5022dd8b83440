// src/handlers/mod.rs

pub mod announcement;
pub mod health;
