// src/models/mod.rs

pub mod announcement;
