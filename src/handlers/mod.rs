// src/handlers/mod.rs

pub mod attempts;
pub mod dashboard;
pub mod employees;
