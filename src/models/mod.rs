// src/models/mod.rs

pub mod analysis;
pub mod attempt;
pub mod question;
pub mod user;
