// src/handlers/mod.rs

pub mod quiz;
pub mod results;
