// src/utils/mod.rs

pub mod export;
