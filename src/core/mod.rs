//! Configuration, request models and timestamp handling

pub mod config;
pub mod models;
pub mod timestamp;
