//! API handlers

pub mod ai;
pub mod tasks;
