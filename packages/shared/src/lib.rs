//! Shared utilities for Irori.

pub mod logger;
pub mod time;
