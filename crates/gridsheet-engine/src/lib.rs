//! gridsheet_engine - Cell model, range functions and text cleanup.

pub mod builtins;
pub mod engine;
