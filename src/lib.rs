//! Catalog - serverless product catalog
//!
//! CRUD over a key-value catalog store plus a change-stream publisher
//! that forwards store mutations to an external event bus, reporting
//! per-item delivery failures back to the trigger.

pub mod bootstrap;
pub mod bus;
pub mod config;
pub mod handlers;
pub mod services;
pub mod storage;
pub mod types;
