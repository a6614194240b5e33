pub mod adapters;
pub mod config;
pub mod error;
pub mod quiz_task;
pub mod state;
