pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod intake;
pub mod orchestrator;
pub mod progress;
pub mod storage;
