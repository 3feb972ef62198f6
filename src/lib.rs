pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
