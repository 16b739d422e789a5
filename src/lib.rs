pub mod calc;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod ipc;
pub mod logging;
pub mod registrar;
pub mod reports;
pub mod store;
