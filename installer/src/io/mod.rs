//! Side-effecting operations: filesystem stores, process execution and the
//! install seams.

pub mod config;
pub mod descriptor_store;
pub mod files;
pub mod host_config;
pub mod locator;
pub mod process;
pub mod prompt;
pub mod strategy;
