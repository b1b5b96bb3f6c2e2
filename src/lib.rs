pub mod commands;
pub mod config;
pub mod dns;
pub mod reconcile;
pub mod report;
pub mod validate;
