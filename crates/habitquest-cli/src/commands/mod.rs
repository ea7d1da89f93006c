pub mod auth;
pub mod config;
pub mod habit;
pub mod suggest;
