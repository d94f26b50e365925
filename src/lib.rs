pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod projects;
pub mod state;
pub mod store;
pub mod users;
pub mod validation;
