pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod services;
pub mod state;
pub mod terminal;
