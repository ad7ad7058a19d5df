pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod transport;
pub mod registry;
pub mod analytics;
pub mod utils;
