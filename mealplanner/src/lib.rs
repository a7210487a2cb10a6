pub mod calc;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod models;
pub mod planner;
pub mod session;
pub mod store;
