//! Qiniu CDN Exporter Library

pub mod api;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod log;
pub mod metrics;
pub mod models;
pub mod reduce;
pub mod services;
pub mod window;

pub use api::create_app;
pub use config::Config;
pub use error::{Error, Result};
