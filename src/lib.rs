pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod security;
pub mod services;

pub use error::{Error, Result};

/// 初始化日志，默认级别 info，可用 RUST_LOG 覆盖
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
