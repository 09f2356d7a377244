use crate::error::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_DATABASE: &str = "users.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// 加载工作目录下的 .env（若存在）
pub fn load_dotenv() {
    if let Err(e) = dotenv::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }
}

/// analyze-code 的运行配置，全部来自环境变量
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    pub github_token: Option<String>,
    pub pr_number: Option<String>,
    pub github_api_url: String,
    pub github_repository: Option<String>,
}

impl AnalyzerConfig {
    /// 空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let anthropic_api_key = get("ANTHROPIC_API_KEY").ok_or_else(|| {
            Error::Config("ANTHROPIC_API_KEY not found in environment.".to_string())
        })?;

        Ok(Self {
            anthropic_api_key,
            anthropic_base_url: get("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            github_token: get("GITHUB_TOKEN"),
            pr_number: get("PR_NUMBER"),
            github_api_url: get("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_repository: get("GITHUB_REPOSITORY"),
        })
    }
}

/// vulnerable-app 的运行配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: PathBuf,
    pub bind_addr: String,
    /// 出错时把 SQL 与错误原文返回给客户端
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let debug = match get("APP_DEBUG") {
            Some(v) => !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            ),
            None => true,
        };

        Self {
            database: get("DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            debug,
        }
    }
}
