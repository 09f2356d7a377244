mod analyzer;
mod prompts;

pub use analyzer::{SecurityAnalyzer, FILES_TO_ANALYZE};
pub use prompts::{build_user_prompt, SYSTEM_PROMPT};

use crate::error::Result;
use async_trait::async_trait;

/// 安全审查后端特征：输入系统提示与用户提示，返回 Markdown 报告
#[async_trait]
pub trait SecurityReviewer: Send + Sync {
    async fn review(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
