use crate::config::{load_dotenv, AnalyzerConfig};
use crate::models::AnalysisReport;
use crate::security::{SecurityAnalyzer, SecurityReviewer};
use crate::services::{AnthropicService, GitHubService};
use std::process::ExitCode;

pub const LOCAL_RUN_BANNER: &str = "--- LOCAL OR 'MAIN' BRANCH EXECUTION (NOT A PR) ---";

/// 报告的去向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    PullRequest(String),
    Stdout,
}

/// 一次运行的结果，映射为进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::FAILURE,
        }
    }
}

/// 设置了 PR_NUMBER 才会尝试评论
pub fn publish_target(config: &AnalyzerConfig) -> PublishTarget {
    match &config.pr_number {
        Some(pr) => PublishTarget::PullRequest(pr.clone()),
        None => PublishTarget::Stdout,
    }
}

/// analyze-code 入口：读取 .env 与进程环境，分析，发布
pub async fn run_analysis() -> ExitCode {
    load_dotenv();
    run_with_lookup(|key| std::env::var(key).ok()).await.into()
}

pub async fn run_with_lookup<F>(lookup: F) -> RunStatus
where
    F: Fn(&str) -> Option<String>,
{
    let config = match AnalyzerConfig::from_lookup(lookup) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Error: {}", e);
            return RunStatus::Failed;
        }
    };

    let reviewer =
        match AnthropicService::new(&config.anthropic_api_key, &config.anthropic_base_url) {
            Ok(reviewer) => reviewer,
            Err(e) => {
                log::error!("Error initializing Anthropic client: {}", e);
                return RunStatus::Failed;
            }
        };

    run_with_analyzer(&config, &SecurityAnalyzer::new(reviewer)).await
}

/// 任一文件读取失败即整体失败；审查调用失败只体现在报告里
pub async fn run_with_analyzer<R: SecurityReviewer>(
    config: &AnalyzerConfig,
    analyzer: &SecurityAnalyzer<R>,
) -> RunStatus {
    let report = analyzer.run().await;
    publish(config, &report).await;

    if report.has_errors() {
        log::error!("One or more files failed to analyze.");
        return RunStatus::Failed;
    }

    RunStatus::Completed
}

pub async fn publish(config: &AnalyzerConfig, report: &AnalysisReport) {
    match publish_target(config) {
        PublishTarget::PullRequest(_) => post_comment_to_pr(config, report.as_markdown()).await,
        PublishTarget::Stdout => {
            println!("{}", LOCAL_RUN_BANNER);
            println!("{}", report.as_markdown());
        }
    }
}

/// 把报告发到 PR 讨论区；失败只记录日志，不影响退出码
pub async fn post_comment_to_pr(config: &AnalyzerConfig, report_body: &str) {
    let (Some(token), Some(pr_number), Some(repository)) = (
        config.github_token.as_deref(),
        config.pr_number.as_deref(),
        config.github_repository.as_deref(),
    ) else {
        log::warn!("Missing GitHub environment variables. Skipping PR comment.");
        return;
    };

    let github = match GitHubService::new(&config.github_api_url) {
        Ok(github) => github,
        Err(e) => {
            log::error!("Error posting comment to GitHub: {:#}", e);
            return;
        }
    };

    log::info!("Posting comment to Pull Request #{}", pr_number);

    match github
        .post_issue_comment(token, repository, pr_number, report_body)
        .await
    {
        Ok(()) => log::info!("Comment posted successfully!"),
        Err(e) => log::error!("Error posting comment to GitHub: {:#}", e),
    }
}
