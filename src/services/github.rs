use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Issue / PR 评论请求体
#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

pub struct GitHubService {
    client: Client,
    api_base: String,
}

impl GitHubService {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("devsecops-ai/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// PR 在 REST API 中按 issue 处理，评论走 issues 端点
    pub fn comments_url(&self, repository: &str, pr_number: &str) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, repository, pr_number
        )
    }

    /// 在 PR 讨论区发表一条新评论
    pub async fn post_issue_comment(
        &self,
        token: &str,
        repository: &str,
        pr_number: &str,
        body: &str,
    ) -> Result<()> {
        let url = self.comments_url(repository, pr_number);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&CommentRequest { body })
            .send()
            .await
            .context("Failed to send comment to GitHub")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "GitHub API returned error: {}\nServer Response: {}",
                status,
                text
            );
        }

        Ok(())
    }
}
