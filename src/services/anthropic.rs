use crate::error::{Error, Result};
use crate::security::SecurityReviewer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Anthropic API version header.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API 调用参数
#[derive(Debug, Clone)]
struct AnthropicConfig {
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

pub struct AnthropicService {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    config: AnthropicConfig,
}

impl AnthropicService {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("devsecops-ai/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            config: AnthropicConfig::default(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.api_base)
    }

    fn build_request<'a>(&'a self, system: &'a str, user_prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system,
            messages: vec![RequestMessage {
                role: "user",
                content: user_prompt,
            }],
        }
    }

    /// 发送单轮消息，返回第一个内容块的文本
    pub async fn create_message(&self, system: &str, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(system, user_prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: MessagesResponse = response.json().await?;
        first_text_block(payload)
    }
}

fn first_text_block(payload: MessagesResponse) -> Result<String> {
    let block = payload
        .content
        .into_iter()
        .next()
        .ok_or_else(|| Error::Other("response contained no content blocks".to_string()))?;

    match block.text {
        Some(text) if block.block_type == "text" => Ok(text),
        _ => Err(Error::Other(format!(
            "first content block is not text (type: {})",
            block.block_type
        ))),
    }
}

#[async_trait]
impl SecurityReviewer for AnthropicService {
    async fn review(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.create_message(system_prompt, user_prompt).await
    }
}
