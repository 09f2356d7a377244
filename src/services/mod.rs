pub mod anthropic;
pub mod database;
pub mod github;

pub use anthropic::AnthropicService;
pub use database::Database;
pub use github::GitHubService;
