use devsecops_ai_lib::commands::demo_app;
use devsecops_ai_lib::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    devsecops_ai_lib::init_logging();
    demo_app::serve(AppConfig::from_env()).await
}
