use anyhow::Context;
use clap::Parser;
use weibo_topic_scraper::core::ConfigProvider;
use weibo_topic_scraper::utils::{logger, validation::Validate};
use weibo_topic_scraper::{CliConfig, EtlEngine, LocalStorage, TomlConfig, TopicPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting weibo-topic-scraper");
    tracing::debug!("CLI config: {:?}", cli);

    match cli.config.clone() {
        Some(path) => {
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file {}", path))?;
            scrape(config).await
        }
        None => scrape(cli).await,
    }
}

async fn scrape<C: ConfigProvider + Validate>(config: C) -> anyhow::Result<()> {
    // 驗證配置，在送出任何請求之前
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        return Err(e).context("invalid configuration");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TopicPipeline::new(storage, config).context("failed to set up HTTP client")?;
    let engine = EtlEngine::new(pipeline);

    // 執行期錯誤只記錄，不改變結束狀態
    match engine.run().await {
        Ok(summary) if summary.record_count == 0 => {
            println!("⚠️ No data retrieved");
        }
        Ok(summary) => {
            for path in &summary.written_files {
                println!("📁 Data saved to {}", path);
            }
            println!(
                "✅ Scraped {} posts in {} requests",
                summary.record_count, summary.pages_fetched
            );
        }
        Err(e) => {
            tracing::error!("❌ Scrape failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
        }
    }

    Ok(())
}
