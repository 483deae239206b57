use anyhow::Context;
use clap::Parser;
use mockup_relay::config::env_file::load_dotenv;
use mockup_relay::utils::{logger, validation::Validate};
use mockup_relay::{App, CliArgs, MockupRelay, PrintfulClient, Server, StaticFiles};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 先載入 .env，讓命令列參數的環境變數後備值讀得到
    let dotenv = load_dotenv();
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Starting mockup-relay");
    match dotenv {
        Ok(Some(path)) => tracing::debug!("📄 Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    // 合併並驗證配置
    let config = match args.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if args.verbose {
        tracing::debug!("Relay config: {:?}", config);
    }

    let client = PrintfulClient::new(&config.printful).context("failed to create Printful client")?;
    let relay = MockupRelay::new(client, config.mockup.clone());
    let app = App::new(relay, StaticFiles::new(&config.server.static_dir))
        .context("failed to build routes")?;

    let server = Server::bind(config.server.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address()))?;

    server.serve(app).await.context("server error")?;

    tracing::info!("✅ mockup-relay stopped");
    Ok(())
}
