use crate::config::RelayConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command line / environment overrides. Anything left unset falls back to
/// the TOML file (when given) and then to the built-in defaults.
#[derive(Clone, Parser)]
#[command(name = "mockup-relay")]
#[command(about = "Relay for Printful mockup generator tasks")]
pub struct CliArgs {
    #[arg(long, short = 'c', env = "MOCKUP_RELAY_CONFIG", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "MOCKUP_RELAY_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "PRINTFUL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "PRINTFUL_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    #[arg(long, env = "PRINTFUL_TIMEOUT_SECONDS", help = "Outbound request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliArgs {
    /// 合併設定：預設值 < TOML 檔案 < 環境變數 / 命令列
    pub fn resolve(&self) -> Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_file(path)?,
            None => RelayConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(static_dir) = &self.static_dir {
            config.server.static_dir = static_dir.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.printful.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.api_base_url {
            config.printful.base_url = base_url.clone();
        }
        if self.timeout.is_some() {
            config.printful.timeout_seconds = self.timeout;
        }

        Ok(config)
    }
}
