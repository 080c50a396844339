mod api;
mod config;
mod error;
mod models;
mod runtime;
mod ui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::api::{HttpMealApi, MealApi};
use crate::config::Config;
use crate::ui::App;

/// 记录每日餐食和卡路里的终端客户端
#[derive(Debug, Parser)]
#[command(name = "meal-log", version, about)]
struct Cli {
    /// 配置文件路径 (默认 ~/.config/meal-log/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的服务地址
    #[arg(long)]
    base_url: Option<String>,

    /// 覆盖配置中的用户 ID
    #[arg(long)]
    user_id: Option<String>,
}

/// 获取数据目录路径 (~/.local/share/meal-log/)
fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .context("无法获取用户数据目录")?
        .join("meal-log");

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("create {}", data_dir.display()))?;

    Ok(data_dir)
}

/// 日志写入文件，避免干扰终端界面
fn init_tracing() -> Result<PathBuf> {
    let log_path = get_data_dir()?.join("meal-log.log");
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(log_path)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(user_id) = &cli.user_id {
        config.user_id = user_id.clone();
    }

    Ok(config.validate()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_tracing()?;
    let config = load_config(&cli)?;
    tracing::info!(base_url = %config.base_url, user_id = %config.user_id, "starting");

    let api: Arc<dyn MealApi> = Arc::new(HttpMealApi::new(&config)?);
    let mut app = App::new(config.user_id.clone());

    let result = runtime::run_app(&mut app, api).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal session failed");
    }
    println!("日志位于 {}", log_path.display());

    result
}
