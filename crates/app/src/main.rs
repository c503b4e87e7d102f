use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use indexlens_chart::render::ChartRenderer;
use indexlens_core::config::AppConfig;
use indexlens_feed::eastmoney::EastmoneyProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod form;
mod settings;

use cli::{Cli, Commands};
use form::{FormShell, PlotOutcome};

/// # Summary
/// 应用启动入口，纯粹的装配层。
///
/// # Logic
/// 1. 解析命令行并加载配置。
/// 2. 初始化日志（输出到 stderr，stdout 只输出查询结果）。
/// 3. 分发子命令，只有需要联网的子命令才构建数据源与渲染器。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = settings::load(cli.config.as_deref())?;
    init_tracing(&config.log.level);
    info!("indexlens starting...");

    match cli.command {
        Commands::Indices { country } => {
            for line in form::list_indices(&country)? {
                println!("{}", line);
            }
        }
        Commands::Query {
            country,
            index,
            date,
        } => {
            let form = build_form(&config)?;
            for line in form.query(&country, index.as_deref(), &date).await? {
                println!("{}", line);
            }
        }
        Commands::Plot {
            country,
            index,
            year,
            chart,
        } => {
            let form = build_form(&config)?;
            match form.plot(&country, index.as_deref(), &year, &chart).await? {
                PlotOutcome::Rendered(path) => println!("{}", path.display()),
                PlotOutcome::NoData => println!("{}", form::NO_DATA),
            }
        }
    }

    Ok(())
}

/// 实例化数据源与渲染器并注入表单
fn build_form(config: &AppConfig) -> anyhow::Result<FormShell> {
    let provider = Arc::new(
        EastmoneyProvider::new(config.feed.clone()).context("failed to build HTTP client")?,
    );
    let renderer = ChartRenderer::new(config.chart.clone());
    Ok(FormShell::new(provider, renderer))
}

/// 优先使用 RUST_LOG，否则使用配置中的级别，并压低 HTTP 栈的日志
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},reqwest=warn,hyper=warn,hyper_util=warn", level))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
