use anyhow::Context;
use config::{Config, Environment, File};
use indexlens_core::config::AppConfig;
use std::path::{Path, PathBuf};

/// 未显式指定时尝试读取的配置文件
const DEFAULT_CONFIG_FILE: &str = "indexlens.toml";

/// 环境变量前缀，例如 `INDEXLENS__FEED__TIMEOUT_SECS=30`
const ENV_PREFIX: &str = "INDEXLENS";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 叠加 TOML 配置文件：显式指定时必须存在，否则可缺省。
/// 3. 叠加 `INDEXLENS__` 前缀的环境变量。
///
/// # Arguments
/// * `explicit`: 命令行传入的配置文件路径。
///
/// # Returns
/// 合并后的 AppConfig。
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let settings = Config::builder()
        .add_source(Config::try_from(&AppConfig::default()).context("invalid default config")?)
        .add_source(File::from(path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    settings
        .try_deserialize()
        .context("failed to deserialize config")
}
