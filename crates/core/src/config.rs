use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub chart: ChartConfig,
    pub log: LogConfig,
}

/// # Summary
/// 行情接口配置，注入到数据源实现中。
///
/// # Invariants
/// - 测试时可将 `base_url` 指向本地假服务。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    // K 线接口地址
    pub base_url: String,
    // 伪装浏览器的 User-Agent
    pub user_agent: String,
    // Referer 请求头
    pub referer: String,
    // 单次请求超时（秒）
    pub timeout_secs: u64,
    // 响应头部字段列表
    pub fields1: String,
    // K 线字段列表：日期,开盘,收盘,最高,最低,成交量,成交额
    pub fields2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub output_dir: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://push2his.eastmoney.com/api/qt/stock/kline/get".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            referer: "https://finance.eastmoney.com/".to_string(),
            timeout_secs: 10,
            fields1: "f1,f2,f3,f4,f5,f6".to_string(),
            fields2: "f51,f52,f53,f54,f55,f56,f57".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: "charts".to_string(),
            width: 1800,
            height: 800,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
