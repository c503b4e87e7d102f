use async_trait::async_trait;
use chrono::NaiveDate;
use indexlens_core::common::IndexCode;
use indexlens_core::common::time::{self, ISO_DATE_FORMAT};
use indexlens_core::config::FeedConfig;
use indexlens_core::market::entity::Candle;
use indexlens_core::market::error::MarketError;
use indexlens_core::market::port::IndexDataProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// 周期类型：101 = 日线，单日与单周查询都使用日线并通过起止日期收窄窗口
const KLINE_PERIOD_DAILY: &str = "101";
/// 复权类型：0 = 不复权
const ADJUST_NONE: &str = "0";

/// # Summary
/// 东方财富历史 K 线行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 除连接池外不持有任何可变状态，接口地址与请求头来自注入的 `FeedConfig`。
#[derive(Clone)]
pub struct EastmoneyProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口配置
    config: FeedConfig,
}

impl EastmoneyProvider {
    /// # Summary
    /// 创建一个新的 EastmoneyProvider 实例。
    ///
    /// # Logic
    /// 1. 安装进程级 rustls 加密后端（已安装时跳过）。
    /// 2. 按配置设置伪装浏览器的 User-Agent 与 Referer。
    /// 3. 按配置设置超时并初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 行情接口配置。
    ///
    /// # Returns
    /// 成功返回 EastmoneyProvider，请求头非法或客户端构建失败时返回 MarketError。
    pub fn new(config: FeedConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(REFERER, header_value(&config.referer)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// # Summary
    /// 请求指定区间的原始 K 线字符串。
    ///
    /// # Logic
    /// 1. 组装 secid、字段列表、周期、复权类型与 `YYYYMMDD` 起止日期。
    /// 2. 发起 GET 请求并检查状态码。
    /// 3. 解析 JSON，提取 `data.klines`。
    ///
    /// # Returns
    /// `data` 为空或缺少 `klines` 时返回 `Ok(None)`。
    async fn fetch_klines(
        &self,
        index: IndexCode,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Vec<String>>, MarketError> {
        let secid = index.secid();
        let beg = time::compact(begin);
        let end = time::compact(end);
        debug!("Requesting klines secid={} beg={} end={}", secid, beg, end);

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("secid", secid.as_str()),
                ("fields1", self.config.fields1.as_str()),
                ("fields2", self.config.fields2.as_str()),
                ("klt", KLINE_PERIOD_DAILY),
                ("fqt", ADJUST_NONE),
                ("beg", beg.as_str()),
                ("end", end.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;
        let json: KlineResponse =
            serde_json::from_str(&body).map_err(|e| MarketError::Parse(e.to_string()))?;

        Ok(json.data.and_then(|data| data.klines))
    }
}

#[async_trait]
impl IndexDataProvider for EastmoneyProvider {
    /// # Summary
    /// 获取单个交易日的日线。
    ///
    /// # Logic
    /// 1. 严格校验日期格式，失败时不发起请求。
    /// 2. 以该日期作为起止日期请求，取第一根 K 线。
    /// 3. 对需要严格日期的指数（道琼斯），返回日期与请求不一致时视为未命中。
    async fn fetch_daily(&self, index: IndexCode, date: &str) -> Result<Candle, MarketError> {
        let requested = time::parse_iso_date(date)?;

        let klines = self
            .fetch_klines(index, requested, requested)
            .await?
            .unwrap_or_default();
        let first = klines.first().ok_or(MarketError::NotFound)?;
        let candle = parse_kline(first)?;

        if index.requires_exact_daily_date() && candle.date != requested {
            return Err(MarketError::DateMismatch {
                requested,
                returned: candle.date,
            });
        }

        Ok(candle)
    }

    /// # Summary
    /// 获取某个 ISO 周周一至周五的日线。
    ///
    /// # Logic
    /// 1. 换算 ISO 周区间，周数非法时不发起请求。
    /// 2. 逐行解码 K 线，无法解码的行记录日志后跳过。
    async fn fetch_weekly(
        &self,
        index: IndexCode,
        year: i32,
        week: u32,
    ) -> Result<Vec<Candle>, MarketError> {
        let (begin, end) = time::iso_week_window(year, week)?;

        let klines = self
            .fetch_klines(index, begin, end)
            .await?
            .ok_or(MarketError::NotFound)?;

        let mut candles = Vec::with_capacity(klines.len());
        for line in &klines {
            match parse_kline(line) {
                Ok(candle) => candles.push(candle),
                Err(e) => warn!("Skipping kline '{}' in {}-W{:02}: {}", line, year, week, e),
            }
        }
        Ok(candles)
    }
}

/// # Summary
/// 接口响应顶层结构。
#[derive(Deserialize, Debug)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Deserialize, Debug)]
struct KlineData {
    klines: Option<Vec<String>>,
}

/// # Summary
/// 一行 K 线的具名字段视图。
///
/// # Invariants
/// - 字段顺序固定为：日期,开盘,收盘,最高,最低,成交量,成交额；只使用前六个。
struct KlineRow<'a> {
    date: &'a str,
    open: &'a str,
    close: &'a str,
    high: &'a str,
    low: &'a str,
    volume: &'a str,
}

impl<'a> KlineRow<'a> {
    const MIN_FIELDS: usize = 6;

    fn split(line: &'a str) -> Result<Self, MarketError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[date, open, close, high, low, volume, ..] = fields.as_slice() else {
            return Err(MarketError::Parse(format!(
                "kline has {} fields, expected at least {}",
                fields.len(),
                Self::MIN_FIELDS
            )));
        };
        Ok(Self {
            date,
            open,
            close,
            high,
            low,
            volume,
        })
    }

    fn decode(&self) -> Result<Candle, MarketError> {
        // 上游可能在日期后附带时间标记，如 "2024-01-02 00:00"
        let date_part = self.date.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT)
            .map_err(|e| MarketError::Parse(format!("date '{}': {}", self.date, e)))?;

        Ok(Candle {
            date,
            open: field("open", self.open)?,
            close: field("close", self.close)?,
            high: field("high", self.high)?,
            low: field("low", self.low)?,
            volume: field("volume", self.volume)?,
        })
    }
}

/// # Summary
/// 将一行逗号分隔的 K 线字符串解码为 `Candle`。
///
/// # Returns
/// 字段不足六个或数值非法时返回 `MarketError::Parse`。
pub fn parse_kline(line: &str) -> Result<Candle, MarketError> {
    KlineRow::split(line)?.decode()
}

fn field<T>(name: &str, raw: &str) -> Result<T, MarketError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| MarketError::Parse(format!("{} '{}': {}", name, raw, e)))
}

fn header_value(value: &str) -> Result<HeaderValue, MarketError> {
    HeaderValue::from_str(value)
        .map_err(|e| MarketError::InvalidInput(format!("header value '{}': {}", value, e)))
}
