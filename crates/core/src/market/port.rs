use crate::common::IndexCode;
use crate::market::entity::Candle;
use crate::market::error::MarketError;
use async_trait::async_trait;
use tracing::warn;

/// # Summary
/// 指数行情数据源接口（原始数据源）。
///
/// # Invariants
/// - 实现者不得持有跨调用的可变状态，相同输入应得到相同结果。
/// - 输入校验失败时必须在发起网络请求之前返回 `MarketError::InvalidInput`。
/// - 每次通过校验的调用最多发起一次外部请求。
#[async_trait]
pub trait IndexDataProvider: Send + Sync {
    /// # Summary
    /// 获取指定交易日的日线数据。
    ///
    /// # Logic
    /// 1. 校验 `YYYY-MM-DD` 日期格式。
    /// 2. 以该日期同时作为起止日期发起请求。
    /// 3. 取返回的第一根 K 线。
    ///
    /// # Arguments
    /// * `index`: 指数标的。
    /// * `date`: `YYYY-MM-DD` 格式的日期字符串。
    ///
    /// # Returns
    /// 成功返回单根 K 线，失败返回 MarketError。
    async fn fetch_daily(&self, index: IndexCode, date: &str) -> Result<Candle, MarketError>;

    /// # Summary
    /// 获取指定 ISO 周（周一至周五）的全部日线数据。
    ///
    /// # Arguments
    /// * `index`: 指数标的。
    /// * `year`: ISO 年份。
    /// * `week`: ISO 周数。
    ///
    /// # Returns
    /// 成功返回按日期排列的 K 线列表（最多 5 根），失败返回 MarketError。
    async fn fetch_weekly(
        &self,
        index: IndexCode,
        year: i32,
        week: u32,
    ) -> Result<Vec<Candle>, MarketError>;
}

/// # Summary
/// 数据源降级扩展：将所有错误转换为“无数据”。
///
/// # Invariants
/// - 自动为所有实现 `IndexDataProvider` 的类型提供支持。
/// - 任何失败都会输出一条 warn 日志，调用方只会看到空结果。
#[async_trait]
pub trait IndexDataProviderExt: IndexDataProvider {
    /// # Summary
    /// 日线查询，失败时返回 None。
    ///
    /// # Logic
    /// 1. 调用 `fetch_daily`。
    /// 2. 出错时记录诊断日志并吞掉错误。
    async fn daily_or_empty(&self, index: IndexCode, date: &str) -> Option<Candle> {
        match self.fetch_daily(index, date).await {
            Ok(candle) => Some(candle),
            Err(e) => {
                warn!("Daily lookup for {} on '{}' returned no data: {}", index.code(), date, e);
                None
            }
        }
    }

    /// # Summary
    /// 周线查询，失败时返回空列表。
    async fn weekly_or_empty(&self, index: IndexCode, year: i32, week: u32) -> Vec<Candle> {
        match self.fetch_weekly(index, year, week).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(
                    "Weekly lookup for {} {}-W{:02} returned no data: {}",
                    index.code(),
                    year,
                    week,
                    e
                );
                Vec::new()
            }
        }
    }
}

impl<T: IndexDataProvider + ?Sized> IndexDataProviderExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct FailingProvider;

    #[async_trait]
    impl IndexDataProvider for FailingProvider {
        async fn fetch_daily(&self, _: IndexCode, _: &str) -> Result<Candle, MarketError> {
            Err(MarketError::Network("connection refused".into()))
        }

        async fn fetch_weekly(
            &self,
            _: IndexCode,
            _: i32,
            _: u32,
        ) -> Result<Vec<Candle>, MarketError> {
            Err(MarketError::Status(502))
        }
    }

    struct FixedProvider;

    #[async_trait]
    impl IndexDataProvider for FixedProvider {
        async fn fetch_daily(&self, _: IndexCode, _: &str) -> Result<Candle, MarketError> {
            Ok(Candle {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 2962.28,
                close: 2962.28,
                high: 2976.27,
                low: 2962.28,
                volume: 311227960,
            })
        }

        async fn fetch_weekly(
            &self,
            _: IndexCode,
            _: i32,
            _: u32,
        ) -> Result<Vec<Candle>, MarketError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_errors_degrade_to_empty() {
        let provider = FailingProvider;
        assert!(
            provider
                .daily_or_empty(IndexCode::DowJones, "2024-01-02")
                .await
                .is_none()
        );
        assert!(
            provider
                .weekly_or_empty(IndexCode::ShenzhenComponent, 2023, 10)
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_success_passes_through_trait_object() {
        let provider: Box<dyn IndexDataProvider> = Box::new(FixedProvider);
        let candle = provider
            .daily_or_empty(IndexCode::ShanghaiComposite, "2024-01-02")
            .await
            .unwrap();
        assert_eq!(candle.volume, 311227960);
    }
}
