use crate::series::CandleSeries;
use indexlens_core::common::IndexCode;
use indexlens_core::common::time::weeks_in_year;
use indexlens_core::market::port::IndexDataProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 年度周线聚合器：逐周抓取一整年的日线并拼接成有序序列。
///
/// # Invariants
/// - 逐周顺序请求，上一周返回后才发起下一周。
/// - 单周失败只会缺少该周数据，不会中断整年抓取。
pub struct YearlyAggregator {
    // 原始行情数据源
    provider: Arc<dyn IndexDataProvider>,
}

impl YearlyAggregator {
    pub fn new(provider: Arc<dyn IndexDataProvider>) -> Self {
        Self { provider }
    }

    /// # Summary
    /// 抓取指定年份全部 ISO 周的数据。
    ///
    /// # Logic
    /// 1. 根据 12 月 31 日是否落在第 53 周确定周数（52 或 53）。
    /// 2. 对第 1 周至最后一周依次调用 `fetch_weekly`，成功则追加，失败则记录日志后跳过。
    /// 3. 按日期升序排序后返回，不去重。
    ///
    /// # Arguments
    /// * `index`: 指数标的。
    /// * `year`: 年份。
    ///
    /// # Returns
    /// 有序 K 线序列；年份非法或全部失败时为空序列。
    pub async fn fetch_year(&self, index: IndexCode, year: i32) -> CandleSeries {
        let Some(weeks) = weeks_in_year(year) else {
            warn!("Year {} is outside the supported calendar range", year);
            return CandleSeries::default();
        };

        info!("Fetching {} weeks of {} for {}", weeks, index.code(), year);
        let mut collected = Vec::new();
        let mut failed_weeks = Vec::new();

        for week in 1..=weeks {
            match self.provider.fetch_weekly(index, year, week).await {
                Ok(candles) => collected.extend(candles),
                Err(e) => {
                    warn!("Week {} of {} for {} failed: {}", week, year, index.code(), e);
                    failed_weeks.push(week);
                }
            }
        }

        if !failed_weeks.is_empty() {
            warn!(
                "{} {}: {} of {} weeks missing ({:?})",
                index.code(),
                year,
                failed_weeks.len(),
                weeks,
                failed_weeks
            );
        }

        let series = CandleSeries::from_unsorted(collected);
        info!("Collected {} candles of {} for {}", series.len(), index.code(), year);
        series
    }
}
