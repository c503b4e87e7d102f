use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，记录某个交易日（或聚合周期）的行情。
///
/// # Invariants
/// - 预期 `low <= min(open, close) <= max(open, close) <= high`，但不做校验，上游数据原样透传。
/// - 解析完成后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // 交易日期（月线为该月最后一天）
    pub date: NaiveDate,
    // 开盘价
    pub open: f64,
    // 收盘价
    pub close: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 成交量（手）
    pub volume: u64,
}

impl Candle {
    /// 收盘价是否不低于开盘价，绘图时用于选择涨跌配色。
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}
