use chrono::NaiveDate;
use indexlens_core::market::entity::Candle;
use serde::{Deserialize, Serialize};

/// # Summary
/// 按日期升序排列的 K 线序列，供图表层使用。
///
/// # Invariants
/// - 内部元素始终按 `date` 升序排列（稳定排序，同日期保持插入顺序）。
/// - 不去重，也不校验日期连续性。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    // 已排序的 K 线
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// # Summary
    /// 从任意顺序的 K 线构造序列。
    ///
    /// # Logic
    /// 使用稳定排序按日期升序排列。
    pub fn from_unsorted(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.date);
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// # Summary
    /// 以日期为键查找 K 线。
    ///
    /// # Logic
    /// 二分定位第一个不早于 `date` 的元素，日期相同时返回最先插入的那一根。
    pub fn get(&self, date: NaiveDate) -> Option<&Candle> {
        let idx = self.candles.partition_point(|c| c.date < date);
        self.candles.get(idx).filter(|c| c.date == date)
    }

    /// # Summary
    /// 计算全序列的价格区间。
    ///
    /// # Returns
    /// 序列为空时返回 None，否则返回 `(最低价, 最高价)`。
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.candles.is_empty() {
            return None;
        }
        let low = self.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let high = self
            .candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((low, high))
    }

    pub fn max_volume(&self) -> u64 {
        self.candles.iter().map(|c| c.volume).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
