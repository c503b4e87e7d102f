use crate::series::CandleSeries;
use indexlens_core::common::time::last_day_of_month;
use indexlens_core::market::entity::Candle;

/// # Summary
/// 将周线（或日线）序列重采样为自然月 K 线。
///
/// # Logic
/// 1. 按 (年, 月) 对已排序的输入分组。
/// 2. 开盘取组内第一根开盘，收盘取最后一根收盘。
/// 3. 最高取组内最高价最大值，最低取最低价最小值，成交量求和。
/// 4. 月线日期标记为该月最后一天；没有数据的月份不产生 K 线。
///
/// # Arguments
/// * `series`: 已按日期升序排列的序列。
///
/// # Returns
/// 月线序列。
pub fn resample_monthly(series: &CandleSeries) -> CandleSeries {
    let mut months: Vec<Candle> = Vec::new();

    for candle in series {
        let label = last_day_of_month(candle.date);
        match months.last_mut() {
            Some(bar) if bar.date == label => {
                bar.close = candle.close;
                bar.high = bar.high.max(candle.high);
                bar.low = bar.low.min(candle.low);
                bar.volume = bar.volume.saturating_add(candle.volume);
            }
            _ => months.push(Candle {
                date: label,
                ..candle.clone()
            }),
        }
    }

    CandleSeries::from_unsorted(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn bar(date: &str, open: f64, close: f64, high: f64, low: f64, volume: u64) -> Candle {
        Candle {
            date: date.parse().unwrap(),
            open,
            close,
            high,
            low,
            volume,
        }
    }

    #[test]
    fn test_single_month_collapses_to_one_bar() {
        let weekly = CandleSeries::from_unsorted(vec![
            bar("2023-05-04", 3300.0, 3310.0, 3320.0, 3290.0, 100),
            bar("2023-05-08", 3310.0, 3350.0, 3360.0, 3300.0, 200),
            bar("2023-05-15", 3350.0, 3280.0, 3370.0, 3270.0, 300),
            bar("2023-05-22", 3280.0, 3210.0, 3290.0, 3200.0, 400),
            bar("2023-05-29", 3210.0, 3204.0, 3230.0, 3195.0, 500),
        ]);

        let monthly = resample_monthly(&weekly);
        assert_eq!(monthly.len(), 1);

        let m = monthly.first().unwrap();
        assert_eq!(m.date.to_string(), "2023-05-31");
        assert_eq!(m.open, 3300.0);
        assert_eq!(m.close, 3204.0);
        assert_eq!(m.high, 3370.0);
        assert_eq!(m.low, 3195.0);
        assert_eq!(m.volume, 1500);
    }

    #[test]
    fn test_months_are_split_and_gaps_skipped() {
        let weekly = CandleSeries::from_unsorted(vec![
            bar("2023-01-30", 1.0, 2.0, 3.0, 0.5, 10),
            bar("2023-02-06", 2.0, 4.0, 5.0, 1.5, 20),
            bar("2023-01-03", 0.8, 1.0, 1.2, 0.7, 5),
            bar("2023-04-03", 6.0, 7.0, 8.0, 5.0, 40),
        ]);

        let monthly = resample_monthly(&weekly);
        let keys: Vec<(i32, u32)> = monthly
            .iter()
            .map(|c| (c.date.year(), c.date.month()))
            .collect();
        assert_eq!(keys, vec![(2023, 1), (2023, 2), (2023, 4)]);

        let jan = monthly.first().unwrap();
        assert_eq!(jan.open, 0.8);
        assert_eq!(jan.close, 2.0);
        assert_eq!(jan.volume, 15);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(resample_monthly(&CandleSeries::default()).is_empty());
    }
}
