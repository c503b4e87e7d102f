use crate::market::error::MarketError;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// 用户输入与上游返回的日期格式
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 上游请求参数 `beg`/`end` 使用的紧凑日期格式
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// # Summary
/// 严格解析 `YYYY-MM-DD` 格式的日期字符串。
///
/// # Logic
/// 1. 长度必须恰好为 10 个字符，拒绝 `2024-1-1` 这类省略补零的写法。
/// 2. 交由 chrono 校验日历合法性。
///
/// # Arguments
/// * `input`: 用户输入的日期字符串。
///
/// # Returns
/// 成功返回 `NaiveDate`，失败返回 `MarketError::InvalidInput`。
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, MarketError> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(MarketError::InvalidInput(format!(
            "date '{}' must use YYYY-MM-DD",
            input
        )));
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT).map_err(|e| {
        MarketError::InvalidInput(format!("date '{}' must use YYYY-MM-DD: {}", input, e))
    })
}

/// 格式化为上游要求的 `YYYYMMDD`。
pub fn compact(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

/// # Summary
/// 计算某年包含的 ISO 周数。
///
/// # Logic
/// 若该年 12 月 31 日落在第 53 周，则该年有 53 周，否则为 52 周。
///
/// # Returns
/// 年份超出 chrono 支持范围时返回 None。
pub fn weeks_in_year(year: i32) -> Option<u32> {
    let last_day = NaiveDate::from_ymd_opt(year, 12, 31)?;
    if last_day.iso_week().week() == 53 {
        Some(53)
    } else {
        Some(52)
    }
}

/// # Summary
/// 将 ISO 年份与周数换算为该周周一至周五的日期区间。
///
/// # Invariants
/// - 结束日期恒等于开始日期加 4 天。
/// - 所有指数共用这一套周次规则。
///
/// # Logic
/// 1. 通过 `from_isoywd_opt` 定位该 ISO 周的周一，周数越界（含 52 周年份的第 53 周）时失败。
/// 2. 在周一基础上加 4 天得到周五。
///
/// # Arguments
/// * `year`: ISO 年份。
/// * `week`: ISO 周数，从 1 开始。
///
/// # Returns
/// 成功返回 `(周一, 周五)`，失败返回 `MarketError::InvalidInput`。
pub fn iso_week_window(year: i32, week: u32) -> Result<(NaiveDate, NaiveDate), MarketError> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(|| {
        MarketError::InvalidInput(format!("week {} is not a valid ISO week of {}", week, year))
    })?;
    let friday = monday.checked_add_days(Days::new(4)).ok_or_else(|| {
        MarketError::InvalidInput(format!("week {} of {} overflows the calendar", week, year))
    })?;
    Ok((monday, friday))
}

/// 所在月份的最后一天，用于月线标签。
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}
