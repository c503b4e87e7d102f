use chrono::NaiveDate;
use thiserror::Error;

/// # Summary
/// 行情获取域错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - `InvalidInput` 只在发起网络请求之前产生。
#[derive(Error, Debug)]
pub enum MarketError {
    // 输入校验失败：日期、周数或指数代码非法
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 上游返回非 2xx 状态码
    #[error("HTTP status {0}")]
    Status(u16),
    // 数据解析错误，如 JSON 格式不匹配或 K 线字段不足
    #[error("Parse error: {0}")]
    Parse(String),
    // 上游未返回任何 K 线
    #[error("Data not found")]
    NotFound,
    // 上游返回的日期与请求日期不一致
    #[error("Date mismatch: requested {requested}, returned {returned}")]
    DateMismatch {
        requested: NaiveDate,
        returned: NaiveDate,
    },
}
