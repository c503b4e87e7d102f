use thiserror::Error;

/// # Summary
/// 图表渲染错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum ChartError {
    // 输出目录或文件读写失败
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    // plotters 绘图后端失败
    #[error("Drawing error: {0}")]
    Backend(String),
}
