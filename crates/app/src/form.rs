use indexlens_chart::error::ChartError;
use indexlens_chart::kind::ChartKind;
use indexlens_chart::render::ChartRenderer;
use indexlens_core::common::time::parse_iso_date;
use indexlens_core::common::{Country, IndexCode};
use indexlens_core::market::entity::Candle;
use indexlens_core::market::port::{IndexDataProvider, IndexDataProviderExt};
use indexlens_market::annual::YearlyAggregator;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 查询无结果时展示的提示
pub const NO_DATA: &str = "未找到数据";

/// # Summary
/// 表单输入错误，全部在发起网络请求之前产生。
#[derive(Error, Debug)]
pub enum FormError {
    #[error("日期格式不正确，请使用YYYY-MM-DD格式: {0}")]
    InvalidDate(String),
    #[error("年份格式不正确，请输入四位数字（如2023）: {0}")]
    InvalidYear(String),
    #[error("{0}")]
    InvalidSelection(String),
    #[error("绘图失败: {0}")]
    Chart(#[from] ChartError),
}

/// 绘图结果
#[derive(Debug, PartialEq, Eq)]
pub enum PlotOutcome {
    Rendered(PathBuf),
    NoData,
}

/// # Summary
/// 命令行表单：收集国家、指数、日期、年份与图表类型并分发到数据层。
///
/// # Invariants
/// - 所有输入校验都在调用数据源之前完成。
pub struct FormShell {
    provider: Arc<dyn IndexDataProvider>,
    aggregator: YearlyAggregator,
    renderer: ChartRenderer,
}

impl FormShell {
    pub fn new(provider: Arc<dyn IndexDataProvider>, renderer: ChartRenderer) -> Self {
        Self {
            aggregator: YearlyAggregator::new(provider.clone()),
            provider,
            renderer,
        }
    }

    /// # Summary
    /// 日线查询。
    ///
    /// # Logic
    /// 1. 校验国家与指数组合、日期格式。
    /// 2. 调用降级接口获取日线，失败时得到 None。
    /// 3. 将结果格式化为逐行文本。
    ///
    /// # Returns
    /// 待展示的文本行；输入非法时返回 FormError。
    pub async fn query(
        &self,
        country: &str,
        index: Option<&str>,
        date: &str,
    ) -> Result<Vec<String>, FormError> {
        let index = select_index(country, index)?;
        let date = validate_date(date)?;

        let candle = self.provider.daily_or_empty(index, &date).await;
        Ok(format_daily(candle.as_ref()))
    }

    /// # Summary
    /// 整年绘图。
    ///
    /// # Logic
    /// 1. 校验国家与指数组合、年份与图表类型。
    /// 2. 逐周聚合全年数据。
    /// 3. 交由渲染器绘制，空序列不绘图。
    pub async fn plot(
        &self,
        country: &str,
        index: Option<&str>,
        year: &str,
        chart: &str,
    ) -> Result<PlotOutcome, FormError> {
        let index = select_index(country, index)?;
        let year = validate_year(year)?;
        let kind: ChartKind = chart.parse().map_err(FormError::InvalidSelection)?;

        let series = self.aggregator.fetch_year(index, year).await;
        match self.renderer.render(kind, index, year, &series)? {
            Some(path) => Ok(PlotOutcome::Rendered(path)),
            None => {
                info!("No data for {} in {}, skipping {} chart", index.code(), year, kind);
                Ok(PlotOutcome::NoData)
            }
        }
    }
}

/// # Summary
/// 根据国家选择指数，指数缺省时取该国家的第一个。
///
/// # Logic
/// 1. 解析国家。
/// 2. 解析指数代码并确认该国家提供此指数。
pub fn select_index(country: &str, index: Option<&str>) -> Result<IndexCode, FormError> {
    let country: Country = country.parse().map_err(FormError::InvalidSelection)?;
    let offered = country.indices();

    let Some(code) = index else {
        return offered
            .first()
            .copied()
            .ok_or_else(|| FormError::InvalidSelection(format!("{} 没有可选指数", country)));
    };

    let index: IndexCode = code
        .parse()
        .map_err(|e| FormError::InvalidSelection(format!("{}", e)))?;
    if !country.offers(index) {
        return Err(FormError::InvalidSelection(format!(
            "{} 不提供指数 {}，可选: {}",
            country,
            index.code(),
            offered
                .iter()
                .map(|i| i.code())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(index)
}

pub fn validate_date(input: &str) -> Result<String, FormError> {
    parse_iso_date(input)
        .map(|date| date.to_string())
        .map_err(|_| FormError::InvalidDate(input.to_string()))
}

/// 年份必须恰好是四位数字
pub fn validate_year(input: &str) -> Result<i32, FormError> {
    let trimmed = input.trim();
    if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormError::InvalidYear(input.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| FormError::InvalidYear(input.to_string()))
}

/// # Summary
/// 将日线结果格式化为逐行展示的文本。
///
/// # Returns
/// 有数据时返回六行 `字段: 值`，否则返回单行无数据提示。
pub fn format_daily(candle: Option<&Candle>) -> Vec<String> {
    match candle {
        Some(c) => vec![
            format!("日期: {}", c.date),
            format!("开盘价: {}", c.open),
            format!("收盘价: {}", c.close),
            format!("最高价: {}", c.high),
            format!("最低价: {}", c.low),
            format!("成交量: {}", c.volume),
        ],
        None => vec![NO_DATA.to_string()],
    }
}

/// 列出国家下的指数，格式与下拉框一致：`上证指数 (000001)`
pub fn list_indices(country: &str) -> Result<Vec<String>, FormError> {
    let country: Country = country.parse().map_err(FormError::InvalidSelection)?;
    Ok(country.indices().iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use indexlens_core::config::ChartConfig;
    use indexlens_core::market::error::MarketError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 只在 2024-01-02 有日线、每周都失败的模拟数据源
    #[derive(Default)]
    struct StubProvider {
        daily_calls: AtomicUsize,
        weekly_calls: AtomicUsize,
    }

    #[async_trait]
    impl IndexDataProvider for StubProvider {
        async fn fetch_daily(&self, _: IndexCode, date: &str) -> Result<Candle, MarketError> {
            self.daily_calls.fetch_add(1, Ordering::SeqCst);
            if date != "2024-01-02" {
                return Err(MarketError::NotFound);
            }
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
            self.weekly_calls.fetch_add(1, Ordering::SeqCst);
            Err(MarketError::Network("offline".into()))
        }
    }

    fn shell(provider: Arc<StubProvider>, output_dir: &std::path::Path) -> FormShell {
        let renderer = ChartRenderer::new(ChartConfig {
            output_dir: output_dir.to_string_lossy().into_owned(),
            ..ChartConfig::default()
        });
        FormShell::new(provider, renderer)
    }

    #[test]
    fn test_select_index_applies_country_gating() {
        assert_eq!(
            select_index("china", None).unwrap(),
            IndexCode::ShanghaiComposite
        );
        assert_eq!(select_index("usa", None).unwrap(), IndexCode::DowJones);
        assert_eq!(
            select_index("中国", Some("399001")).unwrap(),
            IndexCode::ShenzhenComponent
        );
        assert!(matches!(
            select_index("china", Some("DJIA")),
            Err(FormError::InvalidSelection(_))
        ));
        assert!(select_index("japan", None).is_err());
    }

    #[test]
    fn test_validate_year() {
        assert_eq!(validate_year("2023").unwrap(), 2023);
        assert!(validate_year("23").is_err());
        assert!(validate_year("20a3").is_err());
        assert!(validate_year("+202").is_err());
        assert!(validate_year("20233").is_err());
    }

    #[test]
    fn test_format_daily() {
        let lines = format_daily(None);
        assert_eq!(lines, vec![NO_DATA.to_string()]);

        let candle = Candle {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.5,
            close: 2.0,
            high: 2.5,
            low: 1.0,
            volume: 42,
        };
        let lines = format_daily(Some(&candle));
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "日期: 2024-01-02");
        assert_eq!(lines[1], "开盘价: 1.5");
        assert_eq!(lines[5], "成交量: 42");
    }

    #[test]
    fn test_list_indices() {
        assert_eq!(
            list_indices("china").unwrap(),
            vec!["上证指数 (000001)", "深证成指 (399001)"]
        );
        assert_eq!(list_indices("us").unwrap(), vec!["道琼斯指数 (DJIA)"]);
    }

    #[tokio::test]
    async fn test_query_formats_result_and_no_data() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(StubProvider::default());
        let form = shell(provider.clone(), tmp_dir.path());

        let lines = form.query("china", None, "2024-01-02").await.unwrap();
        assert_eq!(lines[0], "日期: 2024-01-02");

        let lines = form.query("china", None, "2024-01-06").await.unwrap();
        assert_eq!(lines, vec![NO_DATA.to_string()]);
        assert_eq!(provider.daily_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_provider() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(StubProvider::default());
        let form = shell(provider.clone(), tmp_dir.path());

        assert!(matches!(
            form.query("china", None, "2024/01/01").await,
            Err(FormError::InvalidDate(_))
        ));
        assert!(matches!(
            form.plot("usa", None, "99", "weekly").await,
            Err(FormError::InvalidYear(_))
        ));
        assert!(matches!(
            form.plot("usa", None, "2023", "pie").await,
            Err(FormError::InvalidSelection(_))
        ));
        assert_eq!(provider.daily_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.weekly_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_plot_without_data_renders_nothing() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(StubProvider::default());
        let form = shell(provider.clone(), tmp_dir.path());

        let outcome = form.plot("china", Some("000001"), "2023", "monthly").await.unwrap();
        assert_eq!(outcome, PlotOutcome::NoData);
        assert_eq!(provider.weekly_calls.load(Ordering::SeqCst), 52);
    }
}
