use crate::error::ChartError;
use crate::kind::ChartKind;
use indexlens_core::common::IndexCode;
use indexlens_core::config::ChartConfig;
use indexlens_market::resample::resample_monthly;
use indexlens_market::series::CandleSeries;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 每根 K 线在 X 轴上占用的坐标单位，成交量柱左右各占一半
const SLOT: usize = 2;

const RISING: RGBColor = RGBColor(14, 203, 129);
const FALLING: RGBColor = RGBColor(246, 70, 93);
const AREA_LINE: RGBColor = RGBColor(30, 100, 200);

/// # Summary
/// 图表渲染器，将有序 K 线序列绘制为 PNG 文件。
///
/// # Invariants
/// - 输入序列为空时不调用任何绘图接口，也不创建文件。
/// - 非交易日不占用 X 轴位置。
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// 输出文件路径：`<output_dir>/<code>_<year>_<kind>.png`
    pub fn output_path(&self, kind: ChartKind, index: IndexCode, year: i32) -> PathBuf {
        Path::new(&self.config.output_dir).join(format!("{}_{}_{}.png", index.code(), year, kind))
    }

    /// # Summary
    /// 渲染指定类型的图表。
    ///
    /// # Logic
    /// 1. 月线图先将周线序列重采样为月线。
    /// 2. 序列为空时直接返回 `Ok(None)`。
    /// 3. 创建输出目录，按类型绘制蜡烛图或面积图。
    ///
    /// # Arguments
    /// * `kind`: 图表类型。
    /// * `index`: 指数标的，用于标题与文件名。
    /// * `year`: 年份。
    /// * `weekly`: 年度聚合得到的周线序列。
    ///
    /// # Returns
    /// 成功返回生成的文件路径；无数据时返回 None。
    pub fn render(
        &self,
        kind: ChartKind,
        index: IndexCode,
        year: i32,
        weekly: &CandleSeries,
    ) -> Result<Option<PathBuf>, ChartError> {
        let monthly;
        let series = match kind {
            ChartKind::Monthly => {
                monthly = resample_monthly(weekly);
                &monthly
            }
            ChartKind::Weekly | ChartKind::Area => weekly,
        };

        if series.is_empty() {
            debug!("Nothing to render for {} {} {}", index.code(), year, kind);
            return Ok(None);
        }

        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self.output_path(kind, index, year);
        let title = format!("{} {} {} Chart", year, index.chart_name(), kind.title());

        if kind.has_volume_panel() {
            self.draw_candles(&path, &title, kind, series)?;
        } else {
            self.draw_area(&path, &title, kind, series)?;
        }

        info!("Rendered {} candles to {}", series.len(), path.display());
        Ok(Some(path))
    }

    /// # Summary
    /// 绘制蜡烛图与成交量副图。
    ///
    /// # Logic
    /// 1. 画布按 7:3 上下分割，上半部分为价格，下半部分为成交量。
    /// 2. 两个子图共享同一套 X 轴槽位。
    fn draw_candles(
        &self,
        path: &Path,
        title: &str,
        kind: ChartKind,
        series: &CandleSeries,
    ) -> Result<(), ChartError> {
        let (y_min, y_max) = padded_price_range(series);
        let x_range = 0..slot_center(series.len());
        let dates: Vec<String> = series
            .iter()
            .map(|c| c.date.format(kind.date_format()).to_string())
            .collect();
        let label = |x: &usize| slot_label(*x, &dates);
        let body_width = self.candle_body_width(series.len());

        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;
        let root = root
            .titled(title, ("sans-serif", 28.0).into_font())
            .map_err(backend)?;
        let split = i32::try_from(self.config.height * 7 / 10).unwrap_or(i32::MAX);
        let (upper, lower) = root.split_vertically(split);

        let mut price = ChartBuilder::on(&upper)
            .margin(10)
            .x_label_area_size(0)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), y_min..y_max)
            .map_err(backend)?;
        price
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(12)
            .x_label_formatter(&|_: &usize| String::new())
            .y_desc("Price")
            .draw()
            .map_err(backend)?;
        price
            .draw_series(series.iter().enumerate().map(|(i, c)| {
                CandleStick::new(
                    slot_center(i),
                    c.open,
                    c.high,
                    c.low,
                    c.close,
                    RISING.filled(),
                    FALLING.filled(),
                    body_width,
                )
            }))
            .map_err(backend)?;

        let volume_top = series.max_volume().saturating_add(series.max_volume() / 10).max(1);
        let mut volume = ChartBuilder::on(&lower)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, 0u64..volume_top)
            .map_err(backend)?;
        volume
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(12)
            .x_label_formatter(&label)
            .y_desc("Volume")
            .draw()
            .map_err(backend)?;
        volume
            .draw_series(series.iter().enumerate().map(|(i, c)| {
                let center = slot_center(i);
                let color = if c.is_rising() { RISING } else { FALLING };
                let mut bar = Rectangle::new(
                    [(center - SLOT / 2, 0), (center + SLOT / 2, c.volume)],
                    color.mix(0.6).filled(),
                );
                bar.set_margin(0, 0, 1, 1);
                bar
            }))
            .map_err(backend)?;

        root.present().map_err(backend)?;
        Ok(())
    }

    /// # Summary
    /// 绘制收盘价面积图，填充至价格轴下沿，不带成交量。
    fn draw_area(
        &self,
        path: &Path,
        title: &str,
        kind: ChartKind,
        series: &CandleSeries,
    ) -> Result<(), ChartError> {
        let (y_min, y_max) = padded_close_range(series);
        let dates: Vec<String> = series
            .iter()
            .map(|c| c.date.format(kind.date_format()).to_string())
            .collect();
        let label = |x: &usize| slot_label(*x, &dates);

        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28.0).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0..slot_center(series.len()), y_min..y_max)
            .map_err(backend)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(12)
            .x_label_formatter(&label)
            .y_desc("Price")
            .draw()
            .map_err(backend)?;
        chart
            .draw_series(
                AreaSeries::new(
                    series.iter().enumerate().map(|(i, c)| (slot_center(i), c.close)),
                    y_min,
                    AREA_LINE.mix(0.25).filled(),
                )
                .border_style(AREA_LINE.stroke_width(2)),
            )
            .map_err(backend)?;

        root.present().map_err(backend)?;
        Ok(())
    }

    /// 蜡烛实体宽度（像素），按根数自适应
    fn candle_body_width(&self, count: usize) -> u32 {
        let count = u32::try_from(count).unwrap_or(u32::MAX).max(1);
        (self.config.width * 6 / 10 / count).clamp(1, 15)
    }
}

/// 第 `i` 根 K 线的 X 轴中心坐标，首尾各留一个槽位。
fn slot_center(i: usize) -> usize {
    (i + 1) * SLOT
}

/// X 轴刻度标签：只有落在槽位中心的刻度显示对应日期。
fn slot_label(x: usize, dates: &[String]) -> String {
    if x % SLOT != 0 {
        return String::new();
    }
    (x / SLOT)
        .checked_sub(1)
        .and_then(|i| dates.get(i))
        .cloned()
        .unwrap_or_default()
}

/// 价格区间上下各留 5% 余量。
fn padded_price_range(series: &CandleSeries) -> (f64, f64) {
    let (low, high) = series.price_bounds().unwrap_or((0.0, 1.0));
    pad(low, high)
}

fn padded_close_range(series: &CandleSeries) -> (f64, f64) {
    let low = series.iter().map(|c| c.close).fold(f64::INFINITY, f64::min);
    let high = series.iter().map(|c| c.close).fold(f64::NEG_INFINITY, f64::max);
    if low.is_finite() && high.is_finite() {
        pad(low, high)
    } else {
        (0.0, 1.0)
    }
}

fn pad(low: f64, high: f64) -> (f64, f64) {
    let padding = ((high - low) * 0.05).max(1e-6);
    (low - padding, high + padding)
}

fn backend<E: Display>(e: E) -> ChartError {
    ChartError::Backend(e.to_string())
}
