use std::str::FromStr;

/// # Summary
/// 图表类型。
///
/// # Invariants
/// - 周线图与月线图为蜡烛图并附带成交量副图，面积图只绘制收盘价。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    // 周线蜡烛图
    Weekly,
    // 月线蜡烛图（由周线重采样）
    Monthly,
    // 收盘价面积图
    Area,
}

impl ChartKind {
    /// 标题中的类型名，例如 `2023 SSE Composite Index Weekly Chart`。
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Weekly => "Weekly",
            ChartKind::Monthly => "Monthly",
            ChartKind::Area => "Area",
        }
    }

    /// X 轴日期标签格式。
    pub fn date_format(&self) -> &'static str {
        match self {
            ChartKind::Weekly | ChartKind::Monthly => "%Y-%m",
            ChartKind::Area => "%Y-%m-%d",
        }
    }

    pub fn has_volume_panel(&self) -> bool {
        !matches!(self, ChartKind::Area)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "周线图" => Ok(ChartKind::Weekly),
            "monthly" | "month" | "月线图" => Ok(ChartKind::Monthly),
            "area" | "面积图" => Ok(ChartKind::Area),
            _ => Err(format!("Unknown chart type: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Weekly => write!(f, "weekly"),
            ChartKind::Monthly => write!(f, "monthly"),
            ChartKind::Area => write!(f, "area"),
        }
    }
}
