pub mod time;

use crate::market::error::MarketError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 系统支持的指数标的，封闭集合。
///
/// # Invariants
/// - 只包含上证指数、深证成指与道琼斯工业指数三种，其余市场不在支持范围内。
/// - 每个变体对应唯一的上游证券 ID（`市场前缀.代码`）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IndexCode {
    // 上证指数 (1.000001)
    ShanghaiComposite,
    // 深证成指 (0.399001)
    ShenzhenComponent,
    // 道琼斯工业平均指数 (100.DJIA)
    DowJones,
}

impl IndexCode {
    /// 全部支持的指数，按展示顺序排列。
    pub const ALL: [IndexCode; 3] = [
        IndexCode::ShanghaiComposite,
        IndexCode::ShenzhenComponent,
        IndexCode::DowJones,
    ];

    /// 用户侧使用的指数代码。
    pub fn code(&self) -> &'static str {
        match self {
            IndexCode::ShanghaiComposite => "000001",
            IndexCode::ShenzhenComponent => "399001",
            IndexCode::DowJones => "DJIA",
        }
    }

    /// # Summary
    /// 上游市场前缀。
    ///
    /// # Logic
    /// `1` 为沪市，`0` 为深市，`100` 为美股指数。
    pub fn market_prefix(&self) -> &'static str {
        match self {
            IndexCode::ShanghaiComposite => "1",
            IndexCode::ShenzhenComponent => "0",
            IndexCode::DowJones => "100",
        }
    }

    /// # Summary
    /// 拼接上游请求所需的证券 ID。
    ///
    /// # Returns
    /// 形如 `1.000001` 的字符串。
    pub fn secid(&self) -> String {
        format!("{}.{}", self.market_prefix(), self.code())
    }

    /// 中文简称，用于查询界面。
    pub fn local_name(&self) -> &'static str {
        match self {
            IndexCode::ShanghaiComposite => "上证指数",
            IndexCode::ShenzhenComponent => "深证成指",
            IndexCode::DowJones => "道琼斯指数",
        }
    }

    /// 英文全称，用于图表标题。
    pub fn chart_name(&self) -> &'static str {
        match self {
            IndexCode::ShanghaiComposite => "SSE Composite Index",
            IndexCode::ShenzhenComponent => "SZSE Component Index",
            IndexCode::DowJones => "Dow Jones Industrial Average",
        }
    }

    pub fn country(&self) -> Country {
        match self {
            IndexCode::ShanghaiComposite | IndexCode::ShenzhenComponent => Country::China,
            IndexCode::DowJones => Country::Usa,
        }
    }

    /// # Summary
    /// 日线查询是否要求返回日期与请求日期严格一致。
    ///
    /// # Logic
    /// 上游对道琼斯序列会在请求区间外静默替换为最近交易日，
    /// 因此仅道琼斯日线查询启用严格校验，其余查询保持原样透传。
    pub fn requires_exact_daily_date(&self) -> bool {
        matches!(self, IndexCode::DowJones)
    }
}

impl FromStr for IndexCode {
    type Err = MarketError;

    /// # Summary
    /// 将指数代码解析为具体指数。
    ///
    /// # Logic
    /// 1. 字面量 `DJIA`（不区分大小写）路由至道琼斯。
    /// 2. `000001` 路由至沪市，`399001` 路由至深市，均要求完全匹配。
    /// 3. 其余输入视为非法标识，不会默认落到深市。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.eq_ignore_ascii_case("DJIA") {
            Ok(IndexCode::DowJones)
        } else if code == "000001" {
            Ok(IndexCode::ShanghaiComposite)
        } else if code == "399001" {
            Ok(IndexCode::ShenzhenComponent)
        } else {
            Err(MarketError::InvalidInput(format!(
                "unsupported index code: '{}'",
                s
            )))
        }
    }
}

impl std::fmt::Display for IndexCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.local_name(), self.code())
    }
}

/// # Summary
/// 国家选择，决定可供查询的指数范围。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Country {
    China,
    Usa,
}

impl Country {
    /// # Summary
    /// 返回该国家下提供的指数列表。
    ///
    /// # Returns
    /// 按展示顺序排列的指数集合，第一个即默认选项。
    pub fn indices(&self) -> Vec<IndexCode> {
        IndexCode::ALL
            .into_iter()
            .filter(|index| index.country() == *self)
            .collect()
    }

    pub fn offers(&self, index: IndexCode) -> bool {
        index.country() == *self
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "china" | "cn" | "中国" => Ok(Country::China),
            "usa" | "us" | "美国" => Ok(Country::Usa),
            _ => Err(format!("Unknown country: {}", s)),
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::China => write!(f, "中国"),
            Country::Usa => write!(f, "美国"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_routing_is_exact() {
        assert_eq!(
            "000001".parse::<IndexCode>().unwrap(),
            IndexCode::ShanghaiComposite
        );
        assert_eq!(
            "399001".parse::<IndexCode>().unwrap(),
            IndexCode::ShenzhenComponent
        );
        assert_eq!("djia".parse::<IndexCode>().unwrap(), IndexCode::DowJones);
        assert!("600519".parse::<IndexCode>().is_err());
        assert!("0000012".parse::<IndexCode>().is_err());
        assert!("399001.SZ".parse::<IndexCode>().is_err());
        assert!("".parse::<IndexCode>().is_err());
    }

    #[test]
    fn test_secid_prefixes() {
        assert_eq!(IndexCode::ShanghaiComposite.secid(), "1.000001");
        assert_eq!(IndexCode::ShenzhenComponent.secid(), "0.399001");
        assert_eq!(IndexCode::DowJones.secid(), "100.DJIA");
    }

    #[test]
    fn test_country_gating() {
        assert_eq!(
            Country::China.indices(),
            vec![IndexCode::ShanghaiComposite, IndexCode::ShenzhenComponent]
        );
        assert_eq!(Country::Usa.indices(), vec![IndexCode::DowJones]);
        assert!(!Country::China.offers(IndexCode::DowJones));
        assert_eq!("美国".parse::<Country>().unwrap(), Country::Usa);
    }

    #[test]
    fn test_only_dow_requires_exact_daily_date() {
        assert!(IndexCode::DowJones.requires_exact_daily_date());
        assert!(!IndexCode::ShanghaiComposite.requires_exact_daily_date());
        assert!(!IndexCode::ShenzhenComponent.requires_exact_daily_date());
    }
}
