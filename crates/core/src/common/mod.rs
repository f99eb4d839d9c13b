pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 证券标的实体，代表一次对比请求中的单个股票代码。
///
/// # Invariants
/// - `symbol` 已经过规范化：去除首尾空白并转为大写，且非空。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stock {
    // 股票代码 (例如: AAPL, 7203.T)
    pub symbol: String,
}

impl Stock {
    /// # Summary
    /// 将用户输入的原始代码规范化为证券实体。
    ///
    /// # Logic
    /// 1. 去除首尾空白。
    /// 2. 转为大写。
    /// 3. 空串视为无效输入。
    ///
    /// # Arguments
    /// * `raw`: 用户输入的代码。
    ///
    /// # Returns
    /// 合法时返回 `Some(Stock)`，否则返回 None。
    pub fn normalize(raw: &str) -> Option<Self> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        Some(Self { symbol })
    }
}

/// # Summary
/// 对比窗口的符号化时间周期标签。
///
/// # Invariants
/// - 标签与字符串一一对应 (`1D`, `1W`, `1M`, `3M`, `1Y`, `YTD`, `MTD`, `CUSTOM`)，大小写敏感。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Timeframe {
    // 最近 1 天
    #[serde(rename = "1D")]
    OneDay,
    // 最近 1 周
    #[serde(rename = "1W")]
    OneWeek,
    // 最近 1 个月
    #[serde(rename = "1M")]
    OneMonth,
    // 最近 3 个月
    #[serde(rename = "3M")]
    ThreeMonths,
    // 最近 1 年
    #[serde(rename = "1Y")]
    OneYear,
    // 年初至今
    #[serde(rename = "YTD")]
    YearToDate,
    // 月初至今
    #[serde(rename = "MTD")]
    MonthToDate,
    // 自定义区间
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(Timeframe::OneDay),
            "1W" => Ok(Timeframe::OneWeek),
            "1M" => Ok(Timeframe::OneMonth),
            "3M" => Ok(Timeframe::ThreeMonths),
            "1Y" => Ok(Timeframe::OneYear),
            "YTD" => Ok(Timeframe::YearToDate),
            "MTD" => Ok(Timeframe::MonthToDate),
            "CUSTOM" => Ok(Timeframe::Custom),
            _ => Err(format!("Unknown Timeframe: {}", s)),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::OneDay => write!(f, "1D"),
            Timeframe::OneWeek => write!(f, "1W"),
            Timeframe::OneMonth => write!(f, "1M"),
            Timeframe::ThreeMonths => write!(f, "3M"),
            Timeframe::OneYear => write!(f, "1Y"),
            Timeframe::YearToDate => write!(f, "YTD"),
            Timeframe::MonthToDate => write!(f, "MTD"),
            Timeframe::Custom => write!(f, "CUSTOM"),
        }
    }
}
