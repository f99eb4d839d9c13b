use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// # Summary
/// 交易日标识，以 `YYYY-MM-DD` 规范字符串形式作为跨标的的连接键。
///
/// # Invariants
/// - 只记录日历日，不含时间与时区。同一 DateKey 的两根 K 线视为同一交易日。
/// - 排序与其字符串形式的字典序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(pub NaiveDate);

impl DateKey {
    /// 规范字符串格式
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// 取 UTC 时刻所在的日历日
    pub fn from_utc(time: DateTime<Utc>) -> Self {
        Self(time.date_naive())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, Self::FORMAT).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// # Summary
/// 单个交易日的 OHLCV 数据。
///
/// # Invariants
/// - 抓取后不可变。
/// - `volume` 为 None 表示数据源未提供成交量，与成交量为 0 严格区分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    // 交易日
    pub date: DateKey,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: Option<f64>,
}

/// # Summary
/// 单个标的的原始日线序列。
///
/// # Invariants
/// - `bars` 按日期升序。
/// - 空序列是合法状态 (抓取失败同样降级为空序列)。
#[derive(Debug, Clone, PartialEq)]
pub struct TickerSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl TickerSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// 抓取失败时使用的空序列，保留标的身份
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// 该标的拥有数据的全部交易日集合
    pub fn date_keys(&self) -> BTreeSet<DateKey> {
        self.bars.iter().map(|b| b.date).collect()
    }
}
