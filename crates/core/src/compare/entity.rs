use crate::common::Timeframe;
use crate::market::entity::DateKey;
use chrono::{DateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

/// # Summary
/// 用户提供的自定义区间，日期均为原始字符串。
///
/// # Invariants
/// - 字符串可为 `YYYY-MM-DD` 或 RFC 3339，无法解析时视为缺省。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// # Summary
/// 解析后的具体时间区间 `[start, end)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// # Summary
/// 请求附带的派生蜡烛图类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleKind {
    // 平均 K 线 (Heikin-Ashi)，递归平滑
    #[serde(rename = "heikin")]
    HeikinAshi,
    // 普通蜡烛图
    Candlestick,
}

/// # Summary
/// 一次多标的对比请求 (领域模型)。
///
/// # Invariants
/// - `tickers` 为用户原始输入，规范化与校验由服务负责。
/// - `timeframe` 为 None 表示标签缺省或无法识别，按 1 个月回溯处理。
#[derive(Debug, Clone, PartialEq)]
pub struct CompareQuery {
    pub tickers: Vec<String>,
    pub timeframe: Option<Timeframe>,
    pub custom_range: Option<CustomRange>,
    pub candles: Option<CandleKind>,
}

/// # Summary
/// 对齐到共享时间轴上的 OHLC 四列。
///
/// # Invariants
/// - 四列长度相同，等于共享时间轴长度。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OhlcColumns {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
}

impl OhlcColumns {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            open: Vec::with_capacity(len),
            high: Vec::with_capacity(len),
            low: Vec::with_capacity(len),
            close: Vec::with_capacity(len),
        }
    }

    /// 四列长度是否一致且等于 `len`
    pub fn is_uniform(&self, len: usize) -> bool {
        self.open.len() == len
            && self.high.len() == len
            && self.low.len() == len
            && self.close.len() == len
    }
}

/// # Summary
/// 单个标的对齐后的序列。
///
/// # Invariants
/// - 位置 i 为 None 表示该标的在 `dates[i]` 当天没有数据，与数值 0 严格区分。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub ticker: String,
    pub ohlc: OhlcColumns,
    pub volume: Vec<Option<f64>>,
}

impl AlignedSeries {
    /// 收盘价列 (折线图使用)
    pub fn closes(&self) -> &[Option<f64>] {
        &self.ohlc.close
    }
}

/// # Summary
/// 派生蜡烛，按图表层的输入顺序 `[open, close, low, high]` 序列化为四元数组。
///
/// 平均 K 线时四个字段分别为 `haOpen`、`haClose`、`haLow`、`haHigh`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleBar {
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
}

impl CandleBar {
    pub fn to_array(self) -> [f64; 4] {
        [self.open, self.close, self.low, self.high]
    }
}

impl Serialize for CandleBar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        for value in self.to_array() {
            tuple.serialize_element(&value)?;
        }
        tuple.end()
    }
}

/// # Summary
/// 对比结果中的单个标的：对齐序列 + 可选派生蜡烛。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedSeries {
    pub aligned: AlignedSeries,
    // None 表示该位置的蜡烛未定义 (输入缺失)
    pub candles: Option<Vec<Option<CandleBar>>>,
}

/// # Summary
/// 完整的对比结果。
///
/// # Invariants
/// - `dates` 严格升序且无重复。
/// - 每个序列的每一列长度都等于 `dates.len()`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub dates: Vec<DateKey>,
    pub series: Vec<ComparedSeries>,
}
