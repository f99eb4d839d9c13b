//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向图表前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。
//! 字段名遵循前端约定的 camelCase。

use kurabe_core::common::Timeframe;
use kurabe_core::compare::entity::{
    AlignedSeries, CandleKind, ComparedSeries, CompareQuery, Comparison, CustomRange,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  请求 DTO
// ============================================================

/// 自定义区间
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomRangeBody {
    /// 开始日期 (YYYY-MM-DD 或 RFC 3339)
    #[schema(example = "2024-01-01")]
    pub start: Option<String>,
    /// 结束日期 (YYYY-MM-DD 或 RFC 3339)
    #[schema(example = "2024-02-01")]
    pub end: Option<String>,
}

/// 派生蜡烛类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CandleStyle {
    /// 平均 K 线 `[haOpen, haClose, haLow, haHigh]`
    #[serde(rename = "heikin")]
    Heikin,
    /// 普通蜡烛 `[open, close, low, high]`
    #[serde(rename = "candlestick")]
    Candlestick,
}

/// 多标的对比请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockDataRequest {
    /// 股票代码列表，规范化 (去空白、转大写) 后不能为空
    #[serde(default)]
    #[schema(example = json!(["AAPL", "MSFT"]))]
    pub tickers: Vec<String>,
    /// 时间窗口: 1D / 1W / 1M / 3M / 1Y / YTD / MTD / CUSTOM，缺省为 1M
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "3M")]
    pub timeframe: Option<String>,
    /// 自定义区间，仅 CUSTOM 时使用开始日期
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_range: Option<CustomRangeBody>,
    /// 需要额外派生的蜡烛类型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candles: Option<CandleStyle>,
}

// ============================================================
//  响应 DTO
// ============================================================

/// 对齐后的 OHLC 四列，缺失交易日为 null
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OhlcResponse {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
}

/// 单个标的的对齐序列
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeriesResponse {
    /// 股票代码 (大写)
    #[schema(example = "AAPL")]
    pub ticker: String,
    /// 收盘价列，与 `ohlc.close` 相同
    pub closes: Vec<Option<f64>>,
    pub ohlc: OhlcResponse,
    /// 成交量列，0 为有效值，null 表示缺失
    pub volume: Vec<Option<f64>>,
    /// 派生蜡烛，仅在请求了 `candles` 时出现；未定义位置为 null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Option<Vec<f64>>>>)]
    pub candles: Option<Vec<Option<[f64; 4]>>>,
}

/// 对比结果：共享时间轴 + 各标的序列
///
/// # Invariants
/// - 每个序列的每一列长度都等于 `dates` 的长度。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockDataResponse {
    /// 共享时间轴 (YYYY-MM-DD，严格升序)
    #[schema(example = json!(["2024-01-02", "2024-01-03"]))]
    pub dates: Vec<String>,
    pub series: Vec<SeriesResponse>,
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// 错误描述信息
    #[schema(example = "tickers required")]
    pub message: String,
}

impl ErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

// ============================================================
//  DTO ↔ 领域模型 惯用转换 (impl From<T>)
// ============================================================

impl From<CandleStyle> for CandleKind {
    fn from(s: CandleStyle) -> Self {
        match s {
            CandleStyle::Heikin => CandleKind::HeikinAshi,
            CandleStyle::Candlestick => CandleKind::Candlestick,
        }
    }
}

impl From<StockDataRequest> for CompareQuery {
    fn from(r: StockDataRequest) -> Self {
        // 缺省与空串都按 1M 处理；无法识别的标签交由解析器走 1 个月回溯
        let tag = r
            .timeframe
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("1M");
        let timeframe = match tag.parse::<Timeframe>() {
            Ok(tf) => Some(tf),
            Err(e) => {
                tracing::warn!("{}, falling back to 1M lookback", e);
                None
            }
        };

        Self {
            tickers: r.tickers,
            timeframe,
            custom_range: r.custom_range.map(|c| CustomRange {
                start: c.start,
                end: c.end,
            }),
            candles: r.candles.map(Into::into),
        }
    }
}

impl From<ComparedSeries> for SeriesResponse {
    fn from(s: ComparedSeries) -> Self {
        let AlignedSeries {
            ticker,
            ohlc,
            volume,
        } = s.aligned;
        Self {
            ticker,
            closes: ohlc.close.clone(),
            ohlc: OhlcResponse {
                open: ohlc.open,
                high: ohlc.high,
                low: ohlc.low,
                close: ohlc.close,
            },
            volume,
            candles: s
                .candles
                .map(|c| c.into_iter().map(|b| b.map(|b| b.to_array())).collect()),
        }
    }
}

impl From<Comparison> for StockDataResponse {
    fn from(c: Comparison) -> Self {
        Self {
            dates: c.dates.iter().map(ToString::to_string).collect(),
            series: c.series.into_iter().map(Into::into).collect(),
        }
    }
}
